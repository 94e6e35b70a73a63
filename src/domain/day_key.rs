//! Day Keys
//!
//! Canonical `YYYY-MM-DD` keys for calendar days. Keys are always derived
//! from the *local* calendar date of a timestamp, never from its UTC date,
//! so a late-evening action does not land on tomorrow's ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::DomainError;

const FORMAT: &str = "%Y-%m-%d";

/// A local calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today in the system's local timezone
    pub fn today() -> Self {
        Self::from_datetime(&Local::now())
    }

    /// Calendar day of `at` as seen in its own timezone
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self(at.date_naive())
    }

    /// Shift by a signed number of days; `None` outside chrono's date range
    pub fn offset(self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        shifted.map(Self)
    }

    pub fn previous(self) -> Option<Self> {
        self.offset(-1)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), FORMAT)
            .map(Self)
            .map_err(|e| DomainError::InvalidInput(format!("bad day key '{}': {}", s, e)))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
