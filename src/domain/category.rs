//! Categories and Time Slots
//!
//! A category is either a board column (a task's "home") or the timeline.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Column or timeline a placement is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    MustDo,
    Communications,
    #[default]
    Todo,
    /// Timeline placement; never a task's home
    Scheduled,
}

impl Category {
    /// Board columns, in display order
    pub const COLUMNS: [Category; 3] = [Category::MustDo, Category::Communications, Category::Todo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MustDo => "must-do",
            Category::Communications => "communications",
            Category::Todo => "todo",
            Category::Scheduled => "scheduled",
        }
    }

    /// True for categories that can be a task's home
    pub fn is_column(&self) -> bool {
        !matches!(self, Category::Scheduled)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "must-do" => Ok(Category::MustDo),
            "communications" => Ok(Category::Communications),
            "todo" => Ok(Category::Todo),
            "scheduled" => Ok(Category::Scheduled),
            other => Err(DomainError::InvalidInput(format!("unknown category '{}'", other))),
        }
    }
}

/// Hour bucket on the timeline, written as `HH:00` (e.g. `"14:00"`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotId(String);

impl SlotId {
    /// Hour bucket `HH:00`
    pub fn at_hour(hour: u32) -> Option<Self> {
        (hour < 24).then(|| Self(format!("{:02}:00", hour)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hour(&self) -> u32 {
        // always `HH:MM` once constructed
        self.0[..2].parse().unwrap_or(0)
    }
}

impl FromStr for SlotId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map_err(|_| DomainError::InvalidInput(format!("bad slot id '{}'", s)))?;
        // slots are whole-hour buckets
        if time.minute() != 0 {
            return Err(DomainError::InvalidInput(format!("slot id '{}' is not on the hour", s)));
        }
        Ok(Self(time.format("%H:%M").to_string()))
    }
}

impl TryFrom<String> for SlotId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotId> for String {
    fn from(slot: SlotId) -> Self {
        slot.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
