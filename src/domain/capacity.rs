//! Capacity Policy
//!
//! Per-category limits on open (not completed) placements within a day.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::error::{DomainError, DomainResult};
use super::ledger::DayLedger;
use super::task::TaskRegistry;

/// `true` when `ledger` already holds `limit` open placements in `category`.
///
/// Completed tasks never count. `None` or `Some(0)` means unlimited.
pub fn is_at_capacity(
    ledger: &DayLedger,
    registry: &TaskRegistry,
    category: Category,
    limit: Option<u32>,
) -> bool {
    match limit {
        Some(limit) if limit > 0 => ledger.open_count(registry, category) >= limit as usize,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CapacityMode {
    /// Reject intents that would overfill a column
    #[default]
    Strict,
    /// Allow them, but log a warning
    Advisory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityPolicy {
    pub limits: BTreeMap<Category, u32>,
    pub mode: CapacityMode,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self {
            limits: BTreeMap::from([(Category::MustDo, 3), (Category::Communications, 5)]),
            mode: CapacityMode::Strict,
        }
    }
}

impl CapacityPolicy {
    pub fn unlimited() -> Self {
        Self {
            limits: BTreeMap::new(),
            mode: CapacityMode::Strict,
        }
    }

    pub fn with_limit(mut self, category: Category, limit: u32) -> Self {
        self.limits.insert(category, limit);
        self
    }

    pub fn limit(&self, category: Category) -> Option<u32> {
        self.limits.get(&category).copied().filter(|limit| *limit > 0)
    }

    /// Admission check for one more open task in `category`
    pub fn check(&self, ledger: &DayLedger, registry: &TaskRegistry, category: Category) -> DomainResult<()> {
        let limit = self.limit(category);
        if !is_at_capacity(ledger, registry, category, limit) {
            return Ok(());
        }
        let limit = limit.unwrap_or_default();
        match self.mode {
            CapacityMode::Strict => Err(DomainError::CapacityExceeded { category, limit }),
            CapacityMode::Advisory => {
                log::warn!("{} is over its limit of {} (advisory)", category, limit);
                Ok(())
            }
        }
    }
}

/// Open count and limit of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityStatus {
    pub open: usize,
    pub limit: Option<u32>,
}

impl CapacityStatus {
    pub fn is_full(&self) -> bool {
        self.limit.map_or(false, |limit| self.open >= limit as usize)
    }
}
