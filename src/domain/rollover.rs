//! Rollover Engine
//!
//! Reconciles a day's ledger against the previous day's ledger:
//! - open tasks from yesterday are carried forward into their home column,
//!   unscheduled and marked `rolled_over_from = yesterday`
//! - existing placements are kept verbatim, except dangling ones and
//!   carried-over placements whose task has since been completed or parked
//!   in the drawer
//! - carried tasks already present today are not added twice
//!
//! Only one day back is consulted. A day that was never reconciled does not
//! propagate its tasks any further.

use std::collections::HashSet;

use super::day_key::DayKey;
use super::drawer::Drawer;
use super::ledger::{DayLedger, DayLedgers, Placement};
use super::task::{TaskId, TaskRegistry};

/// Outcome of reconciling one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub ledger: DayLedger,
    /// Tasks newly carried in from the previous day
    pub carried: Vec<TaskId>,
    /// Placements dropped as dangling or completed carry-overs
    pub dropped: usize,
}

/// Reconcile `day` against `day - 1`.
///
/// Returns `None` when there is nothing to write: no previous ledger, or the
/// result is identical to a ledger already marked complete.
pub fn reconcile(
    day: DayKey,
    days: &DayLedgers,
    registry: &TaskRegistry,
    drawer: &Drawer,
) -> Option<Reconciliation> {
    let yesterday = day.previous()?;
    let previous = days.get(yesterday)?;
    let current = days.get(day);

    let candidates = previous.task_entries.iter().filter_map(|placement| {
        let task = registry.get(&placement.task_id)?;
        if task.completed || drawer.contains(&placement.task_id) {
            return None;
        }
        Some(Placement {
            task_id: placement.task_id.clone(),
            category: task.home(),
            slot_id: None,
            rolled_over_from: Some(yesterday),
        })
    });

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut dropped = 0;
    for placement in current.map(|ledger| ledger.task_entries.as_slice()).unwrap_or_default() {
        let keep = match registry.get(&placement.task_id) {
            Some(task) => {
                !(placement.is_rolled_over() && (task.completed || drawer.contains(&placement.task_id)))
            }
            None => false,
        };
        if keep && seen.insert(placement.task_id.clone()) {
            entries.push(placement.clone());
        } else {
            dropped += 1;
        }
    }

    let mut carried = Vec::new();
    for candidate in candidates {
        if seen.insert(candidate.task_id.clone()) {
            carried.push(candidate.task_id.clone());
            entries.push(candidate);
        }
    }

    if let Some(existing) = current {
        if existing.rollover_complete && existing.task_entries == entries {
            return None;
        }
    }

    let ledger = DayLedger {
        task_entries: entries,
        rollover_complete: true,
        ..current.cloned().unwrap_or_default()
    };
    Some(Reconciliation {
        ledger,
        carried,
        dropped,
    })
}
