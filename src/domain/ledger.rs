//! Day Ledger
//!
//! Per-day placement records. Order inside a ledger is the display order
//! of the columns and the timeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::category::{Category, SlotId};
use super::day_key::DayKey;
use super::task::{TaskId, TaskRegistry};

/// Where a task appears on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub task_id: TaskId,
    pub category: Category,
    /// Set only when `category` is `Scheduled`
    #[serde(default)]
    pub slot_id: Option<SlotId>,
    /// Day this placement was carried over from; `None` once adopted
    #[serde(default)]
    pub rolled_over_from: Option<DayKey>,
}

impl Placement {
    /// Unscheduled placement in a column
    pub fn in_column(task_id: TaskId, category: Category) -> Self {
        Self {
            task_id,
            category,
            slot_id: None,
            rolled_over_from: None,
        }
    }

    pub fn scheduled(task_id: TaskId, slot_id: SlotId) -> Self {
        Self {
            task_id,
            category: Category::Scheduled,
            slot_id: Some(slot_id),
            rolled_over_from: None,
        }
    }

    pub fn is_rolled_over(&self) -> bool {
        self.rolled_over_from.is_some()
    }
}

/// Everything recorded for one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayLedger {
    pub task_entries: Vec<Placement>,
    pub gratefulness: String,
    pub reflections: String,
    /// Reconciliation against the previous day has run at least once
    pub rollover_complete: bool,
}

impl DayLedger {
    pub fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.task_entries.iter().position(|p| &p.task_id == task_id)
    }

    pub fn get(&self, task_id: &TaskId) -> Option<&Placement> {
        self.task_entries.iter().find(|p| &p.task_id == task_id)
    }

    pub fn get_mut(&mut self, task_id: &TaskId) -> Option<&mut Placement> {
        self.task_entries.iter_mut().find(|p| &p.task_id == task_id)
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.position(task_id).is_some()
    }

    pub fn remove(&mut self, task_id: &TaskId) -> Option<Placement> {
        let index = self.position(task_id)?;
        Some(self.task_entries.remove(index))
    }

    /// Insert before `over` when it is present, otherwise append.
    ///
    /// Any existing placement for the same task is replaced.
    pub fn insert_before(&mut self, placement: Placement, over: Option<&TaskId>) {
        self.remove(&placement.task_id);
        match over.and_then(|id| self.position(id)) {
            Some(index) => self.task_entries.insert(index, placement),
            None => self.task_entries.push(placement),
        }
    }

    /// Placements whose task still exists
    pub fn live<'a>(&'a self, registry: &'a TaskRegistry) -> impl Iterator<Item = &'a Placement> + 'a {
        self.task_entries
            .iter()
            .filter(move |p| registry.contains(&p.task_id))
    }

    /// Open (not completed) live placements in `category`
    pub fn open_count(&self, registry: &TaskRegistry, category: Category) -> usize {
        self.task_entries
            .iter()
            .filter(|p| p.category == category && registry.is_open(&p.task_id))
            .count()
    }

    pub fn apply(&mut self, patch: DayDataPatch) {
        if let Some(gratefulness) = patch.gratefulness {
            self.gratefulness = gratefulness;
        }
        if let Some(reflections) = patch.reflections {
            self.reflections = reflections;
        }
    }
}

/// Partial update of a day's journal text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDataPatch {
    pub gratefulness: Option<String>,
    pub reflections: Option<String>,
}

/// All ledgers by day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLedgers {
    days: BTreeMap<DayKey, DayLedger>,
}

impl DayLedgers {
    pub fn get(&self, day: DayKey) -> Option<&DayLedger> {
        self.days.get(&day)
    }

    pub fn get_mut(&mut self, day: DayKey) -> Option<&mut DayLedger> {
        self.days.get_mut(&day)
    }

    /// Ledger for `day`, created empty on first access
    pub fn entry(&mut self, day: DayKey) -> &mut DayLedger {
        self.days.entry(day).or_default()
    }

    pub fn insert(&mut self, day: DayKey, ledger: DayLedger) {
        self.days.insert(day, ledger);
    }

    /// Drop every placement of `task_id` on every day
    pub fn purge(&mut self, task_id: &TaskId) {
        for ledger in self.days.values_mut() {
            ledger.task_entries.retain(|p| &p.task_id != task_id);
        }
    }

    pub fn references(&self, task_id: &TaskId) -> bool {
        self.days.values().any(|ledger| ledger.contains(task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskRecord;

    fn id(s: &str) -> TaskId {
        TaskId::from(s)
    }

    fn ledger(ids: &[&str]) -> DayLedger {
        DayLedger {
            task_entries: ids.iter().map(|s| Placement::in_column(id(s), Category::Todo)).collect(),
            ..Default::default()
        }
    }

    fn order(ledger: &DayLedger) -> Vec<&str> {
        ledger.task_entries.iter().map(|p| p.task_id.as_str()).collect()
    }

    #[test]
    fn test_insert_before_known_target() {
        let mut day = ledger(&["a", "b", "c"]);
        day.insert_before(Placement::in_column(id("c"), Category::Todo), Some(&id("a")));
        assert_eq!(order(&day), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_insert_before_missing_target_appends() {
        let mut day = ledger(&["a", "b"]);
        day.insert_before(Placement::in_column(id("x"), Category::Todo), Some(&id("zzz")));
        assert_eq!(order(&day), vec!["a", "b", "x"]);
    }

    #[test]
    fn test_open_count_skips_completed_and_dangling() {
        let today = DayKey::from_ymd(2024, 1, 1).unwrap();
        let mut registry = TaskRegistry::default();
        registry.insert(id("a"), TaskRecord::new("A".into(), Category::Todo, today));
        let mut done = TaskRecord::new("B".into(), Category::Todo, today);
        done.completed = true;
        registry.insert(id("b"), done);

        let day = ledger(&["a", "b", "ghost"]);
        assert_eq!(day.open_count(&registry, Category::Todo), 1);
        assert_eq!(day.live(&registry).count(), 2);
    }

    #[test]
    fn test_purge_all_days() {
        let mut days = DayLedgers::default();
        let d1 = DayKey::from_ymd(2024, 1, 1).unwrap();
        let d2 = DayKey::from_ymd(2024, 1, 2).unwrap();
        days.insert(d1, ledger(&["a", "b"]));
        days.insert(d2, ledger(&["a"]));

        days.purge(&id("a"));
        assert!(!days.references(&id("a")));
        assert!(days.references(&id("b")));
    }

    #[test]
    fn test_apply_partial_patch() {
        let mut day = DayLedger {
            gratefulness: "sun".to_string(),
            ..Default::default()
        };
        day.apply(DayDataPatch {
            gratefulness: None,
            reflections: Some("long day".to_string()),
        });
        assert_eq!(day.gratefulness, "sun");
        assert_eq!(day.reflections, "long day");
    }

    #[test]
    fn test_ledger_json_shape() {
        let day = ledger(&["a"]);
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "taskEntries": [
                    { "taskId": "a", "category": "todo", "slotId": null, "rolledOverFrom": null }
                ],
                "gratefulness": "",
                "reflections": "",
                "rolloverComplete": false
            })
        );
    }
}
