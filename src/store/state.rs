//! Planner State
//!
//! The single state tree: task registry, day ledgers and drawer. This is
//! also the unit of undo history.

use serde::{Deserialize, Serialize};

use crate::domain::{DayLedgers, Drawer, TaskId, TaskRegistry};

use super::settings::PlannerSettings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerState {
    pub tasks: TaskRegistry,
    pub days: DayLedgers,
    pub drawer: Drawer,
}

impl PlannerState {
    /// Remove a task from the registry and every structure referencing it
    pub fn purge_task(&mut self, task_id: &TaskId) {
        self.tasks.remove(task_id);
        self.days.purge(task_id);
        self.drawer.purge(task_id);
    }

    /// True if any ledger or drawer entry still points at `task_id`
    pub fn references(&self, task_id: &TaskId) -> bool {
        self.days.references(task_id) || self.drawer.contains(task_id)
    }
}

/// Everything that is persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerDocument {
    #[serde(flatten)]
    pub state: PlannerState,
    #[serde(default)]
    pub settings: PlannerSettings,
}

impl PlannerDocument {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
