//! Derived Views
//!
//! Read-only projections for the presentation layer. Placements and drawer
//! entries whose task no longer exists are skipped.

use serde::Serialize;

use crate::domain::{Category, DayKey, DrawerEntry, Folder, Placement, SlotId, TaskId, TaskRecord};

/// A task as it appears in one place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    pub created_on: DayKey,
    /// Home column from the registry
    pub home: Category,
    /// Where it is shown right now
    pub category: Category,
    pub slot_id: Option<SlotId>,
    pub rolled_over_from: Option<DayKey>,
}

impl TaskView {
    pub fn placed(placement: &Placement, task: &TaskRecord) -> Self {
        Self {
            id: placement.task_id.clone(),
            title: task.title.clone(),
            completed: task.completed,
            created_on: task.created_on,
            home: task.category,
            category: placement.category,
            slot_id: placement.slot_id.clone(),
            rolled_over_from: placement.rolled_over_from,
        }
    }

    pub fn drawn(entry: &DrawerEntry, task: &TaskRecord) -> Self {
        Self {
            id: entry.task_id.clone(),
            title: task.title.clone(),
            completed: task.completed,
            created_on: task.created_on,
            home: task.category,
            category: task.home(),
            slot_id: None,
            rolled_over_from: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderView {
    pub folder: Folder,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrawerView {
    pub inbox: Vec<TaskView>,
    pub folders: Vec<FolderView>,
}
