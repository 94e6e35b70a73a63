//! Task Commands
//!
//! Board operations on the active day.

use crate::commands::AppState;
use crate::domain::{Category, SlotId, TaskId, TaskRecord};

/// Create a task in a column of the active day
pub async fn add_task(state: &AppState, category: Category, title: String) -> Result<TaskId, String> {
    state.run(|planner| planner.add_task(category, &title)).await
}

/// Flip completion, returns the new value
pub async fn toggle_task(state: &AppState, task_id: TaskId) -> Result<bool, String> {
    state.run(|planner| planner.toggle_task(&task_id)).await
}

/// Delete everywhere: registry, every day, drawer
pub async fn delete_task(state: &AppState, task_id: TaskId) -> Result<(), String> {
    state.run(|planner| planner.delete_task(&task_id)).await
}

pub async fn update_task_title(state: &AppState, task_id: TaskId, title: String) -> Result<(), String> {
    state.run(|planner| planner.update_task_title(&task_id, &title)).await
}

/// Move between columns or onto the timeline, optionally before `over_id`
pub async fn move_task(
    state: &AppState,
    task_id: TaskId,
    category: Category,
    slot_id: Option<SlotId>,
    over_id: Option<TaskId>,
) -> Result<(), String> {
    state
        .run(|planner| planner.move_task(&task_id, category, slot_id, over_id.as_ref()))
        .await
}

pub async fn reorder_task(state: &AppState, active_id: TaskId, over_id: TaskId) -> Result<(), String> {
    state.run(|planner| planner.reorder_task(&active_id, &over_id)).await
}

pub async fn get_task(state: &AppState, task_id: TaskId) -> Result<Option<TaskRecord>, String> {
    state.view(|planner| planner.task(&task_id).cloned()).await
}
