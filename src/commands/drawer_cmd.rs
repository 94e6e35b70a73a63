//! Drawer Commands
//!
//! Folders and parked tasks that belong to no day.

use crate::commands::AppState;
use crate::domain::{Category, FolderId, SlotId, TaskId};
use crate::store::DrawerView;

pub async fn get_drawer(state: &AppState) -> Result<DrawerView, String> {
    state.view(|planner| planner.drawer_view()).await
}

pub async fn add_drawer_folder(state: &AppState, name: String) -> Result<FolderId, String> {
    state.run(|planner| planner.add_drawer_folder(&name)).await
}

pub async fn update_drawer_folder_title(state: &AppState, folder_id: FolderId, name: String) -> Result<(), String> {
    state
        .run(|planner| planner.update_drawer_folder_title(&folder_id, &name))
        .await
}

/// Expand/collapse, returns the new expanded state
pub async fn toggle_drawer_folder(state: &AppState, folder_id: FolderId) -> Result<bool, String> {
    state.run(|planner| planner.toggle_drawer_folder(&folder_id)).await
}

/// Its tasks move to the inbox
pub async fn delete_drawer_folder(state: &AppState, folder_id: FolderId) -> Result<(), String> {
    state.run(|planner| planner.delete_drawer_folder(&folder_id)).await
}

pub async fn add_drawer_task(state: &AppState, title: String, folder_id: Option<FolderId>) -> Result<TaskId, String> {
    state.run(|planner| planner.add_drawer_task(&title, folder_id)).await
}

pub async fn toggle_drawer_task(state: &AppState, task_id: TaskId) -> Result<bool, String> {
    state.run(|planner| planner.toggle_drawer_task(&task_id)).await
}

pub async fn delete_drawer_task(state: &AppState, task_id: TaskId) -> Result<(), String> {
    state.run(|planner| planner.delete_drawer_task(&task_id)).await
}

pub async fn update_drawer_task_title(state: &AppState, task_id: TaskId, title: String) -> Result<(), String> {
    state
        .run(|planner| planner.update_drawer_task_title(&task_id, &title))
        .await
}

pub async fn move_drawer_task(
    state: &AppState,
    task_id: TaskId,
    folder_id: Option<FolderId>,
    over_id: Option<TaskId>,
) -> Result<(), String> {
    state
        .run(|planner| planner.move_drawer_task(&task_id, folder_id, over_id.as_ref()))
        .await
}

pub async fn move_task_to_drawer(state: &AppState, task_id: TaskId, folder_id: Option<FolderId>) -> Result<(), String> {
    state
        .run(|planner| planner.move_task_to_drawer(&task_id, folder_id))
        .await
}

pub async fn move_task_from_drawer_to_day(
    state: &AppState,
    task_id: TaskId,
    category: Category,
    slot_id: Option<SlotId>,
    over_id: Option<TaskId>,
) -> Result<(), String> {
    state
        .run(|planner| planner.move_task_from_drawer_to_day(&task_id, category, slot_id, over_id.as_ref()))
        .await
}
