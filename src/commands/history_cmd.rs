//! History Commands

use serde::Serialize;

use crate::commands::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Returns false when there was nothing to undo
pub async fn undo(state: &AppState) -> Result<bool, String> {
    state.run(|planner| Ok(planner.undo())).await
}

pub async fn redo(state: &AppState) -> Result<bool, String> {
    state.run(|planner| Ok(planner.redo())).await
}

pub async fn get_history_status(state: &AppState) -> Result<HistoryStatus, String> {
    state
        .view(|planner| HistoryStatus {
            can_undo: planner.can_undo(),
            can_redo: planner.can_redo(),
        })
        .await
}
