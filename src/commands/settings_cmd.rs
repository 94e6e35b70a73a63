//! Settings Commands

use crate::commands::AppState;
use crate::domain::KeyPress;
use crate::store::PlannerSettings;

pub async fn get_settings(state: &AppState) -> Result<PlannerSettings, String> {
    state.view(|planner| planner.settings().clone()).await
}

/// Replace settings; persisted but not undoable
pub async fn update_settings(state: &AppState, settings: PlannerSettings) -> Result<(), String> {
    state
        .run(|planner| {
            planner.update_settings(settings);
            Ok(())
        })
        .await
}

/// Action name bound to a key press, if any
pub async fn resolve_shortcut(state: &AppState, press: KeyPress) -> Result<Option<String>, String> {
    state
        .view(|planner| planner.settings().shortcut_action(&press).map(str::to_string))
        .await
}
