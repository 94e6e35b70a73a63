//! Day Commands
//!
//! Navigation, rollover, journal text and the views of the active day.

use std::collections::BTreeMap;

use crate::commands::AppState;
use crate::domain::{CapacityStatus, Category, DayDataPatch, DayKey, DayLedger, SlotId};
use crate::store::{RolloverSummary, TaskView};

/// Switch days; the new day is reconciled before this returns
pub async fn set_active_day(state: &AppState, day: DayKey) -> Result<Option<RolloverSummary>, String> {
    state.run(|planner| Ok(planner.set_active_day(day))).await
}

pub async fn get_active_day(state: &AppState) -> Result<DayKey, String> {
    state.view(|planner| planner.active_day()).await
}

pub async fn check_rollover(state: &AppState, day: DayKey) -> Result<Option<RolloverSummary>, String> {
    state.run(|planner| Ok(planner.check_rollover(day))).await
}

pub async fn update_day_data(state: &AppState, patch: DayDataPatch) -> Result<(), String> {
    state.run(|planner| planner.update_day_data(patch)).await
}

pub async fn get_day(state: &AppState, day: DayKey) -> Result<Option<DayLedger>, String> {
    state.view(|planner| planner.day(day).cloned()).await
}

pub async fn get_column(state: &AppState, category: Category) -> Result<Vec<TaskView>, String> {
    state.view(|planner| planner.column(category)).await
}

pub async fn get_timeline(state: &AppState) -> Result<BTreeMap<SlotId, Vec<TaskView>>, String> {
    state.view(|planner| planner.timeline()).await
}

pub async fn get_capacity_status(state: &AppState, category: Category) -> Result<CapacityStatus, String> {
    state.view(|planner| planner.capacity_status(category)).await
}
