//! Store Layer
//!
//! The planner engine: a single state tree, settings, the active day and the
//! undo history, mutated only through named actions.

mod actions;
mod history;
mod planner;
mod settings;
mod state;
mod views;

pub use actions::RolloverSummary;
pub use history::History;
pub use planner::Planner;
pub use settings::{PlannerSettings, TimelineSettings};
pub use state::{PlannerDocument, PlannerState};
pub use views::{DrawerView, FolderView, TaskView};
