//! Day Planner Backend
//!
//! Layered architecture:
//! - domain: Core entities and pure rules (capacity, rollover, shortcuts)
//! - store: The planner engine with atomic actions and undo history
//! - repository: Persistence behind an async trait (JSON file, SQLite)
//! - commands: Async command handlers for a presentation layer

use std::path::PathBuf;
use std::sync::Arc;

pub mod commands;
pub mod domain;
pub mod repository;
pub mod store;

pub use commands::AppState;

use domain::DayKey;
use repository::SqliteRepository;

/// Bootstrap: logger, database, then the planner for today
pub async fn launch(data_dir: PathBuf) -> Result<AppState, String> {
    rolling_logger::init_logger(data_dir.join("logs"), "DayPlanner")
        .map_err(|e| format!("Failed to init logger: {}", e))?;

    let db_path = data_dir.join("day_planner.db");
    let repo = SqliteRepository::open(&db_path).map_err(|e| e.to_string())?;

    let today = DayKey::today();
    let state = AppState::open(Arc::new(repo), today)
        .await
        .map_err(|e| e.to_string())?;

    log::info!("Planner ready for {} ({})", today, db_path.display());
    Ok(state)
}
