//! Bootstrap against a real data directory. Kept in its own binary because
//! `launch` installs the process-wide logger.

use day_planner::commands;
use day_planner::domain::Category;
use day_planner::repository::{SqliteRepository, StateRepository};

#[tokio::test]
async fn launch_creates_store_and_logs() {
    let dir = tempfile::tempdir().unwrap();

    let state = day_planner::launch(dir.path().to_path_buf()).await.unwrap();
    let db_path = dir.path().join("day_planner.db");
    assert!(db_path.exists());
    assert!(dir.path().join("logs").join("DayPlanner.log").exists());

    let id = commands::add_task(&state, Category::MustDo, "Ship it".to_string())
        .await
        .unwrap();
    state.flush().await;

    let lines = rolling_logger::recent_lines();
    assert!(lines.iter().any(|l| l.contains("Planner ready for")));

    let reopened = SqliteRepository::open(&db_path).unwrap();
    let document = reopened.load().await.unwrap().expect("document saved");
    assert_eq!(document.state.tasks.get(&id).unwrap().title, "Ship it");
}

#[tokio::test]
async fn launch_fails_when_data_dir_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("not-a-dir");
    std::fs::write(&blocked, "occupied").unwrap();

    assert!(day_planner::launch(blocked).await.is_err());
}
