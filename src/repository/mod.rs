//! Repository Layer
//!
//! Persistence of the planner document behind an async trait.

mod json_repo;
mod sqlite_repo;
mod traits;


pub use json_repo::JsonFileRepository;
pub use sqlite_repo::SqliteRepository;
pub use traits::StateRepository;
