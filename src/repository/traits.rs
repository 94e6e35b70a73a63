//! Repository Layer - Core Traits
//!
//! The engine only knows this interface. Implementations can use a JSON
//! file, SQLite, or anything else that stores one document.

use async_trait::async_trait;

use crate::domain::DomainResult;
use crate::store::PlannerDocument;

/// Load and save the whole planner document
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// `None` when nothing has been saved yet
    async fn load(&self) -> DomainResult<Option<PlannerDocument>>;

    /// Replace the stored document
    async fn save(&self, document: &PlannerDocument) -> DomainResult<()>;
}
