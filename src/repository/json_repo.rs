//! JSON File Repository
//!
//! Stores the document as one pretty-printed JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::traits::StateRepository;
use crate::domain::{DomainError, DomainResult};
use crate::store::PlannerDocument;

pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateRepository for JsonFileRepository {
    async fn load(&self) -> DomainResult<Option<PlannerDocument>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::storage(format!("read {}: {}", self.path.display(), e))),
        };
        let document = PlannerDocument::from_json(&raw)
            .map_err(|e| DomainError::storage(format!("parse {}: {}", self.path.display(), e)))?;
        Ok(Some(document))
    }

    async fn save(&self, document: &PlannerDocument) -> DomainResult<()> {
        let json = document.to_json().map_err(DomainError::storage)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(DomainError::storage)?;
        }

        // Write aside, then rename over the target
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await.map_err(DomainError::storage)?;
        tokio::fs::rename(&temp, &self.path).await.map_err(DomainError::storage)?;
        Ok(())
    }
}
