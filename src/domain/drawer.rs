//! Drawer Entity
//!
//! Global inbox plus folders for tasks that are not placed on any day.
//! Entries reference registry tasks; `folder_id: None` is the inbox.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{DomainError, DomainResult};
use super::task::{TaskId, TaskRegistry};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FolderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_expanded: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerEntry {
    pub task_id: TaskId,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Drawer {
    pub folders: Vec<Folder>,
    #[serde(rename = "tasks")]
    pub entries: Vec<DrawerEntry>,
}

impl Drawer {
    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| &f.id == id)
    }

    pub fn folder_mut(&mut self, id: &FolderId) -> DomainResult<&mut Folder> {
        self.folders
            .iter_mut()
            .find(|f| &f.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("folder {}", id)))
    }

    /// `None` (inbox) always exists; a named folder must be present
    pub fn require_target(&self, folder_id: Option<&FolderId>) -> DomainResult<()> {
        match folder_id {
            Some(id) if self.folder(id).is_none() => {
                Err(DomainError::NotFound(format!("folder {}", id)))
            }
            _ => Ok(()),
        }
    }

    pub fn add_folder(&mut self, id: FolderId, name: String) {
        self.folders.push(Folder {
            id,
            name,
            is_expanded: true,
        });
    }

    /// Remove a folder, moving its entries to the inbox
    pub fn remove_folder(&mut self, id: &FolderId) -> DomainResult<Folder> {
        let index = self
            .folders
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("folder {}", id)))?;
        for entry in self.entries.iter_mut().filter(|e| e.folder_id.as_ref() == Some(id)) {
            entry.folder_id = None;
        }
        Ok(self.folders.remove(index))
    }

    pub fn entry(&self, task_id: &TaskId) -> Option<&DrawerEntry> {
        self.entries.iter().find(|e| &e.task_id == task_id)
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.entry(task_id).is_some()
    }

    pub fn remove(&mut self, task_id: &TaskId) -> Option<DrawerEntry> {
        let index = self.entries.iter().position(|e| &e.task_id == task_id)?;
        Some(self.entries.remove(index))
    }

    /// Place an entry before `over` (if found), otherwise at the end.
    /// An existing entry for the same task is replaced.
    pub fn insert_before(&mut self, entry: DrawerEntry, over: Option<&TaskId>) {
        self.remove(&entry.task_id);
        let index = over.and_then(|id| self.entries.iter().position(|e| &e.task_id == id));
        match index {
            Some(index) => self.entries.insert(index, entry),
            None => self.entries.push(entry),
        }
    }

    pub fn purge(&mut self, task_id: &TaskId) {
        self.entries.retain(|e| &e.task_id != task_id);
    }

    /// Live entries filed under `folder_id` (inbox for `None`)
    pub fn entries_in<'a>(
        &'a self,
        folder_id: Option<&'a FolderId>,
        registry: &'a TaskRegistry,
    ) -> impl Iterator<Item = &'a DrawerEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.folder_id.as_ref() == folder_id && registry.contains(&e.task_id))
    }
}
