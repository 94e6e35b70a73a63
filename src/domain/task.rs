//! Task Entity and Registry
//!
//! The registry is the only owner of a task's title, home category and
//! completion flag. Day ledgers and the drawer hold `TaskId`s only.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::day_key::DayKey;
use super::error::{DomainError, DomainResult};

/// Opaque, process-unique task identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable attributes of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub title: String,
    /// Day the task was created (immutable)
    pub created_on: DayKey,
    pub completed: bool,
    /// Home column
    pub category: Category,
}

impl TaskRecord {
    pub fn new(title: String, category: Category, created_on: DayKey) -> Self {
        Self {
            title,
            created_on,
            completed: false,
            category,
        }
    }

    /// Home column for a fresh, unscheduled placement
    pub fn home(&self) -> Category {
        if self.category.is_column() {
            self.category
        } else {
            Category::Todo
        }
    }
}

/// Trim a user-supplied title, rejecting empty ones
pub fn normalize_title(title: &str) -> DomainResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(DomainError::InvalidTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Global task id -> record map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRegistry {
    tasks: BTreeMap<TaskId, TaskRecord>,
}

impl TaskRegistry {
    pub fn get(&self, id: &TaskId) -> Option<&TaskRecord> {
        self.tasks.get(id)
    }

    /// Lookup that turns a dangling id into `UnknownTask`
    pub fn require(&self, id: &TaskId) -> DomainResult<&TaskRecord> {
        self.tasks
            .get(id)
            .ok_or_else(|| DomainError::UnknownTask(id.clone()))
    }

    pub fn require_mut(&mut self, id: &TaskId) -> DomainResult<&mut TaskRecord> {
        self.tasks
            .get_mut(id)
            .ok_or_else(|| DomainError::UnknownTask(id.clone()))
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Task exists and is not completed
    pub fn is_open(&self, id: &TaskId) -> bool {
        self.tasks.get(id).map_or(false, |task| !task.completed)
    }

    pub fn insert(&mut self, id: TaskId, record: TaskRecord) {
        self.tasks.insert(id, record);
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<TaskRecord> {
        self.tasks.remove(id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
