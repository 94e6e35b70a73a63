//! Domain Layer
//!
//! Core entities and the pure rules over them (capacity, rollover,
//! shortcut matching). Nothing in here performs I/O.

mod capacity;
mod category;
mod day_key;
mod drawer;
mod error;
mod ledger;
mod rollover;
mod shortcut;
mod task;

pub use capacity::{is_at_capacity, CapacityMode, CapacityPolicy, CapacityStatus};
pub use category::{Category, SlotId};
pub use day_key::DayKey;
pub use drawer::{Drawer, DrawerEntry, Folder, FolderId};
pub use error::{DomainError, DomainResult};
pub use ledger::{DayDataPatch, DayLedger, DayLedgers, Placement};
pub use rollover::{reconcile, Reconciliation};
pub use shortcut::{KeyPress, Shortcut};
pub use task::{normalize_title, TaskId, TaskRecord, TaskRegistry};
