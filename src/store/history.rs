//! Undo/Redo History
//!
//! Two bounded stacks of full state snapshots. One snapshot is recorded
//! per user-visible action, never per field write.

use std::collections::VecDeque;

use super::state::PlannerState;

#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<PlannerState>,
    future: Vec<PlannerState>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Push the pre-mutation snapshot and invalidate redo
    pub fn record(&mut self, previous: PlannerState) {
        self.past.push_back(previous);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Swap `current` with the most recent past snapshot
    pub fn undo(&mut self, current: &mut PlannerState) -> bool {
        match self.past.pop_back() {
            Some(previous) => {
                self.future.push(std::mem::replace(current, previous));
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self, current: &mut PlannerState) -> bool {
        match self.future.pop() {
            Some(next) => {
                self.past.push_back(std::mem::replace(current, next));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}
