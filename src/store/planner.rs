//! Planner Engine
//!
//! Owns the state tree, the settings, the active day and the undo history.
//! Every mutating method runs its action against a draft copy of the state
//! and commits it in one step: a rejected action changes nothing, and an
//! accepted one records exactly one history snapshot.

use std::collections::BTreeMap;

use crate::domain::{
    CapacityStatus, Category, DayDataPatch, DayKey, DayLedger, DomainResult, FolderId, SlotId,
    TaskId, TaskRecord,
};

use super::actions::{self, ActionContext, RolloverSummary};
use super::history::History;
use super::settings::PlannerSettings;
use super::state::{PlannerDocument, PlannerState};
use super::views::{DrawerView, FolderView, TaskView};

pub struct Planner {
    state: PlannerState,
    settings: PlannerSettings,
    active_day: DayKey,
    history: History,
    /// Bumped on every committed change (state or settings)
    revision: u64,
}

impl Planner {
    /// Build from a loaded document. Does not run rollover; see `set_active_day`.
    pub fn new(document: PlannerDocument, active_day: DayKey) -> Self {
        let history = History::new(document.settings.history_limit);
        Self {
            state: document.state,
            settings: document.settings,
            active_day,
            history,
            revision: 0,
        }
    }

    pub fn document(&self) -> PlannerDocument {
        PlannerDocument {
            state: self.state.clone(),
            settings: self.settings.clone(),
        }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn active_day(&self) -> DayKey {
        self.active_day
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn commit<T>(
        &mut self,
        action: &str,
        apply: impl FnOnce(&mut PlannerState, &ActionContext<'_>) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let mut draft = self.state.clone();
        let ctx = ActionContext {
            day: self.active_day,
            settings: &self.settings,
        };

        let value = match apply(&mut draft, &ctx) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("{} rejected: {}", action, e);
                return Err(e);
            }
        };

        if draft != self.state {
            let previous = std::mem::replace(&mut self.state, draft);
            self.history.record(previous);
            self.revision += 1;
            log::debug!("{} committed (revision {})", action, self.revision);
        }
        Ok(value)
    }

    // ========================
    // Navigation + Rollover
    // ========================

    /// Switch the visible day and reconcile it before returning
    pub fn set_active_day(&mut self, day: DayKey) -> Option<RolloverSummary> {
        self.active_day = day;
        self.check_rollover(day)
    }

    /// Reconcile `day` against the day before.
    ///
    /// Rollover is bookkeeping, not a user action: it bumps the revision so
    /// the result is saved, but never records an undo snapshot.
    pub fn check_rollover(&mut self, day: DayKey) -> Option<RolloverSummary> {
        let summary = actions::check_rollover(&mut self.state, day)?;
        self.revision += 1;
        log::info!(
            "rollover {}: carried {} task(s), dropped {}",
            summary.day,
            summary.carried.len(),
            summary.dropped
        );
        Some(summary)
    }

    // ========================
    // Board
    // ========================

    pub fn add_task(&mut self, category: Category, title: &str) -> DomainResult<TaskId> {
        self.commit("add_task", |state, ctx| actions::add_task(state, ctx, category, title))
    }

    /// Returns the new completion state
    pub fn toggle_task(&mut self, task_id: &TaskId) -> DomainResult<bool> {
        self.commit("toggle_task", |state, ctx| actions::toggle_task(state, ctx, task_id))
    }

    pub fn delete_task(&mut self, task_id: &TaskId) -> DomainResult<()> {
        self.commit("delete_task", |state, _| actions::delete_task(state, task_id))
    }

    pub fn update_task_title(&mut self, task_id: &TaskId, title: &str) -> DomainResult<()> {
        self.commit("update_task_title", |state, _| actions::update_task_title(state, task_id, title))
    }

    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        target: Category,
        slot_id: Option<SlotId>,
        over: Option<&TaskId>,
    ) -> DomainResult<()> {
        self.commit("move_task", |state, ctx| {
            actions::move_task(state, ctx, task_id, target, slot_id, over)
        })
    }

    pub fn reorder_task(&mut self, active: &TaskId, over: &TaskId) -> DomainResult<()> {
        self.commit("reorder_task", |state, ctx| actions::reorder_task(state, ctx, active, over))
    }

    pub fn update_day_data(&mut self, patch: DayDataPatch) -> DomainResult<()> {
        self.commit("update_day_data", |state, ctx| actions::update_day_data(state, ctx, patch))
    }

    // ========================
    // Drawer
    // ========================

    pub fn add_drawer_folder(&mut self, name: &str) -> DomainResult<FolderId> {
        self.commit("add_drawer_folder", |state, _| actions::add_drawer_folder(state, name))
    }

    pub fn update_drawer_folder_title(&mut self, folder_id: &FolderId, name: &str) -> DomainResult<()> {
        self.commit("update_drawer_folder_title", |state, _| {
            actions::update_drawer_folder_title(state, folder_id, name)
        })
    }

    pub fn toggle_drawer_folder(&mut self, folder_id: &FolderId) -> DomainResult<bool> {
        self.commit("toggle_drawer_folder", |state, _| actions::toggle_drawer_folder(state, folder_id))
    }

    pub fn delete_drawer_folder(&mut self, folder_id: &FolderId) -> DomainResult<()> {
        self.commit("delete_drawer_folder", |state, _| actions::delete_drawer_folder(state, folder_id))
    }

    pub fn add_drawer_task(&mut self, title: &str, folder_id: Option<FolderId>) -> DomainResult<TaskId> {
        self.commit("add_drawer_task", |state, ctx| actions::add_drawer_task(state, ctx, title, folder_id))
    }

    pub fn toggle_drawer_task(&mut self, task_id: &TaskId) -> DomainResult<bool> {
        self.commit("toggle_drawer_task", |state, _| actions::toggle_drawer_task(state, task_id))
    }

    pub fn delete_drawer_task(&mut self, task_id: &TaskId) -> DomainResult<()> {
        self.commit("delete_drawer_task", |state, _| actions::delete_drawer_task(state, task_id))
    }

    pub fn update_drawer_task_title(&mut self, task_id: &TaskId, title: &str) -> DomainResult<()> {
        self.commit("update_drawer_task_title", |state, _| {
            actions::update_drawer_task_title(state, task_id, title)
        })
    }

    pub fn move_drawer_task(
        &mut self,
        task_id: &TaskId,
        folder_id: Option<FolderId>,
        over: Option<&TaskId>,
    ) -> DomainResult<()> {
        self.commit("move_drawer_task", |state, _| {
            actions::move_drawer_task(state, task_id, folder_id, over)
        })
    }

    pub fn move_task_to_drawer(&mut self, task_id: &TaskId, folder_id: Option<FolderId>) -> DomainResult<()> {
        self.commit("move_task_to_drawer", |state, ctx| {
            actions::move_task_to_drawer(state, ctx, task_id, folder_id)
        })
    }

    pub fn move_task_from_drawer_to_day(
        &mut self,
        task_id: &TaskId,
        target: Category,
        slot_id: Option<SlotId>,
        over: Option<&TaskId>,
    ) -> DomainResult<()> {
        self.commit("move_task_from_drawer_to_day", |state, ctx| {
            actions::move_task_from_drawer_to_day(state, ctx, task_id, target, slot_id, over)
        })
    }

    // ========================
    // History + Settings
    // ========================

    /// Returns false when there was nothing to undo
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.state);
        if undone {
            self.revision += 1;
            self.check_rollover(self.active_day);
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.state);
        if redone {
            self.revision += 1;
            self.check_rollover(self.active_day);
        }
        redone
    }

    /// Replace settings. Not part of undo history.
    pub fn update_settings(&mut self, settings: PlannerSettings) {
        self.history.set_limit(settings.history_limit);
        self.settings = settings;
        self.revision += 1;
    }

    // ========================
    // Views
    // ========================

    pub fn task(&self, task_id: &TaskId) -> Option<&TaskRecord> {
        self.state.tasks.get(task_id)
    }

    pub fn day(&self, day: DayKey) -> Option<&DayLedger> {
        self.state.days.get(day)
    }

    /// Live placements of the active day, in order
    pub fn placements(&self) -> Vec<TaskView> {
        let Some(ledger) = self.state.days.get(self.active_day) else {
            return Vec::new();
        };
        ledger
            .live(&self.state.tasks)
            .filter_map(|p| self.state.tasks.get(&p.task_id).map(|task| TaskView::placed(p, task)))
            .collect()
    }

    pub fn column(&self, category: Category) -> Vec<TaskView> {
        self.placements()
            .into_iter()
            .filter(|view| view.category == category)
            .collect()
    }

    /// Scheduled placements grouped by slot
    pub fn timeline(&self) -> BTreeMap<SlotId, Vec<TaskView>> {
        let mut slots: BTreeMap<SlotId, Vec<TaskView>> = BTreeMap::new();
        for view in self.column(Category::Scheduled) {
            if let Some(slot) = view.slot_id.clone() {
                slots.entry(slot).or_default().push(view);
            }
        }
        slots
    }

    pub fn capacity_status(&self, category: Category) -> CapacityStatus {
        let open = self
            .state
            .days
            .get(self.active_day)
            .map_or(0, |ledger| ledger.open_count(&self.state.tasks, category));
        CapacityStatus {
            open,
            limit: self.settings.capacity.limit(category),
        }
    }

    pub fn drawer_view(&self) -> DrawerView {
        let drawer = &self.state.drawer;
        let tasks_in = |folder_id: Option<&FolderId>| -> Vec<TaskView> {
            drawer
                .entries_in(folder_id, &self.state.tasks)
                .filter_map(|entry| self.state.tasks.get(&entry.task_id).map(|task| TaskView::drawn(entry, task)))
                .collect()
        };

        DrawerView {
            inbox: tasks_in(None),
            folders: drawer
                .folders
                .iter()
                .map(|folder| FolderView {
                    folder: folder.clone(),
                    tasks: tasks_in(Some(&folder.id)),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CapacityMode, CapacityPolicy, DomainError};

    fn day(n: u32) -> DayKey {
        DayKey::from_ymd(2024, 10, n).unwrap()
    }

    fn planner() -> Planner {
        let mut document = PlannerDocument::default();
        document.settings.capacity = CapacityPolicy::unlimited().with_limit(Category::MustDo, 1);
        Planner::new(document, day(1))
    }

    #[test]
    fn test_rejected_action_changes_nothing() {
        let mut planner = planner();
        planner.add_task(Category::MustDo, "X").unwrap();
        let before = planner.state().clone();
        let revision = planner.revision();

        assert!(matches!(
            planner.add_task(Category::MustDo, "Y"),
            Err(DomainError::CapacityExceeded { .. })
        ));
        assert_eq!(planner.state(), &before);
        assert_eq!(planner.revision(), revision);
        assert_eq!(planner.column(Category::MustDo).len(), 1);
    }

    #[test]
    fn test_advisory_mode_allows_overfill() {
        let mut planner = planner();
        let mut settings = planner.settings().clone();
        settings.capacity.mode = CapacityMode::Advisory;
        planner.update_settings(settings);

        planner.add_task(Category::MustDo, "X").unwrap();
        planner.add_task(Category::MustDo, "Y").unwrap();
        assert_eq!(planner.capacity_status(Category::MustDo).open, 2);
        assert!(planner.capacity_status(Category::MustDo).is_full());
    }

    #[test]
    fn test_one_snapshot_per_action() {
        let mut planner = planner();
        let id = planner.add_task(Category::Todo, "A").unwrap();
        planner.move_task(&id, Category::Communications, None, None).unwrap();

        assert!(planner.undo());
        assert_eq!(planner.column(Category::Todo).len(), 1);
        assert_eq!(planner.task(&id).unwrap().category, Category::Todo);
        assert!(planner.undo());
        assert!(planner.task(&id).is_none());
        assert!(!planner.undo());
    }

    #[test]
    fn test_noop_action_records_no_history() {
        let mut planner = planner();
        let a = planner.add_task(Category::Todo, "A").unwrap();
        let revision = planner.revision();
        planner.reorder_task(&a, &a).unwrap();
        assert_eq!(planner.revision(), revision);
    }

    #[test]
    fn test_toggle_adopts_rolled_over_task() {
        let mut planner = planner();
        let a = planner.add_task(Category::Todo, "A").unwrap();
        planner.set_active_day(day(2)).expect("rollover should run");
        assert_eq!(planner.column(Category::Todo)[0].rolled_over_from, Some(day(1)));

        assert!(planner.toggle_task(&a).unwrap());
        let view = &planner.column(Category::Todo)[0];
        assert!(view.completed);
        assert_eq!(view.rolled_over_from, None);

        assert!(planner.check_rollover(day(2)).is_none());
        assert_eq!(planner.placements().len(), 1);
    }

    #[test]
    fn test_rollover_is_not_undoable() {
        let mut planner = planner();
        planner.add_task(Category::Todo, "A").unwrap();
        let mut next = Planner::new(planner.document(), day(2));
        assert!(next.check_rollover(day(2)).is_some());
        assert!(!next.can_undo());
        assert_eq!(next.column(Category::Todo).len(), 1);

        next.add_task(Category::Todo, "B").unwrap();
        assert!(next.undo());
        assert_eq!(next.column(Category::Todo).len(), 1);
        assert!(!next.undo());
    }

    #[test]
    fn test_undo_reconciles_active_day() {
        let mut planner = planner();
        planner.add_task(Category::Todo, "A").unwrap();
        planner.add_task(Category::Todo, "B").unwrap();
        planner.set_active_day(day(2));
        assert_eq!(planner.column(Category::Todo).len(), 2);

        // Back to before B existed; day 2 still shows A as carried over
        assert!(planner.undo());
        let todo = planner.column(Category::Todo);
        assert_eq!(todo.len(), 1);
        assert_eq!(todo[0].title, "A");
        assert_eq!(todo[0].rolled_over_from, Some(day(1)));
    }

    #[test]
    fn test_timeline_groups_by_slot() {
        let mut planner = planner();
        let a = planner.add_task(Category::Todo, "A").unwrap();
        let b = planner.add_task(Category::Todo, "B").unwrap();
        let nine = SlotId::at_hour(9).unwrap();
        planner.move_task(&a, Category::Scheduled, Some(nine.clone()), None).unwrap();
        planner.move_task(&b, Category::Scheduled, Some(nine.clone()), None).unwrap();

        let timeline = planner.timeline();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[&nine].len(), 2);
        assert!(planner.column(Category::Todo).is_empty());
    }

    #[test]
    fn test_drawer_view_skips_dangling_entries() {
        let mut planner = planner();
        let folder = planner.add_drawer_folder("Ideas").unwrap();
        planner.add_drawer_task("inbox task", None).unwrap();
        let filed = planner.add_drawer_task("filed task", Some(folder.clone())).unwrap();
        planner.state.tasks.remove(&filed);

        let view = planner.drawer_view();
        assert_eq!(view.inbox.len(), 1);
        assert_eq!(view.folders.len(), 1);
        assert!(view.folders[0].tasks.is_empty());
    }

    #[test]
    fn test_delete_folder_keeps_tasks() {
        let mut planner = planner();
        let folder = planner.add_drawer_folder("Ideas").unwrap();
        planner.add_drawer_task("filed task", Some(folder.clone())).unwrap();
        planner.delete_drawer_folder(&folder).unwrap();

        let view = planner.drawer_view();
        assert!(view.folders.is_empty());
        assert_eq!(view.inbox[0].title, "filed task");
    }

    #[test]
    fn test_update_day_data_is_undoable() {
        let mut planner = planner();
        planner
            .update_day_data(DayDataPatch {
                gratefulness: Some("sunshine".into()),
                reflections: None,
            })
            .unwrap();
        assert_eq!(planner.day(day(1)).unwrap().gratefulness, "sunshine");
        planner.undo();
        assert!(planner.day(day(1)).is_none());
    }
}
