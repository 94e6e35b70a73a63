//! Planner Actions
//!
//! One function per user intent, each of the form `(state, args) -> result`.
//! They mutate the state they are given; the planner hands them a draft and
//! only commits it when the action succeeds, so a rejected action leaves no
//! partial writes behind.

use serde::Serialize;

use crate::domain::{
    normalize_title, reconcile, Category, DayDataPatch, DayKey, DomainError, DomainResult,
    DrawerEntry, FolderId, Placement, Reconciliation, SlotId, TaskId, TaskRecord,
};

use super::settings::PlannerSettings;
use super::state::PlannerState;

/// Read-only inputs every action may consult
pub struct ActionContext<'a> {
    /// The active day
    pub day: DayKey,
    pub settings: &'a PlannerSettings,
}

/// What a rollover run changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverSummary {
    pub day: DayKey,
    pub carried: Vec<TaskId>,
    pub dropped: usize,
}

// ========================
// Board Actions
// ========================

pub fn add_task(state: &mut PlannerState, ctx: &ActionContext<'_>, category: Category, title: &str) -> DomainResult<TaskId> {
    if !category.is_column() {
        return Err(DomainError::InvalidInput(format!(
            "tasks are created in a column, not '{}'",
            category
        )));
    }
    let title = normalize_title(title)?;

    let ledger = state.days.entry(ctx.day);
    ctx.settings.capacity.check(ledger, &state.tasks, category)?;

    let id = TaskId::generate();
    state.tasks.insert(id.clone(), TaskRecord::new(title, category, ctx.day));
    ledger.task_entries.push(Placement::in_column(id.clone(), category));
    Ok(id)
}

/// Flip completion; completing a carried-over task adopts it on the active day
pub fn toggle_task(state: &mut PlannerState, ctx: &ActionContext<'_>, task_id: &TaskId) -> DomainResult<bool> {
    let task = state.tasks.require_mut(task_id)?;
    task.completed = !task.completed;
    let completed = task.completed;

    if completed {
        if let Some(placement) = state.days.get_mut(ctx.day).and_then(|ledger| ledger.get_mut(task_id)) {
            placement.rolled_over_from = None;
        }
    }
    Ok(completed)
}

pub fn delete_task(state: &mut PlannerState, task_id: &TaskId) -> DomainResult<()> {
    state.tasks.require(task_id)?;
    state.purge_task(task_id);
    Ok(())
}

pub fn update_task_title(state: &mut PlannerState, task_id: &TaskId, title: &str) -> DomainResult<()> {
    let title = normalize_title(title)?;
    state.tasks.require_mut(task_id)?.title = title;
    Ok(())
}

/// Cross-container move on the active day
pub fn move_task(
    state: &mut PlannerState,
    ctx: &ActionContext<'_>,
    task_id: &TaskId,
    target: Category,
    slot_id: Option<SlotId>,
    over: Option<&TaskId>,
) -> DomainResult<()> {
    state.tasks.require(task_id)?;
    let current = state
        .days
        .get(ctx.day)
        .and_then(|ledger| ledger.get(task_id))
        .cloned()
        .ok_or_else(|| DomainError::NotFound(format!("task {} is not placed on {}", task_id, ctx.day)))?;

    place(state, ctx, task_id, target, slot_id, over, Some(&current))
}

/// Array-move: take `active` out and re-insert it at `over`'s index
pub fn reorder_task(state: &mut PlannerState, ctx: &ActionContext<'_>, active: &TaskId, over: &TaskId) -> DomainResult<()> {
    if active == over {
        return Ok(());
    }
    let ledger = state
        .days
        .get_mut(ctx.day)
        .ok_or_else(|| DomainError::NotFound(format!("no ledger for {}", ctx.day)))?;
    let from = ledger
        .position(active)
        .ok_or_else(|| DomainError::NotFound(format!("task {} on {}", active, ctx.day)))?;
    let to = ledger
        .position(over)
        .ok_or_else(|| DomainError::NotFound(format!("task {} on {}", over, ctx.day)))?;

    let placement = ledger.task_entries.remove(from);
    ledger.task_entries.insert(to, placement);
    Ok(())
}

pub fn update_day_data(state: &mut PlannerState, ctx: &ActionContext<'_>, patch: DayDataPatch) -> DomainResult<()> {
    state.days.entry(ctx.day).apply(patch);
    Ok(())
}

/// Reconcile `day` against the day before and store the result.
///
/// `None` means the ledger was already up to date (or has no predecessor).
pub fn check_rollover(state: &mut PlannerState, day: DayKey) -> Option<RolloverSummary> {
    let Reconciliation { ledger, carried, dropped } = reconcile(day, &state.days, &state.tasks, &state.drawer)?;
    state.days.insert(day, ledger);
    Some(RolloverSummary { day, carried, dropped })
}

/// Put `task_id` into `target` on the active day, replacing `current`.
///
/// Column moves update the registry's home category and go through the
/// capacity check (skipped for moves within the same column). Scheduling
/// leaves the home category alone. Any move out of the current column
/// adopts a carried-over placement; moves within it keep the marker.
fn place(
    state: &mut PlannerState,
    ctx: &ActionContext<'_>,
    task_id: &TaskId,
    target: Category,
    slot_id: Option<SlotId>,
    over: Option<&TaskId>,
    current: Option<&Placement>,
) -> DomainResult<()> {
    let ledger = state.days.entry(ctx.day);

    let placement = if target == Category::Scheduled {
        let slot_id = slot_id.ok_or_else(|| DomainError::InvalidInput("scheduling requires a slot".to_string()))?;
        ctx.settings.timeline.validate(&slot_id)?;
        Placement::scheduled(task_id.clone(), slot_id)
    } else {
        let same_column = current.map_or(false, |p| p.category == target);
        if !same_column {
            ctx.settings.capacity.check(ledger, &state.tasks, target)?;
        }
        state.tasks.require_mut(task_id)?.category = target;
        Placement {
            rolled_over_from: current.filter(|_| same_column).and_then(|p| p.rolled_over_from),
            ..Placement::in_column(task_id.clone(), target)
        }
    };

    match over {
        Some(over) if over == task_id => {
            let index = ledger.position(task_id).unwrap_or(ledger.task_entries.len());
            ledger.remove(task_id);
            ledger.task_entries.insert(index.min(ledger.task_entries.len()), placement);
        }
        _ => ledger.insert_before(placement, over),
    }
    Ok(())
}

// ========================
// Drawer Actions
// ========================

pub fn add_drawer_folder(state: &mut PlannerState, name: &str) -> DomainResult<FolderId> {
    let name = normalize_title(name)?;
    let id = FolderId::generate();
    state.drawer.add_folder(id.clone(), name);
    Ok(id)
}

pub fn update_drawer_folder_title(state: &mut PlannerState, folder_id: &FolderId, name: &str) -> DomainResult<()> {
    let name = normalize_title(name)?;
    state.drawer.folder_mut(folder_id)?.name = name;
    Ok(())
}

/// Returns the new expanded state
pub fn toggle_drawer_folder(state: &mut PlannerState, folder_id: &FolderId) -> DomainResult<bool> {
    let folder = state.drawer.folder_mut(folder_id)?;
    folder.is_expanded = !folder.is_expanded;
    Ok(folder.is_expanded)
}

/// Tasks filed in the folder move to the inbox
pub fn delete_drawer_folder(state: &mut PlannerState, folder_id: &FolderId) -> DomainResult<()> {
    state.drawer.remove_folder(folder_id)?;
    Ok(())
}

pub fn add_drawer_task(
    state: &mut PlannerState,
    ctx: &ActionContext<'_>,
    title: &str,
    folder_id: Option<FolderId>,
) -> DomainResult<TaskId> {
    let title = normalize_title(title)?;
    state.drawer.require_target(folder_id.as_ref())?;

    let id = TaskId::generate();
    state.tasks.insert(id.clone(), TaskRecord::new(title, Category::Todo, ctx.day));
    state.drawer.entries.push(DrawerEntry {
        task_id: id.clone(),
        folder_id,
    });
    Ok(id)
}

fn require_drawer_task(state: &PlannerState, task_id: &TaskId) -> DomainResult<()> {
    state.tasks.require(task_id)?;
    if state.drawer.contains(task_id) {
        Ok(())
    } else {
        Err(DomainError::NotFound(format!("task {} is not in the drawer", task_id)))
    }
}

pub fn toggle_drawer_task(state: &mut PlannerState, task_id: &TaskId) -> DomainResult<bool> {
    require_drawer_task(state, task_id)?;
    let task = state.tasks.require_mut(task_id)?;
    task.completed = !task.completed;
    Ok(task.completed)
}

pub fn delete_drawer_task(state: &mut PlannerState, task_id: &TaskId) -> DomainResult<()> {
    require_drawer_task(state, task_id)?;
    state.purge_task(task_id);
    Ok(())
}

pub fn update_drawer_task_title(state: &mut PlannerState, task_id: &TaskId, title: &str) -> DomainResult<()> {
    require_drawer_task(state, task_id)?;
    update_task_title(state, task_id, title)
}

/// Refile and/or reorder within the drawer
pub fn move_drawer_task(
    state: &mut PlannerState,
    task_id: &TaskId,
    folder_id: Option<FolderId>,
    over: Option<&TaskId>,
) -> DomainResult<()> {
    require_drawer_task(state, task_id)?;
    state.drawer.require_target(folder_id.as_ref())?;

    let entry = DrawerEntry {
        task_id: task_id.clone(),
        folder_id,
    };
    match over {
        Some(over) if over == task_id => {
            if let Some(existing) = state.drawer.entries.iter_mut().find(|e| &e.task_id == task_id) {
                *existing = entry;
            }
        }
        _ => state.drawer.insert_before(entry, over),
    }
    Ok(())
}

/// Park a task from the active day in the drawer
pub fn move_task_to_drawer(
    state: &mut PlannerState,
    ctx: &ActionContext<'_>,
    task_id: &TaskId,
    folder_id: Option<FolderId>,
) -> DomainResult<()> {
    state.tasks.require(task_id)?;
    state.drawer.require_target(folder_id.as_ref())?;
    state
        .days
        .get_mut(ctx.day)
        .and_then(|ledger| ledger.remove(task_id))
        .ok_or_else(|| DomainError::NotFound(format!("task {} is not placed on {}", task_id, ctx.day)))?;

    state.drawer.insert_before(
        DrawerEntry {
            task_id: task_id.clone(),
            folder_id,
        },
        None,
    );
    Ok(())
}

/// Take a task out of the drawer and place it on the active day
pub fn move_task_from_drawer_to_day(
    state: &mut PlannerState,
    ctx: &ActionContext<'_>,
    task_id: &TaskId,
    target: Category,
    slot_id: Option<SlotId>,
    over: Option<&TaskId>,
) -> DomainResult<()> {
    require_drawer_task(state, task_id)?;
    let current = state
        .days
        .get(ctx.day)
        .and_then(|ledger| ledger.get(task_id))
        .cloned();

    place(state, ctx, task_id, target, slot_id, over, current.as_ref())?;
    state.drawer.remove(task_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CapacityPolicy;

    struct Env {
        state: PlannerState,
        settings: PlannerSettings,
        day: DayKey,
    }

    impl Env {
        fn new() -> Self {
            Self {
                state: PlannerState::default(),
                settings: PlannerSettings {
                    capacity: CapacityPolicy::unlimited().with_limit(Category::MustDo, 1),
                    ..Default::default()
                },
                day: DayKey::from_ymd(2024, 9, 9).unwrap(),
            }
        }

        fn ctx(&self) -> ActionContext<'_> {
            ActionContext {
                day: self.day,
                settings: &self.settings,
            }
        }

        fn add(&mut self, category: Category, title: &str) -> DomainResult<TaskId> {
            let ctx = ActionContext {
                day: self.day,
                settings: &self.settings,
            };
            add_task(&mut self.state, &ctx, category, title)
        }

        fn order(&self) -> Vec<String> {
            self.state
                .days
                .get(self.day)
                .map(|l| l.task_entries.iter().map(|p| self.state.tasks.get(&p.task_id).unwrap().title.clone()).collect())
                .unwrap_or_default()
        }

        fn placement(&self, id: &TaskId) -> Placement {
            self.state.days.get(self.day).unwrap().get(id).unwrap().clone()
        }
    }

    #[test]
    fn test_add_task_rejects_scheduled_and_blank() {
        let mut env = Env::new();
        assert!(matches!(env.add(Category::Scheduled, "x"), Err(DomainError::InvalidInput(_))));
        assert_eq!(env.add(Category::Todo, "   "), Err(DomainError::InvalidTitle));
        assert!(env.state.tasks.is_empty());
    }

    #[test]
    fn test_move_to_schedule_keeps_home_category() {
        let mut env = Env::new();
        let id = env.add(Category::Todo, "Dentist").unwrap();
        let ctx = ActionContext { day: env.day, settings: &env.settings };
        move_task(&mut env.state, &ctx, &id, Category::Scheduled, SlotId::at_hour(14), None).unwrap();

        assert_eq!(env.state.tasks.get(&id).unwrap().category, Category::Todo);
        let placement = env.placement(&id);
        assert_eq!(placement.category, Category::Scheduled);
        assert_eq!(placement.slot_id, SlotId::at_hour(14));
    }

    #[test]
    fn test_schedule_requires_valid_slot() {
        let mut env = Env::new();
        let id = env.add(Category::Todo, "Gym").unwrap();
        let ctx = ActionContext { day: env.day, settings: &env.settings };
        assert!(move_task(&mut env.state, &ctx, &id, Category::Scheduled, None, None).is_err());
        assert!(move_task(&mut env.state, &ctx, &id, Category::Scheduled, SlotId::at_hour(3), None).is_err());
    }

    #[test]
    fn test_move_to_full_column_is_rejected() {
        let mut env = Env::new();
        env.add(Category::MustDo, "X").unwrap();
        let y = env.add(Category::Todo, "Y").unwrap();
        let ctx = ActionContext { day: env.day, settings: &env.settings };
        assert_eq!(
            move_task(&mut env.state, &ctx, &y, Category::MustDo, None, None),
            Err(DomainError::CapacityExceeded { category: Category::MustDo, limit: 1 })
        );
    }

    #[test]
    fn test_move_within_full_column_is_allowed() {
        let mut env = Env::new();
        let x = env.add(Category::MustDo, "X").unwrap();
        let ctx = ActionContext { day: env.day, settings: &env.settings };
        assert!(move_task(&mut env.state, &ctx, &x, Category::MustDo, None, None).is_ok());
    }

    #[test]
    fn test_move_before_over_task() {
        let mut env = Env::new();
        let a = env.add(Category::Todo, "A").unwrap();
        env.add(Category::Todo, "B").unwrap();
        let c = env.add(Category::Todo, "C").unwrap();
        let ctx = ActionContext { day: env.day, settings: &env.settings };
        move_task(&mut env.state, &ctx, &c, Category::Todo, None, Some(&a)).unwrap();
        assert_eq!(env.order(), vec!["C", "A", "B"]);

        let ctx = env.ctx();
        let mut state = env.state.clone();
        move_task(&mut state, &ctx, &a, Category::Todo, None, Some(&a)).unwrap();
        assert_eq!(state, env.state);
    }

    #[test]
    fn test_rollover_marker_rules_on_move() {
        let mut env = Env::new();
        let a = env.add(Category::Todo, "A").unwrap();
        let yesterday = env.day.previous();
        env.state.days.entry(env.day).get_mut(&a).unwrap().rolled_over_from = yesterday;
        let ctx = ActionContext { day: env.day, settings: &env.settings };

        move_task(&mut env.state, &ctx, &a, Category::Todo, None, None).unwrap();
        assert_eq!(env.placement(&a).rolled_over_from, yesterday);

        move_task(&mut env.state, &ctx, &a, Category::Communications, None, None).unwrap();
        assert_eq!(env.placement(&a).rolled_over_from, None);
    }

    #[test]
    fn test_reorder_is_array_move() {
        let mut env = Env::new();
        let a = env.add(Category::Todo, "A").unwrap();
        env.add(Category::Todo, "B").unwrap();
        let c = env.add(Category::Todo, "C").unwrap();
        let ctx = ActionContext { day: env.day, settings: &env.settings };

        reorder_task(&mut env.state, &ctx, &a, &c).unwrap();
        assert_eq!(env.order(), vec!["B", "C", "A"]);
        reorder_task(&mut env.state, &ctx, &a, &TaskId::from("missing")).unwrap_err();
        assert_eq!(env.order(), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_drawer_round_trip_to_day() {
        let mut env = Env::new();
        let folder = add_drawer_folder(&mut env.state, "Later").unwrap();
        let ctx = ActionContext { day: env.day, settings: &env.settings };
        let id = add_drawer_task(&mut env.state, &ctx, "Read book", Some(folder.clone())).unwrap();
        assert!(env.state.drawer.contains(&id));

        move_task_from_drawer_to_day(&mut env.state, &ctx, &id, Category::Todo, None, None).unwrap();
        assert!(!env.state.drawer.contains(&id));
        assert_eq!(env.placement(&id).rolled_over_from, None);

        move_task_to_drawer(&mut env.state, &ctx, &id, Some(folder.clone())).unwrap();
        assert!(!env.state.days.get(env.day).unwrap().contains(&id));
        assert_eq!(env.state.drawer.entry(&id).unwrap().folder_id, Some(folder));
    }

    #[test]
    fn test_drawer_task_to_full_column_stays_in_drawer() {
        let mut env = Env::new();
        env.add(Category::MustDo, "X").unwrap();
        let ctx = ActionContext { day: env.day, settings: &env.settings };
        let id = add_drawer_task(&mut env.state, &ctx, "Y", None).unwrap();
        assert!(move_task_from_drawer_to_day(&mut env.state, &ctx, &id, Category::MustDo, None, None).is_err());
    }

    #[test]
    fn test_drawer_ops_require_drawer_membership() {
        let mut env = Env::new();
        let id = env.add(Category::Todo, "On the board").unwrap();
        assert!(toggle_drawer_task(&mut env.state, &id).is_err());
        assert!(delete_drawer_task(&mut env.state, &id).is_err());
        assert!(env.state.tasks.contains(&id));
    }

    #[test]
    fn test_add_drawer_task_to_missing_folder() {
        let mut env = Env::new();
        let ctx = ActionContext { day: env.day, settings: &env.settings };
        let result = add_drawer_task(&mut env.state, &ctx, "Lost", Some(FolderId::from("nope")));
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
