//! Planner Settings
//!
//! Engine configuration, stored in the `"settings"` section of the
//! persisted document. Keys the engine does not know about (theme, window
//! chrome, sounds) are carried through untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{CapacityPolicy, DomainError, DomainResult, KeyPress, Shortcut, SlotId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerSettings {
    pub capacity: CapacityPolicy,
    pub timeline: TimelineSettings,
    /// Max number of undo steps kept
    pub history_limit: usize,
    /// Action name -> accelerator
    pub shortcuts: BTreeMap<String, Shortcut>,
    /// Presentation-only settings, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        let mut shortcuts = BTreeMap::new();
        if let Ok(undo) = "CmdOrCtrl+Z".parse() {
            shortcuts.insert("undo".to_string(), undo);
        }
        if let Ok(redo) = "CmdOrCtrl+Shift+Z".parse() {
            shortcuts.insert("redo".to_string(), redo);
        }
        Self {
            capacity: CapacityPolicy::default(),
            timeline: TimelineSettings::default(),
            history_limit: 50,
            shortcuts,
            extra: Map::new(),
        }
    }
}

impl PlannerSettings {
    /// Action bound to `press`, if any
    pub fn shortcut_action(&self, press: &KeyPress) -> Option<&str> {
        self.shortcuts
            .iter()
            .find(|(_, shortcut)| shortcut.matches(press))
            .map(|(action, _)| action.as_str())
    }
}

/// Visible hour range of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineSettings {
    pub start_hour: u32,
    /// Inclusive
    pub end_hour: u32,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 22,
        }
    }
}

impl TimelineSettings {
    pub fn validate(&self, slot: &SlotId) -> DomainResult<()> {
        let hour = slot.hour();
        if hour < self.start_hour || hour > self.end_hour {
            return Err(DomainError::InvalidInput(format!(
                "slot {} is outside the timeline ({:02}:00-{:02}:00)",
                slot, self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CapacityMode, Category};

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: PlannerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PlannerSettings::default());
        assert_eq!(settings.capacity.limit(Category::MustDo), Some(3));
        assert_eq!(settings.capacity.limit(Category::Todo), None);
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let raw = serde_json::json!({
            "theme": "dark",
            "soundEnabled": false,
            "capacity": { "limits": { "todo": 2 }, "mode": "advisory" }
        });
        let settings: PlannerSettings = serde_json::from_value(raw).unwrap();
        assert_eq!(settings.capacity.mode, CapacityMode::Advisory);
        assert_eq!(settings.capacity.limit(Category::Todo), Some(2));
        assert_eq!(settings.extra["theme"], "dark");

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["theme"], "dark");
        assert_eq!(back["soundEnabled"], false);
    }

    #[test]
    fn test_shortcut_action_lookup() {
        let settings = PlannerSettings::default();
        assert_eq!(settings.shortcut_action(&KeyPress::new("z").ctrl()), Some("undo"));
        assert_eq!(settings.shortcut_action(&KeyPress::new("z").meta().shift()), Some("redo"));
        assert_eq!(settings.shortcut_action(&KeyPress::new("q").ctrl()), None);
    }

    #[test]
    fn test_timeline_validation() {
        let timeline = TimelineSettings { start_hour: 8, end_hour: 10 };
        assert!(timeline.validate(&SlotId::at_hour(8).unwrap()).is_ok());
        assert!(timeline.validate(&SlotId::at_hour(9).unwrap()).is_ok());
        assert!(timeline.validate(&SlotId::at_hour(11).unwrap()).is_err());
    }
}
