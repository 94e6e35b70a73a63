//! Keyboard Shortcuts
//!
//! Parsing and matching of accelerator strings like `"CmdOrCtrl+Shift+Z"`.
//! Recording shortcuts is a presentation concern and lives elsewhere.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A key press as reported by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

/// Parsed shortcut specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcut {
    key: String,
    cmd_or_ctrl: bool,
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
}

impl Shortcut {
    pub fn matches(&self, press: &KeyPress) -> bool {
        if !self.key.eq_ignore_ascii_case(press.key.trim()) {
            return false;
        }
        if self.alt != press.alt || self.shift != press.shift {
            return false;
        }
        if self.cmd_or_ctrl {
            press.ctrl || press.meta
        } else {
            self.ctrl == press.ctrl && self.meta == press.meta
        }
    }
}

impl FromStr for Shortcut {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidInput(format!("shortcut '{}': {}", s, reason));

        let mut shortcut = Shortcut {
            key: String::new(),
            cmd_or_ctrl: false,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        };

        for token in s.split('+').map(str::trim) {
            if token.is_empty() {
                return Err(invalid("empty segment"));
            }
            let flag = match token.to_ascii_lowercase().as_str() {
                "cmdorctrl" | "commandorcontrol" => &mut shortcut.cmd_or_ctrl,
                "ctrl" | "control" => &mut shortcut.ctrl,
                "alt" | "option" => &mut shortcut.alt,
                "shift" => &mut shortcut.shift,
                "meta" | "cmd" | "command" | "super" => &mut shortcut.meta,
                _ => {
                    if !shortcut.key.is_empty() {
                        return Err(invalid("more than one key"));
                    }
                    shortcut.key = token.to_string();
                    continue;
                }
            };
            *flag = true;
        }

        if shortcut.key.is_empty() {
            return Err(invalid("missing key"));
        }
        Ok(shortcut)
    }
}

impl TryFrom<String> for Shortcut {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Shortcut> for String {
    fn from(shortcut: Shortcut) -> Self {
        shortcut.to_string()
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.cmd_or_ctrl, "CmdOrCtrl"),
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
            (self.meta, "Meta"),
        ];
        for (_, name) in modifiers.iter().filter(|(on, _)| *on) {
            write!(f, "{}+", name)?;
        }
        if self.key.chars().count() == 1 {
            write!(f, "{}", self.key.to_uppercase())
        } else {
            write!(f, "{}", self.key)
        }
    }
}
