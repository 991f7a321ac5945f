use crate::tui::action::Action;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Maps KeyEvents to Actions
#[derive(Debug, Clone, Deserialize)]
pub struct KeyBindings {
    #[serde(rename = "bindings")]
    bindings_list: Vec<KeyBinding>,

    #[serde(skip)]
    bindings_map: HashMap<KeyPattern, Action>,
}

/// Single keybinding entry
#[derive(Debug, Clone, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub action: Action,
}

impl KeyBinding {
    pub fn new(key: &str, action: Action) -> Self {
        Self {
            key: key.to_string(),
            action,
        }
    }
}

/// Pattern for matching key events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_list(vec![
            // Table scrolling
            KeyBinding::new("Up", Action::MoveUp),
            KeyBinding::new("Down", Action::MoveDown),
            KeyBinding::new("k", Action::MoveUp),
            KeyBinding::new("j", Action::MoveDown),
            KeyBinding::new("PageUp", Action::PageUp),
            KeyBinding::new("PageDown", Action::PageDown),
            KeyBinding::new("g", Action::GoToTop),
            KeyBinding::new("G", Action::GoToBottom),
            // Column selector
            KeyBinding::new("Tab", Action::NextColumn),
            KeyBinding::new("BackTab", Action::PrevColumn),
            KeyBinding::new("Right", Action::NextColumn),
            KeyBinding::new("Left", Action::PrevColumn),
            KeyBinding::new("Home", Action::FirstColumn),
            KeyBinding::new("End", Action::LastColumn),
            // Dataset operations
            KeyBinding::new("o", Action::ChooseFile),
            KeyBinding::new("u", Action::Upload),
            KeyBinding::new("t", Action::ViewTable),
            KeyBinding::new("F5", Action::ViewTable),
            KeyBinding::new("s", Action::ViewStats),
            KeyBinding::new("h", Action::ViewHistogram),
            // Application
            KeyBinding::new("q", Action::Quit),
            KeyBinding::new("Ctrl+c", Action::Quit),
            KeyBinding::new("Esc", Action::Cancel),
            KeyBinding::new("Enter", Action::Confirm),
        ])
    }
}

impl KeyBindings {
    fn from_list(bindings_list: Vec<KeyBinding>) -> Self {
        let bindings_map = bindings_list
            .iter()
            .filter_map(|b| {
                KeyPattern::from_string(&b.key)
                    .ok()
                    .map(|pattern| (pattern, b.action))
            })
            .collect();

        Self {
            bindings_list,
            bindings_map,
        }
    }

    /// Get action for key event
    pub fn get_action(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings_map.get(&KeyPattern::from_event(key)).copied()
    }

    /// Load a `{ "bindings": [{ "key": ..., "action": ... }] }` file (JSON5)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let parsed: KeyBindings = json5::from_str(&content)?;
        Ok(Self::from_list(parsed.bindings_list))
    }

    /// Get all bindings for an action (for key hints)
    pub fn get_keys_for_action(&self, action: Action) -> Vec<String> {
        self.bindings_list
            .iter()
            .filter(|b| b.action == action)
            .map(|b| b.key.clone())
            .collect()
    }

    /// `key: description` for the first key bound to each action
    pub fn hints(&self, actions: &[Action]) -> String {
        actions
            .iter()
            .filter_map(|action| {
                self.get_keys_for_action(*action)
                    .into_iter()
                    .next()
                    .map(|key| format!("{key}: {}", action.description()))
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Validate bindings and return warnings
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let mut seen_keys: HashMap<&str, Action> = HashMap::new();
        for binding in &self.bindings_list {
            if let Some(existing_action) = seen_keys.get(binding.key.as_str()) {
                warnings.push(format!(
                    "Duplicate key '{}': bound to both {} and {}",
                    binding.key, existing_action, binding.action
                ));
            } else {
                seen_keys.insert(&binding.key, binding.action);
            }

            if let Err(e) = KeyPattern::from_string(&binding.key) {
                warnings.push(format!(
                    "Invalid key pattern '{}' for action {}: {}",
                    binding.key, binding.action, e
                ));
            }
        }

        warnings
    }
}

impl KeyPattern {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        let mut modifiers = event.modifiers;
        // Terminals disagree on whether shifted characters report SHIFT
        if matches!(event.code, KeyCode::Char(_) | KeyCode::BackTab) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self {
            code: event.code,
            modifiers,
        }
    }

    /// Parse from string (e.g., "Ctrl+c", "G", "PageDown", "F5")
    pub fn from_string(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, modifier_parts) = match parts.split_last() {
            Some((last, rest)) if !last.is_empty() => (*last, rest),
            _ => return Err(format!("Empty key in '{s}'")),
        };

        let mut modifiers = KeyModifiers::empty();
        for part in modifier_parts {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                // Dropped for characters, see `from_event`
                "shift" => {}
                _ => return Err(format!("Unknown modifier: {part}")),
            }
        }

        let mut chars = key_part.chars();
        let code = match (chars.next(), chars.next()) {
            // Single characters keep their case: "g" and "G" are different keys
            (Some(ch), None) => KeyCode::Char(ch),
            _ => match key_part.to_lowercase().as_str() {
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "pageup" | "pgup" => KeyCode::PageUp,
                "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "tab" => KeyCode::Tab,
                "backtab" => KeyCode::BackTab,
                "enter" | "return" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "backspace" => KeyCode::Backspace,
                "delete" | "del" => KeyCode::Delete,
                "space" => KeyCode::Char(' '),
                f if f.starts_with('f') => match f[1..].parse::<u8>() {
                    Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
                    _ => return Err(format!("Invalid function key: {key_part}")),
                },
                _ => return Err(format!("Unknown key: {key_part}")),
            },
        };

        Ok(Self { code, modifiers })
    }
}
