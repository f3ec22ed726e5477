//! Named actions and the key bindings that trigger them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::KeySettings;

/// Everything the keyboard can ask the application to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    CyclePane,
    MoveUp,
    MoveDown,
    Activate,
    TogglePlay,
    Quit,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::CyclePane,
        Action::MoveUp,
        Action::MoveDown,
        Action::Activate,
        Action::TogglePlay,
        Action::Quit,
    ];

    /// Short label used in the controls footer.
    pub fn label(self) -> &'static str {
        match self {
            Action::CyclePane => "switch pane",
            Action::MoveUp => "up",
            Action::MoveDown => "down",
            Action::Activate => "open/play",
            Action::TogglePlay => "play/pause",
            Action::Quit => "quit",
        }
    }
}

/// A key plus the modifiers that matter for matching (ctrl/alt).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Whether a terminal key event triggers this binding.
    ///
    /// Shift is ignored for characters since the terminal already reports
    /// the shifted character.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT;
        event.code == self.code && (event.modifiers & relevant) == self.modifiers
    }
}

/// Parse a key name such as `q`, `space`, `ctrl-c` or `pagedown`.
pub fn parse_key(name: &str) -> Result<KeyBinding, String> {
    let name = name.trim();
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyBinding::plain(KeyCode::Char(c)));
    }

    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "tab" => KeyCode::Tab,
        "backtab" | "shift-tab" => KeyCode::BackTab,
        "enter" | "return" => KeyCode::Enter,
        "space" => KeyCode::Char(' '),
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            Some(n @ 1..=12) => KeyCode::F(n),
            _ => return parse_modified(name, &lower),
        },
    };
    Ok(KeyBinding::plain(code))
}

fn parse_modified(name: &str, lower: &str) -> Result<KeyBinding, String> {
    let Some((prefix, rest)) = lower.split_once('-') else {
        return Err(format!("the key {name:?} is unknown"));
    };
    let modifiers = match prefix {
        "ctrl" | "c" => KeyModifiers::CONTROL,
        "alt" | "a" | "m" => KeyModifiers::ALT,
        _ => return Err(format!("the key {name:?} has an unknown modifier")),
    };
    let mut rest_chars = rest.chars();
    match (rest_chars.next(), rest_chars.next()) {
        (Some(c), None) => Ok(KeyBinding {
            code: KeyCode::Char(c),
            modifiers,
        }),
        _ => Err(format!(
            "the key {name:?} must combine a modifier with one character"
        )),
    }
}

/// Lookup table from key events to actions.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(KeyBinding, Action)>,
    names: Vec<(Action, Vec<String>)>,
}

impl KeyMap {
    /// Build the map from configured key names. A key bound to two different
    /// actions is rejected.
    pub fn from_settings(keys: &KeySettings) -> Result<Self, String> {
        let mut bindings: Vec<(KeyBinding, Action)> = Vec::new();
        let mut names = Vec::new();

        for action in Action::ALL {
            let configured = match action {
                Action::CyclePane => &keys.cycle_pane,
                Action::MoveUp => &keys.move_up,
                Action::MoveDown => &keys.move_down,
                Action::Activate => &keys.activate,
                Action::TogglePlay => &keys.toggle_play,
                Action::Quit => &keys.quit,
            };

            for name in configured {
                let binding = parse_key(name)?;
                if let Some((_, other)) = bindings.iter().find(|(b, _)| *b == binding) {
                    if *other != action {
                        return Err(format!(
                            "the key {name:?} is bound to both {other:?} and {action:?}"
                        ));
                    }
                    continue;
                }
                bindings.push((binding, action));
            }
            names.push((action, configured.clone()));
        }

        Ok(Self { bindings, names })
    }

    /// Resolve a key event to the action bound to it, if any.
    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(b, _)| b.matches(event))
            .map(|(_, a)| *a)
    }

    /// Render the `[keys] label | ...` help line for the footer.
    pub fn help_text(&self) -> String {
        self.names
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(action, keys)| format!("[{}] {}", keys.join("/"), action.label()))
            .collect::<Vec<String>>()
            .join(" | ")
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        match Self::from_settings(&KeySettings::default()) {
            Ok(map) => map,
            Err(_) => Self {
                bindings: Vec::new(),
                names: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests;
