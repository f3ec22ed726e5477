use super::*;
use crossterm::event::{KeyEvent, KeyModifiers};

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

#[test]
fn parse_key_understands_names_chars_and_modifiers() {
    assert_eq!(parse_key("q").unwrap().code, KeyCode::Char('q'));
    assert_eq!(parse_key("Q").unwrap().code, KeyCode::Char('Q'));
    assert_eq!(parse_key("space").unwrap().code, KeyCode::Char(' '));
    assert_eq!(parse_key("Tab").unwrap().code, KeyCode::Tab);
    assert_eq!(parse_key("shift-tab").unwrap().code, KeyCode::BackTab);
    assert_eq!(parse_key("pagedown").unwrap().code, KeyCode::PageDown);
    assert_eq!(parse_key("f5").unwrap().code, KeyCode::F(5));

    let ctrl_c = parse_key("ctrl-c").unwrap();
    assert_eq!(ctrl_c.code, KeyCode::Char('c'));
    assert_eq!(ctrl_c.modifiers, KeyModifiers::CONTROL);

    let alt_x = parse_key("alt-x").unwrap();
    assert_eq!(alt_x.modifiers, KeyModifiers::ALT);
}

#[test]
fn parse_key_rejects_unknown_names() {
    assert!(parse_key("f13").is_err());
    assert!(parse_key("hyper-q").is_err());
    assert!(parse_key("ctrl-ab").is_err());
    assert!(parse_key("banana").is_err());
    assert!(parse_key("").is_err());
}

#[test]
fn default_keymap_resolves_all_named_actions() {
    let map = KeyMap::from_settings(&KeySettings::default()).unwrap();

    let cases = [
        (KeyCode::Tab, Action::CyclePane),
        (KeyCode::Up, Action::MoveUp),
        (KeyCode::Char('k'), Action::MoveUp),
        (KeyCode::Down, Action::MoveDown),
        (KeyCode::Char('j'), Action::MoveDown),
        (KeyCode::Enter, Action::Activate),
        (KeyCode::Char(' '), Action::TogglePlay),
        (KeyCode::Char('p'), Action::TogglePlay),
        (KeyCode::Char('q'), Action::Quit),
    ];
    for (code, action) in cases {
        assert_eq!(
            map.action_for(&press(code, KeyModifiers::NONE)),
            Some(action),
            "{code:?}"
        );
    }

    assert_eq!(
        map.action_for(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(Action::Quit)
    );
    assert_eq!(map.action_for(&press(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    assert_eq!(map.action_for(&press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
}

#[test]
fn shift_is_ignored_for_characters() {
    let keys = KeySettings {
        quit: vec!["Q".to_string()],
        ..KeySettings::default()
    };
    let map = KeyMap::from_settings(&keys).unwrap();
    assert_eq!(
        map.action_for(&press(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
        Some(Action::Quit)
    );
}

#[test]
fn conflicting_bindings_are_rejected() {
    let keys = KeySettings {
        quit: vec!["j".to_string()],
        ..KeySettings::default()
    };
    let err = KeyMap::from_settings(&keys).unwrap_err();
    assert!(err.contains("MoveDown"), "{err}");
}

#[test]
fn help_text_lists_configured_keys() {
    let map = KeyMap::default();
    let text = map.help_text();
    assert!(text.contains("[tab] switch pane"));
    assert!(text.contains("[space/p] play/pause"));
    assert!(text.contains("[q/ctrl-c] quit"));
}
