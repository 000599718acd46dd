//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    NextPage,
    PrevPage,
    NextField,
    PrevField,
    CycleSort,
    ReverseSort,
    NewItem,
    EditItem,
    DeleteItem,
    OpenHelp,
    OpenSearch,
    Refresh,
    Save,
    Confirm,
    Cancel,
    Input(char),
    Backspace,
}

/// Whether printable keys are commands or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Navigate,
    Text,
}

pub fn map_key(event: KeyEvent, mode: InputMode) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Cancel),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('s') => Some(Action::Save),
            _ => None,
        };
    }

    match mode {
        InputMode::Navigate => map_navigate(code),
        InputMode::Text => map_text(code),
    }
}

fn map_navigate(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char('s') => Some(Action::CycleSort),
        KeyCode::Char('o') => Some(Action::ReverseSort),
        KeyCode::Char('y') | KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveRight),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let idx = match c {
                '1' => 0,
                '2' => 1,
                '3' => 2,
                '4' => 3,
                '5' => 4,
                '6' => 5,
                _ => return None,
            };
            Some(Action::SwitchView(idx))
        }
        _ => None,
    }
}

fn map_text(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) => Some(Action::Input(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigate_bindings() {
        assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Navigate), Some(Action::Quit));
        assert_eq!(map_key(key(KeyCode::Char('3')), InputMode::Navigate), Some(Action::SwitchView(2)));
        assert_eq!(map_key(key(KeyCode::Char('9')), InputMode::Navigate), None);
        assert_eq!(map_key(key(KeyCode::Char(']')), InputMode::Navigate), Some(Action::NextPage));
    }

    #[test]
    fn test_control_bindings_apply_in_both_modes() {
        let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(map_key(save, InputMode::Navigate), Some(Action::Save));
        assert_eq!(map_key(save, InputMode::Text), Some(Action::Save));
    }

    #[test]
    fn test_text_mode_keeps_command_letters() {
        assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Text), Some(Action::Input('q')));
        assert_eq!(map_key(key(KeyCode::Tab), InputMode::Text), Some(Action::NextField));
        assert_eq!(map_key(key(KeyCode::Esc), InputMode::Text), Some(Action::Cancel));
    }

    proptest! {
        #[test]
        fn text_mode_maps_every_plain_char_to_input(c in any::<char>()) {
            prop_assert_eq!(map_key(key(KeyCode::Char(c)), InputMode::Text), Some(Action::Input(c)));
        }
    }
}
