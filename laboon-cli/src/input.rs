use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use laboon_core::controller::InputEvent;
use laboon_core::keymap::Key;

/// Translate a crossterm key event into a controller key
fn key_from_crossterm(KeyEvent { code, modifiers, .. }: KeyEvent) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => Key::Ctrl(c),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    };
    Some(key)
}

/// Translate a crossterm event; anything the controller does not care about maps to `None`
pub fn translate(event: CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Key(key) if key.kind == KeyEventKind::Press => {
            key_from_crossterm(key).map(InputEvent::Key)
        }
        CEvent::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        _ => None,
    }
}
