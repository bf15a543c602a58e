//! Logical key values decoded from terminal key events.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const ENTER: u8 = b'\r';
pub const TAB: u8 = b'\t';
pub const ESCAPE: u8 = 0x1b;
pub const BACKSPACE: u8 = 0x08;
pub const DEL: u8 = 0x7f;

/// Control byte for an ASCII letter, e.g. `ctrl(b'l')` is form feed.
pub const fn ctrl(letter: u8) -> u8 {
    letter & 0x1f
}

/// A printable or control byte, or one of the named special keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(u8),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    BackTab,
}

impl Key {
    /// Decode a crossterm key event. Releases, repeats of non-press kinds and keys
    /// with no byte representation yield `None`.
    pub fn from_event(event: KeyEvent) -> Option<Key> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let key = match event.code {
            KeyCode::Char(c) if c.is_ascii() => {
                let byte = c as u8;
                if event.modifiers.contains(KeyModifiers::CONTROL) && byte.is_ascii_alphabetic() {
                    Key::Char(ctrl(byte))
                } else {
                    Key::Char(byte)
                }
            }
            KeyCode::Enter => Key::Char(ENTER),
            KeyCode::Tab => Key::Char(TAB),
            KeyCode::Esc => Key::Char(ESCAPE),
            KeyCode::Backspace => Key::Char(DEL),
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Insert => Key::Insert,
            KeyCode::Delete => Key::Delete,
            KeyCode::BackTab => Key::BackTab,
            _ => return None,
        };
        Some(key)
    }
}
