//! Static key binding table.

use crate::input::keys::{ctrl, Key, ENTER, TAB};
use crate::input::prompt::PromptKind;

/// Columns moved by one horizontal scroll step.
pub const HORIZONTAL_STEP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    LineDown,
    LineUp,
    HalfPageDown,
    HalfPageUp,
    ScrollLeft,
    ScrollRight,
    Repaint,
    Top,
    Bottom,
    OpenPrompt(PromptKind),
    NextMatch,
    PreviousMatch,
    ToggleWrap,
    NextPattern,
    PreviousPattern,
    DeletePattern,
    ToggleDebug,
}

/// The command bound to `key`, if any.
pub fn lookup(key: Key) -> Option<Command> {
    use Command::*;

    let command = match key {
        Key::Char(b'q') => Quit,
        Key::Char(b'j') | Key::Char(ENTER) | Key::Down => LineDown,
        Key::Char(b'k') | Key::Up => LineUp,
        Key::Char(b'd') | Key::Char(b' ') | Key::PageDown => HalfPageDown,
        Key::Char(b'u') | Key::Char(b'b') | Key::PageUp => HalfPageUp,
        Key::Char(b'h') | Key::Left => ScrollLeft,
        Key::Char(b'l') | Key::Right => ScrollRight,
        Key::Char(b'r') => Repaint,
        Key::Char(c) if c == ctrl(b'l') => Repaint,
        Key::Char(b'g') | Key::Home => Top,
        Key::Char(b'G') | Key::End => Bottom,
        Key::Char(b'/') => OpenPrompt(PromptKind::Search { reverse: false }),
        Key::Char(b'?') => OpenPrompt(PromptKind::Search { reverse: true }),
        Key::Char(b'c') => OpenPrompt(PromptKind::Colour),
        Key::Char(b'%') => OpenPrompt(PromptKind::Seek),
        Key::Char(b'B') => OpenPrompt(PromptKind::Bisect),
        Key::Char(b'n') => NextMatch,
        Key::Char(b'N') => PreviousMatch,
        Key::Char(b'w') => ToggleWrap,
        Key::Char(TAB) => NextPattern,
        Key::BackTab => PreviousPattern,
        Key::Delete => DeletePattern,
        Key::Char(b'D') => ToggleDebug,
        _ => return None,
    };
    Some(command)
}
