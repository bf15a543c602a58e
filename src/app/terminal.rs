//! Raw mode and alternate screen, restored on every exit path.

use crate::error::{PagerError, Result};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::sync::Once;

static PANIC_HOOK: Once = Once::new();

/// Puts the terminal into raw mode on the alternate screen until dropped.
///
/// Release builds abort on panic, so unwinding never reaches `Drop`; a panic hook
/// restores the terminal before the default hook prints the message.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode().map_err(|e| PagerError::terminal("Failed to enable raw mode", e))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            restore();
            return Err(PagerError::terminal("Failed to enter alternate screen", e));
        }
        Ok(Self { _private: () })
    }

    /// Current terminal size as (cols, rows).
    pub fn size(&self) -> Result<(u16, u16)> {
        ratatui::crossterm::terminal::size()
            .map_err(|e| PagerError::terminal("Failed to query terminal size", e))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

fn restore() {
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore();
            previous(info);
        }));
    });
}
