//! Terminal front end.

pub mod animation;
pub mod app;
pub mod display;
pub mod input;

pub use app::{run, App, Flow};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, terminal};
use std::io::stdout;
use tracing::warn;

/// Raw mode, alternate screen and mouse capture for as long as it lives.
pub struct TerminalGuard {
    releases_reported: bool,
}

impl TerminalGuard {
    pub fn enter() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let releases_reported = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if releases_reported {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(Self { releases_reported })
    }

    /// Whether the terminal reports key releases separately from presses.
    pub fn releases_reported(&self) -> bool {
        self.releases_reported
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.releases_reported {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        if let Err(e) = execute!(stdout(), cursor::Show, DisableMouseCapture, terminal::LeaveAlternateScreen) {
            warn!(error = %e, "failed to restore terminal");
        }
        let _ = terminal::disable_raw_mode();
    }
}
