//! Keystroke and mouse input using crossterm.
//!
//! Reading happens on a dedicated thread that forwards events to the async
//! event loop. The thread stops once the receiving side is gone.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// Input the player reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Key released (or pressed, on terminals that do not report releases).
    Key(KeyEvent),
    /// Left click at terminal cell `(column, row)`.
    Click { column: u16, row: u16 },
    Resize,
}

/// Handles user input from terminal
pub struct InputHandler {
    poll_timeout: Duration,
}

impl InputHandler {
    /// Create new input handler with default timeout (50ms for responsive input)
    pub fn new() -> Self {
        InputHandler {
            poll_timeout: Duration::from_millis(50),
        }
    }

    /// Poll for an event with timeout (non-blocking).
    pub fn read_event(&self) -> std::io::Result<Option<UiEvent>> {
        if !event::poll(self.poll_timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Repeat => Some(UiEvent::Key(key)),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => Some(UiEvent::Click {
                column: mouse.column,
                row: mouse.row,
            }),
            Event::Resize(_, _) => Some(UiEvent::Resize),
            _ => None,
        })
    }

    /// Check if key event is an exit signal (Ctrl+C)
    pub fn is_exit(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL))
    }

    /// Plain character typed without Ctrl or Alt.
    pub fn key_to_char(key: &KeyEvent) -> Option<char> {
        match key.code {
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// Whether this event completes a keystroke. Terminals with enhanced
    /// keyboard reporting send both press and release; only the release
    /// counts there.
    pub fn is_key_up(key: &KeyEvent, releases_reported: bool) -> bool {
        if releases_reported {
            key.kind == KeyEventKind::Release
        } else {
            key.kind == KeyEventKind::Press
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward terminal events to `tx` from a background thread.
pub fn spawn_reader(tx: UnboundedSender<UiEvent>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let input = InputHandler::new();
        while !tx.is_closed() {
            match input.read_event() {
                Ok(Some(event)) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            }
        }
    })
}
