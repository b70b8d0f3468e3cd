//! Keyboard shortcut binding.
//!
//! Maps key events to prompter commands. The binder is stateless: it
//! only translates keys and forwards the playback subset to
//! `PlaybackClock` operations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::clock::PlaybackClock;

/// Command produced by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Space: flip play/pause
    TogglePlay,
    /// Up arrow: one speed step faster (clamped at the maximum)
    SpeedUp,
    /// Down arrow: one speed step slower (clamped at the minimum)
    SpeedDown,
    /// Restart from the first token
    Restart,
    /// Open the script editor
    EnterEdit,
    /// Toggle the shortcut help overlay
    ToggleHelp,
    /// Leave the session
    Exit,
}

/// Translate a key event into a command, if it is bound.
pub fn bind_key(key: &KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char(' ') => Some(Command::TogglePlay),
        KeyCode::Up => Some(Command::SpeedUp),
        KeyCode::Down => Some(Command::SpeedDown),
        KeyCode::Char('r') => Some(Command::Restart),
        KeyCode::Char('e') => Some(Command::EnterEdit),
        KeyCode::Char('?') => Some(Command::ToggleHelp),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Exit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Exit),
        _ => None,
    }
}

/// Forward a playback command to the clock.
///
/// Returns true when the command was a clock operation; session-level
/// commands (restart, edit, help, exit) are left for the caller.
/// Restart is session-level because it also scrolls the viewport back
/// to its origin, which the clock knows nothing about.
pub fn apply_to_clock(command: Command, clock: &mut PlaybackClock, now: Instant) -> bool {
    match command {
        Command::TogglePlay => {
            clock.toggle_play(now);
            true
        }
        Command::SpeedUp => {
            clock.speed_up(now);
            true
        }
        Command::SpeedDown => {
            clock.speed_down(now);
            true
        }
        Command::Restart | Command::EnterEdit | Command::ToggleHelp | Command::Exit => false,
    }
}
