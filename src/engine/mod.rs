//! Playback engine.
//!
//! The `Prompter` facade ties the token sequence, the playback clock,
//! and scroll centering together and exposes the operation surface the
//! session loop and controls call into.
//!
//! # Architecture
//!
//! - `clock`: `PlaybackClock` scheduler owning `PlaybackState`
//! - `scroll`: centering math and the `ViewGeometryProvider` seam
//!
//! All state is in-memory and ephemeral per session.

pub mod clock;
pub mod scroll;

use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::script::{EditBuffer, Script};
use clock::{PlaybackClock, PlaybackState, Tick};
use scroll::{ScrollCentering, ViewGeometryProvider};

/// Errors surfaced by engine construction.
///
/// Normal operation has no fault paths: out-of-range inputs clamp,
/// missing geometry no-ops, end-of-sequence auto-pauses.
#[derive(Debug, Error)]
pub enum PrompterError {
    /// The script has no tokens, so a session cannot start. Fatal at
    /// the session level; the caller is expected to redirect away.
    #[error("script is empty - nothing to prompt")]
    EmptyScript,
}

/// Construction options for a prompter session.
#[derive(Debug, Clone)]
pub struct PrompterOptions {
    /// The script to play back
    pub initial_script: String,
    /// Requested font size (recognized; terminals render at their own)
    pub font_size: u16,
    /// Requested font family (recognized; terminals render their own)
    pub font_family: String,
    /// Named color for the script text
    pub text_color: String,
    /// Begin playing immediately instead of paused
    pub auto_start: bool,
    /// Initial speed multiplier
    pub speed: f64,
}

impl Default for PrompterOptions {
    fn default() -> Self {
        Self {
            initial_script: String::new(),
            font_size: 48,
            font_family: "monospace".to_string(),
            text_color: "white".to_string(),
            auto_start: false,
            speed: 1.0,
        }
    }
}

/// The playback engine behind a prompter session.
///
/// Owns the script, the clock, the scroll target, and the edit buffer.
/// Everything else (rendering, input sources) talks to it through the
/// operations below.
#[derive(Debug)]
pub struct Prompter {
    script: Script,
    clock: PlaybackClock,
    scroll: ScrollCentering,
    edit: Option<EditBuffer>,
    options: PrompterOptions,
}

impl Prompter {
    /// Build an engine from options.
    ///
    /// Fails only when the script tokenizes to nothing. With
    /// `auto_start` the clock begins playing immediately.
    pub fn new(options: PrompterOptions) -> Result<Self, PrompterError> {
        let script = Script::new(options.initial_script.clone());
        if script.is_empty() {
            return Err(PrompterError::EmptyScript);
        }

        let mut clock = PlaybackClock::new(script.token_count());
        clock.set_speed(options.speed, Instant::now());
        if options.auto_start {
            clock.toggle_play(Instant::now());
        }
        debug!(tokens = script.token_count(), "prompter created");

        Ok(Self {
            script,
            clock,
            scroll: ScrollCentering::new(),
            edit: None,
            options,
        })
    }

    /// The token sequence under playback.
    pub fn tokens(&self) -> &[String] {
        self.script.tokens()
    }

    /// Number of tokens in the sequence.
    pub fn token_count(&self) -> usize {
        self.script.token_count()
    }

    /// Snapshot of the playback state.
    pub fn state(&self) -> PlaybackState {
        self.clock.state()
    }

    /// Construction options (used by the rendering layer).
    pub fn options(&self) -> &PrompterOptions {
        &self.options
    }

    /// Mutable access to the clock for observer registration.
    pub fn clock_mut(&mut self) -> &mut PlaybackClock {
        &mut self.clock
    }

    /// Deadline of the pending tick, if playing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.clock.next_deadline()
    }

    /// Current scroll target offset.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset()
    }

    /// Fire a pending tick and recenter on the new active token.
    ///
    /// Recentering is synchronous with the index change; a token
    /// without geometry leaves the previous offset untouched.
    pub fn poll(&mut self, now: Instant, geometry: &dyn ViewGeometryProvider) -> Tick {
        let tick = self.clock.poll(now);
        if let Tick::Advanced(index) = tick {
            self.scroll.recenter(geometry, index);
        }
        tick
    }

    /// Flip play/pause.
    pub fn toggle_play(&mut self, now: Instant) {
        self.clock.toggle_play(now);
    }

    /// Replace the speed scalar (clamped); next tick runs at the new
    /// cadence.
    pub fn set_speed(&mut self, speed: f64, now: Instant) {
        self.clock.set_speed(speed, now);
    }

    /// One speed step faster.
    pub fn speed_up(&mut self, now: Instant) {
        self.clock.speed_up(now);
    }

    /// One speed step slower.
    pub fn speed_down(&mut self, now: Instant) {
        self.clock.speed_down(now);
    }

    /// Stop, return to the first token, scroll to origin.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.scroll.scroll_to_origin();
    }

    /// Jump straight to a token (pointer selection), clamped; play
    /// state is untouched and the view recenters immediately.
    pub fn jump_to(&mut self, index: usize, geometry: &dyn ViewGeometryProvider) {
        self.clock.jump_to(index);
        self.scroll
            .recenter(geometry, self.clock.state().current_index);
    }

    /// Whether edit mode is active.
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// The active edit buffer, if any.
    pub fn edit_buffer(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    /// Mutable edit buffer for text input.
    pub fn edit_buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        self.edit.as_mut()
    }

    /// Open edit mode with a working copy of the script. Pauses
    /// playback; re-entering while already editing is a no-op.
    pub fn enter_edit_mode(&mut self, now: Instant) {
        if self.edit.is_some() {
            return;
        }
        if self.clock.state().is_playing {
            self.clock.toggle_play(now);
        }
        self.edit = Some(EditBuffer::enter(&self.script));
    }

    /// Discard the edit buffer, leaving script and index unchanged.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Commit the edit buffer: re-tokenize and restart from token 0.
    ///
    /// A blank buffer is ignored - edit mode closes but the prior
    /// tokens and index are preserved unchanged.
    pub fn commit_edit(&mut self, now: Instant) {
        let Some(buffer) = self.edit.take() else {
            return;
        };
        if buffer.is_blank() {
            debug!("blank edit commit ignored");
            return;
        }
        self.script = Script::new(buffer.text());
        self.clock.set_token_count(self.script.token_count(), now);
        self.scroll.scroll_to_origin();
        debug!(tokens = self.script.token_count(), "script replaced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::scroll::TokenGeometry;
    use std::time::Duration;

    struct NoGeometry;

    impl ViewGeometryProvider for NoGeometry {
        fn active_token_geometry(&self, _index: usize) -> Option<TokenGeometry> {
            None
        }

        fn viewport_height(&self) -> f64 {
            100.0
        }
    }

    struct RowGeometry;

    impl ViewGeometryProvider for RowGeometry {
        fn active_token_geometry(&self, index: usize) -> Option<TokenGeometry> {
            Some(TokenGeometry {
                top: index as f64 * 10.0,
                height: 10.0,
            })
        }

        fn viewport_height(&self) -> f64 {
            100.0
        }
    }

    fn prompter(script: &str) -> Prompter {
        Prompter::new(PrompterOptions {
            initial_script: script.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn empty_script_is_fatal_at_construction() {
        let err = Prompter::new(PrompterOptions::default()).unwrap_err();
        assert!(matches!(err, PrompterError::EmptyScript));

        let err = Prompter::new(PrompterOptions {
            initial_script: "  \n\t ".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, PrompterError::EmptyScript));
    }

    #[test]
    fn construction_defaults_to_paused() {
        let p = prompter("Hello world foo");
        assert!(!p.state().is_playing);
        assert_eq!(p.state().current_index, 0);
        assert_eq!(p.tokens().len(), 3);
    }

    #[test]
    fn auto_start_begins_playing() {
        let p = Prompter::new(PrompterOptions {
            initial_script: "a b c".to_string(),
            auto_start: true,
            ..Default::default()
        })
        .unwrap();
        assert!(p.state().is_playing);
        assert!(p.next_deadline().is_some());
    }

    #[test]
    fn poll_recenters_on_advance() {
        let mut p = prompter("a b c");
        let now = Instant::now();
        p.toggle_play(now);

        let tick = p.poll(now + Duration::from_millis(300), &RowGeometry);
        assert_eq!(tick, Tick::Advanced(1));
        // index 1: top=10, height=10, viewport 100 -> 10 - 50 + 5 = -35
        assert_eq!(p.scroll_offset(), -35.0);
    }

    #[test]
    fn missing_geometry_keeps_previous_offset() {
        let mut p = prompter("a b c");
        let now = Instant::now();
        p.jump_to(1, &RowGeometry);
        let offset = p.scroll_offset();

        p.toggle_play(now);
        p.poll(now + Duration::from_millis(300), &NoGeometry);
        assert_eq!(p.scroll_offset(), offset);
    }

    #[test]
    fn jump_to_recenters_without_touching_play_state() {
        let mut p = prompter("Hello world foo");
        p.jump_to(2, &RowGeometry);
        assert_eq!(p.state().current_index, 2);
        assert!(!p.state().is_playing);
        // index 2: 20 - 50 + 5 = -25
        assert_eq!(p.scroll_offset(), -25.0);
    }

    #[test]
    fn reset_restores_origin() {
        let mut p = prompter("a b c d");
        let now = Instant::now();
        p.jump_to(3, &RowGeometry);
        p.toggle_play(now);

        p.reset();

        assert!(!p.state().is_playing);
        assert_eq!(p.state().current_index, 0);
        assert_eq!(p.scroll_offset(), 0.0);
        assert!(p.next_deadline().is_none());
    }

    #[test]
    fn enter_edit_pauses_playback() {
        let mut p = prompter("a b c");
        let now = Instant::now();
        p.toggle_play(now);

        p.enter_edit_mode(now);
        assert!(p.is_editing());
        assert!(!p.state().is_playing);
        assert_eq!(p.edit_buffer().unwrap().text(), "a b c");
    }

    #[test]
    fn cancel_edit_discards_buffer() {
        let mut p = prompter("a b c");
        let now = Instant::now();
        p.enter_edit_mode(now);
        p.edit_buffer_mut().unwrap().set_text("replaced entirely");
        p.cancel_edit();

        assert!(!p.is_editing());
        assert_eq!(p.tokens(), ["a", "b", "c"]);
    }

    #[test]
    fn commit_edit_retokenizes_and_resets_index() {
        let mut p = prompter("a b c");
        let now = Instant::now();
        p.jump_to(2, &RowGeometry);
        p.enter_edit_mode(now);
        p.edit_buffer_mut().unwrap().set_text("one two three four");
        p.commit_edit(now);

        assert!(!p.is_editing());
        assert_eq!(p.tokens().len(), 4);
        assert_eq!(p.state().current_index, 0);
        assert_eq!(p.scroll_offset(), 0.0);
    }

    #[test]
    fn blank_commit_preserves_tokens_and_index() {
        let mut p = prompter("a b c");
        let now = Instant::now();
        p.jump_to(2, &RowGeometry);
        p.enter_edit_mode(now);
        p.edit_buffer_mut().unwrap().set_text("   ");
        p.commit_edit(now);

        assert!(!p.is_editing());
        assert_eq!(p.tokens(), ["a", "b", "c"]);
        assert_eq!(p.state().current_index, 2);
    }
}
