//! Playback clock and tick scheduling.
//!
//! Contains the central `PlaybackState` struct and the `PlaybackClock`
//! scheduler that owns it. The clock advances the current token index on
//! a fixed cadence derived from the speed scalar; the repeating timer is
//! an owned handle that is torn down and rebuilt whenever play state,
//! speed, or the token count changes, so the next tick always reflects
//! the latest cadence.

use std::time::{Duration, Instant};

use tracing::debug;

/// Tokens-per-minute baseline: speed 1.0 reads at a natural pace.
pub const BASE_RATE: f64 = 200.0;

/// Lower speed bound enforced on all speed inputs.
pub const MIN_SPEED: f64 = 0.1;

/// Upper speed bound enforced on all speed inputs.
pub const MAX_SPEED: f64 = 10.0;

/// Speed increment used by the control surface and keyboard shortcuts.
pub const SPEED_STEP: f64 = 0.1;

/// Convert a speed scalar to the tick interval.
///
/// `interval = 60000 / (speed * BASE_RATE)` milliseconds. Strictly
/// positive and strictly decreasing in speed.
pub fn interval_for_speed(speed: f64) -> Duration {
    let ms = 60_000.0 / (speed * BASE_RATE);
    Duration::from_secs_f64(ms / 1_000.0)
}

/// Central playback state.
///
/// Exclusively owned and mutated by `PlaybackClock`; every other
/// component reads a copy or requests transitions through the clock's
/// operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Whether playback is running
    pub is_playing: bool,
    /// Playback speed multiplier (1.0 = BASE_RATE tokens/minute)
    pub speed: f64,
    /// Index of the active token
    pub current_index: usize,
}

/// Outcome of polling the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No tick was due (or playback is not running)
    Idle,
    /// The tick advanced the active token to this index
    Advanced(usize),
    /// The tick landed on the last token: playback auto-paused
    Finished,
}

/// Owned handle for the repeating playback timer.
///
/// At most one exists per clock; dropping it on every exit path is what
/// guarantees no detached tick can fire after a state change.
#[derive(Debug, Clone, Copy)]
struct TickTimer {
    interval: Duration,
    deadline: Instant,
}

impl TickTimer {
    /// Arm a fresh timer, first tick one full interval from `now`.
    fn arm(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            deadline: now + interval,
        }
    }

    fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Schedule the next tick one interval after the previous deadline.
    fn advance(&mut self) {
        self.deadline += self.interval;
    }
}

/// Observer invoked after every state mutation.
pub type StateObserver = Box<dyn FnMut(PlaybackState)>;

/// Scheduler that owns `PlaybackState` and the tick timer.
///
/// Single-threaded: ticks are driven by the caller polling with the
/// current instant, so no two ticks can ever be in flight at once.
pub struct PlaybackClock {
    state: PlaybackState,
    token_count: usize,
    timer: Option<TickTimer>,
    observers: Vec<StateObserver>,
}

impl std::fmt::Debug for PlaybackClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackClock")
            .field("state", &self.state)
            .field("token_count", &self.token_count)
            .field("timer", &self.timer)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PlaybackClock {
    /// Create a clock over `token_count` tokens, initially paused at
    /// index 0.
    pub fn new(token_count: usize) -> Self {
        Self {
            state: PlaybackState {
                is_playing: false,
                speed: 1.0,
                current_index: 0,
            },
            token_count,
            timer: None,
            observers: Vec::new(),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Number of tokens the clock is scheduled over.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Deadline of the pending tick, if playback is running.
    ///
    /// The session loop derives its poll timeout from this.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.map(|t| t.deadline)
    }

    /// Register an observer called after every state mutation.
    pub fn subscribe(&mut self, observer: StateObserver) {
        self.observers.push(observer);
    }

    fn notify(&mut self) {
        let state = self.state;
        for observer in &mut self.observers {
            observer(state);
        }
    }

    /// Rebuild (or drop) the timer so the next tick reflects the
    /// current speed and play state. Deliberately re-arms from `now`
    /// rather than adjusting the in-flight wait, so a speed change can
    /// shift the next tick by up to one old interval.
    fn rebuild_timer(&mut self, now: Instant) {
        self.timer = if self.state.is_playing && self.token_count > 0 {
            Some(TickTimer::arm(now, interval_for_speed(self.state.speed)))
        } else {
            None
        };
    }

    /// Flip play/pause. No effect when there are no tokens.
    pub fn toggle_play(&mut self, now: Instant) {
        if self.token_count == 0 {
            return;
        }
        self.state.is_playing = !self.state.is_playing;
        debug!(playing = self.state.is_playing, "toggle play");
        self.rebuild_timer(now);
        self.notify();
    }

    /// Replace the speed scalar, silently clamped to
    /// `[MIN_SPEED, MAX_SPEED]`.
    ///
    /// Takes effect on the next scheduled tick: the pending timer is
    /// torn down and a fresh one armed at the new cadence.
    pub fn set_speed(&mut self, speed: f64, now: Instant) {
        self.state.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        debug!(speed = self.state.speed, "set speed");
        self.rebuild_timer(now);
        self.notify();
    }

    /// Increase speed by one step (clamped at `MAX_SPEED`).
    pub fn speed_up(&mut self, now: Instant) {
        self.set_speed(self.state.speed + SPEED_STEP, now);
    }

    /// Decrease speed by one step (clamped at `MIN_SPEED`).
    pub fn speed_down(&mut self, now: Instant) {
        self.set_speed(self.state.speed - SPEED_STEP, now);
    }

    /// Stop playback and return to the first token.
    ///
    /// Releases the timer; the caller is responsible for scrolling the
    /// viewport back to its origin.
    pub fn reset(&mut self) {
        self.state.is_playing = false;
        self.state.current_index = 0;
        self.timer = None;
        debug!("reset");
        self.notify();
    }

    /// Jump directly to a token index, silently clamped to the valid
    /// range. Play state is untouched.
    pub fn jump_to(&mut self, index: usize) {
        if self.token_count == 0 {
            return;
        }
        self.state.current_index = index.min(self.token_count - 1);
        self.notify();
    }

    /// Replace the token count after a script edit commit.
    ///
    /// Resets the index to 0 and rebuilds the timer over the new
    /// sequence.
    pub fn set_token_count(&mut self, token_count: usize, now: Instant) {
        self.token_count = token_count;
        self.state.current_index = 0;
        if token_count == 0 {
            self.state.is_playing = false;
        }
        self.rebuild_timer(now);
        self.notify();
    }

    /// Poll the clock: fire the pending tick if its deadline passed.
    ///
    /// Advances the index by one, or auto-pauses when the active token
    /// is already the last one (terminal condition, not an error).
    pub fn poll(&mut self, now: Instant) -> Tick {
        let Some(mut timer) = self.timer else {
            return Tick::Idle;
        };
        if !timer.is_due(now) {
            return Tick::Idle;
        }

        if self.state.current_index + 1 < self.token_count {
            self.state.current_index += 1;
            timer.advance();
            self.timer = Some(timer);
            self.notify();
            Tick::Advanced(self.state.current_index)
        } else {
            self.timer = None;
            self.state.is_playing = false;
            debug!(index = self.state.current_index, "end of sequence");
            self.notify();
            Tick::Finished
        }
    }
}
