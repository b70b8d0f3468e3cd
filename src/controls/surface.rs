//! Transport control surface.
//!
//! Tracks pointer position for the "magnetic" attraction of the primary
//! play control and auto-hides the surface after a period without
//! pointer activity while playback is running. The surface never owns
//! playback state; it only derives presentation from pointer geometry.

use std::time::{Duration, Instant};

use tracing::trace;

/// Radius (in viewport units) inside which the play control is
/// attracted to the pointer.
pub const ATTRACTION_RADIUS: f64 = 150.0;

/// Fraction of the pointer delta applied as displacement.
pub const ATTRACTION_PULL: f64 = 0.3;

/// Maximum extra scale applied at zero distance.
pub const ATTRACTION_SCALE: f64 = 0.1;

/// Pointer inactivity span after which the surface may hide.
pub const IDLE_HIDE_AFTER: Duration = Duration::from_millis(2000);

/// The surface stays visible while the pointer is within this distance
/// of the viewport bottom, even when idle.
pub const BOTTOM_REVEAL_ZONE: f64 = 200.0;

/// Displacement and scale applied to the primary play control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attraction {
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
}

impl Attraction {
    /// No displacement, unit scale.
    pub const IDENTITY: Attraction = Attraction {
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
    };
}

/// Attraction of a control centered at `center` toward `pointer`.
///
/// With Euclidean distance `d`: identity when `d >= ATTRACTION_RADIUS`;
/// otherwise `strength = (radius - d) / radius`, displacement is the
/// pointer delta scaled by `strength * ATTRACTION_PULL`, and scale is
/// `1 + strength * ATTRACTION_SCALE`. Continuous in the pointer
/// position; recomputed per move, never animated here.
pub fn attraction_toward(pointer: (f64, f64), center: (f64, f64)) -> Attraction {
    let dx = pointer.0 - center.0;
    let dy = pointer.1 - center.1;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance >= ATTRACTION_RADIUS {
        return Attraction::IDENTITY;
    }
    let strength = (ATTRACTION_RADIUS - distance) / ATTRACTION_RADIUS;
    Attraction {
        dx: dx * strength * ATTRACTION_PULL,
        dy: dy * strength * ATTRACTION_PULL,
        scale: 1.0 + strength * ATTRACTION_SCALE,
    }
}

/// Control surface visibility and pointer tracking.
#[derive(Debug)]
pub struct ControlSurface {
    visible: bool,
    pointer: Option<(f64, f64)>,
    /// Pending idle timer; at most one, re-armed (not accumulated) on
    /// every pointer move and released on teardown.
    idle_deadline: Option<Instant>,
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlSurface {
    /// New surface, visible, with no pointer seen yet.
    pub fn new() -> Self {
        Self {
            visible: true,
            pointer: None,
            idle_deadline: None,
        }
    }

    /// Whether the surface should currently be drawn.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Last observed pointer position.
    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    /// Deadline of the pending idle timer, for poll-timeout derivation.
    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle_deadline
    }

    /// Record a pointer move: re-show the surface and re-arm the idle
    /// timer (cancel + re-arm, so at most one is ever pending).
    pub fn pointer_moved(&mut self, x: f64, y: f64, now: Instant) {
        self.pointer = Some((x, y));
        if !self.visible {
            trace!("control surface shown");
        }
        self.visible = true;
        self.idle_deadline = Some(now + IDLE_HIDE_AFTER);
    }

    /// Fire the idle timer if due.
    ///
    /// Hides the surface only while playback is running and the pointer
    /// is further than `BOTTOM_REVEAL_ZONE` above the viewport bottom.
    /// Returns true when visibility changed.
    pub fn poll_idle(&mut self, now: Instant, is_playing: bool, viewport_height: f64) -> bool {
        let Some(deadline) = self.idle_deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.idle_deadline = None;

        let pointer_near_bottom = self
            .pointer
            .map(|(_, y)| viewport_height - y <= BOTTOM_REVEAL_ZONE)
            .unwrap_or(false);

        if is_playing && !pointer_near_bottom && self.visible {
            self.visible = false;
            trace!("control surface hidden");
            return true;
        }
        false
    }

    /// Release the idle timer on teardown so no hide fires after the
    /// surface is gone.
    pub fn cancel_idle(&mut self) {
        self.idle_deadline = None;
    }

    /// Attraction of the primary play control toward the pointer.
    ///
    /// Identity when no pointer has been seen yet.
    pub fn play_attraction(&self, control_center: (f64, f64)) -> Attraction {
        match self.pointer {
            Some(pointer) => attraction_toward(pointer, control_center),
            None => Attraction::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> Instant {
        Instant::now()
    }

    #[test]
    fn identity_at_and_beyond_radius() {
        let center = (0.0, 0.0);
        assert_eq!(attraction_toward((150.0, 0.0), center), Attraction::IDENTITY);
        assert_eq!(attraction_toward((0.0, 500.0), center), Attraction::IDENTITY);
        assert_eq!(
            attraction_toward((120.0, 90.0), center), // d = 150 exactly
            Attraction::IDENTITY
        );
    }

    #[test]
    fn attraction_grows_toward_zero_distance() {
        let center = (0.0, 0.0);
        let far = attraction_toward((100.0, 0.0), center);
        let near = attraction_toward((10.0, 0.0), center);

        // strength at d=100 is 1/3, at d=10 is 14/15
        assert!((far.dx - 100.0 * (1.0 / 3.0) * ATTRACTION_PULL).abs() < 1e-9);
        assert!(near.scale > far.scale);
        assert!(near.scale <= 1.0 + ATTRACTION_SCALE);
        assert_eq!(far.dy, 0.0);
    }

    #[test]
    fn attraction_at_center_is_max_scale_no_displacement() {
        let a = attraction_toward((50.0, 50.0), (50.0, 50.0));
        assert_eq!(a.dx, 0.0);
        assert_eq!(a.dy, 0.0);
        assert!((a.scale - (1.0 + ATTRACTION_SCALE)).abs() < 1e-9);
    }

    #[test]
    fn attraction_points_toward_pointer() {
        let a = attraction_toward((10.0, -20.0), (0.0, 0.0));
        assert!(a.dx > 0.0);
        assert!(a.dy < 0.0);
    }

    #[test]
    fn pointer_move_shows_and_arms_idle_timer() {
        let mut surface = ControlSurface::new();
        let now = t0();
        surface.pointer_moved(10.0, 10.0, now);

        assert!(surface.visible());
        assert_eq!(surface.idle_deadline(), Some(now + IDLE_HIDE_AFTER));
    }

    #[test]
    fn idle_timer_is_rearmed_not_accumulated() {
        let mut surface = ControlSurface::new();
        let now = t0();
        surface.pointer_moved(10.0, 10.0, now);
        let later = now + Duration::from_millis(500);
        surface.pointer_moved(12.0, 10.0, later);

        assert_eq!(surface.idle_deadline(), Some(later + IDLE_HIDE_AFTER));
    }

    #[test]
    fn hides_when_idle_while_playing() {
        let mut surface = ControlSurface::new();
        let now = t0();
        surface.pointer_moved(100.0, 100.0, now);

        let fired = surface.poll_idle(now + IDLE_HIDE_AFTER, true, 1000.0);
        assert!(fired);
        assert!(!surface.visible());
        assert!(surface.idle_deadline().is_none());
    }

    #[test]
    fn stays_visible_when_paused() {
        let mut surface = ControlSurface::new();
        let now = t0();
        surface.pointer_moved(100.0, 100.0, now);

        let fired = surface.poll_idle(now + IDLE_HIDE_AFTER, false, 1000.0);
        assert!(!fired);
        assert!(surface.visible());
    }

    #[test]
    fn stays_visible_near_viewport_bottom() {
        let mut surface = ControlSurface::new();
        let now = t0();
        // 1000-high viewport, pointer at y=850 -> 150 from bottom
        surface.pointer_moved(100.0, 850.0, now);

        surface.poll_idle(now + IDLE_HIDE_AFTER, true, 1000.0);
        assert!(surface.visible());
    }

    #[test]
    fn idle_timer_not_due_does_nothing() {
        let mut surface = ControlSurface::new();
        let now = t0();
        surface.pointer_moved(100.0, 100.0, now);

        let fired = surface.poll_idle(now + Duration::from_millis(100), true, 1000.0);
        assert!(!fired);
        assert!(surface.visible());
    }

    #[test]
    fn pointer_move_reshows_after_hide() {
        let mut surface = ControlSurface::new();
        let now = t0();
        surface.pointer_moved(100.0, 100.0, now);
        surface.poll_idle(now + IDLE_HIDE_AFTER, true, 1000.0);
        assert!(!surface.visible());

        surface.pointer_moved(101.0, 100.0, now + IDLE_HIDE_AFTER + Duration::from_millis(1));
        assert!(surface.visible());
    }

    #[test]
    fn cancel_idle_releases_timer() {
        let mut surface = ControlSurface::new();
        let now = t0();
        surface.pointer_moved(100.0, 100.0, now);
        surface.cancel_idle();

        assert!(surface.idle_deadline().is_none());
        assert!(!surface.poll_idle(now + IDLE_HIDE_AFTER, true, 1000.0));
        assert!(surface.visible());
    }

    #[test]
    fn no_attraction_before_first_pointer_event() {
        let surface = ControlSurface::new();
        assert_eq!(surface.play_attraction((40.0, 40.0)), Attraction::IDENTITY);
    }
}
