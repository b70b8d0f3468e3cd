//! End-to-end engine scenarios through the public library API.

use std::time::{Duration, Instant};

use promptr::engine::clock::{interval_for_speed, Tick};
use promptr::engine::scroll::{TokenGeometry, ViewGeometryProvider};
use promptr::{tokenize, Prompter, PrompterOptions};

/// Geometry that lays one token per line, ten units tall.
struct LineGeometry;

impl ViewGeometryProvider for LineGeometry {
    fn active_token_geometry(&self, index: usize) -> Option<TokenGeometry> {
        Some(TokenGeometry {
            top: index as f64 * 10.0,
            height: 10.0,
        })
    }

    fn viewport_height(&self) -> f64 {
        200.0
    }
}

fn prompter(script: &str) -> Prompter {
    Prompter::new(PrompterOptions {
        initial_script: script.to_string(),
        ..Default::default()
    })
    .expect("non-empty script")
}

#[test]
fn hello_world_scenario() {
    // "Hello world foo" at speed 2.0 ticks every 150ms
    assert_eq!(tokenize("Hello world foo"), vec!["Hello", "world", "foo"]);
    assert_eq!(interval_for_speed(2.0), Duration::from_millis(150));

    let mut p = prompter("Hello world foo");
    let now = Instant::now();
    p.set_speed(2.0, now);
    p.toggle_play(now);

    assert_eq!(
        p.poll(now + Duration::from_millis(150), &LineGeometry),
        Tick::Advanced(1)
    );
    assert_eq!(
        p.poll(now + Duration::from_millis(300), &LineGeometry),
        Tick::Advanced(2)
    );
    // Tick at the last index auto-pauses without moving.
    assert_eq!(
        p.poll(now + Duration::from_millis(450), &LineGeometry),
        Tick::Finished
    );
    assert!(!p.state().is_playing);
    assert_eq!(p.state().current_index, 2);
}

#[test]
fn full_session_playback_and_restart() {
    let mut p = prompter("one two three four five");
    let mut now = Instant::now();
    p.toggle_play(now);

    // Drive the clock to completion.
    let interval = interval_for_speed(1.0);
    for _ in 0..10 {
        now += interval;
        p.poll(now, &LineGeometry);
    }
    assert_eq!(p.state().current_index, 4);
    assert!(!p.state().is_playing);

    p.reset();
    assert_eq!(p.state().current_index, 0);
    assert_eq!(p.scroll_offset(), 0.0);
}

#[test]
fn edit_cycle_replaces_script() {
    let mut p = prompter("old script here");
    let now = Instant::now();

    p.enter_edit_mode(now);
    p.edit_buffer_mut().unwrap().set_text("brand new longer script text");
    p.commit_edit(now);

    assert_eq!(p.tokens().len(), 5);
    assert_eq!(p.state().current_index, 0);
}

#[test]
fn speed_change_mid_playback_takes_effect_next_tick() {
    let mut p = prompter("a b c d e f g h");
    let now = Instant::now();
    p.toggle_play(now);

    // 300ms cadence at speed 1.0; advance once.
    let t1 = now + Duration::from_millis(300);
    assert_eq!(p.poll(t1, &LineGeometry), Tick::Advanced(1));

    // Double the speed: the next tick is rebuilt from this instant.
    p.set_speed(2.0, t1);
    assert_eq!(p.next_deadline(), Some(t1 + Duration::from_millis(150)));

    assert_eq!(
        p.poll(t1 + Duration::from_millis(150), &LineGeometry),
        Tick::Advanced(2)
    );
}
