//! Terminal session loop.
//!
//! Owns the terminal (raw mode, alternate screen, mouse capture) for
//! the lifetime of a prompter session and drives the engine from two
//! asynchronous sources: the playback tick deadline and input events.
//! The poll timeout is derived from the nearest pending deadline, so
//! ticks are strictly serialized and no timer can fire after teardown.

pub mod layout;
pub mod render;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, terminal,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::controls::{apply_to_clock, bind_key, Command, ControlSurface};
use crate::engine::clock::Tick;
use crate::engine::Prompter;
use layout::{layout_tokens, FlowGeometry, TokenLayout};
use render::{cell_center, first_visible_line, CHROME_ROWS};

/// Nominal width of a terminal cell in geometry units. Pointer
/// positions are mapped through this so the attraction and idle-hide
/// constants keep their original magnitudes.
pub const CELL_WIDTH: f64 = 8.0;

/// Nominal height of a terminal cell in geometry units.
pub const CELL_HEIGHT: f64 = 16.0;

/// Poll wait when no tick or idle deadline is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Run a prompter session until the user exits.
///
/// Acquires the terminal, runs the loop, and restores the terminal on
/// every exit path, including errors.
pub fn run(prompter: &mut Prompter) -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend)?;

    let result = run_loop(&mut term, prompter);

    // Teardown happens regardless of how the loop ended.
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    result
}

/// Pick the poll timeout from the nearest pending deadline.
fn poll_timeout(now: Instant, deadlines: &[Option<Instant>]) -> Duration {
    deadlines
        .iter()
        .flatten()
        .map(|deadline| deadline.saturating_duration_since(now))
        .min()
        .unwrap_or(IDLE_POLL)
        .min(IDLE_POLL)
}

fn run_loop(
    term: &mut Terminal<CrosstermBackend<io::Stdout>>,
    prompter: &mut Prompter,
) -> Result<()> {
    let mut surface = ControlSurface::new();
    let mut show_help = false;
    let mut needs_render = true;

    let size = term.size()?;
    let mut view_rows = size.height.saturating_sub(CHROME_ROWS);
    let mut token_layout = layout_tokens(prompter.tokens(), size.width);

    // Center the first token before anything is played.
    {
        let geometry = FlowGeometry::new(&token_layout, view_rows);
        let index = prompter.state().current_index;
        prompter.jump_to(index, &geometry);
    }
    debug!(tokens = prompter.token_count(), "session started");

    loop {
        if needs_render {
            term.draw(|frame| {
                render::render(
                    frame,
                    prompter,
                    &token_layout,
                    &surface,
                    show_help,
                    CELL_WIDTH,
                    CELL_HEIGHT,
                )
            })?;
            needs_render = false;
        }

        let now = Instant::now();
        let timeout = poll_timeout(now, &[prompter.next_deadline(), surface.idle_deadline()]);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let now = Instant::now();
                    if prompter.is_editing() {
                        if handle_edit_key(&key, prompter, now) {
                            token_layout = layout_tokens(prompter.tokens(), term.size()?.width);
                            let geometry = FlowGeometry::new(&token_layout, view_rows);
                            let index = prompter.state().current_index;
                            prompter.jump_to(index, &geometry);
                        }
                    } else if show_help {
                        // Any key closes the help overlay.
                        show_help = false;
                    } else if let Some(command) = bind_key(&key) {
                        if handle_command(command, prompter, &mut show_help, now) {
                            break;
                        }
                    }
                    needs_render = true;
                }
                Event::Mouse(mouse) => {
                    let now = Instant::now();
                    handle_mouse_event(
                        &mouse,
                        prompter,
                        &mut surface,
                        &token_layout,
                        view_rows,
                        now,
                    );
                    needs_render = true;
                }
                Event::Resize(new_cols, new_rows) => {
                    view_rows = new_rows.saturating_sub(CHROME_ROWS);
                    token_layout = layout_tokens(prompter.tokens(), new_cols);
                    let geometry = FlowGeometry::new(&token_layout, view_rows);
                    let index = prompter.state().current_index;
                    prompter.jump_to(index, &geometry);
                    needs_render = true;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let geometry = FlowGeometry::new(&token_layout, view_rows);
        match prompter.poll(now, &geometry) {
            Tick::Advanced(_) | Tick::Finished => needs_render = true,
            Tick::Idle => {}
        }

        let viewport_units = term.size()?.height as f64 * CELL_HEIGHT;
        if surface.poll_idle(now, prompter.state().is_playing, viewport_units) {
            needs_render = true;
        }
    }

    // Exit path: release the idle timer and apply reset semantics
    // before handing control back to the caller.
    surface.cancel_idle();
    prompter.reset();
    debug!("session ended");
    Ok(())
}

/// Dispatch a bound command in normal mode. Returns true when the
/// session should exit.
///
/// Restart goes through `Prompter::reset` rather than the clock alone
/// so the scroll target returns to its origin with the index.
fn handle_command(
    command: Command,
    prompter: &mut Prompter,
    show_help: &mut bool,
    now: Instant,
) -> bool {
    match command {
        Command::Exit => return true,
        Command::ToggleHelp => *show_help = !*show_help,
        Command::EnterEdit => prompter.enter_edit_mode(now),
        Command::Restart => prompter.reset(),
        _ => {
            apply_to_clock(command, prompter.clock_mut(), now);
        }
    }
    false
}

/// Keys while the edit overlay is open. Returns true when the script
/// was replaced (layout must be rebuilt).
fn handle_edit_key(key: &KeyEvent, prompter: &mut Prompter, now: Instant) -> bool {
    match key.code {
        KeyCode::Enter => {
            prompter.commit_edit(now);
            true
        }
        KeyCode::Esc => {
            prompter.cancel_edit();
            false
        }
        KeyCode::Backspace => {
            if let Some(buffer) = prompter.edit_buffer_mut() {
                buffer.pop();
            }
            false
        }
        KeyCode::Char(ch) => {
            if let Some(buffer) = prompter.edit_buffer_mut() {
                buffer.push(ch);
            }
            false
        }
        _ => false,
    }
}

fn handle_mouse_event(
    mouse: &MouseEvent,
    prompter: &mut Prompter,
    surface: &mut ControlSurface,
    token_layout: &TokenLayout,
    view_rows: u16,
    now: Instant,
) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            let (x, y) = cell_center(mouse.column, mouse.row, CELL_WIDTH, CELL_HEIGHT);
            surface.pointer_moved(x, y, now);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            // Click in the script area selects the token under the
            // pointer; clicks between tokens are ignored. While the
            // edit overlay is open the index must not move beneath it.
            if prompter.is_editing() {
                return;
            }
            if mouse.row >= view_rows {
                return;
            }
            let line = mouse.row as i64 + first_visible_line(prompter.scroll_offset());
            if line < 0 {
                return;
            }
            if let Some(index) = token_layout.token_at(line as usize, mouse.column) {
                let geometry = FlowGeometry::new(token_layout, view_rows);
                prompter.jump_to(index, &geometry);
            }
        }
        _ => {}
    }
}
