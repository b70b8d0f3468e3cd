//! Frame rendering for the prompter session.
//!
//! Draws the script area (scrolled so the active token is centered),
//! a separator, a progress row, and the transport control bar, plus
//! the help and edit overlays.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::controls::surface::Attraction;
use crate::controls::ControlSurface;
use crate::engine::clock::PlaybackState;
use crate::engine::Prompter;
use crate::session::layout::TokenLayout;

/// Rows reserved below the script area: separator + progress + bar.
pub const CHROME_ROWS: u16 = 3;

/// Help overlay lines.
pub const HELP_LINES: &[&str] = &[
    "╔══════════════════════════════════════╗",
    "║           promptr shortcuts          ║",
    "╠══════════════════════════════════════╣",
    "║                                      ║",
    "║  Space      Play / Pause             ║",
    "║  Up         Faster (+0.1x)           ║",
    "║  Down       Slower (-0.1x)           ║",
    "║  r          Restart from the top     ║",
    "║  e          Edit script              ║",
    "║  Click      Jump to a token          ║",
    "║                                      ║",
    "║  ?          Toggle this help         ║",
    "║  q / Esc    Exit                     ║",
    "║                                      ║",
    "║       Press any key to close         ║",
    "╚══════════════════════════════════════╝",
];

/// Width of the help box for centering.
pub const HELP_BOX_WIDTH: u16 = 40;

/// Map a configured color name to a terminal color.
///
/// Unknown names fall back to white rather than failing; color is
/// cosmetic.
pub fn parse_color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "white" => Color::White,
        _ => Color::White,
    }
}

/// Build the progress cells for the bottom bar.
///
/// Returns the characters and the filled count; the playhead `⏺` sits
/// at the boundary unless the sequence is complete.
pub fn build_progress_cells(width: usize, index: usize, count: usize) -> (Vec<char>, usize) {
    let progress = if count > 1 {
        index as f64 / (count - 1) as f64
    } else {
        1.0
    };
    let filled = ((width as f64) * progress) as usize;

    let mut cells = vec!['─'; width];
    for cell in cells.iter_mut().take(filled.min(width)) {
        *cell = '━';
    }
    if filled < width {
        cells[filled] = '⏺';
    }
    (cells, filled)
}

/// Horizontal cell displacement of the play icon for an attraction.
pub fn icon_offset(attraction: &Attraction, cell_width: f64) -> i16 {
    (attraction.dx / cell_width).round() as i16
}

/// Geometry-unit center of a cell, for attraction queries.
pub fn cell_center(col: u16, row: u16, cell_width: f64, cell_height: f64) -> (f64, f64) {
    (
        (col as f64 + 0.5) * cell_width,
        (row as f64 + 0.5) * cell_height,
    )
}

/// First layout line shown at the top of the script area.
pub fn first_visible_line(scroll_offset: f64) -> i64 {
    scroll_offset.round() as i64
}

/// Render one full frame.
pub fn render(
    frame: &mut Frame,
    prompter: &Prompter,
    layout: &TokenLayout,
    surface: &ControlSurface,
    show_help: bool,
    cell_width: f64,
    cell_height: f64,
) {
    let area = frame.area();
    let script_area = Rect {
        height: area.height.saturating_sub(CHROME_ROWS),
        ..area
    };

    render_script(frame, script_area, prompter, layout);

    if area.height >= CHROME_ROWS {
        let base = area.height - CHROME_ROWS;
        render_separator(frame, Rect::new(0, base, area.width, 1));
        render_progress(
            frame,
            Rect::new(0, base + 1, area.width, 1),
            prompter.state(),
            prompter.token_count(),
        );
        render_control_bar(
            frame,
            Rect::new(0, base + 2, area.width, 1),
            prompter.state(),
            surface,
            cell_width,
            cell_height,
        );
    }

    if prompter.is_editing() {
        render_edit_overlay(frame, area, prompter);
    } else if show_help {
        render_help_overlay(frame, area);
    }
}

fn render_script(frame: &mut Frame, area: Rect, prompter: &Prompter, layout: &TokenLayout) {
    let state = prompter.state();
    let color = parse_color(&prompter.options().text_color);
    let first_line = first_visible_line(prompter.scroll_offset());

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    for view_row in 0..area.height {
        let buf_line = view_row as i64 + first_line;
        if buf_line < 0 || buf_line as usize >= layout.line_count() {
            lines.push(Line::default());
            continue;
        }
        lines.push(script_line(
            prompter.tokens(),
            layout,
            buf_line as usize,
            state.current_index,
            color,
        ));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Build the styled spans for one layout line.
fn script_line<'a>(
    tokens: &'a [String],
    layout: &TokenLayout,
    line: usize,
    active_index: usize,
    color: Color,
) -> Line<'a> {
    let mut spans: Vec<Span> = Vec::new();
    let mut col = 0u16;

    for (index, token) in tokens.iter().enumerate() {
        let Some(span) = layout.span(index) else {
            continue;
        };
        if span.line != line {
            continue;
        }
        if span.col > col {
            spans.push(Span::raw(" ".repeat((span.col - col) as usize)));
        }
        let style = if index == active_index {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(token.as_str(), style));
        col = span.col + span.width;
    }

    Line::from(spans)
}

fn render_separator(frame: &mut Frame, area: Rect) {
    let line = "─".repeat(area.width as usize);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_progress(frame: &mut Frame, area: Rect, state: PlaybackState, count: usize) {
    let (cells, filled) = build_progress_cells(area.width as usize, state.current_index, count);
    let mut spans: Vec<Span> = Vec::with_capacity(3);
    let bar: String = cells.iter().take(filled).collect();
    let rest: String = cells.iter().skip(filled).collect();
    spans.push(Span::styled(bar, Style::default().fg(Color::Green)));
    spans.push(Span::styled(rest, Style::default().fg(Color::DarkGray)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_control_bar(
    frame: &mut Frame,
    area: Rect,
    state: PlaybackState,
    surface: &ControlSurface,
    cell_width: f64,
    cell_height: f64,
) {
    // Idle-hidden: the row stays reserved but empty, so the script
    // geometry never shifts.
    if !surface.visible() {
        frame.render_widget(Paragraph::new(""), area);
        return;
    }

    // Magnetic attraction displaces the play icon toward the pointer.
    let icon_col = 2u16;
    let center = cell_center(icon_col, area.y, cell_width, cell_height);
    let attraction = surface.play_attraction(center);
    let shifted = (icon_col as i16 + icon_offset(&attraction, cell_width)).max(0) as usize;

    let icon = if state.is_playing { "⏸" } else { "▶" };
    let dark = Style::default().fg(Color::DarkGray);
    let hint = Style::default().fg(Color::Cyan);

    let spans = vec![
        Span::raw(" ".repeat(shifted)),
        Span::styled(icon, Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled("spd:", dark),
        Span::styled(format!("{:.1}x ", state.speed), Style::default().fg(Color::White)),
        Span::styled("│ ", dark),
        Span::styled("space", hint),
        Span::styled(if state.is_playing { ":pause " } else { ":play " }, dark),
        Span::styled("↑↓", hint),
        Span::styled(":speed ", dark),
        Span::styled("e", hint),
        Span::styled(":edit ", dark),
        Span::styled("r", hint),
        Span::styled(":restart ", dark),
        Span::styled("?", hint),
        Span::styled(":help ", dark),
        Span::styled("q", hint),
        Span::styled(":quit", dark),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let height = HELP_LINES.len() as u16;
    let width = HELP_BOX_WIDTH.min(area.width);
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let overlay = Rect::new(x, y, width, height.min(area.height));

    frame.render_widget(Clear, overlay);
    let lines: Vec<Line> = HELP_LINES.iter().map(|l| Line::from(*l)).collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::Green)),
        overlay,
    );
}

fn render_edit_overlay(frame: &mut Frame, area: Rect, prompter: &Prompter) {
    let Some(buffer) = prompter.edit_buffer() else {
        return;
    };
    let width = area.width.saturating_sub(8).max(20).min(area.width);
    let height = (area.height / 2).max(5).min(area.height);
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let overlay = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" edit script - Enter:commit Esc:cancel ");
    let text = format!("{}▌", buffer.text());
    frame.render_widget(
        Paragraph::new(text)
            .wrap(ratatui::widgets::Wrap { trim: false })
            .block(block),
        overlay,
    );
}
