//! Token flow layout.
//!
//! Lays the token sequence out as wrapped lines of the script area and
//! exposes the result as the `ViewGeometryProvider` the scroll
//! centering consumes. One layout line is one geometry unit of height.

use unicode_width::UnicodeWidthStr;

use crate::engine::scroll::{TokenGeometry, ViewGeometryProvider};

/// Placement of a single token in the wrapped flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    /// Layout line the token sits on
    pub line: usize,
    /// Column of the token's first cell within the line
    pub col: u16,
    /// Display width in cells
    pub width: u16,
}

/// Wrapped layout of the whole token sequence.
#[derive(Debug, Clone)]
pub struct TokenLayout {
    spans: Vec<TokenSpan>,
    line_count: usize,
}

impl TokenLayout {
    /// Placement of the token at `index`.
    pub fn span(&self, index: usize) -> Option<TokenSpan> {
        self.spans.get(index).copied()
    }

    /// All spans in token order.
    pub fn spans(&self) -> &[TokenSpan] {
        &self.spans
    }

    /// Number of layout lines the flow occupies.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Index of the token under a (line, col) position, for pointer
    /// selection of a token. Returns `None` between tokens.
    pub fn token_at(&self, line: usize, col: u16) -> Option<usize> {
        self.spans.iter().position(|span| {
            span.line == line && col >= span.col && col < span.col + span.width
        })
    }
}

/// Flow tokens into lines wrapped at `wrap_width` cells, one space
/// between tokens.
///
/// A token wider than the wrap width still gets a line of its own; the
/// renderer truncates it visually.
pub fn layout_tokens(tokens: &[String], wrap_width: u16) -> TokenLayout {
    let wrap_width = usize::from(wrap_width.max(1));
    let mut spans = Vec::with_capacity(tokens.len());
    let mut line = 0usize;
    let mut col = 0usize;

    // Positions are tracked in usize; only the stored cell coordinates
    // saturate at the u16 range.
    for token in tokens {
        let width = token.width().max(1);
        if col > 0 && col + 1 + width > wrap_width {
            line += 1;
            col = 0;
        }
        let start = if col == 0 { 0 } else { col + 1 };
        spans.push(TokenSpan {
            line,
            col: start.try_into().unwrap_or(u16::MAX),
            width: width.try_into().unwrap_or(u16::MAX),
        });
        col = start + width;
    }

    let line_count = if spans.is_empty() { 0 } else { line + 1 };
    TokenLayout { spans, line_count }
}

/// Geometry view over a layout, in line units.
#[derive(Debug, Clone, Copy)]
pub struct FlowGeometry<'a> {
    layout: &'a TokenLayout,
    view_rows: u16,
}

impl<'a> FlowGeometry<'a> {
    pub fn new(layout: &'a TokenLayout, view_rows: u16) -> Self {
        Self { layout, view_rows }
    }
}

impl ViewGeometryProvider for FlowGeometry<'_> {
    fn active_token_geometry(&self, index: usize) -> Option<TokenGeometry> {
        self.layout.span(index).map(|span| TokenGeometry {
            top: span.line as f64,
            height: 1.0,
        })
    }

    fn viewport_height(&self) -> f64 {
        self.view_rows as f64
    }
}
