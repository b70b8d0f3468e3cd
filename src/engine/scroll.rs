//! Auto-scroll centering.
//!
//! Computes the scroll offset that keeps the active token centered in
//! the viewport. The math is pure; geometry is supplied through the
//! `ViewGeometryProvider` capability so the engine never reaches into
//! the rendering layer.

/// On-screen geometry of a single token, in viewport units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenGeometry {
    /// Distance from the top of the scrollable content to the token
    pub top: f64,
    /// Height of the token's bounding box
    pub height: f64,
}

/// Read-only geometry supplied by the rendering layer.
pub trait ViewGeometryProvider {
    /// Geometry of the token at `index`, or `None` if it has not been
    /// laid out yet.
    fn active_token_geometry(&self, index: usize) -> Option<TokenGeometry>;

    /// Visible height of the viewport.
    fn viewport_height(&self) -> f64;
}

/// Offset that places a token's vertical center at the viewport's
/// vertical center.
///
/// `offset = token_top - container_height/2 + token_height/2`. The
/// result is deliberately not clamped to the scrollable range; callers
/// opt into clamping via `ScrollCentering::with_clamp`.
pub fn compute_offset(container_height: f64, token_top: f64, token_height: f64) -> f64 {
    token_top - container_height / 2.0 + token_height / 2.0
}

/// Owns the current scroll target and recomputes it per index change.
#[derive(Debug, Clone, Copy)]
pub struct ScrollCentering {
    offset: f64,
    /// Optional scroll range; when set, computed offsets are clipped
    /// to it instead of allowing overscroll.
    clamp_range: Option<(f64, f64)>,
}

impl Default for ScrollCentering {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollCentering {
    /// Unclamped centering, offset at origin.
    pub fn new() -> Self {
        Self {
            offset: 0.0,
            clamp_range: None,
        }
    }

    /// Enable clipping of computed offsets to `[min, max]`.
    pub fn with_clamp(min: f64, max: f64) -> Self {
        Self {
            offset: 0.0,
            clamp_range: Some((min, max)),
        }
    }

    /// The current scroll target, applied by the rendering layer.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Recompute the target for the token at `index`.
    ///
    /// Returns the new offset, or `None` when the token has no geometry
    /// yet; in that case the previous offset is retained (no-op, not an
    /// error).
    pub fn recenter(&mut self, provider: &dyn ViewGeometryProvider, index: usize) -> Option<f64> {
        let geometry = provider.active_token_geometry(index)?;
        let mut offset = compute_offset(provider.viewport_height(), geometry.top, geometry.height);
        if let Some((min, max)) = self.clamp_range {
            offset = offset.clamp(min, max);
        }
        self.offset = offset;
        Some(offset)
    }

    /// Return the viewport to its origin (used by `reset`).
    pub fn scroll_to_origin(&mut self) {
        self.offset = 0.0;
    }
}
