//! Viewport geometry: clamping, staggering, tray slots and edge resizing.

use shared_types::{FramePosition, FrameSize, FrameWindowState};

use crate::config::FrameManagerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Viewport {
    fn from((width, height): (u32, u32)) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }
}

/// Pointer location in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(position: FramePosition, size: FrameSize) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn of(state: &FrameWindowState) -> Self {
        Self::new(state.position, state.size)
    }

    pub fn position(&self) -> FramePosition {
        FramePosition {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn apply_to(self, state: &mut FrameWindowState) {
        state.position = self.position();
        state.size = self.size();
    }
}

/// Edge or corner handle of a frame. Each direction moves a subset of
/// {left, right, top, bottom}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeDirection {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeDirection {
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    /// Compass abbreviation, as used by CSS `*-resize` cursors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }
}

/// Keeps the top-left corner inside `[0, viewport - min_visible_margin]` on both axes.
pub fn clamp_position(
    position: FramePosition,
    viewport: Viewport,
    config: &FrameManagerConfig,
) -> FramePosition {
    let max_x = (viewport.width - config.min_visible_margin).max(0);
    let max_y = (viewport.height - config.min_visible_margin).max(0);
    FramePosition {
        x: position.x.clamp(0, max_x),
        y: position.y.clamp(0, max_y),
    }
}

/// Minimum size wins over the viewport when the viewport is too small.
fn clamp_extent(value: i32, min: i32, available: i32) -> i32 {
    value.min(available).max(min)
}

/// Enforces the minimum size, caps the size at the viewport and keeps the
/// drag handle reachable. Frames may still overhang the right/bottom edge.
pub fn clamp_bounds(bounds: Bounds, viewport: Viewport, config: &FrameManagerConfig) -> Bounds {
    let width = clamp_extent(bounds.width, config.min_width, viewport.width);
    let height = clamp_extent(bounds.height, config.min_height, viewport.height);
    let position = clamp_position(bounds.position(), viewport, config);
    Bounds {
        x: position.x,
        y: position.y,
        width,
        height,
    }
}

/// Like [`clamp_bounds`], but shifts the frame up/left so it is fully visible
/// whenever the viewport is large enough.
pub fn fit_bounds(bounds: Bounds, viewport: Viewport, config: &FrameManagerConfig) -> Bounds {
    let clamped = clamp_bounds(bounds, viewport, config);
    Bounds {
        x: clamped.x.min(viewport.width - clamped.width).max(0),
        y: clamped.y.min(viewport.height - clamped.height).max(0),
        ..clamped
    }
}

/// Default origin of a new frame, offset per already-open frame. The offset
/// wraps to zero once it would exceed `stagger_limit`.
pub fn staggered_position(open_count: usize, config: &FrameManagerConfig) -> FramePosition {
    let slots = (config.stagger_limit / config.stagger_step + 1).max(1) as usize;
    let offset = (open_count % slots) as i32 * config.stagger_step;
    FramePosition {
        x: config.default_position.x + offset,
        y: config.default_position.y + offset,
    }
}

/// Tray position of the `slot`-th minimized frame, counted from the
/// bottom-right corner leftwards.
pub fn tray_position(
    slot: usize,
    viewport: Viewport,
    config: &FrameManagerConfig,
) -> FramePosition {
    let slot = i32::try_from(slot).unwrap_or(i32::MAX);
    let x = viewport.width
        - config.tray_margin
        - config.tray_width
        - slot.saturating_mul(config.tray_pitch);
    let y = viewport.height - config.tray_margin - config.title_bar_height;
    FramePosition {
        x: x.max(0),
        y: y.max(0),
    }
}

pub fn tray_size(config: &FrameManagerConfig) -> FrameSize {
    FrameSize {
        width: config.tray_width,
        height: config.title_bar_height,
    }
}

/// Applies a pointer delta to the edges selected by `direction`.
///
/// The edge opposite to a moving left/top edge stays fixed, sizes never drop
/// below the configured minimum, right/bottom edges stop at the viewport and
/// left/top edges stop at zero.
pub fn resize_bounds(
    start: Bounds,
    direction: ResizeDirection,
    dx: i32,
    dy: i32,
    viewport: Viewport,
    config: &FrameManagerConfig,
) -> Bounds {
    let mut next = start;

    if direction.moves_right() {
        next.width = (start.width + dx)
            .min(viewport.width - start.x)
            .max(config.min_width);
    } else if direction.moves_left() {
        let right = start.right();
        next.x = (start.x + dx).min(right - config.min_width).max(0);
        next.width = (right - next.x).max(config.min_width);
    }

    if direction.moves_bottom() {
        next.height = (start.height + dy)
            .min(viewport.height - start.y)
            .max(config.min_height);
    } else if direction.moves_top() {
        let bottom = start.bottom();
        next.y = (start.y + dy).min(bottom - config.min_height).max(0);
        next.height = (bottom - next.y).max(config.min_height);
    }

    next
}
