//! Pointer gesture sessions: idle -> dragging | resizing(direction) -> idle.
//!
//! A session is opened by a press on the title bar or a resize handle and
//! closed by the release (commit) or a cancel (revert). Sessions are stored per
//! frame id, so gestures on distinct frames never interfere.

use crate::config::FrameManagerConfig;
use crate::geometry::{clamp_position, resize_bounds, Bounds, Point, ResizeDirection, Viewport};
use shared_types::FramePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Dragging,
    Resizing(ResizeDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InteractionMode {
    /// Pointer offset inside the frame captured at press time
    Drag { offset_x: i32, offset_y: i32 },
    Resize {
        direction: ResizeDirection,
        start: Point,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionSession {
    pointer_id: i32,
    mode: InteractionMode,
    start_bounds: Bounds,
}

impl InteractionSession {
    pub fn drag(pointer_id: i32, pointer: Point, bounds: Bounds) -> Self {
        Self {
            pointer_id,
            mode: InteractionMode::Drag {
                offset_x: pointer.x - bounds.x,
                offset_y: pointer.y - bounds.y,
            },
            start_bounds: bounds,
        }
    }

    pub fn resize(
        pointer_id: i32,
        direction: ResizeDirection,
        pointer: Point,
        bounds: Bounds,
    ) -> Self {
        Self {
            pointer_id,
            mode: InteractionMode::Resize {
                direction,
                start: pointer,
            },
            start_bounds: bounds,
        }
    }

    pub fn pointer_id(&self) -> i32 {
        self.pointer_id
    }

    /// Geometry when the gesture began; a cancel reverts to it.
    pub fn start_bounds(&self) -> Bounds {
        self.start_bounds
    }

    pub fn phase(&self) -> InteractionPhase {
        match self.mode {
            InteractionMode::Drag { .. } => InteractionPhase::Dragging,
            InteractionMode::Resize { direction, .. } => InteractionPhase::Resizing(direction),
        }
    }

    /// Geometry for the current pointer location.
    pub fn apply(&self, pointer: Point, viewport: Viewport, config: &FrameManagerConfig) -> Bounds {
        match self.mode {
            InteractionMode::Drag { offset_x, offset_y } => {
                let position = clamp_position(
                    FramePosition {
                        x: pointer.x - offset_x,
                        y: pointer.y - offset_y,
                    },
                    viewport,
                    config,
                );
                Bounds {
                    x: position.x,
                    y: position.y,
                    ..self.start_bounds
                }
            }
            InteractionMode::Resize { direction, start } => resize_bounds(
                self.start_bounds,
                direction,
                pointer.x - start.x,
                pointer.y - start.y,
                viewport,
                config,
            ),
        }
    }
}
