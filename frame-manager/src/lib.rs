//! Floating frame manager
//!
//! Owns the collection of floating "project detail" frames layered above the
//! back-office application: opening/closing keyed by entity id, z-order,
//! maximize/minimize toggles with exact geometry restore, drag and resize
//! sessions clamped to the viewport, and persistence of the layout across
//! reloads.
//!
//! The crate is browser-agnostic. Hosts inject the storage backend
//! ([`FrameStore`]), the viewport and the [`HostContext`].

pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod manager;
pub mod storage;

pub use config::FrameManagerConfig;
pub use context::HostContext;
pub use error::{ConfigError, FrameError};
pub use geometry::{Bounds, Point, ResizeDirection, Viewport};
pub use interaction::{InteractionPhase, InteractionSession};
pub use manager::{FrameManager, OpenOutcome};
pub use storage::{FrameStore, MemoryStore};

pub use shared_types::{FrameId, FramePosition, FrameRecord, FrameSize, FrameWindowState};
