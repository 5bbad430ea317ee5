//! Floating project frames layered above the back-office pages

mod effects;
mod provider;
pub mod storage;

pub use provider::{use_frames, FrameHandle, FrameProvider};
pub use storage::LocalStore;
