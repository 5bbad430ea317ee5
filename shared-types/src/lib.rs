//! Shared types between the frame manager and the web UI
//!
//! These types are used by both:
//! - the `frame-manager` core (native Rust, unit tested off-browser)
//! - Dioxus components (WASM)
//!
//! The window collection is persisted as a JSON array of [`FrameRecord`], so
//! the camelCase field names below are the storage format.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Identity
// ============================================================================

/// Unique identifier of a floating frame: creation timestamp plus a random suffix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../../backoffice-ui/src/types/generated.ts")]
#[serde(transparent)]
pub struct FrameId(pub String);

impl FrameId {
    pub fn new() -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "frame-{}-{}",
            Utc::now().timestamp_millis(),
            &suffix[..9]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Top-left corner in viewport pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../../backoffice-ui/src/types/generated.ts")]
pub struct FramePosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../../backoffice-ui/src/types/generated.ts")]
pub struct FrameSize {
    pub width: i32,
    pub height: i32,
}

// ============================================================================
// Frame records
// ============================================================================

/// Display state of one floating frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../backoffice-ui/src/types/generated.ts")]
#[serde(rename_all = "camelCase")]
pub struct FrameWindowState {
    pub is_maximized: bool,
    pub is_minimized: bool,
    pub is_visible: bool,
    pub position: FramePosition,
    pub size: FrameSize,
    /// Stacking order; unique across the live collection
    pub z_index: u32,
}

/// One open entity view. At most one record exists per `entity_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../../backoffice-ui/src/types/generated.ts")]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    pub id: FrameId,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub entity_label: Option<String>,
    pub window_state: FrameWindowState,
}

impl FrameRecord {
    /// Label shown in the title bar, falling back to the entity id.
    pub fn title(&self) -> &str {
        self.entity_label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(&self.entity_id)
    }
}

// ============================================================================
// Tests
// ============================================================================
