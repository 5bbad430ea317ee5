use serde::{Deserialize, Serialize};
use shared_types::{FramePosition, FrameSize};

use crate::error::ConfigError;
use crate::storage::MAX_Z_INDEX;

pub const DEFAULT_STORAGE_KEY: &str = "floating-project-frames";
pub const DEFAULT_DETAILS_PATH: &str = "/projects/{entity_id}/details";
pub const ENTITY_ID_PLACEHOLDER: &str = "{entity_id}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameManagerConfig {
    /// Key of the persisted frame collection in client-side storage
    pub storage_key: String,
    /// Path template of the embedded details page; `{entity_id}` is substituted
    pub details_path: String,
    /// Top-left corner of the first frame opened on an empty desk
    pub default_position: FramePosition,
    /// Size of newly opened frames, also the fallback restore geometry
    pub default_size: FrameSize,
    /// Offset added per already-open frame so new frames don't overlap exactly
    pub stagger_step: i32,
    /// Largest stagger offset before it wraps back to zero
    pub stagger_limit: i32,
    pub min_width: i32,
    pub min_height: i32,
    /// Part of the frame that must stay inside the viewport while dragging
    pub min_visible_margin: i32,
    /// Height of the title bar, and of a minimized frame
    pub title_bar_height: i32,
    /// Width of a minimized strip in the tray
    pub tray_width: i32,
    /// Horizontal distance between two minimized strips
    pub tray_pitch: i32,
    /// Gap between the tray and the bottom-right viewport corner
    pub tray_margin: i32,
    /// First z-index handed out; keeps frames above the host page
    pub base_z_index: u32,
}

impl Default for FrameManagerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            details_path: DEFAULT_DETAILS_PATH.to_string(),
            default_position: FramePosition { x: 80, y: 60 },
            default_size: FrameSize {
                width: 960,
                height: 680,
            },
            stagger_step: 30,
            stagger_limit: 200,
            min_width: 400,
            min_height: 300,
            min_visible_margin: 100,
            title_bar_height: 40,
            tray_width: 220,
            tray_pitch: 230,
            tray_margin: 16,
            base_z_index: 1000,
        }
    }
}

impl FrameManagerConfig {
    /// Defaults overridden by `FRAMES_*` environment variables (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            storage_key: std::env::var("FRAMES_STORAGE_KEY").unwrap_or(defaults.storage_key),
            details_path: std::env::var("FRAMES_DETAILS_PATH").unwrap_or(defaults.details_path),
            default_position: FramePosition {
                x: env_parse("FRAMES_DEFAULT_X", defaults.default_position.x)?,
                y: env_parse("FRAMES_DEFAULT_Y", defaults.default_position.y)?,
            },
            default_size: FrameSize {
                width: env_parse("FRAMES_DEFAULT_WIDTH", defaults.default_size.width)?,
                height: env_parse("FRAMES_DEFAULT_HEIGHT", defaults.default_size.height)?,
            },
            stagger_step: env_parse("FRAMES_STAGGER_STEP", defaults.stagger_step)?,
            stagger_limit: env_parse("FRAMES_STAGGER_LIMIT", defaults.stagger_limit)?,
            min_width: env_parse("FRAMES_MIN_WIDTH", defaults.min_width)?,
            min_height: env_parse("FRAMES_MIN_HEIGHT", defaults.min_height)?,
            min_visible_margin: env_parse("FRAMES_MIN_VISIBLE_MARGIN", defaults.min_visible_margin)?,
            title_bar_height: env_parse("FRAMES_TITLE_BAR_HEIGHT", defaults.title_bar_height)?,
            tray_width: env_parse("FRAMES_TRAY_WIDTH", defaults.tray_width)?,
            tray_pitch: env_parse("FRAMES_TRAY_PITCH", defaults.tray_pitch)?,
            tray_margin: env_parse("FRAMES_TRAY_MARGIN", defaults.tray_margin)?,
            base_z_index: env_parse("FRAMES_BASE_Z_INDEX", defaults.base_z_index)?,
        }
        .validate()
    }

    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(raw)
            .map_err(|e| ConfigError::Parse(e.to_string()))?
            .validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if !self.details_path.contains(ENTITY_ID_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "details_path '{}' has no {ENTITY_ID_PLACEHOLDER} placeholder",
                self.details_path
            )));
        }
        if self.min_width <= 0 || self.min_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "minimum size {}x{} must be positive",
                self.min_width, self.min_height
            )));
        }
        if self.default_size.width < self.min_width || self.default_size.height < self.min_height
        {
            return Err(ConfigError::Invalid(format!(
                "default size {}x{} is below the minimum {}x{}",
                self.default_size.width,
                self.default_size.height,
                self.min_width,
                self.min_height
            )));
        }
        if self.stagger_step <= 0 || self.stagger_limit < 0 {
            return Err(ConfigError::Invalid(
                "stagger_step must be positive and stagger_limit non-negative".into(),
            ));
        }
        if self.title_bar_height <= 0 || self.tray_width <= 0 || self.tray_pitch <= 0 {
            return Err(ConfigError::Invalid(
                "title bar height and tray dimensions must be positive".into(),
            ));
        }
        if self.base_z_index > MAX_Z_INDEX / 2 {
            return Err(ConfigError::Invalid(format!(
                "base_z_index {} leaves no room below {MAX_Z_INDEX}",
                self.base_z_index
            )));
        }
        if self.min_visible_margin < 0 || self.tray_margin < 0 {
            return Err(ConfigError::Invalid("margins must not be negative".into()));
        }
        Ok(self)
    }

    /// Address of the embedded details page of `entity_id`.
    pub fn details_url(&self, entity_id: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(entity_id.as_bytes()).collect();
        self.details_path.replace(ENTITY_ID_PLACEHOLDER, &encoded)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val.parse::<T>().map_err(|e| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: val.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FrameManagerConfig::default().validate().unwrap();
        assert_eq!(config.min_width, 400);
        assert_eq!(config.min_height, 300);
    }

    #[test]
    fn details_url_substitutes_encoded_entity_id() {
        let config = FrameManagerConfig::default();
        assert_eq!(config.details_url("42"), "/projects/42/details");
        assert_eq!(config.details_url("a/b c"), "/projects/a%2Fb+c/details");
    }

    #[test]
    fn from_json_keeps_defaults_for_missing_fields() {
        let config =
            FrameManagerConfig::from_json(r#"{"storage_key": "crm-frames", "min_width": 450}"#)
                .unwrap();
        assert_eq!(config.storage_key, "crm-frames");
        assert_eq!(config.min_width, 450);
        assert_eq!(config.min_height, 300);
        assert_eq!(config.details_path, DEFAULT_DETAILS_PATH);
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = FrameManagerConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let config = FrameManagerConfig {
            details_path: "/projects".to_string(),
            ..FrameManagerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_default_size_below_minimum() {
        let config = FrameManagerConfig {
            default_size: FrameSize {
                width: 300,
                height: 680,
            },
            ..FrameManagerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_base_z_index_without_headroom() {
        let config = FrameManagerConfig {
            base_z_index: MAX_Z_INDEX,
            ..FrameManagerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn from_env_without_overrides_matches_defaults() {
        let config = FrameManagerConfig::from_env().unwrap();
        assert_eq!(config, FrameManagerConfig::default());
    }

    #[test]
    fn env_parse_reports_the_offending_key() {
        // Only this test touches this variable.
        std::env::set_var("FRAMES_TEST_ONLY_PITCH", "wide");
        let err = env_parse("FRAMES_TEST_ONLY_PITCH", 230i32).unwrap_err();
        std::env::remove_var("FRAMES_TEST_ONLY_PITCH");

        match err {
            ConfigError::InvalidEnv { key, value, .. } => {
                assert_eq!(key, "FRAMES_TEST_ONLY_PITCH");
                assert_eq!(value, "wide");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(env_parse("FRAMES_TEST_ONLY_UNSET", 7i32).unwrap(), 7);
    }
}
