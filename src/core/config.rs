//! Configuration for idle rotation and preview layers
//!
//! Settings can be built from presets (`RotationProfile`) or deserialized from
//! JSON. Every field has a default, so partial documents are accepted.

use crate::core::constants::{
    BASE_MARKER_LAYER, FEATURE_ID_PROPERTY, FRAME_INTERVAL_MS, PREVIEW_LAYER_SUFFIX,
    ROTATION_STEP_DEG, ROTATION_THROTTLE_MS,
};
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum RotationProfile {
    Balanced,
    Slow,
    Off,
    Custom(AnimationConfig),
}

impl RotationProfile {
    pub fn resolve(&self) -> AnimationConfig {
        match self {
            Self::Balanced => AnimationConfig::default(),
            Self::Slow => AnimationConfig {
                throttle_interval_ms: 33.0,
                rotation_step_deg: 0.02,
                ..AnimationConfig::default()
            },
            Self::Off => AnimationConfig {
                rotation_step_deg: 0.0,
                ..AnimationConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for RotationProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

/// Idle rotation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Minimum milliseconds between two applied rotation steps
    pub throttle_interval_ms: f64,
    /// Degrees of longitude added per applied step
    pub rotation_step_deg: f64,
    /// Frame interval for timer-driven hosts
    pub frame_interval_ms: u64,
    /// Initial value of the interaction flag
    pub start_interacting: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            throttle_interval_ms: ROTATION_THROTTLE_MS,
            rotation_step_deg: ROTATION_STEP_DEG,
            frame_interval_ms: FRAME_INTERVAL_MS,
            start_interacting: false,
        }
    }
}

impl AnimationConfig {
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_interval_ms)
    }
}

/// Preview layer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Layer holding one marker per project; previews are inserted beneath it
    pub base_layer_id: String,
    pub preview_suffix: String,
    /// Feature property matched by the hover filter
    pub feature_id_property: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            base_layer_id: BASE_MARKER_LAYER.to_string(),
            preview_suffix: PREVIEW_LAYER_SUFFIX.to_string(),
            feature_id_property: FEATURE_ID_PROPERTY.to_string(),
        }
    }
}

impl PreviewConfig {
    pub fn preview_layer_id(&self, project_id: &str) -> String {
        format!("{}{}", project_id, self.preview_suffix)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub animation: AnimationConfig,
    pub preview: PreviewConfig,
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_profile(mut self, profile: RotationProfile) -> Self {
        self.animation = profile.resolve();
        self
    }
}
