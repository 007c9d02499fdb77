//! Canvas configuration.

use crate::normalize::NormalizeOptions;
use crate::session::MIN_POINT_SPACING;
use serde::{Deserialize, Serialize};

/// Per-canvas settings. Every field has a default, so a partial JSON object
/// (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Raster surface width in pixels.
    pub width: u32,
    /// Raster surface height in pixels.
    pub height: u32,
    /// Decimation threshold for captured points.
    pub min_point_spacing: f32,
    /// Initial brush radius.
    pub brush_radius: f32,
    pub brush_min: f32,
    pub brush_max: f32,
    /// Delay between a classify request and the prediction call.
    pub classify_delay_ms: f64,
    /// Swap spatial axes when normalizing.
    pub transpose: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 185,
            height: 185,
            min_point_spacing: MIN_POINT_SPACING,
            brush_radius: 8.0,
            brush_min: 2.0,
            brush_max: 20.0,
            classify_delay_ms: 500.0,
            transpose: false,
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON config, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("invalid canvas config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "canvas size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if self.brush_min > self.brush_max {
            return Err(format!(
                "brush_min ({}) exceeds brush_max ({})",
                self.brush_min, self.brush_max
            ));
        }
        if self.min_point_spacing < 0.0 {
            return Err("min_point_spacing must not be negative".to_string());
        }
        Ok(())
    }

    /// Clamp a requested brush radius into the configured range.
    pub fn clamp_brush(&self, radius: f32) -> f32 {
        radius.clamp(self.brush_min, self.brush_max)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            transpose: self.transpose,
        }
    }
}
