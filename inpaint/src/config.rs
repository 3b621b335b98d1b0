//! Inpainting configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default synthesis neighborhood radius in pixels.
pub const DEFAULT_RADIUS: usize = 5;

/// Intensity given to the 1-pixel Known ring that surrounds the image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Copy the nearest image pixel. If that pixel is masked, use the mean of
    /// all unmasked pixels instead.
    #[default]
    Replicate,
    /// Fixed intensity for the whole ring.
    Constant(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InpaintConfig {
    /// Half-size of the square neighborhood scanned when synthesizing a pixel.
    /// Larger radii smooth more and cost `O(radius²)` per pixel.
    pub radius: usize,
    pub border: BorderMode,
}

impl Default for InpaintConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            border: BorderMode::Replicate,
        }
    }
}

impl InpaintConfig {
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_border(mut self, border: BorderMode) -> Self {
        self.border = border;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.radius < 1 {
            return Err(Error::InvalidRadius(self.radius));
        }
        Ok(())
    }

    /// Loads a YAML or JSON config, chosen by file extension.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let config: Self = common::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
