//! Water surface configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaterError};
use crate::grid::GridMesh;

/// Vertices per side of the surface grid (one quad).
pub const DEFAULT_GRID_RESOLUTION: u32 = 2;

/// Edge length of one water surface in world units.
pub const DEFAULT_SURFACE_SIZE: f32 = 20.0;

/// Wave phase advance per second.
pub const DEFAULT_WAVE_SPEED: f32 = 0.03;

/// Configuration for a water surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Vertices per side of the surface grid (at least 2).
    pub grid_resolution: u32,
    /// Edge length of the surface, also the spacing of placement cells.
    pub surface_size: f32,
    /// Wave phase advance per second of elapsed time.
    pub wave_speed: f32,
    /// How far the distortion texture perturbs reflection/refraction lookups.
    pub distortion_strength: f32,
    /// Optional PPM file for the distortion texture.
    pub dudv_path: Option<PathBuf>,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            surface_size: DEFAULT_SURFACE_SIZE,
            wave_speed: DEFAULT_WAVE_SPEED,
            distortion_strength: 0.02,
            dudv_path: None,
        }
    }
}

impl WaterConfig {
    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the values describe a buildable surface.
    pub fn validate(&self) -> Result<()> {
        GridMesh::vertex_count_for(self.grid_resolution)?;
        if !self.surface_size.is_finite() || self.surface_size <= 0.0 {
            return Err(WaterError::InvalidSurfaceSize(self.surface_size));
        }
        if !self.wave_speed.is_finite() {
            return Err(WaterError::InvalidWaveSpeed(self.wave_speed));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = WaterConfig::default();
        assert_eq!(config.grid_resolution, 2);
        assert_eq!(config.surface_size, 20.0);
        assert_eq!(config.surface_size, DEFAULT_SURFACE_SIZE);
        assert_eq!(config.wave_speed, DEFAULT_WAVE_SPEED);
        assert!(config.dudv_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json() {
        let config = WaterConfig::from_json_str(r#"{ "grid_resolution": 8 }"#).unwrap();
        assert_eq!(config.grid_resolution, 8);
        assert_eq!(config.surface_size, DEFAULT_SURFACE_SIZE);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = WaterConfig {
            grid_resolution: 5,
            surface_size: 12.5,
            wave_speed: 0.1,
            distortion_strength: 0.05,
            dudv_path: Some(PathBuf::from("textures/dudv.ppm")),
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(WaterConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_config_rejects_invalid() {
        assert!(matches!(
            WaterConfig::from_json_str(r#"{ "grid_resolution": 1 }"#),
            Err(WaterError::InvalidResolution(1))
        ));
        assert!(matches!(
            WaterConfig::from_json_str(r#"{ "surface_size": -2.0 }"#),
            Err(WaterError::InvalidSurfaceSize(_))
        ));
        assert!(matches!(
            WaterConfig::from_json_str(r#"{ "grid_resolution": 60000 }"#),
            Err(WaterError::MeshTooLarge(60000))
        ));
        assert!(matches!(
            WaterConfig::from_json_str("not json"),
            Err(WaterError::JsonError(_))
        ));
    }
}
