use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Streaming configuration: grid geometry, dispatch pacing and world extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Side length of one cell in world units.
    pub cell_size: i32,
    /// Half-width of the visible window, in cells.
    pub radius: i32,
    /// Delay added per build already in flight when a new build is scheduled.
    pub queue_delay_ms: u64,
    /// Width of the world (x extent) in world units.
    pub world_width: f32,
    /// Height of the world (y extent) in world units.
    pub world_height: f32,
    /// Height of the cached water plane.
    pub water_level: f32,
    /// Drop geometry of cells farther than this many radii from the center.
    /// `None` keeps built geometry for the whole session.
    pub evict_beyond: Option<u32>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            cell_size: 128,
            radius: 5,
            queue_delay_ms: 10,
            world_width: 640.0 * 32.0,
            world_height: 512.0 * 32.0,
            water_level: 0.0,
            evict_beyond: None,
        }
    }
}

impl StreamConfig {
    /// Parse a YAML document. Missing keys fall back to defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_grid(self.cell_size, self.radius)?;
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(ConfigError::InvalidExtents {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if self.evict_beyond == Some(0) {
            return Err(ConfigError::InvalidEviction);
        }
        Ok(())
    }

    pub fn queue_delay(&self) -> Duration {
        Duration::from_millis(self.queue_delay_ms)
    }
}

pub(crate) fn validate_grid(cell_size: i32, radius: i32) -> Result<(), ConfigError> {
    if cell_size <= 0 {
        return Err(ConfigError::InvalidCellSize(cell_size));
    }
    if radius < 0 {
        return Err(ConfigError::InvalidRadius(radius));
    }
    // The full window span `(2r+1) * cell_size` must stay representable.
    let span = radius
        .checked_mul(2)
        .and_then(|d| d.checked_add(1))
        .and_then(|n| n.checked_mul(cell_size));
    if span.is_none() {
        return Err(ConfigError::WindowTooLarge { cell_size, radius });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn stream_config_defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.cell_size, 128);
        assert_eq!(config.radius, 5);
        assert_eq!(config.queue_delay(), Duration::from_millis(10));
        assert_eq!(config.world_width, 20480.0);
        assert_eq!(config.world_height, 16384.0);
        assert!(config.evict_beyond.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = StreamConfig::from_yaml_str("cell_size: 256\nradius: 2\n").unwrap();
        assert_eq!(config.cell_size, 256);
        assert_eq!(config.radius, 2);
        assert_eq!(config.queue_delay_ms, 10);
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        let err = StreamConfig::from_yaml_str("cell_size: 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCellSize(0)));
        let err = StreamConfig::from_yaml_str("cell_size: -64").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCellSize(-64)));
    }

    #[test]
    fn rejects_negative_radius() {
        let err = StreamConfig::from_yaml_str("radius: -1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRadius(-1)));
    }

    #[test]
    fn zero_radius_is_a_single_cell_window() {
        assert!(StreamConfig::from_yaml_str("radius: 0").is_ok());
    }

    #[test]
    fn rejects_bad_extents_and_eviction() {
        let err = StreamConfig::from_yaml_str("world_width: 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExtents { .. }));
        let err = StreamConfig::from_yaml_str("evict_beyond: 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEviction));
    }

    #[test]
    fn rejects_window_wider_than_grid() {
        let err = StreamConfig::from_yaml_str("cell_size: 70000\nradius: 70000").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WindowTooLarge {
                cell_size: 70000,
                radius: 70000
            }
        ));
        assert!(validate_grid(1, i32::MAX / 2).is_ok());
        assert!(validate_grid(2, i32::MAX / 2).is_err());
    }

    #[test]
    fn accepts_large_eviction_factor() {
        let config = StreamConfig::from_yaml_str("evict_beyond: 3000000000").unwrap();
        assert_eq!(config.evict_beyond, Some(3_000_000_000));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "cell_size: 64\nradius: 3\nevict_beyond: 4").unwrap();
        let config = StreamConfig::load(tmp.path()).unwrap();
        assert_eq!(config.cell_size, 64);
        assert_eq!(config.radius, 3);
        assert_eq!(config.evict_beyond, Some(4));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = StreamConfig::load("/nonexistent/heightscape.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
