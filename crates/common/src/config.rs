//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{TurntableError, TurntableResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Viewer tuning.
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tuning knobs for the frame-animation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Number of frames in one full rotation.
    pub total_frames: usize,

    /// Drag sensitivity. A drag across 1/speed of the surface spins one turn.
    pub speed_multiplier: f64,

    /// Minimum time between two processed pointer samples (ms).
    pub sampling_interval_ms: u64,

    /// Animation tick rate (Hz).
    pub tick_rate_hz: u32,

    /// Target frame set once preloading completes. Negative spins in reverse;
    /// 0 disables the intro spin.
    pub intro_spin_frames: i64,

    /// Factor applied to detector x coordinates before they reach the tracker.
    pub detector_scale: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "turntable_core=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            total_frames: 180,
            speed_multiplier: 10.0,
            sampling_interval_ms: 10,
            tick_rate_hz: 60,
            intro_spin_frames: -720,
            detector_scale: 2.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ViewerConfig {
    /// Reject settings the animation math cannot work with.
    pub fn validate(&self) -> TurntableResult<()> {
        if self.total_frames == 0 {
            return Err(TurntableError::config("total_frames must be at least 1"));
        }
        if !self.speed_multiplier.is_finite() || self.speed_multiplier <= 0.0 {
            return Err(TurntableError::config(format!(
                "speed_multiplier must be a positive number, got {}",
                self.speed_multiplier
            )));
        }
        if self.tick_rate_hz == 0 {
            return Err(TurntableError::config("tick_rate_hz must be positive"));
        }
        if self.tick_interval_ms() == 0 {
            return Err(TurntableError::config(format!(
                "tick_rate_hz {} is faster than the 1 ms timer resolution",
                self.tick_rate_hz
            )));
        }
        if !self.detector_scale.is_finite() {
            return Err(TurntableError::config("detector_scale must be finite"));
        }
        Ok(())
    }

    /// Tick period in whole milliseconds, rounded like a browser interval timer.
    pub fn tick_interval_ms(&self) -> u64 {
        (1000.0 / self.tick_rate_hz.max(1) as f64).round() as u64
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("turntable").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_viewer() {
        let config = ViewerConfig::default();
        assert_eq!(config.total_frames, 180);
        assert_eq!(config.speed_multiplier, 10.0);
        assert_eq!(config.sampling_interval_ms, 10);
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.intro_spin_frames, -720);
        assert_eq!(config.detector_scale, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tick_interval_rounds() {
        let config = ViewerConfig::default();
        assert_eq!(config.tick_interval_ms(), 17);

        let config = ViewerConfig {
            tick_rate_hz: 30,
            ..Default::default()
        };
        assert_eq!(config.tick_interval_ms(), 33);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_frames = ViewerConfig {
            total_frames: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_frames.validate(),
            Err(TurntableError::Config { .. })
        ));

        let nan_speed = ViewerConfig {
            speed_multiplier: f64::NAN,
            ..Default::default()
        };
        assert!(nan_speed.validate().is_err());

        let no_ticks = ViewerConfig {
            tick_rate_hz: 0,
            ..Default::default()
        };
        assert!(no_ticks.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_sub_millisecond_ticks() {
        let too_fast = ViewerConfig {
            tick_rate_hz: 3000,
            ..Default::default()
        };
        assert_eq!(too_fast.tick_interval_ms(), 0);
        assert!(matches!(
            too_fast.validate(),
            Err(TurntableError::Config { .. })
        ));

        let fastest = ViewerConfig {
            tick_rate_hz: 2000,
            ..Default::default()
        };
        assert_eq!(fastest.tick_interval_ms(), 1);
        assert!(fastest.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"viewer":{"total_frames":36}}"#).unwrap();
        assert_eq!(config.viewer.total_frames, 36);
        assert_eq!(config.viewer.tick_rate_hz, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let dir = std::env::temp_dir().join(format!("turntable-config-{}", std::process::id()));
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.viewer.speed_multiplier = 4.0;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.viewer.speed_multiplier, 4.0);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_unparseable_config_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("turntable-badcfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.viewer, ViewerConfig::default());

        std::fs::remove_dir_all(dir).ok();
    }
}
