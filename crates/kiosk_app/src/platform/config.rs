//! Display configuration loaded from a RON file.
//!
//! Every field has a default, so a partial file (or no file at all when the
//! default path is used) is valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use kiosk_core::CardSpread;
use kiosk_engine::{CarouselSettings, EngineConfig, FetchSettings, TransitionSettings};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "kiosk.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub fade_duration_secs: f32,
    pub step_delay_secs: f32,
    pub hold_delay_secs: f32,
    pub panel_count: usize,
    /// Frame loop ticks per second; also the crossfade sampling rate.
    pub frame_rate: u32,
    pub log_level: String,
    pub fetch: FetchConfig,
    pub card_spread: CardSpreadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: f32,
    pub request_timeout_secs: Option<f32>,
    pub max_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSpreadConfig {
    pub step: f32,
    pub x_range: f32,
    pub y_range: f32,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            fade_duration_secs: 1.0,
            step_delay_secs: 0.2,
            hold_delay_secs: 0.5,
            panel_count: 10,
            frame_rate: 60,
            log_level: "info".to_string(),
            fetch: FetchConfig::default(),
            card_spread: CardSpreadConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10.0,
            request_timeout_secs: None,
            max_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for CardSpreadConfig {
    fn default() -> Self {
        let spread = CardSpread::default();
        Self {
            step: spread.step,
            x_range: spread.x_range,
            y_range: spread.y_range,
        }
    }
}

impl KioskConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or(LevelFilter::Info)
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                connect_timeout: secs(self.fetch.connect_timeout_secs),
                request_timeout: self.fetch.request_timeout_secs.map(secs),
                max_bytes: self.fetch.max_bytes,
                ..FetchSettings::default()
            },
            transition: TransitionSettings {
                panel_count: self.panel_count,
                step_delay: secs(self.step_delay_secs),
                hold_delay: secs(self.hold_delay_secs),
            },
            carousel: CarouselSettings {
                fade_duration: secs(self.fade_duration_secs),
                tick_interval: self.frame_interval(),
            },
            card_spread: self.card_spread.to_spread(),
        }
    }
}

impl CardSpreadConfig {
    /// Non-finite values fall back to the defaults.
    fn to_spread(&self) -> CardSpread {
        let defaults = CardSpread::default();
        CardSpread {
            step: finite_or(self.step, defaults.step),
            x_range: finite_or(self.x_range, defaults.x_range),
            y_range: finite_or(self.y_range, defaults.y_range),
        }
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Negative, NaN and infinite values become zero; values too large for a
/// `Duration` saturate.
fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f32(value).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Load `path`, or `kiosk.ron` from the working directory when no path is given.
/// Only the implicit default file may be missing.
pub fn load_config(path: Option<&Path>) -> Result<KioskConfig, ConfigError> {
    match path {
        Some(path) => read_config(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_config(path)
            } else {
                Ok(KioskConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<KioskConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
