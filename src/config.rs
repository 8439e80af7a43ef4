//! Configuration for aggregation, playback and storage.
//!
//! Only the window width and the frame interval tune the aggregation and
//! playback; the storage path just tells the binary where the events live.
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration as StdDuration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Width of the aggregation windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    /// Window width in seconds. Signed so that a bad value is reported
    /// instead of failing to deserialize.
    #[serde(default = "WindowConfig::default_width_secs")]
    pub width_secs: i64,
}

impl WindowConfig {
    const fn default_width_secs() -> i64 {
        60
    }

    /// The width as a duration, `None` if chrono cannot represent it.
    pub fn width(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_seconds(self.width_secs)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width_secs: Self::default_width_secs(),
        }
    }
}

/// Frame output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    #[default]
    Text,
    #[cfg(feature = "geojson")]
    GeoJson,
}

/// Playback cadence and output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Wall-clock time between two frames, in milliseconds
    #[serde(default = "PlaybackConfig::default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    #[serde(default)]
    pub format: FrameFormat,
}

impl PlaybackConfig {
    const fn default_frame_interval_ms() -> u64 {
        200
    }

    pub fn frame_interval(&self) -> StdDuration {
        StdDuration::from_millis(self.frame_interval_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: Self::default_frame_interval_ms(),
            format: FrameFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_path")]
    pub path: PathBuf,
}

impl StorageConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("tweets.db")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl Config {
    pub fn with_window_width_secs(mut self, secs: i64) -> Self {
        self.window.width_secs = secs;
        self
    }

    pub fn with_frame_interval_ms(mut self, interval_ms: u64) -> Self {
        if interval_ms > 60_000 {
            log::warn!(
                "Frame interval of {} ms is over a minute; playback will be very slow",
                interval_ms
            );
        }
        self.playback.frame_interval_ms = interval_ms;
        self
    }

    pub fn with_format(mut self, format: FrameFormat) -> Self {
        self.playback.format = format;
        self
    }

    pub fn with_storage_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.storage.path = path.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.window.width_secs <= 0 {
            return Err(format!(
                "Window width must be greater than zero, got {} s",
                self.window.width_secs
            ));
        }

        if self.window.width().is_none() {
            return Err(format!(
                "Window width of {} s is too large",
                self.window.width_secs
            ));
        }

        if self.playback.frame_interval_ms == 0 {
            return Err("Frame interval must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a config file, choosing the parser from the extension.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_toml = path.extension().is_some_and(|ext| ext == "toml");

        if is_toml {
            #[cfg(feature = "toml")]
            return Config::from_toml(&contents)
                .map_err(|e| crate::TweetmapError::InvalidConfig(e.to_string()));
            #[cfg(not(feature = "toml"))]
            return Err(crate::TweetmapError::InvalidConfig(
                "TOML configuration requires the 'toml' feature".to_string(),
            ));
        }

        Config::from_json(&contents).map_err(|e| crate::TweetmapError::InvalidConfig(e.to_string()))
    }
}
