//! Configuration management for gesture-panel

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `server.base_url`
pub const SERVER_ENV: &str = "GESTURE_PANEL_SERVER";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gesture-recognition server connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Settings synchronization and initial control values
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Status polling
    #[serde(default)]
    pub status: StatusConfig,

    /// Live MJPEG feed
    #[serde(default)]
    pub feed: FeedConfig,

    /// Path to config file (not serialized)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL the control endpoints are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for settings, snapshot and status requests (ms)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Quiet period before a settings push is sent (ms)
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Initial detection confidence slider value
    #[serde(default = "default_detection_confidence")]
    pub min_detection_confidence: f64,

    /// Initial tracking confidence slider value
    #[serde(default = "default_tracking_confidence")]
    pub min_tracking_confidence: f64,

    /// Initial landmarks overlay toggle
    #[serde(default = "default_true")]
    pub show_landmarks: bool,

    /// Initial FPS overlay toggle
    #[serde(default = "default_true")]
    pub show_fps: bool,

    /// Granularity of the confidence sliders
    #[serde(default = "default_slider_step")]
    pub slider_step: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Delay between the end of one status poll and the start of the next (ms)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Whether to follow the server's MJPEG stream
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Displayed width of the live image, used when a frame has no native size
    #[serde(default = "default_display_width")]
    pub display_width: u32,

    /// Displayed height of the live image, used when a frame has no native size
    #[serde(default = "default_display_height")]
    pub display_height: u32,

    /// Wait before reconnecting a dropped stream (ms)
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_debounce() -> u64 {
    400
}

fn default_detection_confidence() -> f64 {
    0.7
}

fn default_tracking_confidence() -> f64 {
    0.5
}

fn default_slider_step() -> f64 {
    0.05
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_display_width() -> u32 {
    640
}

fn default_display_height() -> u32 {
    480
}

fn default_reconnect_delay() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            min_detection_confidence: default_detection_confidence(),
            min_tracking_confidence: default_tracking_confidence(),
            show_landmarks: true,
            show_fps: true,
            slider_step: default_slider_step(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display_width: default_display_width(),
            display_height: default_display_height(),
            reconnect_delay_ms: default_reconnect_delay(),
        }
    }
}

impl SettingsConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl StatusConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl FeedConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location when
    /// `path` is `None`. A missing default config is created on disk.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::load_from(&default_path)?
                } else {
                    let mut config = Config::default();
                    config.config_path = Some(default_path);
                    config.save()?;
                    config
                }
            }
        };

        config.apply_server_override(std::env::var(SERVER_ENV).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = self.config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Get the config file path
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Self::default_config_path(),
        }
    }

    /// Replace the server base URL when an override is present and non-empty
    pub fn apply_server_override(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.server.base_url = url.trim().to_string();
        }
    }

    /// Get default config path
    fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = directories::ProjectDirs::from("dev", "gesture-panel", "console")
            .context("Failed to determine config directory")?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
