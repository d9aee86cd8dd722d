use super::types::*;
use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_DIR_NAME: &str = "hls-packager";
const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub hls: HlsConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub subtitles: SubtitleConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `config_path` when it exists, then the per-user config file, and
    /// finally falls back to the built-in defaults.
    pub fn load_with_fallback<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            return Self::load(config_path);
        }

        if let Some(user_config) = Self::user_config_path().filter(|p| p.exists()) {
            debug!("Loading configuration from {}", user_config.display());
            return Self::load(user_config);
        }

        warn!(
            "Configuration file {} not found, using built-in defaults",
            config_path.display()
        );
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<()> {
        if self.progress.update_interval_ms == 0 {
            return Err(Error::validation(
                "update_interval_ms must be greater than 0",
            ));
        }

        if self.hls.segment_duration == 0 {
            return Err(Error::validation(
                "hls.segment_duration must be greater than 0",
            ));
        }

        if self.hls.segment_extension.trim().is_empty() {
            return Err(Error::validation("hls.segment_extension must not be empty"));
        }

        if self.video.gop_size == 0 {
            return Err(Error::validation("video.gop_size must be greater than 0"));
        }

        if self.video.ladder.is_empty() {
            return Err(Error::validation("At least one ladder rung must be defined"));
        }

        let mut labels = HashSet::new();
        for rung in &self.video.ladder {
            if rung.label.trim().is_empty() || rung.label.contains(['/', '\\']) {
                return Err(Error::validation(format!(
                    "Invalid ladder label '{}'",
                    rung.label
                )));
            }

            if !labels.insert(rung.label.as_str()) {
                return Err(Error::validation(format!(
                    "Duplicate ladder label '{}'",
                    rung.label
                )));
            }

            if rung.target_dimension == 0 || rung.target_dimension % 2 != 0 {
                return Err(Error::validation(format!(
                    "Invalid target dimension for rung '{}': {} (must be a positive even number)",
                    rung.label, rung.target_dimension
                )));
            }
        }

        if self.tools.operation_timeout_seconds == Some(0) {
            return Err(Error::validation(
                "tools.operation_timeout_seconds must be greater than 0 when set",
            ));
        }

        Ok(())
    }
}
