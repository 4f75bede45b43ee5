use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::cli::{DataFormat, TranscriptFormat};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoints and credentials
    pub api: ApiConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// YouTube Data API key (CLI flag and YOUTUBE_API_KEY take precedence)
    pub api_key: Option<String>,

    /// Base URL of the YouTube Data API v3
    pub base_url: String,

    /// Public watch page used for caption scraping
    pub watch_url: String,

    /// User-Agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base output directory
    pub output_dir: PathBuf,

    /// Format for channel info and video lists
    pub data_format: DataFormat,

    /// Format for transcripts
    pub transcript_format: TranscriptFormat,

    /// Default maximum number of videos per channel
    pub max_videos: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                api_key: None,
                base_url: "https://www.googleapis.com/youtube/v3".to_string(),
                watch_url: "https://www.youtube.com/watch".to_string(),
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            },
            output: OutputConfig {
                output_dir: PathBuf::from("./youtube_data"),
                data_format: DataFormat::Csv,
                transcript_format: TranscriptFormat::Txt,
                max_videos: 50,
            },
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // Current directory wins so a project can carry its own settings
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-channel-extractor").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.output.max_videos == 0 {
            anyhow::bail!("output.max_videos must be greater than zero");
        }

        Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid api.base_url: {}", self.api.base_url))?;
        Url::parse(&self.api.watch_url)
            .with_context(|| format!("Invalid api.watch_url: {}", self.api.watch_url))?;

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  API Key: {}", mask_key(self.api.api_key.as_deref()));
        println!("  API Base URL: {}", self.api.base_url);
        println!("  Watch URL: {}", self.api.watch_url);
        println!("  Output Dir: {}", self.output.output_dir.display());
        println!("  Data Format: {}", self.output.data_format);
        println!("  Transcript Format: {}", self.output.transcript_format);
        println!("  Max Videos: {}", self.output.max_videos);
    }
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(k) if k.chars().count() <= 4 => "****".to_string(),
        Some(k) => {
            let tail: String = k.chars().skip(k.chars().count() - 4).collect();
            format!("****{}", tail)
        }
    }
}
