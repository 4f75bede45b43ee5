use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytextract",
    about = "YouTube Channel Extractor - Export channel info, video lists and transcripts",
    version,
    long_about = "A CLI tool for exporting YouTube channel metadata, uploaded video details and public transcripts to JSON, CSV or plain-text files. Uses the YouTube Data API v3 for metadata and the public watch page for captions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export channel info and its uploaded videos (optionally with transcripts)
    Channel {
        #[command(flatten)]
        target: ChannelTarget,

        /// YouTube Data API key
        #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Output format for channel and video data
        #[arg(long, value_enum)]
        output_format: Option<DataFormat>,

        /// Output format for transcripts
        #[arg(long, value_enum)]
        transcript_format: Option<TranscriptFormat>,

        /// Base output directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Maximum number of videos to retrieve
        #[arg(long, value_name = "COUNT")]
        max_videos: Option<usize>,

        /// Also extract transcripts for all retrieved videos
        #[arg(long)]
        with_transcripts: bool,
    },

    /// Extract the transcript of a single video
    Video {
        /// Video URL (youtube.com/watch?v=, youtu.be/, /embed/ or /v/)
        #[arg(value_name = "URL")]
        url: String,

        /// YouTube Data API key (only used to name the file after the video title)
        #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Output format for the transcript
        #[arg(long, value_enum)]
        transcript_format: Option<TranscriptFormat>,

        /// Output directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}

impl Cli {
    /// Default `EnvFilter` directives, covering both the library and binary targets
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "yt_channel_extractor=debug,ytextract=debug"
        } else {
            "yt_channel_extractor=info,ytextract=info"
        }
    }
}

/// Which channel to export; exactly one must be given
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ChannelTarget {
    /// YouTube channel ID
    #[arg(long = "id", value_name = "CHANNEL_ID")]
    pub channel_id: Option<String>,

    /// Legacy YouTube username
    #[arg(long, value_name = "NAME")]
    pub username: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// Pretty-printed JSON
    Json,
    /// CSV with a header row
    Csv,
}

impl DataFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    /// One `[HH:MM:SS] text` line per caption
    Txt,
    /// JSON array of `{time, text}` objects
    Json,
}

impl TranscriptFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TranscriptFormat::Txt => "txt",
            TranscriptFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
