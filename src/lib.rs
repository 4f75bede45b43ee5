//! YouTube Channel Extractor - A Rust CLI tool for exporting channel data
//!
//! This library retrieves channel metadata and video listings from the YouTube Data API
//! and scrapes public caption tracks to produce transcripts, writing everything to
//! JSON, CSV or plain-text files.

pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod transcript;
pub mod utils;
pub mod youtube;

pub use cli::{Cli, Commands, DataFormat, TranscriptFormat};
pub use config::Config;
pub use pipeline::{ChannelReport, ExtractionPipeline, PipelineOptions};
pub use transcript::{Transcript, TranscriptLine, TranscriptScraper, TranscriptSource};
pub use youtube::{ChannelSelector, ChannelSummary, DataApiClient, VideoSummary};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the extractor
#[derive(thiserror::Error, Debug)]
pub enum ExtractorError {
    #[error("Could not extract video ID from URL: {0}")]
    InvalidVideoUrl(String),

    #[error("Watch URL has no 'v' parameter: {0}")]
    MissingVideoParam(String),

    #[error("Either a channel ID or a username must be provided")]
    MissingChannelSelector,

    #[error("An API key is required for channel extraction (use --api-key or YOUTUBE_API_KEY)")]
    MissingApiKey,

    #[error("Channel not found")]
    ChannelNotFound,

    #[error("Channel {0} has no uploads playlist")]
    MissingUploadsPlaylist(String),

    #[error("Request to {url} failed: HTTP {status}")]
    HttpStatus { status: u16, url: String },
}
