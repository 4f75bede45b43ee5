use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::{DataFormat, TranscriptFormat};
use crate::config::Config;
use crate::output::{self, OutputLayout};
use crate::transcript::{TranscriptScraper, TranscriptSource};
use crate::utils::{file_timestamp, sanitize_filename};
use crate::youtube::{
    video_id_from_url, ChannelSelector, ChannelSummary, DataApiClient, HttpFetch, ReqwestFetcher, VideoSummary,
};
use crate::{ExtractorError, Result};

/// Per-run settings resolved from CLI flags and config
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,
    pub data_format: DataFormat,
    pub transcript_format: TranscriptFormat,
    pub max_videos: usize,
    pub with_transcripts: bool,
    pub show_progress: bool,
}

/// Outcome of a channel export
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub channel: ChannelSummary,
    pub videos: Vec<VideoSummary>,
    pub transcripts_saved: usize,
    pub channel_dir: PathBuf,
}

/// Drives the metadata client and transcript source and writes results
pub struct ExtractionPipeline {
    api: Option<DataApiClient>,
    transcripts: Box<dyn TranscriptSource>,
    options: PipelineOptions,
}

impl ExtractionPipeline {
    pub fn new(api: Option<DataApiClient>, transcripts: Box<dyn TranscriptSource>, options: PipelineOptions) -> Self {
        Self {
            api,
            transcripts,
            options,
        }
    }

    /// Wire up the HTTP-backed client and scraper from configuration
    pub fn from_config(config: &Config, api_key: Option<String>, options: PipelineOptions) -> Result<Self> {
        let http: Arc<dyn HttpFetch> = Arc::new(
            ReqwestFetcher::new(&config.api.user_agent).context("Failed to build HTTP client")?,
        );

        let api = api_key.map(|key| DataApiClient::new(http.clone(), key, config.api.base_url.as_str()));
        let scraper = TranscriptScraper::new(http, config.api.watch_url.as_str());

        Ok(Self::new(api, Box::new(scraper), options))
    }

    /// Extract the transcript of one video.
    ///
    /// Returns the written file, or `None` when the video has no transcript.
    pub async fn extract_video(&self, url: &str) -> Result<Option<PathBuf>> {
        let video_id = video_id_from_url(url)?
            .ok_or_else(|| ExtractorError::InvalidVideoUrl(url.to_string()))?;

        println!("Extracting transcript for video ID: {}", video_id);

        let mut file_stem = format!("video_{}", video_id);
        if let Some(api) = &self.api {
            let details = api.get_video_details(std::slice::from_ref(&video_id)).await?;
            if let Some(video) = details.first().filter(|v| !v.snippet.title.trim().is_empty()) {
                file_stem = sanitize_filename(video.snippet.title.trim());
            }
        }

        let Some(transcript) = self.transcripts.fetch_transcript(&video_id).await else {
            println!("No transcript found for this video");
            return Ok(None);
        };

        fs_err::create_dir_all(&self.options.output_dir)?;
        let path = self
            .options
            .output_dir
            .join(format!("{}.{}", file_stem, self.options.transcript_format.extension()));
        output::save_transcript(&transcript, &path, self.options.transcript_format)?;

        Ok(Some(path))
    }

    /// Export channel info, its uploads and optionally their transcripts
    pub async fn extract_channel(&self, selector: &ChannelSelector) -> Result<ChannelReport> {
        let api = self.api.as_ref().ok_or(ExtractorError::MissingApiKey)?;

        let channel = api.get_channel(selector).await?;
        let summary = ChannelSummary::from(&channel);
        println!("Found channel: {} (ID: {})", summary.title, summary.id);

        let layout = OutputLayout::create(&self.options.output_dir, &summary.id)?;
        let timestamp = file_timestamp();

        output::save_records(
            std::slice::from_ref(&summary),
            &layout.channel_dir.join(format!("info_{}", timestamp)),
            self.options.data_format,
        )?;

        println!("Retrieving up to {} videos...", self.options.max_videos);
        let uploads = api.list_channel_videos(&summary.id, self.options.max_videos).await?;
        let video_ids: Vec<String> = uploads
            .into_iter()
            .map(|item| item.content_details.video_id)
            .collect();

        let details = api.get_video_details(&video_ids).await?;
        let videos: Vec<VideoSummary> = details.iter().map(VideoSummary::from).collect();

        output::save_records(
            &videos,
            &layout.videos_dir.join(format!("list_{}", timestamp)),
            self.options.data_format,
        )?;
        println!("Successfully retrieved {} videos", videos.len());

        let transcripts_saved = if self.options.with_transcripts {
            println!("Extracting transcripts... (this may take a while)");
            let saved = self.extract_transcripts(&videos, &layout).await;
            println!("Successfully extracted {} transcripts", saved);
            saved
        } else {
            0
        };

        Ok(ChannelReport {
            channel: summary,
            videos,
            transcripts_saved,
            channel_dir: layout.channel_dir,
        })
    }

    /// Fetch and save each transcript in turn; returns how many were saved
    async fn extract_transcripts(&self, videos: &[VideoSummary], layout: &OutputLayout) -> usize {
        let progress = if self.options.show_progress {
            let bar = ProgressBar::new(videos.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let format = self.options.transcript_format;
        let mut saved = 0;
        let mut used_stems = HashSet::new();

        for video in videos {
            progress.set_message(format!("Processing: {}", video.title));
            tracing::debug!("Fetching transcript for {}", video.video_id);

            if let Some(transcript) = self.transcripts.fetch_transcript(&video.video_id).await {
                let stem = transcript_file_stem(video, &mut used_stems);
                let path = layout
                    .transcripts_dir
                    .join(format!("{}.{}", stem, format.extension()));
                match output::save_transcript(&transcript, &path, format) {
                    Ok(()) => saved += 1,
                    Err(e) => tracing::warn!("Failed to save transcript for video {}: {:#}", video.video_id, e),
                }
            }

            progress.inc(1);
        }

        progress.finish_with_message("Transcripts done");
        saved
    }
}

/// File stem for a video's transcript, unique within one run.
///
/// Uses the sanitized title, `video_{id}` for blank titles, and appends
/// `_{id}` when another video already claimed the same stem.
fn transcript_file_stem(video: &VideoSummary, used: &mut HashSet<String>) -> String {
    let title = sanitize_filename(video.title.trim());
    let mut stem = if title.is_empty() {
        format!("video_{}", video.video_id)
    } else {
        title
    };

    if used.contains(&stem) {
        stem = format!("{}_{}", stem, video.video_id);
    }
    used.insert(stem.clone());
    stem
}
