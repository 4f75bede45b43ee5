use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::{DataFormat, TranscriptFormat};
use crate::transcript::TranscriptLine;

pub mod formatters;

pub use formatters::*;

/// Per-channel directory tree: `{base}/channel_{id}/{videos,transcripts}`
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub channel_dir: PathBuf,
    pub videos_dir: PathBuf,
    pub transcripts_dir: PathBuf,
}

impl OutputLayout {
    /// Create the directory tree for a channel
    pub fn create(base_dir: &Path, channel_id: &str) -> Result<Self> {
        let channel_dir = base_dir.join(format!("channel_{}", channel_id));
        let layout = Self {
            videos_dir: channel_dir.join("videos"),
            transcripts_dir: channel_dir.join("transcripts"),
            channel_dir,
        };

        for dir in [&layout.channel_dir, &layout.videos_dir, &layout.transcripts_dir] {
            fs_err::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }

        Ok(layout)
    }
}

/// Save records to `{stem}.{json|csv}`; returns the written path, or `None`
/// for an empty CSV list
pub fn save_records<R: CsvRecord + Serialize>(
    records: &[R],
    stem: &Path,
    format: DataFormat,
) -> Result<Option<PathBuf>> {
    let content = match format {
        DataFormat::Json => format_as_json(records)?,
        DataFormat::Csv if records.is_empty() => return Ok(None),
        DataFormat::Csv => format_as_csv(records),
    };

    let path = stem.with_extension(format.extension());
    fs_err::write(&path, content)?;
    Ok(Some(path))
}

/// Save a transcript as `[HH:MM:SS] text` lines or a JSON array
pub fn save_transcript(lines: &[TranscriptLine], path: &Path, format: TranscriptFormat) -> Result<()> {
    let content = match format {
        TranscriptFormat::Txt => format_transcript_as_text(lines),
        TranscriptFormat::Json => format_as_json(lines)?,
    };

    fs_err::write(path, content)?;
    Ok(())
}
