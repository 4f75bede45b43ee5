use anyhow::Result;
use serde::Serialize;

use crate::transcript::TranscriptLine;
use crate::youtube::{ChannelSummary, VideoSummary};

/// A flat record with a fixed column set
pub trait CsvRecord {
    fn headers() -> &'static [&'static str];
    fn fields(&self) -> Vec<&str>;
}

impl CsvRecord for ChannelSummary {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "title",
            "description",
            "published_at",
            "view_count",
            "subscriber_count",
            "video_count",
        ]
    }

    fn fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.title.as_str(),
            self.description.as_str(),
            self.published_at.as_str(),
            self.view_count.as_str(),
            self.subscriber_count.as_str(),
            self.video_count.as_str(),
        ]
    }
}

impl CsvRecord for VideoSummary {
    fn headers() -> &'static [&'static str] {
        &[
            "video_id",
            "title",
            "description",
            "published_at",
            "thumbnail_url",
            "view_count",
            "like_count",
            "comment_count",
        ]
    }

    fn fields(&self) -> Vec<&str> {
        vec![
            self.video_id.as_str(),
            self.title.as_str(),
            self.description.as_str(),
            self.published_at.as_str(),
            self.thumbnail_url.as_str(),
            self.view_count.as_str(),
            self.like_count.as_str(),
            self.comment_count.as_str(),
        ]
    }
}

/// Format records as CSV with a header row
pub fn format_as_csv<R: CsvRecord>(records: &[R]) -> String {
    let mut csv = String::new();
    push_csv_row(&mut csv, R::headers().iter().copied());

    for record in records {
        push_csv_row(&mut csv, record.fields().into_iter());
    }

    csv
}

fn push_csv_row<'a>(csv: &mut String, fields: impl Iterator<Item = &'a str>) {
    let row: Vec<String> = fields.map(escape_csv_field).collect();
    csv.push_str(&row.join(","));
    csv.push_str("\r\n");
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Format any serializable value as pretty JSON, keeping non-ASCII text as-is
pub fn format_as_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format a transcript as `[HH:MM:SS] text` lines
pub fn format_transcript_as_text(lines: &[TranscriptLine]) -> String {
    lines
        .iter()
        .map(|line| format!("[{}] {}\n", line.time, line.text))
        .collect()
}
