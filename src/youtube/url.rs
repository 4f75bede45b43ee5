use url::Url;

use crate::utils::strip_www;
use crate::{ExtractorError, Result};

/// Extract the video ID from a YouTube URL.
///
/// Supported shapes are `youtu.be/ID`, `youtube.com/watch?v=ID`,
/// `youtube.com/embed/ID` and `youtube.com/v/ID`, each with or without `www.`.
/// Anything else yields `Ok(None)`; a `/watch` URL lacking `v` is an error.
pub fn video_id_from_url(input: &str) -> Result<Option<String>> {
    let parsed = match Url::parse(input) {
        Ok(parsed) => parsed,
        Err(_) => return Ok(None),
    };

    let host = match parsed.host_str() {
        Some(host) => strip_www(host),
        None => return Ok(None),
    };
    let path = parsed.path();

    let id = match host {
        "youtu.be" => Some(path.trim_start_matches('/').to_string()),
        "youtube.com" if path == "/watch" => {
            let id = parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
                .ok_or_else(|| ExtractorError::MissingVideoParam(input.to_string()))?;
            Some(id)
        }
        "youtube.com" if path.starts_with("/embed/") || path.starts_with("/v/") => {
            path.split('/').nth(2).map(str::to_string)
        }
        _ => None,
    };

    Ok(id.filter(|id| !id.is_empty()))
}
