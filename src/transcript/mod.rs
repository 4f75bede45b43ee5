use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::youtube::http::{HttpFetch, HttpRequest};
use crate::Result;

pub mod extract;

/// One caption line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Start offset as `HH:MM:SS`
    pub time: String,

    /// Caption text with HTML entities decoded
    pub text: String,
}

/// Caption lines in ascending start order
pub type Transcript = Vec<TranscriptLine>;

/// Anything that can produce a transcript for a video ID.
///
/// Implementations are best-effort: `None` means no transcript could be
/// obtained, for whatever reason, and is never fatal to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, video_id: &str) -> Option<Transcript>;
}

/// Scrapes the public watch page for its first caption track
pub struct TranscriptScraper {
    http: Arc<dyn HttpFetch>,
    watch_url: String,
}

impl TranscriptScraper {
    pub fn new(http: Arc<dyn HttpFetch>, watch_url: impl Into<String>) -> Self {
        Self {
            http,
            watch_url: watch_url.into(),
        }
    }

    async fn scrape(&self, video_id: &str) -> Result<Option<Transcript>> {
        let page = self
            .http
            .get_text(HttpRequest::new(self.watch_url.as_str()).param("v", video_id))
            .await?;

        let Some(caption_url) = extract::find_caption_track_url(&page) else {
            tracing::debug!("No caption tracks on watch page for {}", video_id);
            return Ok(None);
        };

        let xml = self.http.get_text(HttpRequest::new(caption_url)).await?;
        let lines = extract::parse_caption_xml(&xml)?;

        if lines.is_empty() {
            tracing::debug!("Caption track for {} had no lines", video_id);
            return Ok(None);
        }

        Ok(Some(lines))
    }
}

#[async_trait]
impl TranscriptSource for TranscriptScraper {
    async fn fetch_transcript(&self, video_id: &str) -> Option<Transcript> {
        match self.scrape(video_id).await {
            Ok(transcript) => transcript,
            Err(e) => {
                tracing::warn!("Error getting transcript for video {}: {:#}", video_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::http::MockHttpFetch;
    use crate::ExtractorError;

    const WATCH: &str = "https://www.youtube.com/watch";

    fn page_with_track(url: &str) -> String {
        format!(
            r#"<html><script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":[{{"baseUrl":"{}"}}]}}}}}};</script></html>"#,
            url
        )
    }

    #[tokio::test]
    async fn test_fetches_page_then_captions() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .withf(|req| req.url == WATCH && req.get_param("v") == Some("abc"))
            .times(1)
            .returning(|_| Ok(page_with_track("https://captions.test/timedtext?v=abc&amp;lang=en")));
        http.expect_get_text()
            .withf(|req| req.url == "https://captions.test/timedtext?v=abc&lang=en" && req.query.is_empty())
            .times(1)
            .returning(|_| {
                Ok(r#"<transcript><text start="1.5" dur="2.0">Hi &amp; bye</text><text start="61" dur="1">next</text></transcript>"#.to_string())
            });

        let scraper = TranscriptScraper::new(Arc::new(http), WATCH);
        let transcript = scraper.fetch_transcript("abc").await.unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].time, "00:00:01");
        assert_eq!(transcript[0].text, "Hi & bye");
        assert_eq!(transcript[1].time, "00:01:01");
    }

    #[tokio::test]
    async fn test_page_failure_is_absent() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .times(1)
            .returning(|req| Err(ExtractorError::HttpStatus { status: 500, url: req.url }.into()));

        let scraper = TranscriptScraper::new(Arc::new(http), WATCH);
        assert!(scraper.fetch_transcript("abc").await.is_none());
    }

    #[tokio::test]
    async fn test_network_error_is_absent() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .returning(|_| Err(anyhow::anyhow!("connection reset by peer")));

        let scraper = TranscriptScraper::new(Arc::new(http), WATCH);
        assert!(scraper.fetch_transcript("abc").await.is_none());
    }

    #[tokio::test]
    async fn test_no_caption_tracks_skips_second_request() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .times(1)
            .returning(|_| Ok("<html>captions disabled</html>".to_string()));

        let scraper = TranscriptScraper::new(Arc::new(http), WATCH);
        assert!(scraper.fetch_transcript("abc").await.is_none());
    }

    #[tokio::test]
    async fn test_caption_failure_is_absent() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .withf(|req| req.url == WATCH)
            .returning(|_| Ok(page_with_track("https://captions.test/t")));
        http.expect_get_text()
            .withf(|req| req.url != WATCH)
            .returning(|req| Err(ExtractorError::HttpStatus { status: 404, url: req.url }.into()));

        let scraper = TranscriptScraper::new(Arc::new(http), WATCH);
        assert!(scraper.fetch_transcript("abc").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_caption_document_is_absent() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .withf(|req| req.url == WATCH)
            .returning(|_| Ok(page_with_track("https://captions.test/t")));
        http.expect_get_text()
            .withf(|req| req.url != WATCH)
            .returning(|_| Ok("<transcript></transcript>".to_string()));

        let scraper = TranscriptScraper::new(Arc::new(http), WATCH);
        assert!(scraper.fetch_transcript("abc").await.is_none());
    }
}
