use anyhow::Context;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::http::{HttpFetch, HttpRequest};
use super::{ChannelResource, ChannelSelector, ListResponse, PlaylistItem, VideoResource};
use crate::{ExtractorError, Result};

/// Largest page / batch the Data API accepts
pub const MAX_PAGE_SIZE: usize = 50;

/// Read-only client for the YouTube Data API v3
pub struct DataApiClient {
    http: Arc<dyn HttpFetch>,
    api_key: String,
    base_url: String,
}

impl DataApiClient {
    pub fn new(http: Arc<dyn HttpFetch>, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, endpoint: &str) -> HttpRequest {
        HttpRequest::new(format!("{}/{}", self.base_url, endpoint))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<ListResponse<T>> {
        let endpoint = request.url.clone();
        let body = self
            .http
            .get_text(request.param("key", self.api_key.as_str()))
            .await?;

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to decode response from {}", endpoint))
    }

    /// Look up a single channel with its statistics and uploads playlist
    pub async fn get_channel(&self, selector: &ChannelSelector) -> Result<ChannelResource> {
        let request = self
            .request("channels")
            .param("part", "snippet,statistics,contentDetails");
        let request = match selector {
            ChannelSelector::Id(id) => request.param("id", id.as_str()),
            ChannelSelector::Username(name) => request.param("forUsername", name.as_str()),
        };

        tracing::debug!("Looking up channel {:?}", selector);
        let response: ListResponse<ChannelResource> = self.fetch(request).await?;

        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ExtractorError::ChannelNotFound.into())
    }

    /// List up to `max_results` uploads of a channel, newest first.
    ///
    /// Uploads are modelled as a playlist, so the channel is resolved first and
    /// its uploads playlist is paged through until enough items are collected.
    pub async fn list_channel_videos(&self, channel_id: &str, max_results: usize) -> Result<Vec<PlaylistItem>> {
        let channel = self
            .get_channel(&ChannelSelector::Id(channel_id.to_string()))
            .await?;
        let playlist_id = channel
            .uploads_playlist_id()
            .ok_or_else(|| ExtractorError::MissingUploadsPlaylist(channel_id.to_string()))?
            .to_string();

        let mut videos: Vec<PlaylistItem> = Vec::new();
        let mut page_token: Option<String> = None;

        while videos.len() < max_results {
            let mut request = self
                .request("playlistItems")
                .param("part", "snippet,contentDetails")
                .param("maxResults", MAX_PAGE_SIZE.to_string())
                .param("playlistId", playlist_id.as_str());
            if let Some(token) = page_token.take() {
                request = request.param("pageToken", token);
            }

            let page: ListResponse<PlaylistItem> = self.fetch(request).await?;
            videos.extend(page.items);
            tracing::debug!("Fetched {} playlist items so far", videos.len());

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        videos.truncate(max_results);
        Ok(videos)
    }

    /// Fetch full details for the given video IDs in batches of 50.
    ///
    /// Batches are concatenated in order, but the API does not promise to echo
    /// IDs in request order within a batch, and silently drops unknown IDs.
    pub async fn get_video_details(&self, video_ids: &[String]) -> Result<Vec<VideoResource>> {
        let mut videos = Vec::with_capacity(video_ids.len());

        for chunk in video_ids.chunks(MAX_PAGE_SIZE) {
            let request = self
                .request("videos")
                .param("part", "snippet,contentDetails,statistics")
                .param("id", chunk.join(","));

            let response: ListResponse<VideoResource> = self.fetch(request).await?;
            videos.extend(response.items);
        }

        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::http::MockHttpFetch;
    use serde_json::json;

    const BASE: &str = "https://api.test/youtube/v3";

    fn channel_body() -> String {
        json!({
            "items": [{
                "id": "UC123",
                "snippet": { "title": "Test Channel", "description": "d", "publishedAt": "2019-01-01T00:00:00Z" },
                "statistics": { "viewCount": "10", "subscriberCount": "2", "videoCount": "120" },
                "contentDetails": { "relatedPlaylists": { "uploads": "UU123" } }
            }]
        })
        .to_string()
    }

    fn playlist_page(start: usize, count: usize, next: Option<&str>) -> String {
        let items: Vec<_> = (start..start + count)
            .map(|i| json!({ "contentDetails": { "videoId": format!("v{}", i) } }))
            .collect();
        let mut body = json!({ "items": items });
        if let Some(token) = next {
            body["nextPageToken"] = json!(token);
        }
        body.to_string()
    }

    /// Uploads playlist with `total` items served in pages of 50
    fn paged_fetcher(total: usize) -> MockHttpFetch {
        let mut http = MockHttpFetch::new();
        http.expect_get_text().returning(move |req| {
            assert_eq!(req.get_param("key"), Some("k"));
            if req.url.ends_with("/channels") {
                return Ok(channel_body());
            }
            assert!(req.url.ends_with("/playlistItems"));
            assert_eq!(req.get_param("playlistId"), Some("UU123"));
            assert_eq!(req.get_param("maxResults"), Some("50"));
            let start: usize = req
                .get_param("pageToken")
                .map(|t| t.trim_start_matches("page").parse().unwrap())
                .unwrap_or(0);
            let count = MAX_PAGE_SIZE.min(total - start);
            let next_start = start + count;
            let next = (next_start < total).then(|| format!("page{}", next_start));
            Ok(playlist_page(start, count, next.as_deref()))
        });
        http
    }

    #[tokio::test]
    async fn test_get_channel_by_username() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .withf(|req| req.get_param("forUsername") == Some("bob") && req.get_param("id").is_none())
            .times(1)
            .returning(|_| Ok(channel_body()));

        let client = DataApiClient::new(Arc::new(http), "k", BASE);
        let channel = client
            .get_channel(&ChannelSelector::Username("bob".into()))
            .await
            .unwrap();
        assert_eq!(channel.id, "UC123");
        assert_eq!(channel.uploads_playlist_id(), Some("UU123"));
    }

    #[tokio::test]
    async fn test_get_channel_not_found() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .returning(|_| Ok(json!({ "items": [] }).to_string()));

        let client = DataApiClient::new(Arc::new(http), "k", BASE);
        let err = client
            .get_channel(&ChannelSelector::Id("nope".into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractorError>(),
            Some(ExtractorError::ChannelNotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_channel_videos_truncates_to_max() {
        let client = DataApiClient::new(Arc::new(paged_fetcher(200)), "k", BASE);

        let videos = client.list_channel_videos("UC123", 70).await.unwrap();
        assert_eq!(videos.len(), 70);
        assert_eq!(videos[0].content_details.video_id, "v0");
        assert_eq!(videos[69].content_details.video_id, "v69");
    }

    #[tokio::test]
    async fn test_list_channel_videos_stops_when_pages_run_out() {
        let client = DataApiClient::new(Arc::new(paged_fetcher(73)), "k", BASE);

        let videos = client.list_channel_videos("UC123", 500).await.unwrap();
        assert_eq!(videos.len(), 73);
        assert_eq!(videos[72].content_details.video_id, "v72");
    }

    #[tokio::test]
    async fn test_list_channel_videos_only_fetches_needed_pages() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text()
            .withf(|req| req.url.ends_with("/channels"))
            .times(1)
            .returning(|_| Ok(channel_body()));
        http.expect_get_text()
            .withf(|req| req.url.ends_with("/playlistItems"))
            .times(1)
            .returning(|_| Ok(playlist_page(0, 50, Some("page50"))));

        let client = DataApiClient::new(Arc::new(http), "k", BASE);
        let videos = client.list_channel_videos("UC123", 10).await.unwrap();
        assert_eq!(videos.len(), 10);
    }

    #[tokio::test]
    async fn test_get_video_details_batches_by_fifty() {
        let ids: Vec<String> = (0..120).map(|i| format!("v{}", i)).collect();

        let mut http = MockHttpFetch::new();
        http.expect_get_text().times(3).returning(|req| {
            assert!(req.url.ends_with("/videos"));
            let ids: Vec<&str> = req.get_param("id").unwrap().split(',').collect();
            assert!(ids.len() <= MAX_PAGE_SIZE);
            let items: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
            Ok(json!({ "items": items }).to_string())
        });

        let client = DataApiClient::new(Arc::new(http), "k", BASE);
        let videos = client.get_video_details(&ids).await.unwrap();
        assert_eq!(videos.len(), 120);
        assert_eq!(videos[0].id, "v0");
        assert_eq!(videos[50].id, "v50");
        assert_eq!(videos[119].id, "v119");
    }

    #[tokio::test]
    async fn test_get_video_details_empty_input_makes_no_requests() {
        let http = MockHttpFetch::new();
        let client = DataApiClient::new(Arc::new(http), "k", BASE);
        assert!(client.get_video_details(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_errors_propagate() {
        let mut http = MockHttpFetch::new();
        http.expect_get_text().returning(|req| {
            Err(ExtractorError::HttpStatus { status: 403, url: req.url }.into())
        });

        let client = DataApiClient::new(Arc::new(http), "k", BASE);
        let err = client.list_channel_videos("UC123", 5).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractorError>(),
            Some(ExtractorError::HttpStatus { status: 403, .. })
        ));
    }
}
