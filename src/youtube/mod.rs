use serde::{Deserialize, Serialize};

pub mod api;
pub mod http;
pub mod url;

pub use api::DataApiClient;
pub use http::{HttpFetch, HttpRequest, ReqwestFetcher};
pub use self::url::video_id_from_url;

use crate::{ExtractorError, Result};

/// Placeholder written for statistics the API did not return
pub const NOT_AVAILABLE: &str = "N/A";

/// How a channel is looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSelector {
    Id(String),
    Username(String),
}

impl ChannelSelector {
    /// Build a selector from optional CLI inputs; the ID wins if both are set
    pub fn from_options(channel_id: Option<String>, username: Option<String>) -> Result<Self> {
        match (channel_id, username) {
            (Some(id), _) => Ok(ChannelSelector::Id(id)),
            (None, Some(name)) => Ok(ChannelSelector::Username(name)),
            (None, None) => Err(ExtractorError::MissingChannelSelector.into()),
        }
    }
}

/// Envelope shared by every `*.list` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snippet {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(rename = "default")]
    pub standard: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Counts arrive as decimal strings; any of them may be hidden by the owner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub view_count: Option<String>,
    pub subscriber_count: Option<String>,
    pub video_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

/// `channels` resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResource {
    pub id: String,
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub content_details: ChannelContentDetails,
}

impl ChannelResource {
    pub fn uploads_playlist_id(&self) -> Option<&str> {
        self.content_details.related_playlists.uploads.as_deref()
    }
}

/// `playlistItems` resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub snippet: Snippet,
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
}

/// `videos` resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    pub id: String,
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub statistics: Statistics,
}

/// Flattened channel record written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub view_count: String,
    pub subscriber_count: String,
    pub video_count: String,
}

impl From<&ChannelResource> for ChannelSummary {
    fn from(channel: &ChannelResource) -> Self {
        let stats = &channel.statistics;
        Self {
            id: channel.id.clone(),
            title: channel.snippet.title.clone(),
            description: channel.snippet.description.clone(),
            published_at: channel.snippet.published_at.clone(),
            view_count: count_or_na(&stats.view_count),
            subscriber_count: count_or_na(&stats.subscriber_count),
            video_count: count_or_na(&stats.video_count),
        }
    }
}

/// Flattened video record written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub thumbnail_url: String,
    pub view_count: String,
    pub like_count: String,
    pub comment_count: String,
}

impl From<&VideoResource> for VideoSummary {
    fn from(video: &VideoResource) -> Self {
        let thumbnails = &video.snippet.thumbnails;
        let thumbnail_url = thumbnails
            .high
            .as_ref()
            .or(thumbnails.standard.as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default();
        let stats = &video.statistics;

        Self {
            video_id: video.id.clone(),
            title: video.snippet.title.clone(),
            description: video.snippet.description.clone(),
            published_at: video.snippet.published_at.clone(),
            thumbnail_url,
            view_count: count_or_na(&stats.view_count),
            like_count: count_or_na(&stats.like_count),
            comment_count: count_or_na(&stats.comment_count),
        }
    }
}

fn count_or_na(count: &Option<String>) -> String {
    count.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
