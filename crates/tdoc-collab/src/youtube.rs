//! YouTube Data API v3 client.
//!
//! One client implements both collaborator roles backed by the same API:
//! channel search and recent-video listing, both via the `search` endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::CollabConfig;
use crate::error::{CollabError, CollabResult};
use crate::traits::{ChannelMatch, ChannelSearch, VideoItem, VideoListing};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API client.
pub struct YouTubeClient {
    api_key: Option<String>,
    client: Client,
    base_url: String,
}

/// `search` endpoint response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: Option<ResourceId>,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
    title: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl YouTubeClient {
    /// Create a new client from configuration.
    pub fn new(config: &CollabConfig) -> CollabResult<Self> {
        Ok(Self {
            api_key: config.youtube_api_key.clone(),
            client: Client::builder().timeout(config.request_timeout).build()?,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_key(&self) -> CollabResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| CollabError::config("YouTube API key not configured"))
    }

    async fn search(&self, url: String) -> CollabResult<SearchResponse> {
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CollabError::api(format!(
                "YouTube API returned {}: {}",
                status, body
            )));
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| CollabError::malformed(format!("YouTube search response: {}", e)))
    }
}

#[async_trait]
impl ChannelSearch for YouTubeClient {
    async fn search_channel(&self, query: &str) -> CollabResult<Vec<ChannelMatch>> {
        let key = self.api_key()?;
        let url = format!(
            "{}/search?part=snippet&type=channel&maxResults=1&q={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            key
        );

        debug!(query, "Searching for channel");
        let data = self.search(url).await?;

        Ok(data
            .items
            .into_iter()
            .filter_map(|item| {
                let channel_id = item.snippet.channel_id?;
                Some(ChannelMatch {
                    channel_id,
                    channel_name: item.snippet.title,
                })
            })
            .collect())
    }
}

#[async_trait]
impl VideoListing for YouTubeClient {
    async fn list_recent(&self, channel_id: &str, limit: u8) -> CollabResult<Vec<VideoItem>> {
        let key = self.api_key()?;
        let url = format!(
            "{}/search?part=snippet&type=video&order=date&channelId={}&maxResults={}&key={}",
            self.base_url,
            urlencoding::encode(channel_id),
            limit,
            key
        );

        debug!(channel_id, limit, "Listing recent videos");
        let data = self.search(url).await?;

        Ok(data
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.and_then(|id| id.video_id);
                let (Some(video_id), Some(published_at)) = (video_id, item.snippet.published_at)
                else {
                    warn!("Skipping search item without video id or publish time");
                    return None;
                };
                Some(VideoItem {
                    video_id,
                    title: item.snippet.title,
                    published_at,
                    thumbnail_url: item
                        .snippet
                        .thumbnails
                        .and_then(|t| t.default)
                        .map(|t| t.url)
                        .unwrap_or_default(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_with_key(key: &str) -> CollabConfig {
        CollabConfig {
            youtube_api_key: Some(key.to_string()),
            ..CollabConfig::default()
        }
    }

    #[tokio::test]
    async fn test_search_channel_maps_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("type", "channel"))
            .and(query_param("maxResults", "1"))
            .and(query_param("q", "MyChannel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "snippet": {
                        "channelId": "UC123",
                        "title": "My Channel",
                        "publishedAt": "2020-01-01T00:00:00Z"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = YouTubeClient::new(&config_with_key("k"))
            .unwrap()
            .with_base_url(server.uri());

        let matches = client.search_channel("MyChannel").await.unwrap();
        assert_eq!(
            matches,
            vec![ChannelMatch {
                channel_id: "UC123".into(),
                channel_name: "My Channel".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_search_channel_empty_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        let client = YouTubeClient::new(&config_with_key("k"))
            .unwrap()
            .with_base_url(server.uri());

        let matches = client.search_channel("nobody").await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_is_config_fault() {
        let client = YouTubeClient::new(&CollabConfig::default()).unwrap();
        let err = client.search_channel("MyChannel").await.unwrap_err();
        assert!(matches!(err, CollabError::Config(_)));
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string("quotaExceeded"),
            )
            .mount(&server)
            .await;

        let client = YouTubeClient::new(&config_with_key("k"))
            .unwrap()
            .with_base_url(server.uri());

        let err = client.search_channel("MyChannel").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("quotaExceeded"));
    }

    #[tokio::test]
    async fn test_list_recent_maps_videos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("type", "video"))
            .and(query_param("order", "date"))
            .and(query_param("channelId", "UC123"))
            .and(query_param("maxResults", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": { "videoId": "v1" },
                        "snippet": {
                            "title": "First video",
                            "publishedAt": "2024-05-01T12:00:00Z",
                            "thumbnails": { "default": { "url": "https://i.ytimg.com/vi/v1/default.jpg" } }
                        }
                    },
                    {
                        "id": { "videoId": "v2" },
                        "snippet": {
                            "title": "Second video",
                            "publishedAt": "2024-04-01T12:00:00Z"
                        }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = YouTubeClient::new(&config_with_key("k"))
            .unwrap()
            .with_base_url(server.uri());

        let videos = client.list_recent("UC123", 5).await.unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].video_id, "v1");
        assert_eq!(videos[0].title, "First video");
        assert_eq!(
            videos[0].thumbnail_url,
            "https://i.ytimg.com/vi/v1/default.jpg"
        );
        // Missing thumbnail degrades to empty, not an error.
        assert_eq!(videos[1].thumbnail_url, "");
    }
}
