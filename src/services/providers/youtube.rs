/// YouTube Data API v3 provider
///
/// Two call shapes:
/// 1. Keyword search: /search?part=snippet&type=video → candidate video ids
/// 2. Batch details: /videos?part=snippet,contentDetails,statistics → full
///    candidate metadata, including the ISO-8601 duration string
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{SearchListResponse, VideoCandidate, VideoListResponse},
    services::providers::VideoProvider,
};

/// Upper bound on search results requested per call
const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Clone)]
pub struct YouTubeProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl YouTubeProvider {
    /// Creates a provider with a bounded request timeout. Every call is a
    /// single attempt; failures are terminal for that request.
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    #[cfg(test)]
    fn for_tests(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: "test_key".to_string(),
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl VideoProvider for YouTubeProvider {
    async fn search_videos(&self, keywords: &[String]) -> AppResult<Vec<String>> {
        let query = keywords.join(" ");
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search keywords cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search", self.api_url);
        let max_results = MAX_SEARCH_RESULTS.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "YouTube API returned status {}: {}",
                status, body
            )));
        }

        let results: SearchListResponse = response.json().await?;
        let ids: Vec<String> = results
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();

        tracing::info!(
            query = %query,
            results = ids.len(),
            provider = "youtube",
            "Video search completed"
        );

        Ok(ids)
    }

    async fn fetch_details(&self, ids: &[String]) -> AppResult<Vec<VideoCandidate>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/videos", self.api_url);
        let id_list = ids.join(",");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", id_list.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "YouTube API returned status {}: {}",
                status, body
            )));
        }

        let results: VideoListResponse = response.json().await?;
        let candidates: Vec<VideoCandidate> = results
            .items
            .into_iter()
            .map(VideoCandidate::from)
            .collect();

        tracing::info!(
            requested = ids.len(),
            found = candidates.len(),
            provider = "youtube",
            "Video details fetched"
        );

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}
