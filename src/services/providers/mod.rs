/// Video platform provider abstraction
///
/// A pluggable seam for the external search-and-details API. The only
/// production implementation talks to the YouTube Data API; tests inject
/// stubs.
use crate::{error::AppResult, models::VideoCandidate};

pub mod youtube;

/// Trait for video platform providers
///
/// Both operations are single-attempt request/response wrappers: no
/// retries, no backoff. Callers in the list flows treat failures as empty
/// result sets.
#[async_trait::async_trait]
pub trait VideoProvider: Send + Sync {
    /// Searches for videos matching the joined keywords.
    ///
    /// Returns up to 10 video ids for downstream detail lookups; an empty
    /// response yields an empty vec.
    async fn search_videos(&self, keywords: &[String]) -> AppResult<Vec<String>>;

    /// Batch-fetches snippet, statistics, and content details for the
    /// given ids. Empty input returns empty without a network call.
    async fn fetch_details(&self, ids: &[String]) -> AppResult<Vec<VideoCandidate>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
