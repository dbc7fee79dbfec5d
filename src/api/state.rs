use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::UserProfile;
use crate::services::embedding::TextEmbedder;
use crate::services::providers::VideoProvider;
use crate::services::watch_tracker::WatchTracker;

/// Shared application state
///
/// The provider and embedder are read-only handles constructed once at
/// startup; mutable state lives behind one lock so profile writes and
/// watch-record read-modify-write sequences cannot race.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub provider: Arc<dyn VideoProvider>,
    pub embedder: Arc<dyn TextEmbedder>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub profile: UserProfile,
    pub watch_tracker: WatchTracker,
}

impl AppState {
    /// Creates application state with empty profile and watch history
    pub fn new(provider: Arc<dyn VideoProvider>, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                profile: UserProfile::default(),
                watch_tracker: WatchTracker::new(),
            })),
            provider,
            embedder,
        }
    }
}
