use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::WatchRecord;

/// Tracks cumulative watched seconds per video identifier.
///
/// Records live for the process lifetime and are never deleted. All watch
/// events for a given id are merged into one counter regardless of caller;
/// callers serialize access through the application-state lock.
#[derive(Debug, Default)]
pub struct WatchTracker {
    records: HashMap<String, WatchRecord>,
}

impl WatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates a client-reported playback event.
    ///
    /// The duration is set on the first event for an id and never
    /// overwritten afterwards. Watched seconds accumulate without an upper
    /// clamp, so the percentage can exceed 100. A zero or absent duration
    /// yields percentage 0 rather than a division error.
    pub fn record_watch(
        &mut self,
        video_id: Option<&str>,
        watched_seconds: Option<f64>,
        duration: Option<f64>,
    ) -> AppResult<WatchRecord> {
        let video_id = match video_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(AppError::InvalidInput("Invalid data".to_string())),
        };
        let watched_seconds = watched_seconds
            .ok_or_else(|| AppError::InvalidInput("Invalid data".to_string()))?;

        let record = self
            .records
            .entry(video_id.to_string())
            .or_insert_with(|| WatchRecord {
                duration_seconds: duration.unwrap_or(0.0),
                ..WatchRecord::default()
            });

        record.total_watched_seconds += watched_seconds;
        record.percentage = if record.duration_seconds > 0.0 {
            record.total_watched_seconds / record.duration_seconds * 100.0
        } else {
            0.0
        };

        tracing::debug!(
            video_id = %video_id,
            total = record.total_watched_seconds,
            percentage = record.percentage,
            "Watch event recorded"
        );

        Ok(record.clone())
    }

    /// Read-only lookup; a zero-valued record when the id is unknown.
    pub fn get(&self, video_id: &str) -> WatchRecord {
        self.records.get(video_id).cloned().unwrap_or_default()
    }
}
