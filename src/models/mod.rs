use serde::{Deserialize, Serialize};

/// A video returned by the external platform, eligible for scoring
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoCandidate {
    #[serde(rename = "videoId")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub view_count: u64,
    pub duration_seconds: f64,
}

/// A candidate with its blended recommendation score attached
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub link: String,
    pub score: f64,
}

impl ScoredVideo {
    pub fn new(candidate: &VideoCandidate, score: f64) -> Self {
        Self {
            video_id: candidate.id.clone(),
            title: candidate.title.clone(),
            description: candidate.description.clone(),
            thumbnail: candidate.thumbnail.clone(),
            link: format!("https://www.youtube.com/watch?v={}", candidate.id),
            score,
        }
    }
}

/// The current user's demographic and interest answers
///
/// Single process-wide instance, overwritten on every submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub custom_interest: Option<String>,
}

impl UserProfile {
    /// Interest keywords used for search and scoring: the selected
    /// interests followed by the free-text interest when present.
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords = self.interests.clone();
        if let Some(custom) = &self.custom_interest {
            if !custom.trim().is_empty() {
                keywords.push(custom.clone());
            }
        }
        keywords
    }
}

/// Cumulative playback-progress state for one video identifier
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchRecord {
    pub total_watched_seconds: f64,
    pub duration_seconds: f64,
    pub percentage: f64,
}

impl Default for WatchRecord {
    fn default() -> Self {
        Self {
            total_watched_seconds: 0.0,
            duration_seconds: 0.0,
            percentage: 0.0,
        }
    }
}

// ============================================================================
// YouTube Data API v3 wire types
// ============================================================================

/// Response from GET /search
#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
}

/// Search results mix resource kinds; only video results carry a videoId
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Response from GET /videos
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
    #[serde(default)]
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// The API serializes viewCount as a decimal string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoContentDetails {
    pub duration: String,
}

impl From<VideoItem> for VideoCandidate {
    fn from(item: VideoItem) -> Self {
        let view_count = item
            .statistics
            .and_then(|s| s.view_count)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let duration_seconds = item
            .content_details
            .and_then(|d| parse_iso8601_duration(&d.duration))
            .unwrap_or(0.0);

        // Prefer the high-resolution thumbnail, fall back to default
        let thumbnail = item
            .snippet
            .thumbnails
            .high
            .or(item.snippet.thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();

        VideoCandidate {
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            thumbnail,
            view_count,
            duration_seconds,
        }
    }
}

/// Parses an ISO-8601 duration (the `contentDetails.duration` format,
/// e.g. `PT15M33S` or `P1DT2H`) into total seconds.
///
/// Returns `None` for malformed input or for year/month designators,
/// which have no fixed length in seconds and never appear in video
/// durations.
pub fn parse_iso8601_duration(value: &str) -> Option<f64> {
    let rest = value.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut seconds = 0.0;
    let mut number = String::new();
    let mut in_time = false;
    let mut saw_component = false;

    for c in rest.chars() {
        match c {
            'T' => {
                if in_time || !number.is_empty() {
                    return None;
                }
                in_time = true;
            }
            '0'..='9' | '.' => number.push(c),
            designator => {
                let magnitude: f64 = number.parse().ok()?;
                number.clear();
                let unit = match (designator, in_time) {
                    ('W', false) => 604_800.0,
                    ('D', false) => 86_400.0,
                    ('H', true) => 3_600.0,
                    ('M', true) => 60.0,
                    ('S', true) => 1.0,
                    _ => return None,
                };
                seconds += magnitude * unit;
                saw_component = true;
            }
        }
    }

    if !number.is_empty() || !saw_component {
        return None;
    }
    Some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_full() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723.0));
    }

    #[test]
    fn test_parse_duration_minutes_seconds() {
        assert_eq!(parse_iso8601_duration("PT15M33S"), Some(933.0));
    }

    #[test]
    fn test_parse_duration_seconds_only() {
        assert_eq!(parse_iso8601_duration("PT45S"), Some(45.0));
    }

    #[test]
    fn test_parse_duration_with_days() {
        assert_eq!(parse_iso8601_duration("P1DT2H"), Some(93_600.0));
    }

    #[test]
    fn test_parse_duration_malformed() {
        assert_eq!(parse_iso8601_duration(""), None);
        assert_eq!(parse_iso8601_duration("15M"), None);
        assert_eq!(parse_iso8601_duration("P"), None);
        assert_eq!(parse_iso8601_duration("PT"), None);
        assert_eq!(parse_iso8601_duration("PT5X"), None);
        assert_eq!(parse_iso8601_duration("PT5"), None);
        // Months are ambiguous; only time-section M is minutes
        assert_eq!(parse_iso8601_duration("P3M"), None);
    }

    #[test]
    fn test_video_item_to_candidate() {
        let json = r#"{
            "id": "abc123",
            "snippet": {
                "title": "cooking pasta",
                "description": "easy recipe",
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg" },
                    "high": { "url": "https://i.ytimg.com/vi/abc123/hqdefault.jpg" }
                }
            },
            "statistics": { "viewCount": "1000000" },
            "contentDetails": { "duration": "PT10M" }
        }"#;

        let item: VideoItem = serde_json::from_str(json).unwrap();
        let candidate = VideoCandidate::from(item);
        assert_eq!(candidate.id, "abc123");
        assert_eq!(candidate.title, "cooking pasta");
        assert_eq!(candidate.view_count, 1_000_000);
        assert_eq!(candidate.duration_seconds, 600.0);
        assert_eq!(candidate.thumbnail, "https://i.ytimg.com/vi/abc123/hqdefault.jpg");
    }

    #[test]
    fn test_video_item_missing_statistics_and_duration() {
        let json = r#"{
            "id": "abc123",
            "snippet": { "title": "untitled" }
        }"#;

        let item: VideoItem = serde_json::from_str(json).unwrap();
        let candidate = VideoCandidate::from(item);
        assert_eq!(candidate.view_count, 0);
        assert_eq!(candidate.duration_seconds, 0.0);
        assert_eq!(candidate.thumbnail, "");
        assert_eq!(candidate.description, "");
    }

    #[test]
    fn test_search_response_skips_non_video_results() {
        let json = r#"{
            "items": [
                { "id": { "kind": "youtube#video", "videoId": "v1" } },
                { "id": { "kind": "youtube#channel", "channelId": "c1" } },
                { "id": { "kind": "youtube#video", "videoId": "v2" } }
            ]
        }"#;

        let response: SearchListResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = response
            .items
            .into_iter()
            .filter_map(|r| r.id.video_id)
            .collect();
        assert_eq!(ids, vec!["v1".to_string(), "v2".to_string()]);
    }

    #[test]
    fn test_profile_keywords_with_custom_interest() {
        let profile = UserProfile {
            interests: vec!["cooking".to_string(), "music".to_string()],
            custom_interest: Some("climbing".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.keywords(), vec!["cooking", "music", "climbing"]);
    }

    #[test]
    fn test_profile_keywords_blank_custom_interest() {
        let profile = UserProfile {
            interests: vec!["cooking".to_string()],
            custom_interest: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.keywords(), vec!["cooking"]);
    }

    #[test]
    fn test_profile_deserializes_camel_case() {
        let json = r#"{
            "age": "25",
            "interests": ["cooking"],
            "customInterest": "chess"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.age, Some("25".to_string()));
        assert_eq!(profile.custom_interest, Some("chess".to_string()));
        assert_eq!(profile.height, None);
    }

    #[test]
    fn test_scored_video_link() {
        let candidate = VideoCandidate {
            id: "abc123".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            thumbnail: "".to_string(),
            view_count: 0,
            duration_seconds: 0.0,
        };
        let scored = ScoredVideo::new(&candidate, 0.5);
        assert_eq!(scored.link, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(scored.video_id, "abc123");
    }
}
