/// Track domain type
use crate::error::{HepzifyError, Result};
use crate::types::{TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A song in the catalog.
///
/// Everything except the like-set is fixed at upload time. The same value is
/// handed to the playback engine, which only reads `id`, `audio_url` and
/// `duration_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub genre: String,
    /// Where the audio bytes live; `/stream` redirects here
    pub audio_url: String,
    /// Cover art location, empty when none was uploaded
    #[serde(default)]
    pub image_url: String,
    /// Duration if known at upload time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Users who liked this track
    #[serde(default)]
    pub likes: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Track {
    /// Build a fresh track from validated upload input
    pub fn from_create(input: CreateTrack) -> Self {
        let now = Utc::now();
        Self {
            id: TrackId::generate(),
            title: input.title,
            artist: input.artist,
            genre: input.genre,
            audio_url: input.audio_url,
            image_url: input.image_url.unwrap_or_default(),
            duration_ms: input.duration_ms,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    /// Add `user` to the like-set. Returns false if it was already there.
    pub fn like(&mut self, user: &UserId) -> bool {
        if self.is_liked_by(user) {
            return false;
        }
        self.likes.push(user.clone());
        true
    }

    /// Remove `user` from the like-set. Returns false if it was not there.
    pub fn unlike(&mut self, user: &UserId) -> bool {
        let before = self.likes.len();
        self.likes.retain(|u| u != user);
        self.likes.len() != before
    }

    /// Case-insensitive match against title, artist and genre
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [&self.title, &self.artist, &self.genre]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Data for creating a new track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrack {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub audio_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl CreateTrack {
    /// Check that every required field is present
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("artist", &self.artist),
            ("genre", &self.genre),
            ("audioUrl", &self.audio_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(HepzifyError::invalid_input(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateTrack {
        CreateTrack {
            title: "So What".into(),
            artist: "Miles Davis".into(),
            genre: "Jazz".into(),
            audio_url: "https://cdn.example.com/so-what.mp3".into(),
            image_url: None,
            duration_ms: None,
        }
    }

    #[test]
    fn validate_lists_missing_fields() {
        let mut bad = input();
        bad.title = String::new();
        bad.genre = "  ".into();
        let err = bad.validate().unwrap_err().to_string();
        assert!(err.contains("title"));
        assert!(err.contains("genre"));
        assert!(!err.contains("artist"));
    }

    #[test]
    fn like_and_unlike_report_changes() {
        let mut track = Track::from_create(input());
        let user = UserId::new("u1");

        assert!(track.like(&user));
        assert!(!track.like(&user));
        assert_eq!(track.likes.len(), 1);

        assert!(track.unlike(&user));
        assert!(!track.unlike(&user));
        assert!(!track.is_liked_by(&user));
    }

    #[test]
    fn matches_is_case_insensitive() {
        let track = Track::from_create(input());
        assert!(track.matches("miles"));
        assert!(track.matches("JAZZ"));
        assert!(!track.matches("rock"));
    }

    #[test]
    fn serializes_camel_case() {
        let track = Track::from_create(input());
        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("audioUrl").is_some());
        assert_eq!(json["imageUrl"], "");
        assert!(json.get("durationMs").is_none());
    }
}
