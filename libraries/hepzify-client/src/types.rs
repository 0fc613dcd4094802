//! Request and response types for the Hepzify API.

use hepzify_core::{Playlist, Track, User};
use serde::{Deserialize, Serialize};

/// Where the server lives and the tokens to talk to it with
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub url: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Resume a previous session
    pub fn with_tokens(
        url: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            access_token: Some(access_token.into()),
            refresh_token,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Returned by register and login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub token: String,
}

/// Result of a catalog search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    pub songs: Vec<Track>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddSongRequest<'a> {
    pub song_id: &'a str,
}

/// Error body sent by the server
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
