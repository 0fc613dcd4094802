//! Main Hepzify client.

use crate::error::{ClientError, Result};
use crate::types::{ClientConfig, ErrorBody};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Client for a Hepzify server.
///
/// Cheap to clone; clones share the signed-in session.
///
/// # Example
///
/// ```no_run
/// use hepzify_client::{ClientConfig, HepzifyClient};
///
/// # async fn example() -> hepzify_client::Result<()> {
/// let client = HepzifyClient::new(ClientConfig::new("https://music.example.com"))?;
/// client.login("me@example.com", "secret").await?;
///
/// for track in client.liked().await? {
///     println!("{} - {}", track.artist, track.title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HepzifyClient {
    pub(crate) http: Client,
    base_url: String,
    tokens: Arc<RwLock<Tokens>>,
}

impl HepzifyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_url(&config.url)?;

        // Create HTTP client with reasonable defaults. Redirects are not
        // followed so stream URLs can be read from `Location`.
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(format!("Hepzify/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            tokens: Arc::new(RwLock::new(Tokens {
                access: config.access_token,
                refresh: config.refresh_token,
            })),
        })
    }

    /// The server URL, without a trailing slash.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.access.is_some()
    }

    /// Set tokens directly (e.g., from stored credentials).
    pub async fn set_tokens(&self, access_token: String, refresh_token: Option<String>) {
        let mut tokens = self.tokens.write().await;
        tokens.access = Some(access_token);
        tokens.refresh = refresh_token;
    }

    /// Get the current tokens.
    pub async fn tokens(&self) -> (Option<String>, Option<String>) {
        let tokens = self.tokens.read().await;
        (tokens.access.clone(), tokens.refresh.clone())
    }

    /// Clear stored tokens (logout).
    pub async fn logout(&self) {
        let mut tokens = self.tokens.write().await;
        tokens.access = None;
        tokens.refresh = None;
        info!("Logged out");
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn access_token(&self) -> Result<String> {
        self.tokens
            .read()
            .await
            .access
            .clone()
            .ok_or(ClientError::AuthRequired)
    }

    pub(crate) async fn refresh_token_value(&self) -> Result<String> {
        self.tokens
            .read()
            .await
            .refresh
            .clone()
            .ok_or(ClientError::AuthRequired)
    }

    pub(crate) async fn store_tokens(&self, access: String, refresh: Option<String>) {
        let mut tokens = self.tokens.write().await;
        tokens.access = Some(access);
        if refresh.is_some() {
            tokens.refresh = refresh;
        }
    }

    /// A request carrying the bearer token, or `AuthRequired` without one
    pub(crate) async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(request.bearer_auth(self.access_token().await?))
    }

    /// Send a request and decode a successful JSON response
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse {}: {}", what, e)))
    }

    /// Send a request, discarding a successful body
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Pass successful responses through; turn the rest into errors using the
/// server's `{"error": ...}` message when there is one
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() || status.is_redirection() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    debug!(status = %status, error = %message, "request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::AuthFailed(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    })
}

fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(trimmed.to_string())
}
