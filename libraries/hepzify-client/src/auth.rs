//! Account operations.

use crate::client::HepzifyClient;
use crate::error::Result;
use crate::types::{AuthResponse, CredentialsRequest, RefreshRequest, RefreshResponse};
use tracing::{debug, info};

impl HepzifyClient {
    /// Create an account. The client is signed in afterwards.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.authenticate("/api/auth/register", email, password)
            .await
    }

    /// Sign in with email and password.
    ///
    /// On success, the tokens are stored for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.authenticate("/api/auth/login", email, password).await
    }

    /// Swap the stored refresh token for a new access token.
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = self.refresh_token_value().await?;
        debug!("Refreshing access token");

        let request = self
            .http
            .post(self.endpoint("/api/auth/refresh"))
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            });
        let response: RefreshResponse = self.send_json(request, "refresh response").await?;

        self.store_tokens(response.token, None).await;
        Ok(())
    }

    async fn authenticate(&self, path: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let url = self.endpoint(path);
        debug!(url = %url, email = %email, "Authenticating");

        let request = self
            .http
            .post(&url)
            .json(&CredentialsRequest { email, password });
        let session: AuthResponse = self.send_json(request, "auth response").await?;

        self.store_tokens(session.token.clone(), Some(session.refresh_token.clone()))
            .await;
        info!(user_id = %session.user.id, "Signed in");

        Ok(session)
    }
}
