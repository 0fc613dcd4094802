/// Authentication service - accounts, JWT and password handling
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use hepzify_core::{User, UserId, UserStore};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    access_token_expiration: Duration,
    refresh_token_expiration: Duration,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// A signed-in user with fresh tokens
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: User,
    /// Access token, sent as `Authorization: Bearer <token>`
    pub token: String,
    pub refresh_token: String,
}

impl AuthService {
    pub fn new(secret: String, access_expiration_hours: u64, refresh_expiration_days: u64) -> Self {
        Self {
            secret,
            access_token_expiration: Duration::hours(access_expiration_hours as i64),
            refresh_token_expiration: Duration::days(refresh_expiration_days as i64),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor (tests use the minimum)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Create an account and sign it in.
    ///
    /// The display name is the local part of the email.
    pub async fn register(
        &self,
        users: &dyn UserStore,
        email: &str,
        password: &str,
    ) -> Result<AuthSession> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(ServerError::BadRequest("Password is required".to_string()));
        }

        if users.find_credentials_by_email(&email).await?.is_some() {
            return Err(ServerError::Conflict("User already exists".to_string()));
        }

        let password_hash = self.hash_password_blocking(password.to_string()).await?;
        let user = users
            .create_user(&email, &User::default_name(&email), &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        self.session_for(user)
    }

    /// Check credentials and sign in. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(
        &self,
        users: &dyn UserStore,
        email: &str,
        password: &str,
    ) -> Result<AuthSession> {
        let invalid = || ServerError::Auth("Invalid credentials".to_string());

        let email = normalize_email(email).map_err(|_| invalid())?;
        let credentials = users
            .find_credentials_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        let valid = self
            .verify_password_blocking(password.to_string(), credentials.password_hash)
            .await?;
        if !valid {
            tracing::debug!(user_id = %credentials.user.id, "wrong password");
            return Err(invalid());
        }

        self.session_for(credentials.user)
    }

    /// Exchange a refresh token for a new access token
    pub fn refresh(&self, refresh_token: &str) -> Result<String> {
        let user_id = self.verify_refresh_token(refresh_token)?;
        self.create_access_token(&user_id)
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Create an access token
    pub fn create_access_token(&self, user_id: &UserId) -> Result<String> {
        self.create_token(user_id, TokenType::Access, self.access_token_expiration)
    }

    /// Create a refresh token
    pub fn create_refresh_token(&self, user_id: &UserId) -> Result<String> {
        self.create_token(user_id, TokenType::Refresh, self.refresh_token_expiration)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify that a token is an access token
    pub fn verify_access_token(&self, token: &str) -> Result<UserId> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(ServerError::Auth("Invalid token type".to_string()));
        }
        Ok(UserId::new(claims.sub))
    }

    /// Verify that a token is a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<UserId> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(ServerError::Auth("Invalid token type".to_string()));
        }
        Ok(UserId::new(claims.sub))
    }

    fn session_for(&self, user: User) -> Result<AuthSession> {
        Ok(AuthSession {
            token: self.create_access_token(&user.id)?,
            refresh_token: self.create_refresh_token(&user.id)?,
            user,
        })
    }

    // bcrypt blocks; run it on the blocking pool
    async fn hash_password_blocking(&self, password: String) -> Result<String> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash_password(&password))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
    }

    async fn verify_password_blocking(&self, password: String, hash: String) -> Result<bool> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify_password(&password, &hash))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
    }

    fn create_token(
        &self,
        user_id: &UserId,
        token_type: TokenType,
        expiration: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + expiration;

        let claims = Claims {
            sub: user_id.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }
}

/// Trim and lowercase; reject anything without a local part and a domain
fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(ServerError::BadRequest("A valid email is required".to_string())),
    }
}
