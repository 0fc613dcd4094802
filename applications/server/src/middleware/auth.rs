/// Authentication middleware
use crate::{error::ServerError, services::AuthService};
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use hepzify_core::UserId;
use std::sync::Arc;

/// Extension type to store authenticated user ID in request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

/// Middleware that rejects requests without a valid access token
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let user = authenticate(&auth_service, request.headers())?;

    // Insert user ID into request extensions
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Verify the `Authorization: Bearer` header
fn authenticate(auth_service: &AuthService, headers: &HeaderMap) -> Result<AuthenticatedUser, ServerError> {
    let missing = || ServerError::Auth("Authentication required".to_string());

    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(missing)?;

    let user_id = auth_service.verify_access_token(token).map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        ServerError::Auth("Invalid or expired token".to_string())
    })?;

    Ok(AuthenticatedUser(user_id))
}

/// Uses the identity set by [`auth_middleware`] when the route sits behind
/// it, otherwise verifies the header itself
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let auth_service = Arc::<AuthService>::from_ref(state);
        authenticate(&auth_service, &parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate() {
        let auth = AuthService::new("secret".to_string(), 1, 1);
        let token = auth.create_access_token(&UserId::new("u1")).unwrap();

        let user = authenticate(&auth, &headers(&format!("Bearer {token}"))).unwrap();
        assert_eq!(user.user_id().as_str(), "u1");

        assert!(authenticate(&auth, &HeaderMap::new()).is_err());
        assert!(authenticate(&auth, &headers(&token)).is_err());
        assert!(authenticate(&auth, &headers("Bearer ")).is_err());
        assert!(authenticate(&auth, &headers("Bearer garbage")).is_err());
    }

    #[test]
    fn test_refresh_token_is_not_accepted() {
        let auth = AuthService::new("secret".to_string(), 1, 1);
        let token = auth.create_refresh_token(&UserId::new("u1")).unwrap();
        assert!(authenticate(&auth, &headers(&format!("Bearer {token}"))).is_err());
    }
}
