/// Authentication service tests
/// Registration and login against a real database, plus token edge cases
mod common;

use common::{create_test_auth_service, create_test_database, TEST_SECRET};
use hepzify_core::{UserId, UserStore};
use hepzify_server::{
    services::auth::{Claims, TokenType},
    ServerError,
};
use jsonwebtoken::{encode, EncodingKey, Header};

/// Test password hashing produces valid bcrypt hashes
#[tokio::test]
async fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let password = "MySecurePassword123!";
    let hash = auth_service.hash_password(password).unwrap();

    // Verify hash format (bcrypt starts with $2b$ or $2a$)
    assert!(hash.starts_with("$2b$") || hash.starts_with("$2a$"));

    // Verify the hash is different each time (salt is random)
    let hash2 = auth_service.hash_password(password).unwrap();
    assert_ne!(hash, hash2, "Hashes should differ due to random salt");
}

/// Test password verification with invalid hash format
#[tokio::test]
async fn test_password_verification_invalid_hash() {
    let auth_service = create_test_auth_service();

    let result = auth_service.verify_password("password", "not-a-valid-hash");
    assert!(result.is_err(), "Invalid hash should return error");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let auth_service = create_test_auth_service();
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: "user123".to_string(),
        exp: now - 3600,
        iat: now - 7200,
        token_type: TokenType::Access,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert!(auth_service.verify_access_token(&token).is_err());
}

#[tokio::test]
async fn test_malformed_tokens_are_rejected() {
    let auth_service = create_test_auth_service();

    assert!(auth_service.verify_access_token("").is_err());
    assert!(auth_service.verify_access_token("not.a.jwt").is_err());
}

#[tokio::test]
async fn test_register_stores_hashed_password() {
    let (db, _dir) = create_test_database().await;
    let auth_service = create_test_auth_service();

    let session = auth_service
        .register(&db, "  Listener@Example.com ", "secret")
        .await
        .unwrap();

    assert_eq!(session.user.email, "listener@example.com");
    assert_eq!(session.user.name, "listener");
    assert_eq!(
        auth_service.verify_access_token(&session.token).unwrap(),
        session.user.id
    );
    assert_eq!(
        auth_service
            .verify_refresh_token(&session.refresh_token)
            .unwrap(),
        session.user.id
    );

    let credentials = db
        .find_credentials_by_email("listener@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(credentials.password_hash, "secret");
    assert!(auth_service
        .verify_password("secret", &credentials.password_hash)
        .unwrap());
}

#[tokio::test]
async fn test_register_then_login_same_user() {
    let (db, _dir) = create_test_database().await;
    let auth_service = create_test_auth_service();

    let registered = auth_service.register(&db, "a@b.com", "x").await.unwrap();
    let logged_in = auth_service.login(&db, "a@b.com", "x").await.unwrap();

    assert_eq!(registered.user.id, logged_in.user.id);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (db, _dir) = create_test_database().await;
    let auth_service = create_test_auth_service();

    auth_service.register(&db, "dup@example.com", "one").await.unwrap();
    let result = auth_service.register(&db, "DUP@example.com", "two").await;

    assert!(matches!(result, Err(ServerError::Conflict(_))));
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let (db, _dir) = create_test_database().await;
    let auth_service = create_test_auth_service();

    let result = auth_service.register(&db, "nope", "pw").await;
    assert!(matches!(result, Err(ServerError::BadRequest(_))));

    let result = auth_service.register(&db, "ok@example.com", "").await;
    assert!(matches!(result, Err(ServerError::BadRequest(_))));

    assert!(db.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let (db, _dir) = create_test_database().await;
    let auth_service = create_test_auth_service();
    auth_service.register(&db, "user@example.com", "right").await.unwrap();

    let wrong_password = auth_service.login(&db, "user@example.com", "wrong").await;
    let unknown_user = auth_service.login(&db, "ghost@example.com", "right").await;

    match (wrong_password, unknown_user) {
        (Err(ServerError::Auth(a)), Err(ServerError::Auth(b))) => assert_eq!(a, b),
        other => panic!("expected two auth errors, got {other:?}"),
    }
}

#[tokio::test]
async fn test_multiple_users_authentication() {
    let (db, _dir) = create_test_database().await;
    let auth_service = create_test_auth_service();

    let user1 = auth_service.register(&db, "one@example.com", "Password1!").await.unwrap();
    let user2 = auth_service.register(&db, "two@example.com", "Password2!").await.unwrap();
    assert_ne!(user1.user.id, user2.user.id);

    assert!(auth_service.login(&db, "one@example.com", "Password2!").await.is_err());
    assert!(auth_service.login(&db, "two@example.com", "Password1!").await.is_err());

    let session = auth_service.login(&db, "two@example.com", "Password2!").await.unwrap();
    assert_eq!(session.user.id, user2.user.id);

    let ids: Vec<UserId> = db.list_users().await.unwrap().into_iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), 2);
}
