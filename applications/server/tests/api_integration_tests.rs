/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{create_test_app, multipart_request, TestApp};
use hepzify_core::{Catalog, CreateTrack, Track};
use serde_json::json;
use tower::util::ServiceExt;

async fn create_track(app: &TestApp, title: &str, artist: &str, genre: &str) -> Track {
    app.db
        .create_track(CreateTrack {
            title: title.to_string(),
            artist: artist.to_string(),
            genre: genre.to_string(),
            audio_url: format!("https://cdn.example.com/{title}.mp3"),
            image_url: None,
            duration_ms: Some(180_000),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_and_root() {
    let app = create_test_app().await;

    let (status, body) = app.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Hepzify API is running"));
}

#[tokio::test]
async fn test_register_then_login_returns_same_user() {
    let app = create_test_app().await;
    let (_, user_id) = app.register("a@b.com", "x").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "A@B.com", "password": "x" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["name"], "a");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refreshToken"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = create_test_app().await;
    app.register("dup@example.com", "pw").await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "dup@example.com", "password": "other" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_register_validation() {
    let app = create_test_app().await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "not-an-email", "password": "pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "ok@example.com", "password": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = create_test_app().await;
    app.register("user@example.com", "right").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "user@example.com", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "right" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token() {
    let app = create_test_app().await;
    let (_, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "r@example.com", "password": "pw" }),
        )
        .await;
    let refresh_token = body["refreshToken"].as_str().unwrap();

    let (status, body) = app
        .post(
            "/api/auth/refresh",
            None,
            json!({ "refreshToken": refresh_token }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (status, _) = app.get("/api/music/liked", Some(token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post("/api/auth/refresh", None, json!({ "refreshToken": "garbage" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_and_get_tracks() {
    let app = create_test_app().await;

    let (status, body) = app.get("/api/music/all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let track = create_track(&app, "Song", "Artist", "Pop").await;

    let (status, body) = app.get("/api/music", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .get(&format!("/api/music/{}", track.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Song");
    assert_eq!(body["audioUrl"], "https://cdn.example.com/Song.mp3");

    let (status, body) = app.get("/api/music/title/son", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], track.id.as_str());

    let (status, body) = app.get("/api/music/missing-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_stream_redirects_to_audio_url() {
    let app = create_test_app().await;
    let track = create_track(&app, "Stream", "Artist", "Jazz").await;

    let response = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/music/{}/stream", track.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://cdn.example.com/Stream.mp3"
    );

    let (status, _) = app.get("/api/music/nope/stream", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_and_unlike() {
    let app = create_test_app().await;
    let (token, user_id) = app.register("fan@example.com", "pw").await;
    let track = create_track(&app, "Liked", "Artist", "Rock").await;
    let like_uri = format!("/api/music/{}/like", track.id);
    let unlike_uri = format!("/api/music/{}/unlike", track.id);

    // Requires a token
    let (status, _) = app.post(&like_uri, None, json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.post(&like_uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], json!([user_id]));

    let (_, body) = app.get("/api/music/liked", Some(&token)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Liking again takes the like back
    let (status, body) = app.post(&like_uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], json!([]));

    let (_, body) = app.get("/api/music/liked", Some(&token)).await;
    assert_eq!(body, json!([]));

    let (_, body) = app.post(&like_uri, Some(&token), json!({})).await;
    assert_eq!(body["likes"], json!([user_id]));

    let (status, body) = app.post(&unlike_uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], json!([]));

    let (_, body) = app.get("/api/music/liked", Some(&token)).await;
    assert_eq!(body, json!([]));

    let (status, _) = app.post(&unlike_uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/music/missing/like", Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search() {
    let app = create_test_app().await;
    let (token, _) = app.register("s@example.com", "pw").await;
    create_track(&app, "Thunder", "AC/DC", "Rock").await;
    create_track(&app, "Blue", "Miles", "Jazz").await;

    app.post(
        "/api/playlists",
        Some(&token),
        json!({ "name": "Rock Classics" }),
    )
    .await;

    let (status, body) = app.get("/api/music/search?query=rock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["songs"].as_array().unwrap().len(), 1);
    assert_eq!(body["songs"][0]["title"], "Thunder");
    assert_eq!(body["playlists"].as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/music/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/music/search?query=%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_track() {
    let app = create_test_app().await;
    let (token, _) = app.register("up@example.com", "pw").await;

    let request = multipart_request(
        "/api/music/upload",
        &token,
        &[
            ("title", "Uploaded"),
            ("artist", "Me"),
            ("genre", "Indie"),
            ("durationMs", "1234"),
        ],
        Some(("audio", "song.mp3", b"ID3 fake audio")),
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["title"], "Uploaded");
    assert_eq!(body["durationMs"], 1234);

    let audio_url = body["audioUrl"].as_str().unwrap();
    let key = audio_url.strip_prefix("/uploads/").unwrap();
    assert!(key.starts_with("audio/") && key.ends_with(".mp3"));
    assert!(app.upload_dir.path().join(key).exists());

    // The stored file is served back
    let response = app
        .app
        .clone()
        .oneshot(Request::builder().uri(audio_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejects_bad_input() {
    let app = create_test_app().await;
    let (token, _) = app.register("up@example.com", "pw").await;
    let fields = [("title", "T"), ("artist", "A"), ("genre", "G")];

    // Missing file
    let (status, _) = app
        .send(multipart_request("/api/music/upload", &token, &fields, None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unsupported format
    let (status, _) = app
        .send(multipart_request(
            "/api/music/upload",
            &token,
            &fields,
            Some(("audio", "song.flac", b"data")),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing metadata leaves nothing behind
    let (status, body) = app
        .send(multipart_request(
            "/api/music/upload",
            &token,
            &[("title", "T")],
            Some(("audio", "song.mp3", b"data")),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("artist"));

    let audio_dir = app.upload_dir.path().join("audio");
    let leftover = std::fs::read_dir(&audio_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftover, 0);

    let (_, body) = app.get("/api/music/all", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_upload_image() {
    let app = create_test_app().await;
    let (token, _) = app.register("img@example.com", "pw").await;

    let (status, body) = app
        .send(multipart_request(
            "/api/music/upload-image",
            &token,
            &[],
            Some(("image", "cover.PNG", b"\x89PNG fake")),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let image_url = body["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/images/"));
    assert!(image_url.ends_with(".png"));
}

#[tokio::test]
async fn test_delete_track_removes_it_from_playlists() {
    let app = create_test_app().await;
    let (token, _) = app.register("del@example.com", "pw").await;
    let track = create_track(&app, "Doomed", "Artist", "Pop").await;

    let (_, playlist) = app
        .post(
            "/api/playlists",
            Some(&token),
            json!({ "name": "Mix", "songs": [track.id.as_str()] }),
        )
        .await;
    let playlist_id = playlist["id"].as_str().unwrap();

    let (status, _) = app
        .delete(&format!("/api/music/{}", track.id), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .delete(&format!("/api/music/{}", track.id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/music/{}", track.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .get(&format!("/api/playlists/{playlist_id}"), Some(&token))
        .await;
    assert_eq!(body["songs"], json!([]));
}

#[tokio::test]
async fn test_comments() {
    let app = create_test_app().await;
    let (token, user_id) = app.register("talk@example.com", "pw").await;
    let track = create_track(&app, "Chatty", "Artist", "Pop").await;
    let uri = format!("/api/music/{}/comments", track.id);

    let (status, _) = app.post(&uri, None, json!({ "text": "hi" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post(&uri, Some(&token), json!({ "text": "great song" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], user_id.as_str());
    assert_eq!(body["authorName"], "talk");

    let (status, _) = app.post(&uri, Some(&token), json!({ "text": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["text"], "great song");

    let (status, _) = app.get("/api/music/missing/comments", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_playlists_require_auth() {
    let app = create_test_app().await;

    let (status, body) = app.get("/api/playlists", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.get("/api/playlists", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_playlist_lifecycle() {
    let app = create_test_app().await;
    let (token, user_id) = app.register("owner@example.com", "pw").await;
    let first = create_track(&app, "First", "A", "Pop").await;
    let second = create_track(&app, "Second", "B", "Pop").await;

    let (status, playlist) = app
        .post(
            "/api/playlists",
            Some(&token),
            json!({ "name": "Road Trip", "description": "long drives" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(playlist["ownerId"], user_id.as_str());
    let id = playlist["id"].as_str().unwrap().to_string();

    for track in [&first, &second] {
        let (status, _) = app
            .post(
                &format!("/api/playlists/{id}/songs"),
                Some(&token),
                json!({ "songId": track.id.as_str() }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.get(&format!("/api/playlists/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["songs"][0]["title"], "First");
    assert_eq!(body["songs"][1]["title"], "Second");

    let (status, body) = app
        .get(&format!("/api/playlists/{id}/stream"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playlistName"], "Road Trip");
    assert_eq!(body["description"], "long drives");
    assert_eq!(body["autoplay"], true);
    assert_eq!(body["songs"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .delete(
            &format!("/api/playlists/{id}/songs/{}", first.id),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["songs"].as_array().unwrap().len(), 1);
    assert_eq!(body["songs"][0]["title"], "Second");

    let (_, body) = app.get("/api/playlists", Some(&token)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app.delete(&format!("/api/playlists/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = app.get(&format!("/api/playlists/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_playlist_of_another_user_is_not_found() {
    let app = create_test_app().await;
    let (owner, _) = app.register("owner@example.com", "pw").await;
    let (other, _) = app.register("other@example.com", "pw").await;
    let track = create_track(&app, "Private", "A", "Pop").await;

    let (_, playlist) = app
        .post(
            "/api/playlists",
            Some(&owner),
            json!({ "name": "Mine", "songs": [track.id.as_str()] }),
        )
        .await;
    let id = playlist["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/playlists/{id}"), Some(&other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("songs").is_none());

    let (status, _) = app
        .get(&format!("/api/playlists/{id}/stream"), Some(&other))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            &format!("/api/playlists/{id}/songs"),
            Some(&other),
            json!({ "songId": track.id.as_str() }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/playlists/{id}"), Some(&other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/playlists", Some(&other)).await;
    assert_eq!(body, json!([]));

    // Still intact for the owner
    let (status, body) = app.get(&format!("/api/playlists/{id}"), Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["songs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_playlist_requires_name() {
    let app = create_test_app().await;
    let (token, _) = app.register("p@example.com", "pw").await;

    let (status, _) = app
        .post("/api/playlists", Some(&token), json!({ "name": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
