/// HTTP router assembly
use crate::{
    api,
    config::ServerConfig,
    error::{Result, ServerError},
    middleware::auth_middleware,
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the full application router
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Result<Router> {
    let auth_routes = Router::new()
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
        .route("/refresh", post(api::auth::refresh));

    // Reads are public; handlers that mutate take an AuthenticatedUser
    let music_routes = Router::new()
        .route("/", get(api::music::list_all))
        .route("/all", get(api::music::list_all))
        .route("/search", get(api::music::search))
        .route("/liked", get(api::music::liked))
        .route("/upload", post(api::music::upload))
        .route("/upload-image", post(api::music::upload_image))
        .route("/title/:title", get(api::music::get_by_title))
        .route(
            "/:id",
            get(api::music::get_track).delete(api::music::delete_track),
        )
        .route("/:id/stream", get(api::music::stream))
        .route("/:id/like", post(api::music::like))
        .route("/:id/unlike", post(api::music::unlike))
        .route(
            "/:id/comments",
            get(api::music::list_comments).post(api::music::add_comment),
        )
        .layer(DefaultBodyLimit::max(config.uploads.max_upload_bytes));

    let playlist_routes = Router::new()
        .route(
            "/",
            get(api::playlists::list_playlists).post(api::playlists::create_playlist),
        )
        .route(
            "/:id",
            get(api::playlists::get_playlist).delete(api::playlists::delete_playlist),
        )
        .route("/:id/stream", get(api::playlists::stream_playlist))
        .route("/:id/songs", post(api::playlists::add_track))
        .route(
            "/:id/songs/:song_id",
            axum::routing::delete(api::playlists::remove_track),
        )
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            auth_middleware,
        ));

    let mut router = Router::new()
        .route("/api/health", get(api::health::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/music", music_routes)
        .nest("/api/playlists", playlist_routes)
        .nest_service("/uploads", ServeDir::new(&config.uploads.path));

    // Static file serving for web UI (SPA with fallback to index.html)
    router = match &config.server.web_dir {
        Some(web_dir) => router.fallback_service(
            ServeDir::new(web_dir).not_found_service(ServeFile::new(web_dir.join("index.html"))),
        ),
        None => router.route("/", get(api::health::root)),
    };

    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.cors_allowed_origin)?)
        .with_state(app_state))
}

/// `*` allows any origin without credentials; anything else is a single
/// origin allowed to send credentials
fn cors_layer(origin: &str) -> Result<CorsLayer> {
    if origin == "*" {
        return Ok(CorsLayer::permissive());
    }

    let origin = HeaderValue::from_str(origin)
        .map_err(|_| ServerError::Config(format!("invalid CORS origin: {origin}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}
