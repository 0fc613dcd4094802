/// Shared application state
use crate::services::{AuthService, ObjectStore};
use axum::extract::FromRef;
use hepzify_core::{Catalog, CommentStore, PlaylistStore, UserStore};
use hepzify_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub playlists: Arc<dyn PlaylistStore>,
    pub users: Arc<dyn UserStore>,
    pub comments: Arc<dyn CommentStore>,
    pub auth_service: Arc<AuthService>,
    pub object_store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Wire every store to the same database
    pub fn new(
        db: Database,
        auth_service: Arc<AuthService>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Self {
        let db = Arc::new(db);
        Self {
            catalog: db.clone(),
            playlists: db.clone(),
            users: db.clone(),
            comments: db,
            auth_service,
            object_store,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.auth_service)
    }
}
