//! Hepzify Server Library
//!
//! Music streaming API: accounts, the track catalog with likes and
//! comments, uploads and owner-scoped playlists.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use app::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{AuthService, LocalObjectStore, ObjectStore};
pub use state::AppState;
