//! Hepzify Client
//!
//! HTTP client library for the Hepzify API.
//!
//! # Features
//!
//! - **Accounts**: register, login and token refresh
//! - **Catalog**: list, search, like and stream tracks
//! - **Playlists**: manage the signed-in user's playlists
//!
//! Server errors come back as [`ClientError`]: 401 as `AuthFailed`, 404 as
//! `NotFound`, anything else as `Server` with the server's message.

mod auth;
mod catalog;
mod client;
mod error;
mod playlists;
mod types;

pub use client::HepzifyClient;
pub use error::{ClientError, Result};
pub use types::{AuthResponse, ClientConfig, SearchResults};
