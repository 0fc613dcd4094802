/// Server services
pub mod auth;
pub mod object_store;

pub use auth::{AuthService, AuthSession};
pub use object_store::{LocalObjectStore, ObjectStore, StoredObject};
