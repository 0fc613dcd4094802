//! Domain types

mod comment;
mod ids;
mod playlist;
mod track;
mod user;

pub use comment::{Comment, CreateComment};
pub use ids::{CommentId, PlaylistId, TrackId, UserId};
pub use playlist::{CreatePlaylist, Playlist, PlaylistWithTracks};
pub use track::{CreateTrack, Track};
pub use user::{User, UserCredentials};
