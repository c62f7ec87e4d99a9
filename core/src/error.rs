//! Error types for the PetFriends client.
//!
//! # Design
//! Status codes are never errors here: a 403 or a 500 is a valid answer that
//! tests assert on, so it travels inside `ApiResponse`. `ApiError` only covers
//! failures that leave no response to inspect.

use std::path::PathBuf;

/// Errors returned by the client and its transports.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, broken stream).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A photo file could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pet's `pet_photo` field is not a base64 data URI.
    #[error("invalid photo data: {0}")]
    InvalidPhotoData(String),
}
