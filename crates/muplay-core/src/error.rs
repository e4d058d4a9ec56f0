//! Error types for MuPlay Lite core operations.
//!
//! Playlist-level failures ([`Error`]) abort the operation that raised them.
//! Track-level failures ([`TagError`]) are recoverable: the codec hands them to
//! a [`MissingFileResolver`](crate::resolve::MissingFileResolver) and only drops
//! the offending track.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in MuPlay Lite core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Playlist file cannot be opened for reading, or its destination cannot be written.
    #[error("Playlist file {name} not found")]
    PlaylistNotFound {
        /// Display name of the playlist.
        name: String,
    },

    /// Playlist file exists but does not start with the `#EXTM3U` header.
    #[error("Playlist file {name} is corrupted")]
    PlaylistCorrupted {
        /// Display name of the playlist.
        name: String,
    },

    /// Rename target exists and the caller declined to overwrite it.
    #[error("A playlist already exists with that name: {name}")]
    NameCollision {
        /// Requested playlist name.
        name: String,
    },

    /// Playlist already exists.
    #[error("Playlist already exists: {name}")]
    PlaylistAlreadyExists {
        /// Playlist name.
        name: String,
    },

    /// Invalid playlist name.
    #[error("Invalid playlist name '{name}': {reason}")]
    InvalidPlaylistName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// File system operation failed.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File system failures, each carrying the path it happened at.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// Reading a file or directory failed.
    #[error("Failed to read {path}: {reason}")]
    ReadFailed {
        /// Path being read.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// Writing a file failed.
    #[error("Failed to write {path}: {reason}")]
    WriteFailed {
        /// Path being written.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// Creating a directory failed.
    #[error("Failed to create directory {path}: {reason}")]
    CreateDirFailed {
        /// Directory path.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// Deleting a file failed.
    #[error("Failed to delete {path}: {reason}")]
    DeleteFailed {
        /// Path being deleted.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// Moving a file failed.
    #[error("Failed to move {from} to {to}: {reason}")]
    RenameFailed {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying reason.
        reason: String,
    },
}

/// Per-track failure reported by a [`TagReader`](crate::tags::TagReader).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagError {
    /// The referenced audio file does not exist.
    #[error("Audio file not found: {path}")]
    NotFound {
        /// Missing audio file.
        path: PathBuf,
    },

    /// The audio file exists but its tag could not be decoded.
    #[error("Invalid tag in {path}: {reason}")]
    InvalidTag {
        /// Audio file with the unreadable tag.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

impl TagError {
    /// Path of the audio file the failure refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path } | Self::InvalidTag { path, .. } => path,
        }
    }
}
