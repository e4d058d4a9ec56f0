//! `MuPlay Lite` Core Library
//!
//! This crate provides the playlist persistence layer of the `MuPlay Lite`
//! playlist manager:
//! - The `.m3u` codec (read, write, rename) with missing-track recovery
//! - Playlist and track models
//! - MP3 tag reading behind the [`TagReader`] trait
//! - Playlist library management (create, list, delete)
//! - Application configuration and logging setup
//!
//! # Error Handling
//!
//! Playlist-level failures are [`Error`]s and abort the operation. Track-level
//! failures are [`TagError`]s and only drop the track. See the [`error`] module.
//!
//! ```rust,ignore
//! use muplay_core::{DeclineMissing, M3uCodec, Result};
//! use std::path::Path;
//!
//! fn track_count(path: &Path) -> Result<usize> {
//!     let playlist = M3uCodec::default().read(path, &mut DeclineMissing::new())?;
//!     Ok(playlist.size())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod playlist;
pub mod resolve;
pub mod tags;
pub mod track;

pub use codec::{
    CodecConfig, HEADER, LineEnding, M3uCodec, MARKER, ReadReport, RenameOutcome,
};
pub use config::{AppConfig, config_file_path, default_playlists_directory};
pub use error::{Error, FileSystemError, Result, TagError};
pub use library::{PlaylistLibrary, is_playlist_file, validate_playlist_name};
pub use logging::{LogRotation, LoggingConfig, LoggingError, LoggingGuard};
pub use playlist::{PLAYLIST_EXTENSION, Playlist, playlist_name_from_path};
pub use resolve::{
    DeclineMissing, MissingFileResolver, RenameCollisionResolver, RenameDecision, ReplacementMap,
};
pub use tags::{Id3TagReader, TagReader};
pub use track::{Track, format_time};
