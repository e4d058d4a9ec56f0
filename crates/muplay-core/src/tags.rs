//! MP3 tag reading.
//!
//! The codec never trusts the `#EXTINF` line of a playlist: every track is
//! re-resolved from the audio file through a [`TagReader`]. [`Id3TagReader`] is
//! the production implementation; tests substitute their own.
//!
//! # Example
//!
//! ```rust,ignore
//! use muplay_core::tags::{Id3TagReader, TagReader};
//! use std::path::Path;
//! ```

use std::path::Path;
use std::time::Duration;

use id3::{Tag, TagLike};
use lofty::file::AudioFile;
use tracing::{debug, warn};

use crate::error::TagError;
use crate::track::Track;

/// Resolves an audio file path to track metadata.
///
/// This trait allows for mocking in tests.
#[cfg_attr(test, mockall::automock)]
pub trait TagReader {
    /// Read the metadata of the audio file at `path`.
    ///
    /// The returned track must carry `path` as its file path.
    fn read_track(&self, path: &Path) -> Result<Track, TagError>;
}

/// Tag reader backed by the `id3` crate (ID3v1, ID3v2.2 to ID3v2.4).
///
/// The playing time is measured from the audio stream with `lofty`; the
/// `TLEN` frame is only consulted when the stream cannot be measured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3TagReader;

impl Id3TagReader {
    /// Create a new reader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TagReader for Id3TagReader {
    fn read_track(&self, path: &Path) -> Result<Track, TagError> {
        if !path.is_file() {
            return Err(TagError::NotFound {
                path: path.to_path_buf(),
            });
        }

        debug!("Reading tag from: {}", path.display());

        let stream_secs = measure_duration(path);

        // Prefers ID3v2, falls back to an ID3v1 block at the end of the file.
        let tag = match id3::v1v2::read_from_path(path) {
            Ok(tag) => tag,
            Err(id3::Error {
                kind: id3::ErrorKind::NoTag,
                ..
            }) => {
                debug!("No ID3 tag found in: {}", path.display());
                return Ok(Track::new(path).duration(stream_secs.unwrap_or(0)));
            }
            Err(e) => {
                warn!("Failed to read ID3 tag from {}: {}", path.display(), e);
                return Err(TagError::InvalidTag {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let mut track = track_from_tag(path, &tag);
        if let Some(secs) = stream_secs {
            track.duration_secs = secs;
        }
        Ok(track)
    }
}

/// Build a track from a decoded tag. Absent frames become empty strings.
fn track_from_tag(path: &Path, tag: &Tag) -> Track {
    Track {
        file_path: path.to_path_buf(),
        title: tag.title().unwrap_or_default().to_string(),
        artist: tag.artist().unwrap_or_default().to_string(),
        album: tag.album().unwrap_or_default().to_string(),
        genre: tag
            .genre_parsed()
            .map(|g| g.to_string())
            .unwrap_or_default(),
        year: tag.year().map(|y| y.to_string()).unwrap_or_default(),
        duration_secs: tag.duration().map_or(0, millis_to_secs),
    }
}

/// Length of the audio stream in whole seconds, or `None` if it has no
/// measurable frames.
fn measure_duration(path: &Path) -> Option<u64> {
    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let secs = duration_to_secs(tagged.properties().duration());
            (secs > 0).then_some(secs)
        }
        Err(e) => {
            debug!("Could not measure audio length of {}: {}", path.display(), e);
            None
        }
    }
}

/// Partial seconds round up.
fn duration_to_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

/// `TLEN` is stored in milliseconds; partial seconds round up.
fn millis_to_secs(millis: u32) -> u64 {
    u64::from(millis).div_ceil(1000)
}
