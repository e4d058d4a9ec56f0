//! Track records referenced by a playlist.
//!
//! A [`Track`] is one audio file plus its descriptive metadata. Identity is the
//! file path: two tracks with the same path are equal even if their tags differ.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const SECONDS_IN_MINUTE: u64 = 60;
const MINUTES_IN_HOUR: u64 = 60;

/// One audio file referenced by a playlist.
///
/// Empty strings mean "unknown" for every text field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    /// Path of the audio file, exactly as written in the playlist.
    pub file_path: PathBuf,
    /// Track title.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// Album name.
    pub album: String,
    /// Genre description.
    pub genre: String,
    /// Release year, as stored in the tag.
    pub year: String,
    /// Duration in whole seconds.
    pub duration_secs: u64,
}

impl Track {
    /// Create a track with no metadata.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Create a track with a title and nothing else.
    #[must_use]
    pub fn with_title(file_path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::new(file_path)
        }
    }

    /// Set the artist.
    #[must_use]
    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the album.
    #[must_use]
    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the genre.
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    /// Set the year.
    #[must_use]
    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    /// Set the duration in seconds.
    #[must_use]
    pub const fn duration(mut self, secs: u64) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Duration formatted as `h:mm:ss`, or `m:ss` under an hour.
    #[must_use]
    pub fn formatted_duration(&self) -> String {
        format_time(self.duration_secs)
    }

    /// Replace an empty title with the file's base name.
    pub fn apply_title_fallback(&mut self) {
        if self.title.is_empty() {
            self.title = base_name(&self.file_path);
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.file_path.as_os_str() == other.file_path.as_os_str()
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file_path.as_os_str().hash(state);
    }
}

/// Format a duration in seconds as `h:mm:ss`.
///
/// The hours segment is omitted when the duration is under an hour; minutes
/// and seconds are zero padded whenever they follow another segment.
///
/// ```
/// use muplay_core::format_time;
///
/// assert_eq!(format_time(59), "0:59");
/// assert_eq!(format_time(3661), "1:01:01");
/// ```
#[must_use]
pub fn format_time(total_secs: u64) -> String {
    let seconds = total_secs % SECONDS_IN_MINUTE;
    let total_minutes = total_secs / SECONDS_IN_MINUTE;
    let minutes = total_minutes % MINUTES_IN_HOUR;
    let hours = total_minutes / MINUTES_IN_HOUR;

    if hours == 0 {
        format!("{minutes}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}")
    }
}

/// Last path segment without its extension. Both `/` and `\` count as separators
/// so playlists written on Windows resolve the same way everywhere.
fn base_name(path: &Path) -> String {
    let full = path.to_string_lossy();
    let file_name = full.rsplit(['/', '\\']).next().unwrap_or_default();
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(185), "3:05");
        assert_eq!(format_time(3599), "59:59");
        assert_eq!(format_time(3600), "1:00:00");
        assert_eq!(format_time(3661), "1:01:01");
        assert_eq!(format_time(36_000), "10:00:00");
    }

    #[test]
    fn test_formatted_duration_follows_duration() {
        let mut track = Track::new("/music/a.mp3").duration(61);
        assert_eq!(track.formatted_duration(), "1:01");

        track.duration_secs = 3600;
        assert_eq!(track.formatted_duration(), "1:00:00");
    }

    #[test]
    fn test_equality_ignores_metadata() {
        let a = Track::with_title("/music/a.mp3", "First").duration(10);
        let b = Track::with_title("/music/a.mp3", "Second")
            .artist("Someone")
            .duration(99);
        let c = Track::with_title("/music/c.mp3", "First").duration(10);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        assert_ne!(Track::new("/music/A.mp3"), Track::new("/music/a.mp3"));
    }

    #[test]
    fn test_hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(Track::with_title("/music/a.mp3", "One"));
        set.insert(Track::with_title("/music/a.mp3", "Two"));
        set.insert(Track::new("/music/b.mp3"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_title_fallback() {
        let mut track = Track::new("/music/Artist - Song.mp3");
        track.apply_title_fallback();
        assert_eq!(track.title, "Artist - Song");

        let mut windows = Track::new(r"C:\Music\Tune.mp3");
        windows.apply_title_fallback();
        assert_eq!(windows.title, "Tune");

        let mut titled = Track::with_title("/music/x.mp3", "Kept");
        titled.apply_title_fallback();
        assert_eq!(titled.title, "Kept");
    }

    #[test]
    fn test_title_fallback_without_extension() {
        let mut track = Track::new("/music/noext");
        track.apply_title_fallback();
        assert_eq!(track.title, "noext");

        let mut hidden = Track::new("/music/.hidden");
        hidden.apply_title_fallback();
        assert_eq!(hidden.title, ".hidden");
    }

    #[test]
    fn test_builder_setters() {
        let track = Track::with_title("/music/a.mp3", "Song")
            .artist("Band")
            .album("Record")
            .genre("Rock")
            .year("1999")
            .duration(200);
        assert_eq!(track.artist, "Band");
        assert_eq!(track.album, "Record");
        assert_eq!(track.genre, "Rock");
        assert_eq!(track.year, "1999");
        assert_eq!(track.duration_secs, 200);
    }

    #[test]
    fn test_track_serialization() {
        let track = Track::with_title("/music/a.mp3", "Song").duration(42);
        let json = serde_json::to_string(&track).expect("Serialization should succeed");
        let back: Track = serde_json::from_str(&json).expect("Deserialization should succeed");
        assert_eq!(back.title, "Song");
        assert_eq!(back.duration_secs, 42);
    }
}
