//! Playlist model.
//!
//! A [`Playlist`] is an ordered list of [`Track`]s backed by an `.m3u` file.
//! Order is playback order and duplicates are allowed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::track::{Track, format_time};

/// Extension of playlist files, including the dot.
pub const PLAYLIST_EXTENSION: &str = ".m3u";

/// An ordered, mutable sequence of tracks plus the file that backs it.
///
/// Two playlists are equal when their file paths are equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlist {
    name: String,
    file_path: PathBuf,
    records: Vec<Track>,
}

impl Playlist {
    /// Create an empty playlist.
    #[must_use]
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.into(),
            records: Vec::new(),
        }
    }

    /// Create an empty playlist named after its file.
    #[must_use]
    pub fn from_path(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        Self::new(playlist_name_from_path(&file_path), file_path)
    }

    /// Create a playlist with the given tracks.
    #[must_use]
    pub fn with_records(
        name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        records: Vec<Track>,
    ) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.into(),
            records,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the display name. The backing file is not touched.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Path of the backing `.m3u` file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Point the playlist at another backing file.
    pub fn set_file_path(&mut self, file_path: impl Into<PathBuf>) {
        self.file_path = file_path.into();
    }

    /// Number of tracks.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.records.len()
    }

    /// Whether the playlist has no tracks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tracks in playback order.
    #[must_use]
    pub fn records(&self) -> &[Track] {
        &self.records
    }

    /// Mutable access to the tracks, for in-place metadata edits and reordering.
    pub fn records_mut(&mut self) -> &mut [Track] {
        &mut self.records
    }

    /// Track at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.records.get(index)
    }

    /// Append a track.
    pub fn add(&mut self, track: Track) {
        self.records.push(track);
    }

    /// Append several tracks, keeping their order.
    pub fn add_all(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.records.extend(tracks);
    }

    /// Remove the first track equal to `track`. Returns whether one was removed.
    pub fn delete(&mut self, track: &Track) -> bool {
        if let Some(index) = self.records.iter().position(|t| t == track) {
            self.records.remove(index);
            true
        } else {
            false
        }
    }

    /// Remove every track equal to any of `tracks`. Returns how many were removed.
    pub fn delete_all(&mut self, tracks: &[Track]) -> usize {
        let before = self.records.len();
        self.records.retain(|t| !tracks.contains(t));
        before - self.records.len()
    }

    /// Remove and return the track at `index`.
    pub fn delete_at(&mut self, index: usize) -> Option<Track> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    /// Sum of all track durations in seconds.
    #[must_use]
    pub fn total_duration_secs(&self) -> u64 {
        self.records.iter().map(|t| t.duration_secs).sum()
    }

    /// Total duration formatted like a track duration.
    #[must_use]
    pub fn formatted_total_duration(&self) -> String {
        format_time(self.total_duration_secs())
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.file_path.as_os_str() == other.file_path.as_os_str()
    }
}

impl Eq for Playlist {}

/// Derive a playlist's display name from its file path.
///
/// Strips a trailing `.m3u`, then everything up to the last `/` or `\`.
#[must_use]
pub fn playlist_name_from_path(path: &Path) -> String {
    let full = path.to_string_lossy();
    let without_ext = full.strip_suffix(PLAYLIST_EXTENSION).unwrap_or(&full);
    without_ext
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_ext)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample() -> Playlist {
        Playlist::with_records(
            "mix",
            "/music/mix.m3u",
            vec![
                Track::with_title("/music/a.mp3", "A").duration(60),
                Track::with_title("/music/b.mp3", "B").duration(90),
                Track::with_title("/music/a.mp3", "A").duration(60),
            ],
        )
    }

    #[test]
    fn test_name_from_path() {
        assert_eq!(playlist_name_from_path(Path::new("/music/Road Trip.m3u")), "Road Trip");
        assert_eq!(playlist_name_from_path(Path::new(r"C:\Music\Chill.m3u")), "Chill");
        assert_eq!(playlist_name_from_path(Path::new("plain.m3u")), "plain");
        assert_eq!(playlist_name_from_path(Path::new("/music/notes.txt")), "notes.txt");
    }

    #[test]
    fn test_from_path() {
        let playlist = Playlist::from_path("/music/Gym.m3u");
        assert_eq!(playlist.name(), "Gym");
        assert_eq!(playlist.file_path(), Path::new("/music/Gym.m3u"));
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_size_tracks_records() {
        let mut playlist = Playlist::new("mix", "/music/mix.m3u");
        assert_eq!(playlist.size(), 0);

        playlist.add(Track::new("/music/a.mp3"));
        playlist.add_all(vec![Track::new("/music/b.mp3"), Track::new("/music/c.mp3")]);
        assert_eq!(playlist.size(), 3);
        assert_eq!(playlist.size(), playlist.records().len());

        assert!(playlist.delete(&Track::new("/music/b.mp3")));
        assert!(!playlist.delete(&Track::new("/music/zzz.mp3")));
        assert_eq!(playlist.size(), 2);
    }

    #[test]
    fn test_duplicates_allowed() {
        let playlist = sample();
        assert_eq!(playlist.size(), 3);
        assert_eq!(playlist.get(0), playlist.get(2));
    }

    #[test]
    fn test_delete_removes_first_occurrence() {
        let mut playlist = sample();
        assert!(playlist.delete(&Track::new("/music/a.mp3")));
        let paths: Vec<_> = playlist.records().iter().map(|t| t.file_path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/music/b.mp3"), PathBuf::from("/music/a.mp3")]
        );
    }

    #[test]
    fn test_delete_all_removes_every_match() {
        let mut playlist = sample();
        let removed = playlist.delete_all(&[Track::new("/music/a.mp3")]);
        assert_eq!(removed, 2);
        assert_eq!(playlist.size(), 1);
        assert_eq!(playlist.get(0).unwrap().title, "B");
    }

    #[test]
    fn test_delete_at() {
        let mut playlist = sample();
        let removed = playlist.delete_at(1).expect("index in range");
        assert_eq!(removed.title, "B");
        assert_eq!(playlist.size(), 2);
        assert!(playlist.delete_at(5).is_none());
        assert_eq!(playlist.size(), 2);
    }

    #[test]
    fn test_equality_by_file_path() {
        let a = sample();
        let mut b = Playlist::new("other name", "/music/mix.m3u");
        b.add(Track::new("/music/z.mp3"));
        assert_eq!(a, b);

        let c = Playlist::new("mix", "/elsewhere/mix.m3u");
        assert_ne!(a, c);
    }

    #[test]
    fn test_setters() {
        let mut playlist = sample();
        playlist.set_name("renamed");
        playlist.set_file_path("/music/renamed.m3u");
        assert_eq!(playlist.name(), "renamed");
        assert_eq!(playlist.file_path(), Path::new("/music/renamed.m3u"));
    }

    #[test]
    fn test_records_mut_edits_in_place() {
        let mut playlist = sample();
        playlist.records_mut()[1].title = "Edited".to_string();
        playlist.records_mut().swap(0, 1);
        assert_eq!(playlist.get(0).unwrap().title, "Edited");
    }

    #[test]
    fn test_total_duration() {
        let playlist = sample();
        assert_eq!(playlist.total_duration_secs(), 210);
        assert_eq!(playlist.formatted_total_duration(), "3:30");
    }
}
