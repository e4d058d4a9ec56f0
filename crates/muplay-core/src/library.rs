//! Playlist library management.
//!
//! Handles creating, loading, renaming and deleting playlists.
//! Each playlist is a single `.m3u` file directly inside the library directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::codec::{M3uCodec, RenameOutcome};
use crate::error::{Error, FileSystemError, Result};
use crate::playlist::{PLAYLIST_EXTENSION, Playlist};
use crate::resolve::{MissingFileResolver, RenameCollisionResolver};
use crate::tags::TagReader;

/// Manager for the playlists stored in one directory.
pub struct PlaylistLibrary<T: TagReader> {
    /// Directory where playlist files are stored.
    base_path: PathBuf,
    codec: M3uCodec<T>,
}

impl<T: TagReader> PlaylistLibrary<T> {
    /// Create a new playlist library.
    ///
    /// # Errors
    ///
    /// Returns an error if the base path cannot be created.
    pub fn new(base_path: PathBuf, codec: M3uCodec<T>) -> Result<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                Error::FileSystem(FileSystemError::CreateDirFailed {
                    path: base_path.clone(),
                    reason: e.to_string(),
                })
            })?;
        }
        Ok(Self { base_path, codec })
    }

    /// Get the base path for playlists.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The codec used for every file operation.
    #[must_use]
    pub const fn codec(&self) -> &M3uCodec<T> {
        &self.codec
    }

    /// Path of the playlist file called `name`, whether or not it exists.
    #[must_use]
    pub fn playlist_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{name}{PLAYLIST_EXTENSION}"))
    }

    /// List all playlist files, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list_playlists(&self) -> Result<Vec<PathBuf>> {
        let mut playlists = Vec::new();

        for entry in WalkDir::new(&self.base_path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                Error::FileSystem(FileSystemError::ReadFailed {
                    path: self.base_path.clone(),
                    reason: e.to_string(),
                })
            })?;

            let path = entry.path();
            if entry.file_type().is_file() && is_playlist_file(path) {
                playlists.push(path.to_path_buf());
            }
        }

        playlists.sort();
        Ok(playlists)
    }

    /// Create a new empty playlist and write it to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the playlist already exists,
    /// or the file cannot be written.
    pub fn create_playlist(&self, name: &str) -> Result<Playlist> {
        validate_playlist_name(name)?;

        let path = self.playlist_path(name);
        if path.exists() {
            return Err(Error::PlaylistAlreadyExists {
                name: name.to_string(),
            });
        }

        let playlist = Playlist::new(name, path);
        self.codec.write(&playlist)?;

        info!("Created playlist: {}", name);
        Ok(playlist)
    }

    /// Load the playlist called `name`. May rewrite the file; see [`M3uCodec::read`].
    ///
    /// # Errors
    ///
    /// Returns an error if the playlist is missing or corrupted.
    pub fn load_playlist(
        &self,
        name: &str,
        resolver: &mut dyn MissingFileResolver,
    ) -> Result<Playlist> {
        self.codec.read(&self.playlist_path(name), resolver)
    }

    /// Load every playlist in the library, skipping the ones that fail.
    pub fn load_all(&self, resolver: &mut dyn MissingFileResolver) -> Result<Vec<Playlist>> {
        let mut loaded = Vec::new();
        for path in self.list_playlists()? {
            match self.codec.read(&path, resolver) {
                Ok(playlist) => loaded.push(playlist),
                Err(e) => warn!("Failed to load playlist at {}: {}", path.display(), e),
            }
        }
        Ok(loaded)
    }

    /// Save a playlist to its own file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_playlist(&self, playlist: &Playlist) -> Result<()> {
        self.codec.write(playlist)
    }

    /// Rename a playlist's file and, on success, its in-memory name and path.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the caller declines to overwrite
    /// an existing playlist, or the file cannot be moved.
    pub fn rename_playlist(
        &self,
        playlist: &mut Playlist,
        new_name: &str,
        resolver: &mut dyn RenameCollisionResolver,
    ) -> Result<RenameOutcome> {
        let outcome = self.codec.rename(playlist.file_path(), new_name, resolver)?;
        if let RenameOutcome::Renamed(path) = &outcome {
            playlist.set_name(new_name);
            playlist.set_file_path(path.clone());
        }
        Ok(outcome)
    }

    /// Delete the playlist file called `name`. Referenced audio files are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the playlist doesn't exist or cannot be deleted.
    pub fn delete_playlist(&self, name: &str) -> Result<()> {
        let path = self.playlist_path(name);
        if !path.exists() {
            return Err(Error::PlaylistNotFound {
                name: name.to_string(),
            });
        }

        fs::remove_file(&path).map_err(|e| {
            Error::FileSystem(FileSystemError::DeleteFailed {
                path,
                reason: e.to_string(),
            })
        })?;

        info!("Deleted playlist: {}", name);
        Ok(())
    }
}

/// Check if a file is a playlist file based on extension.
///
/// The match is exact so every listed file maps back to itself through
/// [`PlaylistLibrary::playlist_path`].
#[must_use]
pub fn is_playlist_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(PLAYLIST_EXTENSION))
        .is_some_and(|stem| !stem.is_empty())
}

/// Validate a playlist name.
///
/// # Errors
///
/// Returns an error if the name is empty, too long, contains invalid characters,
/// or is a reserved name.
pub fn validate_playlist_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidPlaylistName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("Playlist name cannot be empty");
    }

    if name.len() > 255 {
        return invalid("Playlist name too long");
    }

    let invalid_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];
    if name.chars().any(|c| invalid_chars.contains(&c)) {
        return invalid("Playlist name contains invalid characters");
    }

    // Windows device names
    let reserved = [
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    if reserved.contains(&name.to_uppercase().as_str()) {
        return invalid("Playlist name is reserved");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::resolve::{DeclineMissing, RenameDecision};
    use crate::tags::MockTagReader;
    use crate::track::Track;
    use tempfile::TempDir;

    fn setup_test_library() -> (PlaylistLibrary<MockTagReader>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut reader = MockTagReader::new();
        reader
            .expect_read_track()
            .returning(|p| Ok(Track::with_title(p, "Song").duration(30)));
        let library = PlaylistLibrary::new(temp_dir.path().to_path_buf(), M3uCodec::new(reader))
            .expect("Failed to create library");
        (library, temp_dir)
    }

    #[test]
    fn test_new_creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("playlists");
        let library = PlaylistLibrary::new(base.clone(), M3uCodec::new(MockTagReader::new()))
            .expect("Library creation should succeed");
        assert!(base.is_dir());
        assert_eq!(library.base_path(), base);
    }

    #[test]
    fn test_create_playlist() {
        let (library, _temp) = setup_test_library();

        let playlist = library.create_playlist("My Playlist").expect("Should create");
        assert_eq!(playlist.name(), "My Playlist");
        assert!(playlist.is_empty());
        assert!(playlist.file_path().exists());
        assert!(
            fs::read_to_string(playlist.file_path())
                .unwrap()
                .starts_with("#EXTM3U")
        );
    }

    #[test]
    fn test_create_duplicate_playlist() {
        let (library, _temp) = setup_test_library();

        library
            .create_playlist("Duplicate")
            .expect("First creation should succeed");
        let result = library.create_playlist("Duplicate");
        assert!(matches!(result, Err(Error::PlaylistAlreadyExists { .. })));
    }

    #[test]
    fn test_create_playlist_invalid_name() {
        let (library, _temp) = setup_test_library();
        let result = library.create_playlist("bad/name");
        assert!(matches!(result, Err(Error::InvalidPlaylistName { .. })));
    }

    #[test]
    fn test_delete_playlist() {
        let (library, _temp) = setup_test_library();

        let playlist = library.create_playlist("ToDelete").unwrap();
        library.delete_playlist("ToDelete").expect("Delete should succeed");
        assert!(!playlist.file_path().exists());
    }

    #[test]
    fn test_delete_nonexistent_playlist() {
        let (library, _temp) = setup_test_library();
        let result = library.delete_playlist("NonExistent");
        assert!(matches!(result, Err(Error::PlaylistNotFound { .. })));
    }

    #[test]
    fn test_list_playlists() {
        let (library, temp) = setup_test_library();

        library.create_playlist("Beta").unwrap();
        library.create_playlist("Alpha").unwrap();
        fs::write(temp.path().join("notes.txt"), "not a playlist").unwrap();
        fs::create_dir(temp.path().join("folder.m3u")).unwrap();

        let playlists = library.list_playlists().unwrap();
        assert_eq!(
            playlists,
            vec![temp.path().join("Alpha.m3u"), temp.path().join("Beta.m3u")]
        );
    }

    #[test]
    fn test_listed_playlists_load_by_name() {
        let (library, temp) = setup_test_library();

        library.create_playlist("Mix").unwrap();
        fs::write(temp.path().join("Shout.M3U"), "#EXTM3U\n").unwrap();

        let loaded = library.load_all(&mut DeclineMissing::new()).unwrap();
        assert_eq!(loaded.len(), 1);
        for playlist in &loaded {
            assert_eq!(library.playlist_path(playlist.name()), playlist.file_path());
        }
    }

    #[test]
    fn test_list_playlists_empty() {
        let (library, _temp) = setup_test_library();
        assert!(library.list_playlists().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_playlist() {
        let (library, _temp) = setup_test_library();

        let mut playlist = library.create_playlist("Road").unwrap();
        playlist.add(Track::with_title("/music/a.mp3", "Song").duration(30));
        playlist.add(Track::with_title("/music/b.mp3", "Song").duration(30));
        library.save_playlist(&playlist).unwrap();

        let loaded = library
            .load_playlist("Road", &mut DeclineMissing::new())
            .unwrap();
        assert_eq!(loaded, playlist);
        assert_eq!(loaded.size(), 2);
        assert_eq!(loaded.records(), playlist.records());
    }

    #[test]
    fn test_load_all_skips_corrupted() {
        let (library, temp) = setup_test_library();

        library.create_playlist("Good").unwrap();
        fs::write(temp.path().join("Broken.m3u"), "garbage").unwrap();

        let loaded = library.load_all(&mut DeclineMissing::new()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "Good");
    }

    #[test]
    fn test_rename_playlist_updates_in_memory() {
        let (library, _temp) = setup_test_library();

        let mut playlist = library.create_playlist("Old").unwrap();
        let outcome = library
            .rename_playlist(&mut playlist, "New", &mut RenameDecision::Decline)
            .unwrap();

        assert_eq!(outcome, RenameOutcome::Renamed(library.playlist_path("New")));
        assert_eq!(playlist.name(), "New");
        assert_eq!(playlist.file_path(), library.playlist_path("New"));
        assert!(!library.playlist_path("Old").exists());
    }

    #[test]
    fn test_rename_playlist_undecided_keeps_in_memory() {
        let (library, _temp) = setup_test_library();

        let mut playlist = library.create_playlist("Keep").unwrap();
        library.create_playlist("Taken").unwrap();
        let outcome = library
            .rename_playlist(&mut playlist, "Taken", &mut RenameDecision::NoDecision)
            .unwrap();

        assert_eq!(outcome, RenameOutcome::Unchanged);
        assert_eq!(playlist.name(), "Keep");
        assert_eq!(playlist.file_path(), library.playlist_path("Keep"));
    }

    #[test]
    fn test_validate_playlist_name_valid() {
        assert!(validate_playlist_name("My Playlist").is_ok());
        assert!(validate_playlist_name("Summer 2024 - Hits").is_ok());
    }

    #[test]
    fn test_validate_playlist_name_empty() {
        assert!(validate_playlist_name("").is_err());
    }

    #[test]
    fn test_validate_playlist_name_invalid_chars() {
        for name in ["a/b", r"a\b", "a:b", "a*b", "a?b", "a\"b", "a<b", "a>b", "a|b"] {
            assert!(validate_playlist_name(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_validate_playlist_name_reserved() {
        assert!(validate_playlist_name("CON").is_err());
        assert!(validate_playlist_name("lpt1").is_err());
    }

    #[test]
    fn test_validate_playlist_name_too_long() {
        assert!(validate_playlist_name(&"a".repeat(256)).is_err());
        assert!(validate_playlist_name(&"a".repeat(255)).is_ok());
    }

    #[test]
    fn test_is_playlist_file() {
        assert!(is_playlist_file(Path::new("mix.m3u")));
        assert!(!is_playlist_file(Path::new("/music/MIX.M3U")));
        assert!(!is_playlist_file(Path::new(".m3u")));
        assert!(!is_playlist_file(Path::new("mix.m3u8")));
        assert!(!is_playlist_file(Path::new("song.mp3")));
        assert!(!is_playlist_file(Path::new("m3u")));
    }
}
