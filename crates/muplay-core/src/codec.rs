//! `.m3u` playlist codec.
//!
//! Reads a playlist file into a [`Playlist`], writes it back, and renames the
//! backing file. The on-disk layout is:
//!
//! ```text
//! #EXTM3U
//! #EXTINF:<duration seconds>,<title>
//! <audio file path>
//! ...
//! ```
//!
//! The final path line has no line terminator.
//!
//! # Auto-heal
//!
//! [`M3uCodec::read`] is not a pure read. When a track cannot be resolved on
//! the first attempt, the playlist is marked dirty, and after the whole file
//! has been consumed it is rewritten from the in-memory playlist. Dropped
//! tracks disappear from disk and replacement paths are persisted. Set
//! [`CodecConfig::auto_heal`] to `false` to keep the file untouched.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, FileSystemError, Result, TagError};
use crate::library::validate_playlist_name;
use crate::playlist::{PLAYLIST_EXTENSION, Playlist, playlist_name_from_path};
use crate::resolve::{MissingFileResolver, RenameCollisionResolver, RenameDecision};
use crate::tags::{Id3TagReader, TagReader};
use crate::track::Track;

/// First line of every playlist file.
pub const HEADER: &str = "#EXTM3U";

/// Prefix of the per-track info line.
pub const MARKER: &str = "#EXTINF";

/// Line terminator used when writing playlists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n` on Windows, `\n` everywhere else.
    #[default]
    Platform,
    /// Always `\n`.
    Lf,
    /// Always `\r\n`.
    CrLf,
}

impl LineEnding {
    /// The terminator as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platform => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Codec behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Terminator for written lines.
    pub line_ending: LineEnding,
    /// Rewrite the playlist file after a read that had to drop or relocate tracks.
    pub auto_heal: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Platform,
            auto_heal: true,
        }
    }
}

/// Everything a read found out, beyond the playlist itself.
#[derive(Debug, Clone)]
pub struct ReadReport {
    /// The playlist, containing only the tracks that resolved.
    pub playlist: Playlist,
    /// Paths dropped from the playlist, in file order.
    pub removed: Vec<PathBuf>,
    /// `(missing, replacement)` pairs that were resolved through the resolver.
    pub replaced: Vec<(PathBuf, PathBuf)>,
    /// Whether the playlist file was rewritten.
    pub healed: bool,
}

impl ReadReport {
    /// Whether every track resolved on the first attempt.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.removed.is_empty() && self.replaced.is_empty()
    }
}

/// Result of a rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The file now lives at this path.
    Renamed(PathBuf),
    /// The collision went unanswered; nothing was moved.
    Unchanged,
}

impl RenameOutcome {
    /// New path of the playlist file, if it moved.
    #[must_use]
    pub fn new_path(&self) -> Option<&Path> {
        match self {
            Self::Renamed(path) => Some(path),
            Self::Unchanged => None,
        }
    }
}

/// Reads, writes and renames `.m3u` playlists.
#[derive(Debug, Clone, Default)]
pub struct M3uCodec<T = Id3TagReader> {
    tag_reader: T,
    config: CodecConfig,
}

impl<T: TagReader> M3uCodec<T> {
    /// Create a codec with the default configuration.
    #[must_use]
    pub fn new(tag_reader: T) -> Self {
        Self::with_config(tag_reader, CodecConfig::default())
    }

    /// Create a codec with an explicit configuration.
    #[must_use]
    pub const fn with_config(tag_reader: T, config: CodecConfig) -> Self {
        Self { tag_reader, config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The tag reader tracks are resolved with.
    #[must_use]
    pub const fn tag_reader(&self) -> &T {
        &self.tag_reader
    }

    /// Read the playlist at `path`.
    ///
    /// Unresolvable tracks go through `resolver`; see the module docs for the
    /// rewrite this may trigger.
    ///
    /// # Errors
    ///
    /// - [`Error::PlaylistNotFound`] if the file cannot be opened.
    /// - [`Error::PlaylistCorrupted`] if the header is missing or wrong.
    /// - Any error from [`write`](Self::write) during auto-heal.
    pub fn read(&self, path: &Path, resolver: &mut dyn MissingFileResolver) -> Result<Playlist> {
        self.read_with_report(path, resolver)
            .map(|report| report.playlist)
    }

    /// Same as [`read`](Self::read), also reporting dropped and relocated tracks.
    pub fn read_with_report(
        &self,
        path: &Path,
        resolver: &mut dyn MissingFileResolver,
    ) -> Result<ReadReport> {
        let name = playlist_name_from_path(path);
        let entries = parse_entries(path, &name)?;

        let mut report = ReadReport {
            playlist: Playlist::new(name, path),
            removed: Vec::new(),
            replaced: Vec::new(),
            healed: false,
        };
        let mut dirty = false;

        for entry in entries {
            match self.resolve_track(&entry) {
                Ok(track) => report.playlist.add(track),
                Err(e) => {
                    dirty = true;
                    warn!("Could not resolve {}: {}", entry.display(), e);

                    let replacement = resolver.resolve(&entry).and_then(|replacement| {
                        match self.resolve_track(&replacement) {
                            Ok(track) => Some((replacement, track)),
                            Err(e) => {
                                warn!("Replacement {} also failed: {}", replacement.display(), e);
                                None
                            }
                        }
                    });

                    if let Some((replacement, track)) = replacement {
                        debug!("{} relocated to {}", entry.display(), replacement.display());
                        report.playlist.add(track);
                        report.replaced.push((entry, replacement));
                    } else {
                        resolver.track_removed(&entry);
                        report.removed.push(entry);
                    }
                }
            }
        }

        if dirty && self.config.auto_heal {
            warn!(
                "Rewriting playlist {} after dropping {} and relocating {} track(s)",
                report.playlist.name(),
                report.removed.len(),
                report.replaced.len()
            );
            self.write(&report.playlist)?;
            report.healed = true;
        }

        debug!(
            "Read playlist {} with {} track(s)",
            report.playlist.name(),
            report.playlist.size()
        );
        Ok(report)
    }

    /// Write `playlist` to its file path, replacing whatever is there.
    ///
    /// # Errors
    ///
    /// - [`Error::PlaylistNotFound`] if the file cannot be created.
    /// - [`FileSystemError::WriteFailed`] if writing the contents fails.
    pub fn write(&self, playlist: &Playlist) -> Result<()> {
        let path = playlist.file_path();
        let file = File::create(path).map_err(|e| {
            warn!("Cannot create {}: {}", path.display(), e);
            Error::PlaylistNotFound {
                name: playlist.name().to_string(),
            }
        })?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(self.render(playlist).as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                Error::FileSystem(FileSystemError::WriteFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            })?;

        info!(
            "Wrote playlist {} ({} tracks) to {}",
            playlist.name(),
            playlist.size(),
            path.display()
        );
        Ok(())
    }

    /// The exact text [`write`](Self::write) would persist.
    #[must_use]
    pub fn render(&self, playlist: &Playlist) -> String {
        let eol = self.config.line_ending.as_str();
        let last = playlist.size().saturating_sub(1);

        let mut out = String::new();
        out.push_str(HEADER);
        out.push_str(eol);
        for (i, track) in playlist.records().iter().enumerate() {
            out.push_str(MARKER);
            out.push(':');
            out.push_str(&track.duration_secs.to_string());
            out.push(',');
            out.push_str(&track.title);
            out.push_str(eol);
            out.push_str(&track.file_path.to_string_lossy());
            if i != last {
                out.push_str(eol);
            }
        }
        out
    }

    /// Move the playlist file at `file_path` to `<same dir>/<new_name>.m3u`.
    ///
    /// The in-memory playlist is not updated; use the returned outcome for that.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPlaylistName`] if `new_name` is not a usable file name.
    /// - [`Error::NameCollision`] if the target exists and `resolver` declines.
    /// - [`FileSystemError::RenameFailed`] if the move itself fails.
    pub fn rename(
        &self,
        file_path: &Path,
        new_name: &str,
        resolver: &mut dyn RenameCollisionResolver,
    ) -> Result<RenameOutcome> {
        validate_playlist_name(new_name)?;
        let destination = file_path.with_file_name(format!("{new_name}{PLAYLIST_EXTENSION}"));

        if destination.exists() {
            match resolver.resolve(&destination) {
                RenameDecision::Overwrite => {
                    info!("Overwriting existing playlist {}", destination.display());
                }
                RenameDecision::Decline => {
                    return Err(Error::NameCollision {
                        name: new_name.to_string(),
                    });
                }
                RenameDecision::NoDecision => {
                    debug!("Rename to {} left undecided", destination.display());
                    return Ok(RenameOutcome::Unchanged);
                }
            }
        }

        fs::rename(file_path, &destination).map_err(|e| {
            Error::FileSystem(FileSystemError::RenameFailed {
                from: file_path.to_path_buf(),
                to: destination.clone(),
                reason: e.to_string(),
            })
        })?;

        info!(
            "Renamed playlist {} to {}",
            file_path.display(),
            destination.display()
        );
        Ok(RenameOutcome::Renamed(destination))
    }

    /// Resolve one path through the tag reader, pinning the path and title fallback.
    fn resolve_track(&self, path: &Path) -> std::result::Result<Track, TagError> {
        let mut track = self.tag_reader.read_track(path)?;
        track.file_path = path.to_path_buf();
        track.apply_title_fallback();
        Ok(track)
    }
}

/// Read the header and the `(info, path)` pairs of a playlist file.
///
/// Info lines are skipped; a final line without a partner is ignored. The file
/// is closed before this returns.
fn parse_entries(path: &Path, name: &str) -> Result<Vec<PathBuf>> {
    let file = File::open(path).map_err(|e| {
        debug!("Cannot open {}: {}", path.display(), e);
        Error::PlaylistNotFound {
            name: name.to_string(),
        }
    })?;
    let mut lines = BufReader::new(file).lines();

    match lines.next() {
        Some(Ok(header)) if strip_cr(&header) == HEADER => {}
        Some(Err(e)) => return Err(line_error(e, name)),
        _ => {
            return Err(Error::PlaylistCorrupted {
                name: name.to_string(),
            });
        }
    }

    let mut entries = Vec::new();
    while let Some(info) = lines.next() {
        info.map_err(|e| line_error(e, name))?;
        let Some(location) = lines.next() else {
            debug!("Ignoring unpaired last line in {}", path.display());
            break;
        };
        let location = location.map_err(|e| line_error(e, name))?;
        entries.push(PathBuf::from(strip_cr(&location)));
    }

    Ok(entries)
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Undecodable text means a corrupted playlist; anything else is plain I/O.
fn line_error(e: io::Error, name: &str) -> Error {
    if e.kind() == io::ErrorKind::InvalidData {
        Error::PlaylistCorrupted {
            name: name.to_string(),
        }
    } else {
        Error::Io(e)
    }
}
