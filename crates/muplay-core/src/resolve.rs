//! Decision hooks consulted by the codec.
//!
//! Reading a playlist may hit tracks whose audio files have moved, and renaming
//! may hit an existing playlist. Both situations need a caller decision; the
//! UI layer answers interactively, tests and batch tools answer from a script.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Answers "where did this audio file go?" while a playlist is being read.
#[cfg_attr(test, mockall::automock)]
pub trait MissingFileResolver {
    /// Called once per track that could not be resolved.
    ///
    /// Return a replacement path to retry with, or `None` to drop the track.
    fn resolve(&mut self, missing: &Path) -> Option<PathBuf>;

    /// Notice that `path` was removed from the playlist being read.
    fn track_removed(&mut self, path: &Path) {
        warn!("{} was removed from the playlist", path.display());
    }
}

/// Never supplies a replacement, so every unresolvable track is dropped.
#[derive(Debug, Clone, Default)]
pub struct DeclineMissing {
    removed: Vec<PathBuf>,
}

impl DeclineMissing {
    /// Create a new resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths that were dropped so far.
    #[must_use]
    pub fn removed(&self) -> &[PathBuf] {
        &self.removed
    }
}

impl MissingFileResolver for DeclineMissing {
    fn resolve(&mut self, _missing: &Path) -> Option<PathBuf> {
        None
    }

    fn track_removed(&mut self, path: &Path) {
        warn!("{} was removed from the playlist", path.display());
        self.removed.push(path.to_path_buf());
    }
}

/// Scripted resolver: looks each missing path up in a fixed map.
#[derive(Debug, Clone, Default)]
pub struct ReplacementMap {
    replacements: HashMap<PathBuf, PathBuf>,
    removed: Vec<PathBuf>,
}

impl ReplacementMap {
    /// Create an empty map, which behaves like [`DeclineMissing`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `missing` to `replacement`.
    #[must_use]
    pub fn with(mut self, missing: impl Into<PathBuf>, replacement: impl Into<PathBuf>) -> Self {
        self.insert(missing, replacement);
        self
    }

    /// Map `missing` to `replacement`.
    pub fn insert(&mut self, missing: impl Into<PathBuf>, replacement: impl Into<PathBuf>) {
        self.replacements.insert(missing.into(), replacement.into());
    }

    /// Paths that were dropped so far.
    #[must_use]
    pub fn removed(&self) -> &[PathBuf] {
        &self.removed
    }
}

impl MissingFileResolver for ReplacementMap {
    fn resolve(&mut self, missing: &Path) -> Option<PathBuf> {
        self.replacements.get(missing).cloned()
    }

    fn track_removed(&mut self, path: &Path) {
        warn!("{} was removed from the playlist", path.display());
        self.removed.push(path.to_path_buf());
    }
}

/// What to do when a rename target already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameDecision {
    /// Replace the existing playlist file.
    Overwrite,
    /// Keep the existing file and fail the rename.
    Decline,
    /// No answer was given; leave everything as it is.
    NoDecision,
}

/// Answers "overwrite the existing playlist?" during a rename.
#[cfg_attr(test, mockall::automock)]
pub trait RenameCollisionResolver {
    /// Called once when `destination` already exists.
    fn resolve(&mut self, destination: &Path) -> RenameDecision;
}

/// A decision known up front answers every collision the same way.
impl RenameCollisionResolver for RenameDecision {
    fn resolve(&mut self, _destination: &Path) -> RenameDecision {
        *self
    }
}
