//! Discovery of addon archives in the configuration directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::ARCHIVE_EXTENSION;

/// Failure while locating addon archives.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The addon directory was missing and could not be created.
    #[error("addon directory {path:?} unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The addon directory could not be listed.
    #[error("cannot enumerate addon directory {path:?}: {source}")]
    EnumerationFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Locates addon archives in a single directory.
///
/// Only direct children with a `.jar` extension are reported; subdirectories
/// are never descended into.
#[derive(Debug, Clone)]
pub struct Scanner {
    directory: PathBuf,
}

impl Scanner {
    /// Creates a scanner over `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory this scanner inspects.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the addon archives present, sorted by file name.
    ///
    /// A missing directory is created and reported as empty, so a fresh
    /// install ends up with the expected drop-in location after one run.
    pub fn discover(&self) -> Result<Vec<PathBuf>, ScanError> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory).map_err(|source| {
                ScanError::DirectoryUnavailable {
                    path: self.directory.clone(),
                    source,
                }
            })?;
            debug!("Created addon directory {:?}", self.directory);
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&self.directory).map_err(|source| ScanError::EnumerationFailure {
                path: self.directory.clone(),
                source,
            })?;

        let mut archives = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ScanError::EnumerationFailure {
                path: self.directory.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == ARCHIVE_EXTENSION)
            {
                archives.push(path);
            }
        }
        archives.sort();
        Ok(archives)
    }
}
