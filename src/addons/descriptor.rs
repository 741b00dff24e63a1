//! Optional addon metadata carried inside the archive.
//!
//! Addons may ship a `cobalt.addon.json` entry describing themselves. The
//! descriptor is informational: a missing one never blocks loading, and a
//! broken one only drops the addon from the index.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use zip::result::ZipError;

use super::archive::{ArchiveError, open_archive};
use super::{DESCRIPTOR_ENTRY, MAX_DESCRIPTOR_SIZE, RESERVED_ADDON_ID};

/// Failure reading or validating an addon descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The archive itself could not be opened.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// The descriptor entry could not be read.
    #[error("cannot read descriptor in {path:?}: {source}")]
    Entry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The descriptor entry exceeds the size limit.
    #[error("descriptor in {path:?} exceeds {MAX_DESCRIPTOR_SIZE} bytes")]
    TooLarge { path: PathBuf },
    /// The descriptor entry is not valid JSON.
    #[error("descriptor in {path:?} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The descriptor parsed but its fields are unusable.
    #[error("descriptor in {path:?} is invalid: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Metadata an addon declares about itself.
///
/// Unknown fields are ignored so older loaders keep accepting newer addons.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddonDescriptor {
    /// Unique addon identifier, lowercase.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Version string, unconstrained format.
    #[serde(default)]
    pub version: Option<String>,
    /// Short description for listings.
    #[serde(default)]
    pub description: Option<String>,
    /// Entrypoint class the host activates after boot.
    #[serde(default)]
    pub entrypoint: Option<String>,
}

impl AddonDescriptor {
    /// Name to show in listings, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Checks the declared fields, returning the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("id is empty".to_string());
        }
        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(format!(
                "id '{}' must be lowercase alphanumeric with '-' or '_'",
                self.id
            ));
        }
        if self.id == RESERVED_ADDON_ID {
            return Err(format!("id '{RESERVED_ADDON_ID}' is reserved"));
        }
        Ok(())
    }
}

/// Reads the descriptor from `path`, if the archive carries one.
pub fn read_descriptor(path: &Path) -> Result<Option<AddonDescriptor>, DescriptorError> {
    let mut archive = open_archive(path)?;

    let mut entry = match archive.by_name(DESCRIPTOR_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(source) => {
            return Err(DescriptorError::Archive(ArchiveError::Format {
                path: path.to_path_buf(),
                source,
            }));
        }
    };

    if entry.size() > MAX_DESCRIPTOR_SIZE {
        return Err(DescriptorError::TooLarge {
            path: path.to_path_buf(),
        });
    }

    let mut raw = String::new();
    entry
        .read_to_string(&mut raw)
        .map_err(|source| DescriptorError::Entry {
            path: path.to_path_buf(),
            source,
        })?;

    let descriptor: AddonDescriptor =
        serde_json::from_str(&raw).map_err(|source| DescriptorError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    descriptor
        .validate()
        .map_err(|reason| DescriptorError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

    Ok(Some(descriptor))
}
