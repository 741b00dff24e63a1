//! Host collaborator traits.
//!
//! The loader never talks to the game runtime directly. The class-loading
//! subsystem and the shared mixin-configuration registry are injected behind
//! the narrow traits defined here, so the crate can be exercised without a
//! running host.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Failure reported by the host when exposing an archive for class loading.
#[derive(Debug, Clone, Error)]
#[error("classpath rejected {path:?}: {reason}")]
pub struct ClasspathError {
    /// Archive the host refused.
    pub path: PathBuf,
    /// Host-supplied reason.
    pub reason: String,
}

impl ClasspathError {
    /// Creates a classpath error for the given archive.
    #[must_use]
    pub fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Why the registry refused a configuration name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryRejection {
    /// Empty names are never valid configuration entries.
    #[error("configuration name is empty")]
    EmptyName,
    /// The name is already active for this process.
    #[error("configuration '{0}' is already registered")]
    Duplicate(String),
    /// Host-specific refusal.
    #[error("{0}")]
    Rejected(String),
}

/// Class-loading subsystem of the host runtime.
///
/// Adding the same path twice must not be treated as an error; the host is
/// responsible for the actual idempotence guarantee.
pub trait ClasspathExtender: Send {
    /// Makes `path` available for class resolution.
    fn add_to_classpath(&mut self, path: &Path) -> Result<(), ClasspathError>;
}

/// Process-wide registry of active mixin-configuration names.
///
/// The loader is append-only towards this registry and assumes nothing about
/// its storage. Appends happen one name at a time under the shared lock; see
/// [`SharedMixinRegistry`].
pub trait MixinRegistry: Send {
    /// Activates a configuration name for the process lifetime.
    fn add_configuration(&mut self, name: &str) -> Result<(), RegistryRejection>;
}

/// Handle under which every registry append is performed.
///
/// The lock is held for a single `add_configuration` call, never across the
/// archive-read loop.
pub type SharedMixinRegistry = Arc<Mutex<dyn MixinRegistry>>;

/// In-memory [`MixinRegistry`] used by tests and standalone hosts.
///
/// Keeps names in registration order and rejects duplicates; hosts wanting a
/// different duplicate policy supply their own implementation.
#[derive(Debug, Default)]
pub struct MixinConfigSet {
    names: Vec<String>,
}

impl MixinConfigSet {
    /// Creates an empty configuration set.
    #[must_use]
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Returns the registered names in registration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if `name` has been registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Wraps the set in the shared handle the loader expects.
    #[must_use]
    pub fn into_shared(self) -> SharedMixinRegistry {
        Arc::new(Mutex::new(self))
    }
}

impl MixinRegistry for MixinConfigSet {
    fn add_configuration(&mut self, name: &str) -> Result<(), RegistryRejection> {
        if name.is_empty() {
            return Err(RegistryRejection::EmptyName);
        }
        if self.contains(name) {
            return Err(RegistryRejection::Duplicate(name.to_string()));
        }
        self.names.push(name.to_string());
        Ok(())
    }
}

/// Classpath extender that records paths without touching a real launcher.
#[derive(Debug, Default)]
pub struct RecordingClasspath {
    paths: Vec<PathBuf>,
}

impl RecordingClasspath {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Returns the recorded paths in addition order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl ClasspathExtender for RecordingClasspath {
    fn add_to_classpath(&mut self, path: &Path) -> Result<(), ClasspathError> {
        self.paths.push(path.to_path_buf());
        Ok(())
    }
}
