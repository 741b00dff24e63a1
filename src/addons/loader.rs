//! Prelaunch orchestration over the discovered addon set.
//!
//! The loader makes exactly two passes over the same discovery result: the
//! first exposes every archive to the host class loader (and indexes
//! descriptors on the side), the second registers mixin configurations. A
//! broken archive or a refused name never aborts the run; the failure is
//! logged and counted while the remaining addons proceed.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::descriptor::{AddonDescriptor, read_descriptor};
use super::registrar::Registrar;
use super::scanner::Scanner;
use crate::env::Environment;
use crate::host::{ClasspathExtender, SharedMixinRegistry};
use crate::settings::LoaderSettings;

/// Counters describing one prelaunch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Archives the scanner reported.
    pub archives_found: usize,
    /// Archives the host accepted onto the classpath.
    pub classpath_added: usize,
    /// Archives the host refused.
    pub classpath_failed: usize,
    /// Configuration names the registry accepted.
    pub configs_registered: usize,
    /// Configuration names withheld by the decision chain.
    pub configs_skipped: usize,
    /// Configuration names the registry refused.
    pub configs_rejected: usize,
    /// Archives that could not be read during registration.
    pub archives_unreadable: usize,
    /// Addons that contributed a descriptor to the index.
    pub addons_indexed: usize,
}

/// An addon that declared a descriptor, keyed into [`AddonIndex`].
#[derive(Debug, Clone)]
pub struct IndexedAddon {
    /// Declared metadata.
    pub descriptor: AddonDescriptor,
    /// Archive the descriptor came from.
    pub archive: PathBuf,
}

/// Descriptor index built during the classpath pass.
///
/// Ids are unique; when two archives declare the same id the first one in
/// scan order wins and the duplicate is only logged.
#[derive(Debug, Default)]
pub struct AddonIndex {
    addons: HashMap<String, IndexedAddon>,
}

impl AddonIndex {
    /// Looks up an addon by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndexedAddon> {
        self.addons.get(id)
    }

    /// Returns true if `id` is present.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.addons.contains_key(id)
    }

    /// Returns the indexed ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.addons.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of indexed addons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addons.len()
    }

    /// Returns true if no addon declared a descriptor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    fn insert(&mut self, descriptor: AddonDescriptor, archive: &Path) -> bool {
        match self.addons.entry(descriptor.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(IndexedAddon {
                    descriptor,
                    archive: archive.to_path_buf(),
                });
                true
            }
        }
    }
}

/// Runs the prelaunch passes over one addon directory.
pub struct AddonLoader {
    scanner: Scanner,
    registrar: Registrar,
}

impl AddonLoader {
    /// Creates a loader from its two halves.
    #[must_use]
    pub fn new(scanner: Scanner, registrar: Registrar) -> Self {
        Self { scanner, registrar }
    }

    /// Discovers addons and runs both passes, returning the counters and the
    /// descriptor index.
    ///
    /// Every failure is handled here: a failed scan yields an empty result,
    /// and per-archive problems are counted without stopping the run.
    pub fn run(&self, classpath: &mut dyn ClasspathExtender) -> (LoadSummary, AddonIndex) {
        let mut summary = LoadSummary::default();
        let mut index = AddonIndex::default();

        let archives = match self.scanner.discover() {
            Ok(archives) => archives,
            Err(err) => {
                warn!("Addon scan failed: {}", err);
                return (summary, index);
            }
        };
        summary.archives_found = archives.len();
        info!(
            "Found {} addon archive(s) in {:?} for a {} install",
            archives.len(),
            self.scanner.directory(),
            self.registrar.environment()
        );
        if archives.is_empty() {
            return (summary, index);
        }

        for path in &archives {
            match classpath.add_to_classpath(path) {
                Ok(()) => {
                    debug!("Added {:?} to the launch classpath", path);
                    summary.classpath_added += 1;
                }
                Err(err) => {
                    warn!("Classpath refused {:?}: {}", path, err.reason);
                    summary.classpath_failed += 1;
                }
            }

            match read_descriptor(path) {
                Ok(Some(descriptor)) => {
                    let id = descriptor.id.clone();
                    if index.insert(descriptor, path) {
                        summary.addons_indexed += 1;
                    } else {
                        warn!(
                            "Addon id '{}' from {:?} is already indexed, keeping the first",
                            id, path
                        );
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("Unusable addon descriptor: {}", err),
            }
        }

        for path in &archives {
            match self.registrar.register_from_archive(path) {
                Ok(report) => {
                    summary.configs_registered += report.registered.len();
                    summary.configs_skipped += report.skipped.len();
                    summary.configs_rejected += report.rejected.len();
                }
                Err(err) => {
                    warn!("Cannot read addon archive: {}", err);
                    summary.archives_unreadable += 1;
                }
            }
        }

        info!(
            "Addon prelaunch complete: {} archive(s), {} configuration(s) registered, {} skipped, {} rejected",
            summary.archives_found,
            summary.configs_registered,
            summary.configs_skipped,
            summary.configs_rejected
        );
        (summary, index)
    }
}

/// Runs the full prelaunch sequence with the configured addon directory.
///
/// `detected` is the environment reported by the host; an explicit setting in
/// `settings` overrides it.
pub fn prelaunch(
    settings: &LoaderSettings,
    detected: Environment,
    classpath: &mut dyn ClasspathExtender,
    registry: SharedMixinRegistry,
) -> (LoadSummary, AddonIndex) {
    let environment = settings.environment.unwrap_or(detected);
    info!("Cobalt addon prelaunch starting ({} install)", environment);

    let scanner = Scanner::new(settings.addons_path());
    let registrar = Registrar::new(registry, environment);
    AddonLoader::new(scanner, registrar).run(classpath)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::{MixinConfigSet, RecordingClasspath};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_archive(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, contents) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn loader_for(dir: &Path, environment: Environment) -> AddonLoader {
        let registry = MixinConfigSet::new().into_shared();
        AddonLoader::new(Scanner::new(dir), Registrar::new(registry, environment))
    }

    #[test]
    fn test_run_with_empty_directory() {
        let dir = TempDir::new().unwrap();
        let loader = loader_for(dir.path(), Environment::Client);
        let mut classpath = RecordingClasspath::new();

        let (summary, index) = loader.run(&mut classpath);
        assert_eq!(summary, LoadSummary::default());
        assert!(index.is_empty());
        assert!(classpath.paths().is_empty());
    }

    #[test]
    fn test_run_counts_every_outcome() {
        let dir = TempDir::new().unwrap();
        write_archive(
            &dir.path().join("good.jar"),
            &[
                ("foo.mixins.json", "{}"),
                ("client-extra.mixins.json", "{}"),
                ("cobalt.mixins.json", "{}"),
            ],
        );
        std::fs::write(dir.path().join("broken.jar"), b"garbage").unwrap();

        let loader = loader_for(dir.path(), Environment::Server);
        let mut classpath = RecordingClasspath::new();
        let (summary, _) = loader.run(&mut classpath);

        assert_eq!(summary.archives_found, 2);
        assert_eq!(summary.classpath_added, 2);
        assert_eq!(summary.configs_registered, 1);
        assert_eq!(summary.configs_skipped, 2);
        assert_eq!(summary.archives_unreadable, 1);
    }

    #[test]
    fn test_index_keeps_first_duplicate_id() {
        let dir = TempDir::new().unwrap();
        write_archive(
            &dir.path().join("a.jar"),
            &[("cobalt.addon.json", r#"{"id": "tweaks", "version": "1"}"#)],
        );
        write_archive(
            &dir.path().join("b.jar"),
            &[("cobalt.addon.json", r#"{"id": "tweaks", "version": "2"}"#)],
        );

        let loader = loader_for(dir.path(), Environment::Client);
        let (summary, index) = loader.run(&mut RecordingClasspath::new());

        assert_eq!(summary.addons_indexed, 1);
        let indexed = index.get("tweaks").unwrap();
        assert_eq!(indexed.archive, dir.path().join("a.jar"));
        assert_eq!(indexed.descriptor.version.as_deref(), Some("1"));
    }

    #[test]
    fn test_prelaunch_settings_override_environment() {
        let dir = TempDir::new().unwrap();
        write_archive(
            &dir.path().join("a.jar"),
            &[("client-extra.mixins.json", "{}")],
        );

        let settings = LoaderSettings {
            addons_dir: Some(dir.path().to_path_buf()),
            environment: Some(Environment::Server),
            ..LoaderSettings::default()
        };

        let registry = MixinConfigSet::new().into_shared();
        let mut classpath = RecordingClasspath::new();
        let (summary, _) =
            prelaunch(&settings, Environment::Client, &mut classpath, registry);

        assert_eq!(summary.configs_registered, 0);
        assert_eq!(summary.configs_skipped, 1);
    }
}
