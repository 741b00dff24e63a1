//! Mixin-configuration registration for a single addon archive.
//!
//! Every archive entry runs through the same decision chain: non-config
//! entries are ignored, the reserved core configuration and client-only
//! configurations in non-client installs are skipped, and everything else is
//! appended to the shared registry one name at a time.

use std::path::Path;
use std::sync::PoisonError;

use tracing::{debug, info, warn};

use super::archive::{ArchiveError, open_archive};
use super::{CLIENT_ONLY_MARKER, MIXIN_CONFIG_SUFFIX, RESERVED_MIXIN_CONFIG};
use crate::env::Environment;
use crate::host::SharedMixinRegistry;

/// Why a configuration entry was withheld from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The name belongs to the Cobalt core configuration.
    Reserved,
    /// The name is client-only and this install is not a client.
    ClientOnly,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reserved => write!(f, "reserved core configuration"),
            Self::ClientOnly => write!(f, "client-only in a non-client install"),
        }
    }
}

/// Outcome of the decision chain for one archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDecision {
    /// Not a mixin configuration; nothing to do.
    Ignore,
    /// Eligible for registration.
    Register,
    /// A mixin configuration that must not be registered here.
    Skip(SkipReason),
}

/// Decides what to do with the archive entry `name` in `environment`.
///
/// The reserved-name check runs before the environment check, so the core
/// configuration is reported as reserved everywhere.
#[must_use]
pub fn classify_entry(name: &str, environment: Environment) -> EntryDecision {
    if !name.ends_with(MIXIN_CONFIG_SUFFIX) {
        return EntryDecision::Ignore;
    }
    if name == RESERVED_MIXIN_CONFIG {
        return EntryDecision::Skip(SkipReason::Reserved);
    }
    if name.contains(CLIENT_ONLY_MARKER) && !environment.is_client() {
        return EntryDecision::Skip(SkipReason::ClientOnly);
    }
    EntryDecision::Register
}

/// Per-archive registration outcome.
#[derive(Debug, Default)]
pub struct ArchiveReport {
    /// Names accepted by the registry, in archive order.
    pub registered: Vec<String>,
    /// Names withheld by the decision chain.
    pub skipped: Vec<(String, SkipReason)>,
    /// Names the registry refused.
    pub rejected: Vec<String>,
}

/// Registers eligible mixin configurations from addon archives.
pub struct Registrar {
    registry: SharedMixinRegistry,
    environment: Environment,
}

impl Registrar {
    /// Creates a registrar appending to `registry` for `environment`.
    #[must_use]
    pub fn new(registry: SharedMixinRegistry, environment: Environment) -> Self {
        Self {
            registry,
            environment,
        }
    }

    /// Install environment this registrar filters for.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Walks the entries of the archive at `path` and registers the eligible
    /// configuration names.
    ///
    /// The registry lock is taken per name, never across the walk. A refused
    /// name is recorded and the walk continues.
    pub fn register_from_archive(&self, path: &Path) -> Result<ArchiveReport, ArchiveError> {
        let archive = open_archive(path)?;
        let names: Vec<String> = archive.file_names().map(String::from).collect();

        let mut report = ArchiveReport::default();
        for name in names {
            match classify_entry(&name, self.environment) {
                EntryDecision::Ignore => {}
                EntryDecision::Skip(reason) => {
                    match reason {
                        SkipReason::Reserved => {
                            debug!("Skipping {} in {:?}", reason, path);
                        }
                        SkipReason::ClientOnly => {
                            info!(
                                "Skipping client-only mixin configuration '{}' in {:?}",
                                name, path
                            );
                        }
                    }
                    report.skipped.push((name, reason));
                }
                EntryDecision::Register => {
                    let result = {
                        let mut registry = self
                            .registry
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner);
                        registry.add_configuration(&name)
                    };
                    match result {
                        Ok(()) => {
                            info!("Registered mixin configuration '{}' from {:?}", name, path);
                            report.registered.push(name);
                        }
                        Err(err) => {
                            warn!(
                                "Registry refused configuration '{}' from {:?}: {}",
                                name, path, err
                            );
                            report.rejected.push(name);
                        }
                    }
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::MixinConfigSet;
    use proptest::prelude::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
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

    fn shared_set() -> (Arc<Mutex<MixinConfigSet>>, SharedMixinRegistry) {
        let set = Arc::new(Mutex::new(MixinConfigSet::new()));
        let registry: SharedMixinRegistry = set.clone();
        (set, registry)
    }

    #[test]
    fn test_ignores_non_config_entries() {
        for env in [Environment::Client, Environment::Server] {
            assert_eq!(classify_entry("foo.json", env), EntryDecision::Ignore);
            assert_eq!(classify_entry("mixins.json", env), EntryDecision::Ignore);
            assert_eq!(
                classify_entry("foo.mixins.json.bak", env),
                EntryDecision::Ignore
            );
            assert_eq!(classify_entry("", env), EntryDecision::Ignore);
        }
    }

    #[test]
    fn test_registers_plain_config_everywhere() {
        for env in [Environment::Client, Environment::Server] {
            assert_eq!(
                classify_entry("foo.mixins.json", env),
                EntryDecision::Register
            );
        }
    }

    #[test]
    fn test_reserved_config_always_skipped() {
        for env in [Environment::Client, Environment::Server] {
            assert_eq!(
                classify_entry("cobalt.mixins.json", env),
                EntryDecision::Skip(SkipReason::Reserved)
            );
        }
    }

    #[test]
    fn test_client_only_depends_on_environment() {
        assert_eq!(
            classify_entry("client-extra.mixins.json", Environment::Client),
            EntryDecision::Register
        );
        assert_eq!(
            classify_entry("client-extra.mixins.json", Environment::Server),
            EntryDecision::Skip(SkipReason::ClientOnly)
        );
    }

    #[test]
    fn test_client_marker_matches_anywhere_in_name() {
        assert_eq!(
            classify_entry("myclientpatch.mixins.json", Environment::Server),
            EntryDecision::Skip(SkipReason::ClientOnly)
        );
    }

    #[test]
    fn test_environment_accessor() {
        let (_, registry) = shared_set();
        let registrar = Registrar::new(registry, Environment::Server);
        assert_eq!(registrar.environment(), Environment::Server);
    }

    #[test]
    fn test_register_from_archive_server() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.jar");
        write_archive(
            &path,
            &[
                ("foo.mixins.json", "{}"),
                ("client-extra.mixins.json", "{}"),
                ("cobalt.mixins.json", "{}"),
                ("readme.txt", "hello"),
            ],
        );

        let (set, registry) = shared_set();
        let registrar = Registrar::new(registry, Environment::Server);
        let report = registrar.register_from_archive(&path).unwrap();

        assert_eq!(report.registered, ["foo.mixins.json"]);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.rejected.is_empty());
        assert_eq!(set.lock().unwrap().names(), ["foo.mixins.json"]);
    }

    #[test]
    fn test_register_from_archive_client() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.jar");
        write_archive(
            &path,
            &[
                ("foo.mixins.json", "{}"),
                ("client-extra.mixins.json", "{}"),
            ],
        );

        let (set, registry) = shared_set();
        let registrar = Registrar::new(registry, Environment::Client);
        let report = registrar.register_from_archive(&path).unwrap();

        assert_eq!(
            report.registered,
            ["foo.mixins.json", "client-extra.mixins.json"]
        );
        assert_eq!(set.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_nested_entries_keep_full_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.jar");
        write_archive(&path, &[("mixins/deep.mixins.json", "{}")]);

        let (set, registry) = shared_set();
        let registrar = Registrar::new(registry, Environment::Client);
        let report = registrar.register_from_archive(&path).unwrap();

        assert_eq!(report.registered, ["mixins/deep.mixins.json"]);
        assert!(set.lock().unwrap().contains("mixins/deep.mixins.json"));
    }

    #[test]
    fn test_refused_name_does_not_stop_walk() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.jar");
        let second = dir.path().join("b.jar");
        write_archive(&first, &[("foo.mixins.json", "{}")]);
        write_archive(
            &second,
            &[("foo.mixins.json", "{}"), ("bar.mixins.json", "{}")],
        );

        let (set, registry) = shared_set();
        let registrar = Registrar::new(registry, Environment::Server);
        registrar.register_from_archive(&first).unwrap();
        let report = registrar.register_from_archive(&second).unwrap();

        assert_eq!(report.rejected, ["foo.mixins.json"]);
        assert_eq!(report.registered, ["bar.mixins.json"]);
        assert_eq!(
            set.lock().unwrap().names(),
            ["foo.mixins.json", "bar.mixins.json"]
        );
    }

    #[test]
    fn test_unreadable_archive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jar");
        std::fs::write(&path, b"garbage").unwrap();

        let (_, registry) = shared_set();
        let registrar = Registrar::new(registry, Environment::Client);
        assert!(registrar.register_from_archive(&path).is_err());
    }

    proptest! {
        #[test]
        fn prop_non_config_names_are_ignored(name in "[a-z./-]{0,40}") {
            prop_assume!(!name.ends_with(MIXIN_CONFIG_SUFFIX));
            for env in [Environment::Client, Environment::Server] {
                prop_assert_eq!(classify_entry(&name, env), EntryDecision::Ignore);
            }
        }

        #[test]
        fn prop_server_never_registers_client_marked(stem in "[a-z-]{0,20}") {
            let name = format!("{stem}client{stem}.mixins.json");
            prop_assert_ne!(
                classify_entry(&name, Environment::Server),
                EntryDecision::Register
            );
        }

        #[test]
        fn prop_client_registers_unreserved_configs(stem in "[a-z][a-z0-9-]{0,20}") {
            let name = format!("{stem}.mixins.json");
            prop_assume!(name != RESERVED_MIXIN_CONFIG);
            prop_assert_eq!(
                classify_entry(&name, Environment::Client),
                EntryDecision::Register
            );
        }
    }
}
