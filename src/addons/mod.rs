//! Addon loading for the Cobalt client.
//!
//! Players drop addon archives into the Cobalt configuration directory and
//! the loader activates them before the game boots: every archive is exposed
//! to the host class loader, then scanned for mixin-configuration entries to
//! register with the host mixin subsystem.
//!
//! # Architecture
//!
//! - **scanner**: Directory discovery of `*.jar` archives
//! - **archive**: Shared archive-open helper and its error type
//! - **descriptor**: Optional `cobalt.addon.json` metadata
//! - **registrar**: Per-archive mixin-configuration filtering and registration
//! - **loader**: Prelaunch orchestration across both passes
//!
//! # Usage
//!
//! ```ignore
//! use cobalt_loader::addons::prelaunch;
//! use cobalt_loader::host::MixinConfigSet;
//! use cobalt_loader::settings::LoaderSettings;
//!
//! let settings = LoaderSettings::load_or_default();
//! let registry = MixinConfigSet::new().into_shared();
//! let (summary, index) = prelaunch(&settings, detected_env, &mut classpath, registry);
//! ```

use std::path::{Path, PathBuf};

mod archive;
mod descriptor;
mod loader;
mod registrar;
mod scanner;

pub use archive::ArchiveError;
pub use descriptor::{AddonDescriptor, DescriptorError, read_descriptor};
pub use loader::{AddonIndex, AddonLoader, IndexedAddon, LoadSummary, prelaunch};
pub use registrar::{ArchiveReport, EntryDecision, Registrar, SkipReason, classify_entry};
pub use scanner::{ScanError, Scanner};

/// Extension an archive must carry to be picked up by the scanner.
pub const ARCHIVE_EXTENSION: &str = "jar";

/// Suffix identifying a mixin-configuration entry inside an archive.
pub const MIXIN_CONFIG_SUFFIX: &str = ".mixins.json";

/// Configuration name owned by the Cobalt core; addons may not re-register it.
pub const RESERVED_MIXIN_CONFIG: &str = "cobalt.mixins.json";

/// Substring marking a configuration as applicable to client installs only.
pub const CLIENT_ONLY_MARKER: &str = "client";

/// Archive entry holding the optional addon descriptor.
pub const DESCRIPTOR_ENTRY: &str = "cobalt.addon.json";

/// Addon id owned by the Cobalt core itself.
pub const RESERVED_ADDON_ID: &str = "cobalt";

/// Upper bound on descriptor size, in bytes.
pub const MAX_DESCRIPTOR_SIZE: u64 = 64 * 1024;

/// Default configuration root of the Cobalt client.
pub const DEFAULT_CONFIG_ROOT: &str = "config/cobalt";

/// Returns the default addon directory under [`DEFAULT_CONFIG_ROOT`].
#[must_use]
pub fn default_addons_dir() -> PathBuf {
    Path::new(DEFAULT_CONFIG_ROOT).join("addons")
}
