//! Cobalt addon loader.
//!
//! Prelaunch shim that discovers addon archives dropped into the Cobalt
//! configuration directory and wires them into the host runtime before the
//! game boots: each archive is added to the launch classpath and its mixin
//! configurations are registered with the host mixin subsystem.
//!
//! # Architecture
//!
//! - **addons**: Archive discovery, descriptor metadata, and the two
//!   prelaunch passes
//! - **env**: Client/server install distinction
//! - **host**: Traits the embedding runtime implements
//! - **logging**: Timestamped file logging with retention cleanup
//! - **settings**: Optional `loader.toml` configuration
//!
//! # Usage
//!
//! ```no_run
//! use cobalt_loader::addons::prelaunch;
//! use cobalt_loader::env::Environment;
//! use cobalt_loader::host::{MixinConfigSet, RecordingClasspath};
//! use cobalt_loader::settings::LoaderSettings;
//!
//! let settings = LoaderSettings::load_or_default();
//! let registry = MixinConfigSet::new().into_shared();
//! let mut classpath = RecordingClasspath::new();
//! let (summary, index) =
//!     prelaunch(&settings, Environment::Client, &mut classpath, registry);
//! println!("registered {} configuration(s)", summary.configs_registered);
//! println!("{} addon(s) declared metadata", index.len());
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod addons;
pub mod env;
pub mod host;
pub mod logging;
pub mod settings;

// Re-export main types
pub use addons::{AddonIndex, AddonLoader, LoadSummary, Registrar, Scanner, prelaunch};
pub use env::Environment;
pub use host::{ClasspathExtender, MixinConfigSet, MixinRegistry, SharedMixinRegistry};
pub use settings::LoaderSettings;
