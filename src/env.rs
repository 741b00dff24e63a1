//! Run-mode classification for the host process.
//!
//! The environment is fixed by the host before the loader runs and is only
//! consulted for filtering decisions; nothing in this crate mutates it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Process-wide run mode, established before prelaunch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Full interactive game client.
    Client,
    /// Dedicated server or other headless run mode.
    Server,
}

impl Environment {
    /// Returns true for the interactive client environment.
    #[must_use]
    pub fn is_client(self) -> bool {
        matches!(self, Self::Client)
    }

    /// Parses an environment name, accepting common server aliases.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "client" => Some(Self::Client),
            "server" | "dedicated" | "headless" => Some(Self::Server),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
        }
    }
}
