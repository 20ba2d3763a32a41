//! Shared core types used across configuration layers.

use serde::{Deserialize, Serialize};

/// Where the active config file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigOrigin {
    /// Override file in the user's home directory.
    LocalOverride,
    /// Per-user file in the application data directory.
    Shared,
}

/// Runtime flags supplied by the host process, never read from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecParams {
    /// Debug logging was forced by the host; stored debug/verbose are ignored.
    pub forced_debug_mode: bool,
}

impl ExecParams {
    pub const FORCED_DEBUG_ENV: &'static str = "HEARTH_FORCED_DEBUG";

    /// Read flags from the process environment.
    pub fn from_env() -> Self {
        let forced_debug_mode = std::env::var(Self::FORCED_DEBUG_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self { forced_debug_mode }
    }
}
