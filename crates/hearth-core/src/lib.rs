//! Hearth Core Library
//!
//! Locates, loads, upgrades and saves the per-user configuration file of
//! the host application, and keeps logging state in step with it.

pub mod config;
pub mod context;
pub mod fs;
pub mod logging;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{
        CORE_SECTION, ConfigLocations, ConfigStore, CoreSettings, Section, StoreError, UserConfig,
        Value,
    };

    // Context
    pub use crate::context::AppContext;

    // Logging
    pub use crate::logging::{LogControl, LogLevel, LogSwitch};

    // Types
    pub use crate::types::{ConfigOrigin, ExecParams};
}
