//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{ConfigLocations, UserConfig};
use crate::logging::LogControl;
use crate::types::ExecParams;

/// Unified application context.
///
/// Holds every input the config layer needs from the host process.
/// Frontends create this once and open the [`UserConfig`] from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    locations: ConfigLocations,
    exec: ExecParams,
    install_dir: PathBuf,
}

impl AppContext {
    /// Create a new context with explicit paths.
    pub fn new(locations: ConfigLocations, exec: ExecParams, install_dir: PathBuf) -> Self {
        Self {
            locations,
            exec,
            install_dir,
        }
    }

    /// Create a context from the process environment.
    ///
    /// The install directory is the running executable's directory.
    pub fn from_env(exec: ExecParams) -> anyhow::Result<Self> {
        let locations = ConfigLocations::from_env()?;
        let install_dir = std::env::current_exe()?
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow::anyhow!("Could not determine install directory"))?;
        Ok(Self::new(locations, exec, install_dir))
    }

    pub fn locations(&self) -> &ConfigLocations {
        &self.locations
    }

    pub fn exec_params(&self) -> ExecParams {
        self.exec
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Extensions shipped with the host.
    pub fn builtin_extensions_dir(&self) -> PathBuf {
        self.install_dir.join("extensions")
    }

    /// Open the user config for this process.
    pub fn user_config(&self, log: Arc<dyn LogControl>) -> UserConfig {
        UserConfig::open(self, log)
    }
}
