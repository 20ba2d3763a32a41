//! The user config object owned by the host application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::context::AppContext;
use crate::fs::expand_env_vars;
use crate::logging::LogControl;
use crate::types::ExecParams;

use super::bootstrap::create_default;
use super::environment::sync_environment;
use super::error::StoreError;
use super::resolver::{Resolution, resolve_config_path};
use super::schema::{CORE_SECTION, CoreSettings, USER_EXTENSIONS};
use super::store::ConfigStore;
use super::upgrade::upgrade_user_config;

/// Read/write access to the user configuration.
///
/// Created once by the host at startup and passed to whatever needs it.
/// Logging state follows the stored settings after construction and after
/// every [`UserConfig::save_changes`].
pub struct UserConfig {
    store: ConfigStore,
    exec: ExecParams,
    log: Arc<dyn LogControl>,
    builtin_extensions_dir: PathBuf,
    resolution: Option<Resolution>,
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("config_file", &self.config_file())
            .field("exec", &self.exec)
            .field("builtin_extensions_dir", &self.builtin_extensions_dir)
            .finish_non_exhaustive()
    }
}

impl UserConfig {
    /// Run the startup sequence: resolve, load or bootstrap, upgrade, sync.
    pub fn open(ctx: &AppContext, log: Arc<dyn LogControl>) -> Self {
        let resolution = resolve_config_path(ctx.locations());
        let store = load_or_bootstrap(&resolution.path);

        let mut config = Self::from_store(
            store,
            ctx.exec_params(),
            log,
            ctx.builtin_extensions_dir(),
        );
        config.resolution = Some(resolution);
        config
    }

    /// Wrap an already loaded store. Applies logging settings immediately.
    pub fn from_store(
        store: ConfigStore,
        exec: ExecParams,
        log: Arc<dyn LogControl>,
        builtin_extensions_dir: PathBuf,
    ) -> Self {
        let config = Self {
            store,
            exec,
            log,
            builtin_extensions_dir,
            resolution: None,
        };
        config.update_env();
        config
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.store.path()
    }

    /// How the config file was chosen, when opened through [`UserConfig::open`].
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Changes are not written until [`UserConfig::save_changes`].
    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    /// Typed `core` settings.
    pub fn core(&self) -> Result<CoreSettings, StoreError> {
        CoreSettings::from_section(self.store.get_section(CORE_SECTION)?)
    }

    /// Content fingerprint, for change detection by collaborators.
    pub fn get_config_version(&self) -> String {
        self.store.fingerprint()
    }

    /// Built-in extensions directory followed by the user's directories.
    pub fn get_ext_root_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.builtin_extensions_dir.clone()];
        dirs.extend(self.get_thirdparty_ext_root_dirs());
        dirs
    }

    /// Directories listed in `core.userextensions`, variables expanded.
    ///
    /// Entries that fail to expand are logged and left out.
    pub fn get_thirdparty_ext_root_dirs(&self) -> Vec<PathBuf> {
        let entries = match self
            .store
            .get_section(CORE_SECTION)
            .and_then(|core| core.get_as::<Vec<String>>(USER_EXTENSIONS))
        {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(error = %e, "error reading list of user extension folders");
                return Vec::new();
            }
        };

        entries
            .iter()
            .filter_map(|entry| match expand_env_vars(entry) {
                Ok(expanded) => Some(PathBuf::from(expanded)),
                Err(e) => {
                    tracing::error!(entry = %entry, error = %e, "skipping user extension folder");
                    None
                }
            })
            .collect()
    }

    /// Save to the config file, then re-apply logging settings.
    ///
    /// A failed save is logged here and returned so the caller may report
    /// it; the in-memory settings stay authoritative either way.
    pub fn save_changes(&mut self) -> Result<(), StoreError> {
        let result = self.store.save();
        if let Err(e) = &result {
            tracing::error!(
                path = ?self.config_file(),
                error = %e,
                "can not save user config"
            );
        }
        self.update_env();
        result
    }

    fn update_env(&self) {
        sync_environment(&self.store, self.exec, self.log.as_ref());
    }
}

/// Load `path`, bootstrapping defaults when it is missing or unreadable,
/// then bring it to the current schema.
pub fn load_or_bootstrap(path: &Path) -> ConfigStore {
    let mut store = if path.exists() {
        match ConfigStore::load(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "can not read existing config file"
                );
                create_default(path)
            }
        }
    } else {
        create_default(path)
    };

    upgrade_user_config(&mut store);
    store
}
