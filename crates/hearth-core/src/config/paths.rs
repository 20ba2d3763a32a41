//! Config path resolution helpers.

use std::path::{Path, PathBuf};

use crate::types::ConfigOrigin;

pub const APP_NAME: &str = "hearth";
pub const CONFIG_FILE_ID: &str = "config";
pub const CONFIG_FILE_EXT: &str = "ini";

/// Directories the resolver looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
    home_dir: PathBuf,
    app_dir: PathBuf,
    admin_dir: PathBuf,
    username: Option<String>,
}

impl ConfigLocations {
    pub fn from_env() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let app_dir = dirs::data_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| home_dir.join(format!(".{}", APP_NAME)));
        let username = std::env::var("USERNAME")
            .or_else(|_| std::env::var("USER"))
            .ok()
            .filter(|name| !name.trim().is_empty());

        Ok(Self::from_paths(home_dir, app_dir, default_admin_dir(), username))
    }

    pub fn from_paths(
        home_dir: PathBuf,
        app_dir: PathBuf,
        admin_dir: PathBuf,
        username: Option<String>,
    ) -> Self {
        Self {
            home_dir,
            app_dir,
            admin_dir,
            username,
        }
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    pub fn admin_dir(&self) -> &Path {
        &self.admin_dir
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// `<home>/hearth_config.ini`
    pub fn local_override_file(&self) -> PathBuf {
        self.home_dir.join(universal_file_name(CONFIG_FILE_ID, CONFIG_FILE_EXT))
    }

    /// `<app_dir>/hearth_<file_id>.<ext>`, shared by every host version.
    pub fn universal_data_file(&self, file_id: &str, file_ext: &str) -> PathBuf {
        self.app_dir.join(universal_file_name(file_id, file_ext))
    }

    pub fn shared_config_file(&self) -> PathBuf {
        self.universal_data_file(CONFIG_FILE_ID, CONFIG_FILE_EXT)
    }

    /// Older releases put the username into the file name.
    pub fn legacy_config_file(&self) -> Option<PathBuf> {
        self.username.as_ref().map(|user| {
            self.app_dir.join(format!(
                "{}_{}_{}.{}",
                APP_NAME, user, CONFIG_FILE_ID, CONFIG_FILE_EXT
            ))
        })
    }

    pub fn config_path_for_origin(&self, origin: ConfigOrigin) -> PathBuf {
        match origin {
            ConfigOrigin::LocalOverride => self.local_override_file(),
            ConfigOrigin::Shared => self.shared_config_file(),
        }
    }
}

fn universal_file_name(file_id: &str, file_ext: &str) -> String {
    format!("{}_{}.{}", APP_NAME, file_id, file_ext)
}

/// True if `path` has the config extension (ASCII case-insensitive).
pub fn has_config_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CONFIG_FILE_EXT))
}

fn default_admin_dir() -> PathBuf {
    if cfg!(windows) {
        std::env::var_os("PROGRAMDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"))
            .join(APP_NAME)
    } else {
        PathBuf::from("/etc").join(APP_NAME)
    }
}
