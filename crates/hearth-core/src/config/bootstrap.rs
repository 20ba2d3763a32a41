//! Default config bootstrap.

use std::path::Path;

use crate::fs::touch;

use super::error::StoreError;
use super::schema::{CORE_SECTION, CoreSettings};
use super::store::ConfigStore;

/// Build a store at `path` with the hardcoded `core` defaults and save it.
///
/// Every `core` value is overwritten; other sections in an existing file
/// are kept. If `path` cannot be created or read, the defaults live in an
/// in-memory store instead, so the caller always gets a usable store.
pub fn create_default(path: &Path) -> ConfigStore {
    tracing::debug!(path = %path.display(), "creating default config file");

    let mut store = match open_for_bootstrap(path) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "can not create config file; using in-memory defaults"
            );
            ConfigStore::in_memory()
        }
    };

    apply_defaults(&mut store);

    match store.save() {
        Ok(()) => tracing::debug!(path = %path.display(), "default config saved"),
        Err(e) => tracing::error!(error = %e, "can not save default config"),
    }
    store
}

/// Write every `core` default into `store`, overwriting existing values.
pub fn apply_defaults(store: &mut ConfigStore) {
    CoreSettings::default().write_to(store.add_section(CORE_SECTION));
}

fn open_for_bootstrap(path: &Path) -> Result<ConfigStore, StoreError> {
    touch(path).map_err(|e| StoreError::io(path, e))?;
    ConfigStore::load(path)
}
