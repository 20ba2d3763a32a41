//! Applies logging settings from the `core` section to the process.

use crate::logging::LogControl;
use crate::types::ExecParams;

use super::error::StoreError;
use super::schema::{CORE_SECTION, DEBUG, FILE_LOGGING, VERBOSE};
use super::store::ConfigStore;

/// Push `debug`, `verbose` and `filelogging` from `store` into `log`.
///
/// Forced debug mode beats the stored `debug` flag, which beats `verbose`.
/// Read failures are logged at debug level and otherwise ignored.
pub fn sync_environment(store: &ConfigStore, exec: ExecParams, log: &dyn LogControl) {
    log.reset_level();
    if exec.forced_debug_mode {
        log.set_debug_mode();
    }

    if let Err(e) = apply_user_settings(store, exec, log) {
        tracing::debug!(error = %e, "error updating environment per user config");
    }
}

fn apply_user_settings(
    store: &ConfigStore,
    exec: ExecParams,
    log: &dyn LogControl,
) -> Result<(), StoreError> {
    let core = store.get_section(CORE_SECTION)?;

    if !exec.forced_debug_mode {
        if core.get_as::<bool>(DEBUG)? {
            log.set_debug_mode();
            tracing::debug!("debug mode is enabled in user settings");
        } else if core.get_as::<bool>(VERBOSE)? {
            log.set_verbose_mode();
        }
    }

    log.set_file_logging(core.get_as::<bool>(FILE_LOGGING)?);
    Ok(())
}
