//! User configuration store.
//!
//! One sectioned config file per user, chosen at startup:
//! - Local override: `~/hearth_config.ini`, used exclusively when present
//! - Shared: `<data dir>/hearth/hearth_config.ini`
//!
//! Loading order: resolve the path (renaming the legacy file and copying an
//! admin seed if needed), load it or bootstrap defaults, upgrade to the
//! current schema, then apply logging settings.

pub mod bootstrap;
pub mod environment;
pub mod error;
pub mod parser;
pub mod paths;
pub mod resolver;
pub mod schema;
pub mod section;
pub mod store;
pub mod upgrade;
pub mod user;
pub mod value;

pub use bootstrap::create_default;
pub use environment::sync_environment;
pub use error::StoreError;
pub use parser::{parse_ini_str, to_ini};
pub use paths::ConfigLocations;
pub use resolver::{Resolution, resolve_config_path};
pub use schema::{CORE_SECTION, CoreSettings};
pub use section::Section;
pub use store::ConfigStore;
pub use upgrade::{UpgradeReport, UpgradeStep, Upgrader, upgrade_user_config};
pub use user::{UserConfig, load_or_bootstrap};
pub use value::{FromValue, Value};
