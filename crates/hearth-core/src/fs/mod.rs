//! Filesystem primitives shared across features.

pub mod expand;

pub use expand::{ExpandError, expand_env_vars};

use std::fs::OpenOptions;
use std::path::Path;

/// Create `path` as an empty file if it does not exist. Existing content is kept.
pub fn touch(path: &Path) -> std::io::Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
}
