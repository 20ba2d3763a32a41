//! Config store for loading and saving the user config file.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::StoreError;
use super::parser::{self, Sections};
use super::section::Section;
use super::value::Value;

/// Path reported in errors for stores without a backing file.
const MEMORY_PATH: &str = "<memory>";

/// In-memory configuration: every section of one config file.
///
/// A store is bound to the path it was loaded from. Mutations stay in
/// memory until [`ConfigStore::save`] is called.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    sections: Sections,
}

impl ConfigStore {
    /// A store with no backing file. Saving it is an error.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load `path`. A missing file yields an empty store bound to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    path: Some(path),
                    sections: Sections::new(),
                });
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let sections = parser::parse_ini_str(&content).map_err(|e| e.at(&path))?;
        Ok(Self {
            path: Some(path),
            sections,
        })
    }

    /// Parse config text into an in-memory store.
    pub fn parse(content: &str) -> Result<Self, StoreError> {
        let sections =
            parser::parse_ini_str(content).map_err(|e| e.at(MEMORY_PATH))?;
        Ok(Self {
            path: None,
            sections,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the store to its backing file (temp file + rename).
    ///
    /// The parent directory must already exist. A store without a backing
    /// file fails with [`StoreError::Io`].
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = self.path.as_ref() else {
            return Err(StoreError::io(
                MEMORY_PATH,
                std::io::Error::new(std::io::ErrorKind::NotFound, "store has no backing file"),
            ));
        };

        let content = self.to_ini_string();
        let tmp_path = tmp_path_for(path);
        fs::write(&tmp_path, content).map_err(|e| StoreError::io(&tmp_path, e))?;

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(path, e));
        }
        Ok(())
    }

    pub fn to_ini_string(&self) -> String {
        parser::to_ini(&self.sections)
    }

    /// Stable content hash used for change detection.
    pub fn fingerprint(&self) -> String {
        blake3::hash(self.to_ini_string().as_bytes())
            .to_hex()
            .to_string()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Strict section lookup.
    pub fn get_section(&self, name: &str) -> Result<&Section, StoreError> {
        self.sections
            .get(name)
            .ok_or_else(|| StoreError::SectionNotFound {
                section: name.to_string(),
            })
    }

    /// Return the section called `name`, creating it if needed.
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        self.sections
            .entry(name.to_string())
            .or_insert_with(|| Section::new(name))
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.remove(name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Value of `section.key`, or `default` if either is missing.
    pub fn get(&self, section: &str, key: &str, default: impl Into<Value>) -> Value {
        match self.sections.get(section).and_then(|s| s.get(key)) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Set `section.key`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        self.add_section(section).set(key, value);
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_never_fails_on_missing_section_or_key() {
        let mut store = ConfigStore::in_memory();
        assert_eq!(store.get("nope", "debug", false), Value::Bool(false));

        store.add_section("core");
        assert_eq!(store.get("core", "debug", 3), Value::Int(3));
    }

    #[test]
    fn test_set_creates_section() {
        let mut store = ConfigStore::in_memory();
        store.set("ext", "disabled", true);
        assert!(store.has_section("ext"));
        assert_eq!(store.get("ext", "disabled", false), Value::Bool(true));
    }

    #[test]
    fn test_add_section_is_idempotent() {
        let mut store = ConfigStore::in_memory();
        store.add_section("core").set("debug", true);
        store.add_section("core");

        assert_eq!(store.sections().count(), 1);
        assert_eq!(store.get("core", "debug", false), Value::Bool(true));
    }

    #[test]
    fn test_get_section_missing_is_not_found() {
        let store = ConfigStore::in_memory();
        assert!(store.get_section("core").unwrap_err().is_not_found());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut store = ConfigStore::in_memory();
        let empty = store.fingerprint();
        store.set("core", "debug", true);
        let changed = store.fingerprint();

        assert_ne!(empty, changed);
        assert_eq!(changed.len(), 64);
        assert_eq!(changed, store.clone().fingerprint());
    }

    #[test]
    fn test_in_memory_save_is_io_error() {
        let mut store = ConfigStore::in_memory();
        store.set("core", "debug", true);
        let err = store.save().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::NotFound
        ));
        assert!(store.path().is_none());
    }

    #[test]
    fn test_remove_section() {
        let mut store = ConfigStore::in_memory();
        store.add_section("ext");
        assert!(store.remove_section("ext").is_some());
        assert!(!store.has_section("ext"));
        assert!(store.remove_section("ext").is_none());
    }
}
