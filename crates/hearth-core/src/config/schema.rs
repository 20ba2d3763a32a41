//! Typed view of the `core` section and its hardcoded defaults.

use serde::Serialize;

use super::error::StoreError;
use super::section::Section;
use super::value::{FromValue, Value};

/// Name of the section holding host settings.
pub const CORE_SECTION: &str = "core";

pub const CHECK_UPDATES: &str = "checkupdates";
pub const AUTO_UPDATE: &str = "autoupdate";
pub const VERBOSE: &str = "verbose";
pub const DEBUG: &str = "debug";
pub const FILE_LOGGING: &str = "filelogging";
pub const STARTUP_LOG_TIMEOUT: &str = "startuplogtimeout";
pub const USER_EXTENSIONS: &str = "userextensions";
pub const COMPILE_CSHARP: &str = "compilecsharp";
pub const COMPILE_VB: &str = "compilevb";
pub const LOAD_BETA: &str = "loadbeta";
pub const ROCKET_MODE: &str = "rocketmode";

/// Settings stored in the `core` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreSettings {
    pub checkupdates: bool,
    pub autoupdate: bool,
    pub verbose: bool,
    pub debug: bool,
    pub filelogging: bool,
    pub startuplogtimeout: i64,
    pub userextensions: Vec<String>,
    pub compilecsharp: bool,
    pub compilevb: bool,
    pub loadbeta: bool,
    pub rocketmode: bool,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            checkupdates: false,
            autoupdate: false,
            verbose: true,
            debug: false,
            filelogging: true,
            startuplogtimeout: 10,
            userextensions: Vec::new(),
            compilecsharp: true,
            compilevb: true,
            loadbeta: false,
            rocketmode: false,
        }
    }
}

impl CoreSettings {
    /// Read settings from a `core` section.
    ///
    /// Absent keys take their default; a key holding the wrong type is an error.
    pub fn from_section(section: &Section) -> Result<Self, StoreError> {
        let d = Self::default();
        Ok(Self {
            checkupdates: read_or(section, CHECK_UPDATES, d.checkupdates)?,
            autoupdate: read_or(section, AUTO_UPDATE, d.autoupdate)?,
            verbose: read_or(section, VERBOSE, d.verbose)?,
            debug: read_or(section, DEBUG, d.debug)?,
            filelogging: read_or(section, FILE_LOGGING, d.filelogging)?,
            startuplogtimeout: read_or(section, STARTUP_LOG_TIMEOUT, d.startuplogtimeout)?,
            userextensions: read_or(section, USER_EXTENSIONS, d.userextensions)?,
            compilecsharp: read_or(section, COMPILE_CSHARP, d.compilecsharp)?,
            compilevb: read_or(section, COMPILE_VB, d.compilevb)?,
            loadbeta: read_or(section, LOAD_BETA, d.loadbeta)?,
            rocketmode: read_or(section, ROCKET_MODE, d.rocketmode)?,
        })
    }

    /// Key/value pairs in schema order.
    pub fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            (CHECK_UPDATES, self.checkupdates.into()),
            (AUTO_UPDATE, self.autoupdate.into()),
            (VERBOSE, self.verbose.into()),
            (DEBUG, self.debug.into()),
            (FILE_LOGGING, self.filelogging.into()),
            (STARTUP_LOG_TIMEOUT, self.startuplogtimeout.into()),
            (USER_EXTENSIONS, self.userextensions.clone().into()),
            (COMPILE_CSHARP, self.compilecsharp.into()),
            (COMPILE_VB, self.compilevb.into()),
            (LOAD_BETA, self.loadbeta.into()),
            (ROCKET_MODE, self.rocketmode.into()),
        ]
    }

    /// Write every setting into `section`, overwriting existing values.
    pub fn write_to(&self, section: &mut Section) {
        for (key, value) in self.entries() {
            section.set(key, value);
        }
    }
}

/// Schema entry for a recognized `core` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    List,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::List => "list",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ValueKind::Bool, Value::Bool(_))
                | (ValueKind::Int, Value::Int(_))
                | (ValueKind::List, Value::List(_))
        )
    }
}

/// Recognized `core` keys with their declared types.
pub fn core_schema() -> [(&'static str, ValueKind); 11] {
    [
        (CHECK_UPDATES, ValueKind::Bool),
        (AUTO_UPDATE, ValueKind::Bool),
        (VERBOSE, ValueKind::Bool),
        (DEBUG, ValueKind::Bool),
        (FILE_LOGGING, ValueKind::Bool),
        (STARTUP_LOG_TIMEOUT, ValueKind::Int),
        (USER_EXTENSIONS, ValueKind::List),
        (COMPILE_CSHARP, ValueKind::Bool),
        (COMPILE_VB, ValueKind::Bool),
        (LOAD_BETA, ValueKind::Bool),
        (ROCKET_MODE, ValueKind::Bool),
    ]
}

fn read_or<T: FromValue>(section: &Section, key: &str, default: T) -> Result<T, StoreError> {
    if section.has_option(key) {
        section.get_as(key)
    } else {
        Ok(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entries_cover_schema() {
        let defaults = CoreSettings::default();
        let entries = defaults.entries();
        assert_eq!(entries.len(), 11);
        for ((key, value), (schema_key, kind)) in entries.iter().zip(core_schema()) {
            assert_eq!(*key, schema_key);
            assert!(kind.matches(value), "{key} should be {}", kind.name());
        }
    }

    #[test]
    fn test_from_section_fills_absent_keys() {
        let mut section = Section::new(CORE_SECTION);
        section.set(ROCKET_MODE, true);

        let settings = CoreSettings::from_section(&section).unwrap();
        assert!(settings.rocketmode);
        assert_eq!(settings.startuplogtimeout, 10);
        assert!(settings.verbose);
    }

    #[test]
    fn test_from_section_rejects_wrong_type() {
        let mut section = Section::new(CORE_SECTION);
        section.set(DEBUG, "yes please");
        assert!(matches!(
            CoreSettings::from_section(&section),
            Err(StoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_write_to_roundtrips() {
        let mut settings = CoreSettings::default();
        settings.userextensions = vec!["$HOME/ext".to_string()];
        settings.debug = true;

        let mut section = Section::new(CORE_SECTION);
        settings.write_to(&mut section);

        assert_eq!(section.len(), 11);
        assert_eq!(CoreSettings::from_section(&section).unwrap(), settings);
    }
}
