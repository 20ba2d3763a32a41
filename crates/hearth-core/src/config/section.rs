//! A named group of options inside a [`ConfigStore`](super::ConfigStore).

use std::collections::BTreeMap;

use super::error::StoreError;
use super::value::{FromValue, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    name: String,
    options: BTreeMap<String, Value>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Value of `key`, or `default` when the option is not set.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.options
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// Strict lookup; a missing option is a [`StoreError::NotFound`].
    pub fn require(&self, key: &str) -> Result<&Value, StoreError> {
        self.options.get(key).ok_or_else(|| StoreError::NotFound {
            section: self.name.clone(),
            key: key.to_string(),
        })
    }

    /// Strict typed lookup.
    pub fn get_as<T: FromValue>(&self, key: &str) -> Result<T, StoreError> {
        let value = self.require(key)?;
        T::from_value(value).ok_or_else(|| StoreError::TypeMismatch {
            key: key.to_string(),
            expected: T::TYPE_NAME,
            found: value.type_name(),
        })
    }

    /// Set `key`, replacing any previous value. Returns the old value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.options.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.options.remove(key)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing_key_is_not_found() {
        let section = Section::new("core");
        let err = section.require("debug").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("debug"));
    }

    #[test]
    fn test_get_or_returns_default_when_absent() {
        let mut section = Section::new("core");
        assert_eq!(section.get_or("verbose", true), Value::Bool(true));

        section.set("verbose", false);
        assert_eq!(section.get_or("verbose", true), Value::Bool(false));
    }

    #[test]
    fn test_get_as_reports_type_mismatch() {
        let mut section = Section::new("core");
        section.set("startuplogtimeout", "ten");

        let err = section.get_as::<i64>("startuplogtimeout").unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch {
                expected: "int",
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut section = Section::new("core");
        section.set("Debug", true);
        assert!(section.has_option("Debug"));
        assert!(!section.has_option("debug"));
    }

    #[test]
    fn test_set_overwrites_and_changes_type() {
        let mut section = Section::new("core");
        section.set("startuplogtimeout", 10);
        let old = section.set("startuplogtimeout", 2.5);
        assert_eq!(old, Some(Value::Int(10)));
        assert_eq!(section.get("startuplogtimeout"), Some(&Value::Float(2.5)));
    }
}
