//! Forward migration of loaded config stores.
//!
//! Each step checks whether the store still needs it (`applies`) and then
//! transforms a copy of the store (`apply`). A failing step is logged and
//! skipped; the store keeps the state from before that step. Steps detect
//! their own work, so running the upgrader again is a no-op.

use thiserror::Error;

use super::schema::{CORE_SECTION, CoreSettings, ValueKind, core_schema};
use super::store::ConfigStore;
use super::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpgradeError {
    #[error("cannot convert '{key}' from {found} to {expected}")]
    Coerce {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

pub type ApplyFn = fn(ConfigStore) -> Result<ConfigStore, UpgradeError>;

#[derive(Debug, Clone, Copy)]
pub struct UpgradeStep {
    pub name: &'static str,
    pub applies: fn(&ConfigStore) -> bool,
    pub apply: ApplyFn,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpgradeReport {
    pub applied: Vec<&'static str>,
    pub skipped: Vec<(&'static str, String)>,
}

impl UpgradeReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.skipped.is_empty()
    }
}

/// Ordered list of upgrade steps.
#[derive(Debug, Clone)]
pub struct Upgrader {
    steps: Vec<UpgradeStep>,
}

impl Default for Upgrader {
    fn default() -> Self {
        Self::new(vec![
            UpgradeStep {
                name: "core-section",
                applies: lacks_core_section,
                apply: add_core_section,
            },
            UpgradeStep {
                name: "core-value-types",
                applies: has_mistyped_core_values,
                apply: coerce_core_values,
            },
            UpgradeStep {
                name: "core-defaults",
                applies: lacks_core_defaults,
                apply: fill_core_defaults,
            },
        ])
    }
}

impl Upgrader {
    pub fn new(steps: Vec<UpgradeStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[UpgradeStep] {
        &self.steps
    }

    /// Apply every pending step in order. Does not save.
    pub fn run(&self, store: &mut ConfigStore) -> UpgradeReport {
        let mut report = UpgradeReport::default();
        for step in &self.steps {
            if !(step.applies)(store) {
                continue;
            }
            match (step.apply)(store.clone()) {
                Ok(upgraded) => {
                    tracing::debug!(step = step.name, "applied config upgrade step");
                    *store = upgraded;
                    report.applied.push(step.name);
                }
                Err(e) => {
                    tracing::warn!(step = step.name, error = %e, "skipping config upgrade step");
                    report.skipped.push((step.name, e.to_string()));
                }
            }
        }
        report
    }

    /// Run the steps and save the store if anything changed.
    pub fn upgrade(&self, store: &mut ConfigStore) -> UpgradeReport {
        let before = store.fingerprint();
        let report = self.run(store);
        if store.fingerprint() != before {
            if let Err(e) = store.save() {
                tracing::error!(error = %e, "can not save upgraded config");
            }
        }
        report
    }
}

/// Bring `store` up to the current schema with the standard steps.
pub fn upgrade_user_config(store: &mut ConfigStore) -> UpgradeReport {
    Upgrader::default().upgrade(store)
}

fn lacks_core_section(store: &ConfigStore) -> bool {
    !store.has_section(CORE_SECTION)
}

fn add_core_section(mut store: ConfigStore) -> Result<ConfigStore, UpgradeError> {
    store.add_section(CORE_SECTION);
    Ok(store)
}

fn has_mistyped_core_values(store: &ConfigStore) -> bool {
    let Some(core) = store.section(CORE_SECTION) else {
        return false;
    };
    core_schema()
        .iter()
        .any(|(key, kind)| core.get(key).is_some_and(|value| !kind.matches(value)))
}

fn coerce_core_values(mut store: ConfigStore) -> Result<ConfigStore, UpgradeError> {
    let Some(core) = store.section_mut(CORE_SECTION) else {
        return Ok(store);
    };
    for (key, kind) in core_schema() {
        let Some(value) = core.get(key) else {
            continue;
        };
        if kind.matches(value) {
            continue;
        }
        let coerced = coerce(key, value, kind)?;
        core.set(key, coerced);
    }
    Ok(store)
}

fn lacks_core_defaults(store: &ConfigStore) -> bool {
    store
        .section(CORE_SECTION)
        .is_some_and(|core| core_schema().iter().any(|(key, _)| !core.has_option(key)))
}

fn fill_core_defaults(mut store: ConfigStore) -> Result<ConfigStore, UpgradeError> {
    let core = store.add_section(CORE_SECTION);
    for (key, value) in CoreSettings::default().entries() {
        if !core.has_option(key) {
            core.set(key, value);
        }
    }
    Ok(store)
}

fn coerce(key: &str, value: &Value, kind: ValueKind) -> Result<Value, UpgradeError> {
    let coerced = match (kind, value) {
        (ValueKind::Bool, Value::Str(s)) => parse_flag(s).map(Value::Bool),
        (ValueKind::Bool, Value::Int(0)) => Some(Value::Bool(false)),
        (ValueKind::Bool, Value::Int(1)) => Some(Value::Bool(true)),
        (ValueKind::Int, Value::Str(s)) => s.trim().parse::<i64>().ok().map(Value::Int),
        (ValueKind::Int, Value::Float(f)) => float_to_int(*f).map(Value::Int),
        (ValueKind::List, Value::Str(s)) if s.trim().is_empty() => Some(Value::List(Vec::new())),
        (ValueKind::List, Value::Str(s)) => Some(Value::List(vec![s.clone()])),
        _ => None,
    };
    coerced.ok_or_else(|| UpgradeError::Coerce {
        key: key.to_string(),
        expected: kind.name(),
        found: value.type_name(),
    })
}

/// Whole floats inside the `i64` range only; `i64::MAX as f64` rounds up to 2^63.
fn float_to_int(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
