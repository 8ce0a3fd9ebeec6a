//! Judge configuration snapshot
//!
//! The engine's behavior is tuned through a key/value configuration table
//! (penalty time, result priorities, verification policy, ...). Rather than
//! consulting a process-wide store, every operation receives an immutable
//! [`JudgeSettings`] snapshot so components are testable with arbitrary
//! configuration and concurrent operations see a consistent view.
//!
//! Raw values are JSON-encoded strings typed against a fixed schema; a
//! value whose type does not match its schema entry is rejected at load
//! time rather than coerced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COMPILE_PENALTY, DEFAULT_JUDGEHOST_CRITICAL_SECONDS,
    DEFAULT_JUDGEHOST_WARNING_SECONDS, DEFAULT_LAZY_EVAL_RESULTS, DEFAULT_OUTPUT_STORAGE_LIMIT,
    DEFAULT_PENALTY_TIME, DEFAULT_RESULTS_PRIO, DEFAULT_SCORE_IN_SECONDS,
    DEFAULT_VERIFICATION_REQUIRED,
};
use crate::error::{AppError, AppResult};

/// Schema type of a configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    Bool,
    Int,
    String,
    Array,
    KeyValue,
}

/// A typed configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    String(String),
    Array(Vec<String>),
    KeyValue(HashMap<String, serde_json::Value>),
}

impl SettingValue {
    /// Parse a raw JSON value string under the given schema type
    pub fn parse(raw: &str, ty: SettingType) -> AppResult<Self> {
        let json: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| AppError::Configuration(format!("invalid JSON value: {}", e)))?;
        Self::from_json(json, ty)
    }

    fn from_json(json: serde_json::Value, ty: SettingType) -> AppResult<Self> {
        use serde_json::Value;
        match (ty, json) {
            (SettingType::Bool, Value::Bool(b)) => Ok(Self::Bool(b)),
            // MySQL-style configuration dumps store booleans as 0/1
            (SettingType::Bool, Value::Number(n)) if n.as_i64() == Some(0) => Ok(Self::Bool(false)),
            (SettingType::Bool, Value::Number(n)) if n.as_i64() == Some(1) => Ok(Self::Bool(true)),
            (SettingType::Int, Value::Number(n)) => n
                .as_i64()
                .map(Self::Int)
                .ok_or_else(|| AppError::Configuration("integer out of range".to_string())),
            (SettingType::String, Value::String(s)) => Ok(Self::String(s)),
            (SettingType::Array, Value::Array(items)) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => values.push(s),
                        other => {
                            return Err(AppError::Configuration(format!(
                                "array element is not a string: {}",
                                other
                            )));
                        }
                    }
                }
                Ok(Self::Array(values))
            }
            (SettingType::KeyValue, Value::Object(map)) => {
                Ok(Self::KeyValue(map.into_iter().collect()))
            }
            (ty, other) => Err(AppError::Configuration(format!(
                "value {} does not match schema type {:?}",
                other, ty
            ))),
        }
    }
}

/// The configuration keys the engine recognizes, with their schema types
pub const SCHEMA: &[(&str, SettingType)] = &[
    ("verification_required", SettingType::Bool),
    ("compile_penalty", SettingType::Bool),
    ("penalty_time", SettingType::Int),
    ("results_prio", SettingType::KeyValue),
    ("results_remap", SettingType::KeyValue),
    ("lazy_eval_results", SettingType::Bool),
    ("output_storage_limit", SettingType::Int),
    ("judgehost_warning", SettingType::Int),
    ("judgehost_critical", SettingType::Int),
    ("score_in_seconds", SettingType::Bool),
];

/// Immutable snapshot of the judge configuration
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeSettings {
    /// Jury verification required before a result becomes public
    pub verification_required: bool,
    /// Compiler errors incur penalty time (and show on the scoreboard)
    pub compile_penalty: bool,
    /// Penalty in minutes per wrong submission, for solved problems
    pub penalty_time: i64,
    /// Result -> priority; the highest priority determines the verdict
    pub results_prio: HashMap<String, i32>,
    /// Result -> result remap applied to incoming testcase run results
    pub results_remap: HashMap<String, String>,
    /// Stop judging once the verdict cannot change anymore
    pub lazy_eval_results: bool,
    /// Cap on stored output per testcase run, in bytes
    pub output_storage_limit: i64,
    /// Judgehost check-in age before "warning" status, in seconds
    pub judgehost_warning: i64,
    /// Judgehost check-in age before "critical" status, in seconds
    pub judgehost_critical: i64,
    /// Score in seconds instead of minutes
    pub score_in_seconds: bool,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            verification_required: DEFAULT_VERIFICATION_REQUIRED,
            compile_penalty: DEFAULT_COMPILE_PENALTY,
            penalty_time: DEFAULT_PENALTY_TIME,
            results_prio: DEFAULT_RESULTS_PRIO
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            results_remap: HashMap::new(),
            lazy_eval_results: DEFAULT_LAZY_EVAL_RESULTS,
            output_storage_limit: DEFAULT_OUTPUT_STORAGE_LIMIT,
            judgehost_warning: DEFAULT_JUDGEHOST_WARNING_SECONDS,
            judgehost_critical: DEFAULT_JUDGEHOST_CRITICAL_SECONDS,
            score_in_seconds: DEFAULT_SCORE_IN_SECONDS,
        }
    }
}

impl JudgeSettings {
    /// Build a snapshot from raw `(name, json_value)` configuration rows.
    /// Unknown keys are rejected, missing keys fall back to defaults, and
    /// each value is validated against the schema.
    pub fn from_rows<'a, I>(rows: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut settings = Self::default();

        for (name, raw) in rows {
            let ty = SCHEMA
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, ty)| *ty)
                .ok_or_else(|| {
                    AppError::Configuration(format!("unknown configuration key '{}'", name))
                })?;
            let value = SettingValue::parse(raw, ty)
                .map_err(|e| AppError::Configuration(format!("key '{}': {}", name, e)))?;
            settings.apply(name, value)?;
        }

        Ok(settings)
    }

    fn apply(&mut self, name: &str, value: SettingValue) -> AppResult<()> {
        match (name, value) {
            ("verification_required", SettingValue::Bool(b)) => self.verification_required = b,
            ("compile_penalty", SettingValue::Bool(b)) => self.compile_penalty = b,
            ("penalty_time", SettingValue::Int(i)) => self.penalty_time = i,
            ("results_prio", SettingValue::KeyValue(map)) => {
                self.results_prio = map_to_int_map(name, map)?;
            }
            ("results_remap", SettingValue::KeyValue(map)) => {
                let mut remap = HashMap::new();
                for (key, value) in map {
                    match value {
                        serde_json::Value::String(s) => {
                            remap.insert(key, s);
                        }
                        other => {
                            return Err(AppError::Configuration(format!(
                                "results_remap['{}'] is not a string: {}",
                                key, other
                            )));
                        }
                    }
                }
                self.results_remap = remap;
            }
            ("lazy_eval_results", SettingValue::Bool(b)) => self.lazy_eval_results = b,
            ("output_storage_limit", SettingValue::Int(i)) => self.output_storage_limit = i,
            ("judgehost_warning", SettingValue::Int(i)) => self.judgehost_warning = i,
            ("judgehost_critical", SettingValue::Int(i)) => self.judgehost_critical = i,
            ("score_in_seconds", SettingValue::Bool(b)) => self.score_in_seconds = b,
            (name, value) => {
                return Err(AppError::Configuration(format!(
                    "key '{}' cannot hold {:?}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

fn map_to_int_map(
    name: &str,
    map: HashMap<String, serde_json::Value>,
) -> AppResult<HashMap<String, i32>> {
    let mut out = HashMap::with_capacity(map.len());
    for (key, value) in map {
        let int = value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| {
                AppError::Configuration(format!("{}['{}'] is not an integer: {}", name, key, value))
            })?;
        out.insert(key, int);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::results;

    #[test]
    fn defaults_carry_inverted_priorities() {
        let settings = JudgeSettings::default();
        // correct must be the lowest priority so that full confirmation
        // requires every testcase to run
        let correct = settings.results_prio[results::CORRECT];
        for (result, prio) in &settings.results_prio {
            if result != results::CORRECT {
                assert!(*prio > correct, "{} should outrank correct", result);
            }
        }
    }

    #[test]
    fn defaults_cover_every_run_result() {
        let settings = JudgeSettings::default();
        for result in results::ALL_RUN_RESULTS {
            assert!(
                settings.results_prio.contains_key(*result),
                "{} has no priority",
                result
            );
        }
    }

    #[test]
    fn from_rows_overrides_defaults() {
        let rows = vec![
            ("penalty_time", "30"),
            ("score_in_seconds", "true"),
            ("results_remap", r#"{"no-output":"wrong-answer"}"#),
        ];
        let settings = JudgeSettings::from_rows(rows).unwrap();
        assert_eq!(settings.penalty_time, 30);
        assert!(settings.score_in_seconds);
        assert_eq!(
            settings.results_remap.get(results::NO_OUTPUT).map(String::as_str),
            Some(results::WRONG_ANSWER)
        );
        // untouched keys keep their defaults
        assert!(settings.compile_penalty);
    }

    #[test]
    fn from_rows_accepts_numeric_bools() {
        let settings = JudgeSettings::from_rows(vec![("verification_required", "1")]).unwrap();
        assert!(settings.verification_required);
    }

    #[test]
    fn from_rows_rejects_unknown_key() {
        let err = JudgeSettings::from_rows(vec![("no_such_key", "1")]).unwrap_err();
        assert!(err.to_string().contains("no_such_key"));
    }

    #[test]
    fn from_rows_rejects_type_mismatch() {
        assert!(JudgeSettings::from_rows(vec![("penalty_time", "\"twenty\"")]).is_err());
        assert!(JudgeSettings::from_rows(vec![("results_prio", "[1,2]")]).is_err());
    }
}
