//! Field validators: (predicate, message) pairs, and their compilation from config rules.

use crate::config::ValidationRule;
use crate::error::ConfigError;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Message reported for a required field that is null or empty.
pub const REQUIRED_MESSAGE: &str = "is a required field";

pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A check on one field value. A `false` predicate reports `message`.
#[derive(Clone)]
pub struct Validator {
    predicate: Predicate,
    message: String,
}

impl Validator {
    pub fn new<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("message", &self.message).finish_non_exhaustive()
    }
}

/// One failed check, as collected for reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Compile a declarative rule into validators, in the order
/// format, max_length, min_length, pattern, allowed, minimum, maximum.
/// Null values pass every rule; absence is handled by `required`.
pub fn compile_rule(
    type_name: &str,
    field: &str,
    rule: &ValidationRule,
) -> Result<Vec<Validator>, ConfigError> {
    let msg = |default: String| rule.message.clone().unwrap_or(default);
    let mut out = Vec::new();

    if let Some(format) = &rule.format {
        match format.to_lowercase().as_str() {
            "email" => out.push(Validator::new(
                |v| match v {
                    Value::String(s) => s.contains('@') && s.len() >= 3,
                    Value::Null => true,
                    _ => false,
                },
                msg("must be a valid email".into()),
            )),
            "uuid" => out.push(Validator::new(
                |v| match v {
                    Value::String(s) => uuid::Uuid::parse_str(s).is_ok(),
                    Value::Null => true,
                    _ => false,
                },
                msg("must be a valid UUID".into()),
            )),
            other => {
                return Err(ConfigError::Validation(format!(
                    "{}.{}: unknown format '{}'",
                    type_name, field, other
                )))
            }
        }
    }
    if let Some(max) = rule.max_length {
        out.push(Validator::new(
            move |v| v.as_str().map_or(true, |s| s.chars().count() <= max as usize),
            msg(format!("must be at most {} characters", max)),
        ));
    }
    if let Some(min) = rule.min_length {
        out.push(Validator::new(
            move |v| v.as_str().map_or(true, |s| s.chars().count() >= min as usize),
            msg(format!("must be at least {} characters", min)),
        ));
    }
    if let Some(pattern) = &rule.pattern {
        let re = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            type_name: type_name.to_string(),
            field: field.to_string(),
            source,
        })?;
        out.push(Validator::new(
            move |v| v.as_str().map_or(true, |s| re.is_match(s)),
            msg("does not match required pattern".into()),
        ));
    }
    if let Some(allowed) = &rule.allowed {
        let message = msg(format!(
            "must be one of: {:?}",
            allowed.iter().take(5).collect::<Vec<_>>()
        ));
        let allowed = allowed.clone();
        out.push(Validator::new(
            move |v| v.is_null() || allowed.iter().any(|a| value_eq(v, a)),
            message,
        ));
    }
    if let Some(min) = rule.minimum {
        out.push(Validator::new(
            move |v| v.as_f64().map_or(true, |n| n >= min),
            msg(format!("must be at least {}", min)),
        ));
    }
    if let Some(max) = rule.maximum {
        out.push(Validator::new(
            move |v| v.as_f64().map_or(true, |n| n <= max),
            msg(format!("must be at most {}", max)),
        ));
    }
    Ok(out)
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(s), Value::String(t)) => s == t,
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}
