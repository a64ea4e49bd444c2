//! Model specification: fields, required subset, validators and hooks.

use super::hooks::Hooks;
use super::validation::Validator;
use crate::document::{Document, DeleteOutcome, ID_FIELD, REVISION_FIELD};
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};

/// Compiled description of one document type. Immutable once built.
#[derive(Clone, Debug)]
pub struct ModelSpec {
    type_name: String,
    fields: Vec<String>,
    required: HashSet<String>,
    validators: HashMap<String, Vec<Validator>>,
    hooks: Hooks,
}

impl ModelSpec {
    pub fn builder(type_name: impl Into<String>) -> ModelSpecBuilder {
        ModelSpecBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
            required: Vec::new(),
            validators: Vec::new(),
            hooks: Hooks::default(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared fields in order; `id` and `revision` always come first.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(field)
    }

    pub fn validators(&self, field: &str) -> &[Validator] {
        self.validators.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Replace the hooks, e.g. after loading the rest of the spec from config.
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }
}

pub struct ModelSpecBuilder {
    type_name: String,
    fields: Vec<String>,
    required: Vec<String>,
    validators: Vec<(String, Validator)>,
    hooks: Hooks,
}

impl ModelSpecBuilder {
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn required<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Append a validator for `field`; validators of one field run in the order added.
    pub fn validator(mut self, field: impl Into<String>, validator: Validator) -> Self {
        self.validators.push((field.into(), validator));
        self
    }

    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn on_init<F>(mut self, f: F) -> Self
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        self.hooks = self.hooks.on_init(f);
        self
    }

    pub fn on_put<F>(mut self, f: F) -> Self
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        self.hooks = self.hooks.on_put(f);
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&DeleteOutcome) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.on_delete(f);
        self
    }

    pub fn on_validate_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&Document, &str, &str) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.on_validate_error(f);
        self
    }

    /// Build the spec. Required fields and validator targets must be declared.
    pub fn build(self) -> Result<ModelSpec, ConfigError> {
        if self.type_name.trim().is_empty() {
            return Err(ConfigError::Validation("model type name must not be empty".into()));
        }
        let mut fields = vec![ID_FIELD.to_string(), REVISION_FIELD.to_string()];
        for f in self.fields {
            if !fields.contains(&f) {
                fields.push(f);
            }
        }
        let declared: HashSet<&str> = fields.iter().map(String::as_str).collect();
        let unknown = |field: &str| ConfigError::UnknownField {
            type_name: self.type_name.clone(),
            field: field.to_string(),
        };

        let mut required = HashSet::new();
        for f in self.required {
            if !declared.contains(f.as_str()) {
                return Err(unknown(&f));
            }
            required.insert(f);
        }

        let mut validators: HashMap<String, Vec<Validator>> = HashMap::new();
        for (f, v) in self.validators {
            if !declared.contains(f.as_str()) {
                return Err(unknown(&f));
            }
            validators.entry(f).or_default().push(v);
        }

        Ok(ModelSpec {
            type_name: self.type_name,
            fields,
            required,
            validators,
            hooks: self.hooks,
        })
    }
}
