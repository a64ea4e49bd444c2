//! Config validation: unique type names and field references.

use crate::config::FullConfig;
use crate::document::{ID_FIELD, REVISION_FIELD};
use crate::error::ConfigError;
use std::collections::HashSet;

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    let mut type_names = HashSet::new();
    for model in &config.models {
        if model.type_name.trim().is_empty() {
            return Err(ConfigError::Validation("model type_name must not be empty".into()));
        }
        if !type_names.insert(model.type_name.as_str()) {
            return Err(ConfigError::DuplicateModel(model.type_name.clone()));
        }

        let declared: HashSet<&str> = model
            .fields
            .iter()
            .map(String::as_str)
            .chain([ID_FIELD, REVISION_FIELD])
            .collect();
        let referenced = model
            .required
            .iter()
            .chain(model.validation.keys());
        for field in referenced {
            if !declared.contains(field.as_str()) {
                return Err(ConfigError::UnknownField {
                    type_name: model.type_name.clone(),
                    field: field.clone(),
                });
            }
        }
    }
    Ok(())
}
