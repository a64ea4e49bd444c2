//! Load model config from JSON (string, file, directory or env) and resolve it into specs.

use crate::config::{validate, FullConfig, ModelConfig};
use crate::error::ConfigError;
use crate::model::{compile_rule, ModelSpec};
use std::path::Path;

/// Env var naming a config file or a directory containing `models.json`.
pub const CONFIG_PATH_ENV: &str = "DOCMODEL_CONFIG_PATH";

/// Build one spec per configured model (validates first). Hooks are empty; attach them
/// with [`ModelSpec::with_hooks`].
pub fn resolve(config: &FullConfig) -> Result<Vec<ModelSpec>, ConfigError> {
    validate(config)?;
    config.models.iter().map(resolve_model).collect()
}

pub fn resolve_model(model: &ModelConfig) -> Result<ModelSpec, ConfigError> {
    let mut builder = ModelSpec::builder(model.type_name.clone())
        .fields(model.fields.iter().cloned())
        .required(model.required.iter().cloned());
    for (field, rules) in &model.validation {
        for rule in rules {
            for validator in compile_rule(&model.type_name, field, rule)? {
                builder = builder.validator(field.clone(), validator);
            }
        }
    }
    builder.build()
}

pub fn load_from_str(json: &str) -> Result<FullConfig, ConfigError> {
    let config: FullConfig = serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Load from a `.json` file, or from `models.json` inside a directory.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<FullConfig, ConfigError> {
    let path = path.as_ref();
    let file = if path.is_dir() {
        path.join("models.json")
    } else {
        path.to_path_buf()
    };
    let raw = tokio::fs::read_to_string(&file)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", file.display(), e)))?;
    let config = load_from_str(&raw)?;
    tracing::info!(path = %file.display(), models = config.models.len(), "model config loaded");
    Ok(config)
}

/// Load from the path in `DOCMODEL_CONFIG_PATH` (a `.env` file is honoured). Empty config when unset.
pub async fn load_from_env() -> Result<FullConfig, ConfigError> {
    dotenvy::dotenv().ok();
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_from_path(path).await,
        Err(_) => {
            tracing::info!("{} not set; starting with no models", CONFIG_PATH_ENV);
            Ok(FullConfig::default())
        }
    }
}
