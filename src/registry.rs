//! Registry of model factories sharing one store.

use crate::case::to_snake_case;
use crate::config::{resolve, FullConfig};
use crate::error::ConfigError;
use crate::model::{Hooks, ModelFactory, ModelSpec, Operation};
use crate::store::DocumentStore;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ModelRegistry {
    store: Arc<dyn DocumentStore>,
    factories: HashMap<String, ModelFactory>,
    /// Registration order, for listing.
    order: Vec<String>,
}

impl ModelRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            factories: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register every model in `config`. `hooks` are attached by type name.
    pub fn from_config(
        store: Arc<dyn DocumentStore>,
        config: &FullConfig,
        mut hooks: HashMap<String, Hooks>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new(store);
        for spec in resolve(config)? {
            let spec = match hooks.remove(spec.type_name()) {
                Some(h) => spec.with_hooks(h),
                None => spec,
            };
            registry.register(spec)?;
        }
        if let Some(unused) = hooks.keys().next() {
            return Err(ConfigError::Validation(format!("hooks given for unknown model '{}'", unused)));
        }
        tracing::info!(models = registry.order.len(), "model registry built");
        Ok(registry)
    }

    pub fn register(&mut self, spec: ModelSpec) -> Result<&ModelFactory, ConfigError> {
        let type_name = spec.type_name().to_string();
        if self.factories.contains_key(&type_name) {
            return Err(ConfigError::DuplicateModel(type_name));
        }
        let factory = ModelFactory::new(spec, self.store.clone());
        tracing::debug!(model = %type_name, names = ?factory.names(), "registered model");
        self.order.push(type_name.clone());
        Ok(self.factories.entry(type_name).or_insert(factory))
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn factory(&self, type_name: &str) -> Option<&ModelFactory> {
        self.factories.get(type_name)
    }

    /// Lookup for URL segments: exact type name first, then its snake_case form
    /// (`blogPost` finds `blog_post`).
    pub fn factory_for_segment(&self, segment: &str) -> Option<&ModelFactory> {
        self.factory(segment)
            .or_else(|| self.factory(&to_snake_case(segment)))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Find the model and operation published under a generated name such as `makeUser` or `userExists?`.
    pub fn resolve_operation(&self, name: &str) -> Option<(&ModelFactory, Operation)> {
        self.order.iter().find_map(|t| {
            let factory = self.factories.get(t)?;
            factory.names().operation(name).map(|op| (factory, op))
        })
    }
}
