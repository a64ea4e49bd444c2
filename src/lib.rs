//! docmodel: declarative document models over a document store.
//!
//! A [`ModelSpec`] names a type's fields, required subset, validators and lifecycle hooks.
//! A [`ModelFactory`] binds one spec to one [`DocumentStore`] and provides `make`, `get`,
//! `put`, `delete`, `exists` and `valid`. Specs can be written in code or loaded from JSON
//! config into a [`ModelRegistry`], which the optional axum routes expose over HTTP.

pub mod case;
pub mod config;
pub mod document;
pub mod error;
pub mod handlers;
pub mod model;
pub mod registry;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{load_from_env, load_from_path, load_from_str, resolve, FullConfig, ModelConfig, ValidationRule};
pub use document::{DeleteOutcome, Document};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{FieldError, Hooks, ModelFactory, ModelSpec, Operation, OperationNames, PutOutcome, Validator};
pub use registry::ModelRegistry;
pub use response::{success_one, success_one_ok};
pub use routes::{common_routes, common_routes_with_ready, model_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, DocumentStore, InMemoryStore, PgDocumentStore};
