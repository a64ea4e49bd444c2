//! Model definitions and the factory that binds them to a store.

mod factory;
mod hooks;
mod names;
mod spec;
mod validation;

pub use factory::{ModelFactory, PutOutcome};
pub use hooks::{DeleteHook, Hooks, TransformHook, ValidateErrorHook};
pub use names::{Operation, OperationNames};
pub use spec::{ModelSpec, ModelSpecBuilder};
pub use validation::{compile_rule, FieldError, Predicate, Validator, REQUIRED_MESSAGE};
