//! Lifecycle callbacks attached to a model.

use crate::document::{DeleteOutcome, Document};
use std::fmt;
use std::sync::Arc;

/// Document-to-document transform run by `make` (`on_init`) and `put` (`on_put`).
pub type TransformHook = Arc<dyn Fn(Document) -> Document + Send + Sync>;
/// Called after a successful delete with the store's outcome.
pub type DeleteHook = Arc<dyn Fn(&DeleteOutcome) + Send + Sync>;
/// Called once per failed check with `(document, field, message)`.
pub type ValidateErrorHook = Arc<dyn Fn(&Document, &str, &str) + Send + Sync>;

/// Optional hooks. Unset hooks are skipped.
#[derive(Clone, Default)]
pub struct Hooks {
    pub on_init: Option<TransformHook>,
    pub on_put: Option<TransformHook>,
    pub on_delete: Option<DeleteHook>,
    pub on_validate_error: Option<ValidateErrorHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_init<F>(mut self, f: F) -> Self
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        self.on_init = Some(Arc::new(f));
        self
    }

    pub fn on_put<F>(mut self, f: F) -> Self
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        self.on_put = Some(Arc::new(f));
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&DeleteOutcome) + Send + Sync + 'static,
    {
        self.on_delete = Some(Arc::new(f));
        self
    }

    pub fn on_validate_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&Document, &str, &str) + Send + Sync + 'static,
    {
        self.on_validate_error = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_init", &self.on_init.is_some())
            .field("on_put", &self.on_put.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .field("on_validate_error", &self.on_validate_error.is_some())
            .finish()
    }
}
