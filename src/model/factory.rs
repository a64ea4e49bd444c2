//! ModelFactory: make, get, put, delete, exists and valid for one model bound to one store.

use super::names::OperationNames;
use super::spec::ModelSpec;
use super::validation::{FieldError, REQUIRED_MESSAGE};
use crate::document::{self, doc_id, DeleteOutcome, Document};
use crate::error::{AppError, StoreError};
use crate::store::DocumentStore;
use serde_json::Value;
use std::sync::Arc;

/// Result of [`ModelFactory::put_with_report`].
#[derive(Clone, Debug, PartialEq)]
pub enum PutOutcome {
    /// The store accepted the document; carries the stored version with `id`/`revision`.
    Stored(Document),
    /// Validation failed; nothing was written.
    Invalid(Vec<FieldError>),
}

impl PutOutcome {
    pub fn into_stored(self) -> Option<Document> {
        match self {
            PutOutcome::Stored(doc) => Some(doc),
            PutOutcome::Invalid(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct ModelFactory {
    spec: Arc<ModelSpec>,
    store: Arc<dyn DocumentStore>,
    names: OperationNames,
}

impl ModelFactory {
    pub fn new(spec: ModelSpec, store: Arc<dyn DocumentStore>) -> Self {
        let names = OperationNames::for_type(spec.type_name());
        Self {
            spec: Arc::new(spec),
            store,
            names,
        }
    }

    pub fn type_name(&self) -> &str {
        self.spec.type_name()
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn names(&self) -> &OperationNames {
        &self.names
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// New in-memory document: every declared field null, overlaid with `args`, then `on_init`.
    /// Nothing is validated or stored.
    pub fn make<I, K, V>(&self, args: I) -> Document
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let doc = self.overlay(args);
        match &self.spec.hooks().on_init {
            Some(on_init) => on_init(doc),
            None => doc,
        }
    }

    /// The null template overlaid with `args`. Unlike [`make`](Self::make), `on_init` does not run,
    /// so this is the shape for updating a document that already exists.
    pub fn overlay<I, K, V>(&self, args: I) -> Document
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut doc = document::template(self.spec.fields());
        document::merge_into(
            &mut doc,
            args.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        );
        doc
    }

    /// `make` from alternating key/value arguments: `["username", "ada", "email", null]`.
    pub fn make_from_args(&self, args: &[Value]) -> Result<Document, AppError> {
        Ok(self.make(self.pairs_from_args(args)?))
    }

    /// Split alternating key/value arguments into pairs. Keys must be strings.
    pub fn pairs_from_args(&self, args: &[Value]) -> Result<Vec<(String, Value)>, AppError> {
        if args.len() % 2 != 0 {
            return Err(AppError::BadRequest(format!(
                "{}: expected key/value pairs, got {} arguments",
                self.names.make,
                args.len()
            )));
        }
        let mut pairs = Vec::with_capacity(args.len() / 2);
        for chunk in args.chunks(2) {
            let key = chunk[0].as_str().ok_or_else(|| {
                AppError::BadRequest(format!("{}: keys must be strings, got {}", self.names.make, chunk[0]))
            })?;
            pairs.push((key.to_string(), chunk[1].clone()));
        }
        Ok(pairs)
    }

    /// Fetch by id; the stored document is laid over the null template so every declared field is present.
    pub async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        tracing::debug!(model = %self.type_name(), id = %id, "get");
        let raw = self.store.get_document(id).await?;
        Ok(raw.map(|stored| {
            let mut doc = document::template(self.spec.fields());
            document::merge_into(&mut doc, stored);
            doc
        }))
    }

    /// True iff every required field is set and every validator passes.
    /// All checks run; `on_validate_error` fires once per failure.
    pub fn valid(&self, doc: &Document) -> bool {
        self.validate_report(doc).is_empty()
    }

    /// Run the same checks as [`valid`](Self::valid) and return the failures.
    pub fn validate_report(&self, doc: &Document) -> Vec<FieldError> {
        let on_error = self.spec.hooks().on_validate_error.as_ref();
        let mut errors = Vec::new();
        let mut fail = |field: &str, message: &str| {
            if let Some(hook) = on_error {
                hook(doc, field, message);
            }
            errors.push(FieldError {
                field: field.to_string(),
                message: message.to_string(),
            });
        };

        for field in self.spec.fields() {
            let value = doc.get(field).unwrap_or(&Value::Null);
            if self.spec.is_required(field) && document::is_blank(value) {
                fail(field.as_str(), REQUIRED_MESSAGE);
                continue;
            }
            for validator in self.spec.validators(field) {
                if !validator.check(value) {
                    fail(field.as_str(), validator.message());
                }
            }
        }
        tracing::debug!(model = %self.type_name(), failures = errors.len(), "validated");
        errors
    }

    /// `on_put`, prune to declared non-null fields, validate, then store.
    /// Returns `Ok(None)` without writing when validation fails.
    pub async fn put(&self, doc: Document) -> Result<Option<Document>, StoreError> {
        Ok(self.put_with_report(doc).await?.into_stored())
    }

    pub async fn put_with_report(&self, doc: Document) -> Result<PutOutcome, StoreError> {
        let doc = match &self.spec.hooks().on_put {
            Some(on_put) => on_put(doc),
            None => doc,
        };
        let pruned = document::prune(&doc, self.spec.fields());
        let errors = self.validate_report(&pruned);
        if !errors.is_empty() {
            tracing::debug!(model = %self.type_name(), failures = errors.len(), "put rejected");
            return Ok(PutOutcome::Invalid(errors));
        }
        tracing::debug!(model = %self.type_name(), id = ?doc_id(&pruned), "put");
        let stored = self.store.put_document(pruned).await?;
        Ok(PutOutcome::Stored(stored))
    }

    /// Delete the current version of `id`; `on_delete` runs with the outcome on success.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome, StoreError> {
        let doc = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        tracing::debug!(model = %self.type_name(), id = %id, "delete");
        let outcome = self.store.delete_document(&doc).await?;
        if let Some(on_delete) = &self.spec.hooks().on_delete {
            on_delete(&outcome);
        }
        Ok(outcome)
    }

    pub async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.get(id).await?.is_some())
    }
}

impl std::fmt::Debug for ModelFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelFactory")
            .field("spec", &self.spec)
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Validator;
    use crate::store::InMemoryStore;
    use serde_json::json;

    fn factory(spec: ModelSpec) -> ModelFactory {
        ModelFactory::new(spec, Arc::new(InMemoryStore::new()))
    }

    fn obj(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn make_fills_template_and_keeps_extra_keys() {
        let users = factory(ModelSpec::builder("user").fields(["username", "email"]).build().unwrap());
        let doc = users.make([("username", "ada"), ("nickname", "a")]);
        assert_eq!(
            Value::Object(doc),
            json!({"id": null, "revision": null, "username": "ada", "email": null, "nickname": "a"})
        );
    }

    #[test]
    fn make_from_args_pairs() {
        let users = factory(ModelSpec::builder("user").fields(["username"]).build().unwrap());
        let doc = users.make_from_args(&[json!("username"), json!("ada")]).unwrap();
        assert_eq!(doc["username"], json!("ada"));
        assert!(matches!(users.make_from_args(&[json!("username")]), Err(AppError::BadRequest(_))));
        assert!(matches!(users.make_from_args(&[json!(1), json!(2)]), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn on_init_result_is_returned() {
        let users = factory(
            ModelSpec::builder("user")
                .fields(["username", "role"])
                .on_init(|mut d| {
                    d.insert("role".into(), json!("member"));
                    d
                })
                .build()
                .unwrap(),
        );
        assert_eq!(users.make(Document::new())["role"], json!("member"));
        assert_eq!(users.overlay([("role", "admin")])["role"], json!("admin"));
        assert_eq!(users.overlay(Document::new())["role"], Value::Null);
    }

    #[test]
    fn validators_are_skipped_when_required_check_fails() {
        let users = factory(
            ModelSpec::builder("user")
                .fields(["email"])
                .required(["email"])
                .validator("email", Validator::new(|v| v.as_str().is_some(), "must be a string"))
                .build()
                .unwrap(),
        );
        let report = users.validate_report(&users.make(Document::new()));
        assert_eq!(
            report,
            vec![FieldError {
                field: "email".into(),
                message: REQUIRED_MESSAGE.into()
            }]
        );
    }

    #[test]
    fn every_failing_check_is_reported() {
        let users = factory(
            ModelSpec::builder("user")
                .fields(["username", "email"])
                .required(["username"])
                .validator("email", Validator::new(|v| v.as_str().map_or(false, |s| s.contains('@')), "needs @"))
                .validator("email", Validator::new(|v| v.as_str().map_or(false, |s| s.len() > 5), "too short"))
                .build()
                .unwrap(),
        );
        let report = users.validate_report(&obj(json!({"email": "x"})));
        let fields: Vec<_> = report.iter().map(|e| (e.field.as_str(), e.message.as_str())).collect();
        assert_eq!(
            fields,
            [("username", REQUIRED_MESSAGE), ("email", "needs @"), ("email", "too short")]
        );
    }
}
