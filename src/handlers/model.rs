//! Model handlers: make, validate, create, read, exists, replace, delete.

use crate::document::{doc_id, Document, ID_FIELD};
use crate::error::AppError;
use crate::model::{ModelFactory, PutOutcome};
use crate::response::{success_one, success_one_ok, success_with_meta};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

fn factory<'a>(state: &'a AppState, type_name: &str) -> Result<&'a ModelFactory, AppError> {
    state
        .registry
        .factory_for_segment(type_name)
        .ok_or_else(|| AppError::NotFound(format!("model: {}", type_name)))
}

/// Object bodies are field maps; array bodies are alternating keys and values.
fn make_from_body(factory: &ModelFactory, body: Value) -> Result<Document, AppError> {
    match body {
        Value::Object(m) => Ok(factory.make(m)),
        Value::Array(args) => factory.make_from_args(&args),
        Value::Null => Ok(factory.make(Document::new())),
        _ => Err(AppError::BadRequest("body must be a JSON object or array".into())),
    }
}

/// Same body shapes as [`make_from_body`], laid over the null template without `on_init`.
fn overlay_from_body(factory: &ModelFactory, body: Value) -> Result<Document, AppError> {
    match body {
        Value::Object(m) => Ok(factory.overlay(m)),
        Value::Array(args) => Ok(factory.overlay(factory.pairs_from_args(&args)?)),
        Value::Null => Ok(factory.overlay(Document::new())),
        _ => Err(AppError::BadRequest("body must be a JSON object or array".into())),
    }
}

/// Ids starting with `_` are reserved for the `/_make` and `/_validate` routes.
fn check_id(id: &str) -> Result<(), AppError> {
    if id.starts_with('_') {
        return Err(AppError::BadRequest(format!("id '{}' is reserved: ids may not start with '_'", id)));
    }
    Ok(())
}

fn stored_or_invalid(factory: &ModelFactory, outcome: PutOutcome) -> Result<Document, AppError> {
    match outcome {
        PutOutcome::Stored(doc) => Ok(doc),
        PutOutcome::Invalid(errors) => Err(AppError::Validation {
            type_name: factory.type_name().to_string(),
            errors,
        }),
    }
}

/// GET / - registered models with their fields and operation names.
pub async fn list_models(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let models: Vec<Value> = state
        .registry
        .type_names()
        .filter_map(|t| state.registry.factory(t))
        .map(|f| {
            serde_json::json!({
                "type_name": f.type_name(),
                "fields": f.spec().fields(),
                "operations": f.names(),
            })
        })
        .collect();
    let count = models.len();
    success_with_meta(models, serde_json::json!({ "count": count }))
}

/// POST /:type_name/_make - build a document without storing it.
pub async fn make(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let factory = factory(&state, &type_name)?;
    let doc = make_from_body(factory, body)?;
    Ok(success_one_ok(doc))
}

/// POST /:type_name/_validate - make, then report every failed check.
pub async fn validate(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let factory = factory(&state, &type_name)?;
    let doc = make_from_body(factory, body)?;
    let errors = factory.validate_report(&doc);
    Ok(success_one_ok(serde_json::json!({
        "valid": errors.is_empty(),
        "errors": errors,
    })))
}

/// POST /:type_name - make and put.
pub async fn create(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let factory = factory(&state, &type_name)?;
    let doc = make_from_body(factory, body)?;
    if let Some(id) = doc_id(&doc) {
        check_id(id)?;
    }
    let outcome = factory.put_with_report(doc).await?;
    let stored = stored_or_invalid(factory, outcome)?;
    Ok(success_one(stored))
}

/// GET /:type_name/:id
pub async fn read(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let factory = factory(&state, &type_name)?;
    let doc = factory.get(&id).await?.ok_or_else(|| AppError::NotFound(id))?;
    Ok(success_one_ok(doc))
}

/// HEAD /:type_name/:id - 200 when the document exists, 404 otherwise.
pub async fn exists(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let factory = factory(&state, &type_name)?;
    Ok(if factory.exists(&id).await? {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    })
}

/// PUT /:type_name/:id - put with the path id; updates must carry the current revision.
/// `on_init` does not run here: the body is the whole document, not a fresh one.
pub async fn replace(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let factory = factory(&state, &type_name)?;
    check_id(&id)?;
    let mut doc = overlay_from_body(factory, body)?;
    doc.insert(ID_FIELD.into(), Value::String(id));
    let outcome = factory.put_with_report(doc).await?;
    let stored = stored_or_invalid(factory, outcome)?;
    Ok(success_one_ok(stored))
}

/// DELETE /:type_name/:id
pub async fn delete(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let factory = factory(&state, &type_name)?;
    let outcome = factory.delete(&id).await?;
    Ok(success_one_ok(outcome))
}
