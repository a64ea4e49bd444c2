//! Model routes built from the registry. Handlers resolve the model by the `type_name` path segment.

use crate::handlers::model::{
    create, delete as delete_handler, exists, list_models, make, read, replace, validate,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};
use tower_http::limit::RequestBodyLimitLayer;

/// Request body cap for model routes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn model_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_models))
        .route("/:type_name", post(create))
        .route("/:type_name/_make", post(make))
        .route("/:type_name/_validate", post(validate))
        .route(
            "/:type_name/:id",
            get(read).head(exists).put(replace).delete(delete_handler),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
