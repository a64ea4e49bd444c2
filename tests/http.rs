use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use docmodel::{common_routes_with_ready, load_from_str, model_routes, AppState, Hooks, InMemoryStore, ModelRegistry};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

const CONFIG: &str = r#"{
    "models": [{
        "type_name": "user",
        "fields": ["username", "email", "role"],
        "required": ["username", "email"],
        "validation": {"email": [{"format": "email"}]}
    }]
}"#;

fn app() -> Router {
    let config = load_from_str(CONFIG).unwrap();
    let hooks = HashMap::from([(
        "user".to_string(),
        Hooks::new().on_init(|mut d| {
            d.insert("role".into(), json!("member"));
            d
        }),
    )]);
    let registry = ModelRegistry::from_config(Arc::new(InMemoryStore::new()), &config, hooks).unwrap();
    let state = AppState::new(registry);
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api/v1", model_routes(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn create_read_delete_cycle() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user",
        Some(json!({"username": "ada", "email": "ada@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let doc = &body["data"];
    assert_eq!(doc["role"], json!("member"));
    let id = doc["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/user/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], json!("ada"));

    let (status, _) = send(&app, Method::HEAD, &format!("/api/v1/user/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/user/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(id));

    let (status, _) = send(&app, Method::HEAD, &format!("/api/v1/user/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, Method::GET, &format!("/api/v1/user/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("not_found"));
}

#[tokio::test]
async fn invalid_create_is_unprocessable_with_every_failure() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/v1/user", Some(json!({"email": "nope"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("validation_error"));
    assert_eq!(
        body["error"]["details"],
        json!([
            {"field": "username", "message": "is a required field"},
            {"field": "email", "message": "must be a valid email"}
        ])
    );
}

#[tokio::test]
async fn make_and_validate_do_not_store() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/v1/user/_make", Some(json!(["username", "ada"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"id": null, "revision": null, "username": "ada", "email": null, "role": "member"})
    );

    let (status, body) = send(&app, Method::POST, "/api/v1/user/_validate", Some(json!({"username": "ada"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["valid"], json!(false));
    assert_eq!(body["data"]["errors"][0]["field"], json!("email"));

    let (status, _) = send(&app, Method::POST, "/api/v1/user/_make", Some(json!(["username"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replace_with_stale_revision_conflicts() {
    let app = app();
    let (_, body) = send(
        &app,
        Method::PUT,
        "/api/v1/user/ada",
        Some(json!({"username": "ada", "email": "ada@x.com"})),
    )
    .await;
    let first = body["data"].clone();
    assert_eq!(first["id"], json!("ada"));

    let mut update = first.clone();
    update["email"] = json!("lovelace@x.com");
    let (status, body) = send(&app, Method::PUT, "/api/v1/user/ada", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("lovelace@x.com"));

    let (status, body) = send(&app, Method::PUT, "/api/v1/user/ada", Some(first)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("conflict"));
}

#[tokio::test]
async fn replace_keeps_client_values_over_on_init_defaults() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/v1/user", Some(json!({"username": "ada", "email": "ada@x.com"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], json!("member"));

    let mut update = body["data"].clone();
    update["role"] = json!("admin");
    let uri = format!("/api/v1/user/{}", update["id"].as_str().unwrap());
    let (status, body) = send(&app, Method::PUT, &uri, Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], json!("admin"));

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["data"]["role"], json!("admin"));
}

#[tokio::test]
async fn document_ids_do_not_collide_with_action_routes() {
    let app = app();
    let doc = json!({"username": "ada", "email": "ada@x.com"});
    let (status, body) = send(&app, Method::PUT, "/api/v1/user/make", Some(doc.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!("make"));

    let (status, body) = send(&app, Method::GET, "/api/v1/user/make", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], json!("ada"));
    let (status, _) = send(&app, Method::DELETE, "/api/v1/user/make", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/api/v1/user/validate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::PUT, "/api/v1/user/_make", Some(doc.clone())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{body}");
    let (status, _) = send(&app, Method::PUT, "/api/v1/user/_other", Some(doc.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let mut with_id = doc;
    with_id["id"] = json!("_validate");
    let (status, _) = send(&app, Method::POST, "/api/v1/user", Some(with_id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_model_and_listing() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/api/v1/comment/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/v1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], json!(1));
    assert_eq!(body["data"][0]["operations"]["exists"], json!("userExists?"));
}

#[tokio::test]
async fn health_and_ready() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], json!("ok"));
}
