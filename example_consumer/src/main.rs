//! Example consumer: a separate Rust project that defines a model in code and drives it directly.
//!
//! Run from repo root: `cargo run -p example-consumer`

use docmodel::{InMemoryStore, ModelFactory, ModelSpec, Validator};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("docmodel=debug")),
        )
        .init();

    let spec = ModelSpec::builder("user")
        .fields(["username", "email"])
        .required(["username", "email"])
        .validator(
            "email",
            Validator::new(|v| v.as_str().map_or(true, |s| s.contains('@')), "must contain @"),
        )
        .on_validate_error(|_, field, msg| tracing::warn!(field, msg, "invalid user"))
        .on_delete(|outcome| tracing::info!(id = %outcome.id, "user deleted"))
        .build()?;
    let users = ModelFactory::new(spec, Arc::new(InMemoryStore::new()));
    tracing::info!(names = ?users.names(), "model ready");

    let mut ada = users.make([("username", "ada")]);
    tracing::info!(valid = users.valid(&ada), "made {}", json!(ada));

    ada.insert("email".into(), json!("ada@x.com"));
    let stored = users.put(ada).await?.ok_or("user rejected")?;
    tracing::info!("stored {}", json!(stored));

    let id = stored["id"].as_str().unwrap_or_default().to_string();
    users.delete(&id).await?;
    tracing::info!(exists = users.exists(&id).await?, "after delete");
    Ok(())
}
