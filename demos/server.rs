//! Example server: loads model config from `DOCMODEL_CONFIG_PATH`, stores documents in PostgreSQL when
//! `DATABASE_URL` is set (in memory otherwise), mounts common and model routes.

use docmodel::{
    common_routes_with_ready, ensure_database_exists, load_from_env, model_routes, AppState, DocumentStore, InMemoryStore,
    ModelRegistry, PgDocumentStore,
};
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docmodel=info")),
        )
        .init();

    let store: Arc<dyn DocumentStore> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            ensure_database_exists(&database_url).await?;
            let database = std::env::var("DOCMODEL_DATABASE").unwrap_or_else(|_| "default".into());
            Arc::new(PgDocumentStore::connect(&database_url, database).await?)
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set; using in-memory store");
            Arc::new(InMemoryStore::new())
        }
    };

    let config = load_from_env().await?;
    let registry = ModelRegistry::from_config(store, &config, HashMap::new())?;
    let state = AppState::new(registry);

    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api/v1", model_routes(state));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
