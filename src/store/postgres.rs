//! PostgreSQL-backed document store. Documents live as JSONB in `<schema>.documents`,
//! with the schema named from `DOCMODEL_SCHEMA` env (default `docmodel`).

use super::{check_revision, new_document_id, next_revision, DocumentStore};
use crate::document::{doc_id, doc_revision, DeleteOutcome, Document, ID_FIELD, REVISION_FIELD};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Schema holding the documents table. From env `DOCMODEL_SCHEMA`, default `docmodel`.
pub fn docmodel_schema() -> String {
    std::env::var("DOCMODEL_SCHEMA").unwrap_or_else(|_| "docmodel".into())
}

/// Schema-qualified, quoted table name (e.g. `"docmodel"."documents"`).
pub fn qualified_table(table: &str) -> String {
    qualify(&docmodel_schema(), table)
}

fn qualify(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// `INSERT` for a new id. A concurrent insert of the same id leaves zero rows affected.
fn insert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {} (database, id, revision, body, updated_at) VALUES ($1, $2, $3, $4, NOW()) \
         ON CONFLICT (database, id) DO NOTHING",
        table
    )
}

fn update_sql(table: &str) -> String {
    format!(
        "UPDATE {} SET revision = $3, body = $4, updated_at = NOW() WHERE database = $1 AND id = $2",
        table
    )
}

/// A write that touched no row lost a race for `id`.
fn written_or_conflict(id: &str, rows_affected: u64) -> Result<(), StoreError> {
    if rows_affected == 0 {
        tracing::warn!(id = %id, "put conflict (concurrent write)");
        return Err(StoreError::Conflict { id: id.to_string() });
    }
    Ok(())
}

/// One logical database inside the shared documents table.
#[derive(Clone, Debug)]
pub struct PgDocumentStore {
    pool: PgPool,
    database: String,
}

impl PgDocumentStore {
    /// Use an existing pool.
    pub fn new(pool: PgPool, database: impl Into<String>) -> Self {
        Self {
            pool,
            database: database.into(),
        }
    }

    /// Open a pool from a database URL, create the table if needed.
    pub async fn connect(database_url: &str, database: impl Into<String>) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self::new(pool, database);
        store.ensure_tables().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Create the schema and documents table if they do not exist.
    pub async fn ensure_tables(&self) -> Result<(), StoreError> {
        let schema = docmodel_schema();
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&schema)))
            .execute(&self.pool)
            .await?;
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                database TEXT NOT NULL,
                id TEXT NOT NULL,
                revision TEXT NOT NULL,
                body JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (database, id)
            )
            "#,
            qualified_table("documents")
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    async fn current_revision(
        tx: &mut sqlx::PgConnection,
        database: &str,
        id: &str,
    ) -> Result<Option<String>, StoreError> {
        let sql = format!(
            "SELECT revision FROM {} WHERE database = $1 AND id = $2 FOR UPDATE",
            qualified_table("documents")
        );
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(database)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        Ok(row.map(|r| r.0))
    }
}

/// Body as stored: the document without `id` and `revision`, which have their own columns.
fn body_of(doc: &Document) -> Value {
    let mut body = doc.clone();
    body.remove(ID_FIELD);
    body.remove(REVISION_FIELD);
    Value::Object(body)
}

fn document_from_row(id: String, revision: String, body: Value) -> Document {
    let mut doc = match body {
        Value::Object(m) => m,
        _ => Document::new(),
    };
    doc.insert(ID_FIELD.into(), Value::String(id));
    doc.insert(REVISION_FIELD.into(), Value::String(revision));
    doc
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "SELECT revision, body FROM {} WHERE database = $1 AND id = $2",
            qualified_table("documents")
        );
        tracing::debug!(sql = %sql, id = %id, "query");
        let row: Option<(String, Value)> = sqlx::query_as(&sql)
            .bind(&self.database)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(revision, body)| document_from_row(id.to_string(), revision, body)))
    }

    async fn put_document(&self, doc: Document) -> Result<Document, StoreError> {
        let id = doc_id(&doc).map(str::to_string).unwrap_or_else(new_document_id);
        let body = body_of(&doc);
        let mut tx = self.pool.begin().await?;
        let current = Self::current_revision(&mut *tx, &self.database, &id).await?;
        if let Err(e) = check_revision(&id, current.as_deref(), doc_revision(&doc)) {
            tracing::warn!(id = %id, "put conflict");
            return Err(e);
        }
        let revision = next_revision(current.as_deref());
        let q_table = qualified_table("documents");
        let sql = if current.is_some() {
            update_sql(&q_table)
        } else {
            insert_sql(&q_table)
        };
        tracing::debug!(sql = %sql, id = %id, "query (tx)");
        let result = sqlx::query(&sql)
            .bind(&self.database)
            .bind(&id)
            .bind(&revision)
            .bind(&body)
            .execute(&mut *tx)
            .await?;
        written_or_conflict(&id, result.rows_affected())?;
        tx.commit().await?;
        Ok(document_from_row(id, revision, body))
    }

    async fn delete_document(&self, doc: &Document) -> Result<DeleteOutcome, StoreError> {
        let id = doc_id(doc).ok_or(StoreError::MissingField(ID_FIELD))?;
        let supplied = doc_revision(doc).ok_or(StoreError::MissingField(REVISION_FIELD))?;
        let mut tx = self.pool.begin().await?;
        let current = Self::current_revision(&mut *tx, &self.database, id)
            .await?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        if current != supplied {
            tracing::warn!(id = %id, "delete conflict");
            return Err(StoreError::Conflict { id: id.to_string() });
        }
        let sql = format!(
            "DELETE FROM {} WHERE database = $1 AND id = $2",
            qualified_table("documents")
        );
        tracing::debug!(sql = %sql, id = %id, "query (tx)");
        sqlx::query(&sql)
            .bind(&self.database)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(DeleteOutcome {
            id: id.to_string(),
            revision: next_revision(Some(&current)),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| StoreError::Db(sqlx::Error::Configuration("DATABASE_URL: no path".into())))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
