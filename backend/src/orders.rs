//! # Order Records
//!
//! Read access to orders and templates, plus the single write the renderer
//! performs: recording the combined production PDF on its order.
//!
//! ## Optimistic concurrency
//!
//! Every order row carries a `version`. `record_combined_pdf` only updates
//! the row when its version still equals the one read at the start of the
//! render, and bumps it. Two overlapping regenerations of the same order
//! therefore cannot silently overwrite each other; the loser gets `false`.
//!
//! Two stores are provided: [`SupabaseOrderStore`] (PostgREST over HTTP) and
//! [`SqliteOrderStore`] (a local database file, used for development).

use async_trait::async_trait;
use common::model::order::{CombinedPdfRecord, Order};
use common::model::template::Template;
use reqwest::Client;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>>;

    async fn get_template(&self, template_id: &str) -> Result<Option<Template>>;

    /// Writes the combined PDF columns if the order is still at
    /// `expected_version`. Returns `false` when another writer got there first.
    async fn record_combined_pdf(
        &self,
        order_id: &str,
        expected_version: i64,
        record: &CombinedPdfRecord,
    ) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// Supabase (PostgREST)
// ---------------------------------------------------------------------------

pub struct SupabaseOrderStore {
    base_url: String,
    service_key: String,
    client: Client,
}

impl SupabaseOrderStore {
    pub fn new(base_url: &str, service_key: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            client,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn fetch_one<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<Option<T>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("id", format!("eq.{}", id)), ("select", "*".to_string())])
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Database(format!(
                "reading {} {} failed ({}): {}",
                table, id, status, body
            )));
        }
        let rows: Vec<T> = response.json().await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl OrderStore for SupabaseOrderStore {
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        self.fetch_one("orders", order_id).await
    }

    async fn get_template(&self, template_id: &str) -> Result<Option<Template>> {
        self.fetch_one("templates", template_id).await
    }

    async fn record_combined_pdf(
        &self,
        order_id: &str,
        expected_version: i64,
        record: &CombinedPdfRecord,
    ) -> Result<bool> {
        let body = serde_json::json!({
            "production_combined_pdf_path": record.production_combined_pdf_path,
            "production_combined_pdf_public_url": record.production_combined_pdf_public_url,
            "production_combined_pdf_generated_at": record.production_combined_pdf_generated_at,
            "version": expected_version + 1,
        });
        let response = self
            .client
            .patch(self.table_url("orders"))
            .query(&[
                ("id", format!("eq.{}", order_id)),
                ("version", format!("eq.{}", expected_version)),
            ])
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Database(format!(
                "updating order {} failed ({}): {}",
                order_id, status, body
            )));
        }
        let updated: Vec<serde_json::Value> = response.json().await?;
        Ok(!updated.is_empty())
    }
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS templates (
    id TEXT PRIMARY KEY,
    name TEXT,
    preview_url TEXT
);
CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    template_id TEXT NOT NULL,
    custom_message TEXT,
    selected_message TEXT,
    logo_url TEXT,
    signature_url TEXT,
    cropped_signature_url TEXT,
    production_combined_pdf_path TEXT,
    production_combined_pdf_public_url TEXT,
    production_combined_pdf_generated_at TEXT,
    version INTEGER NOT NULL DEFAULT 0
);
";

/// Orders kept in a local SQLite file. A connection is opened per call on
/// the blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteOrderStore {
    path: PathBuf,
}

impl SqliteOrderStore {
    /// Opens (and if needed creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { path })
    }

    pub fn insert_template(&self, template: &Template) -> Result<()> {
        let conn = Connection::open(&self.path)?;
        conn.execute(
            "INSERT OR REPLACE INTO templates (id, name, preview_url) VALUES (?1, ?2, ?3)",
            params![template.id, template.name, template.preview_url],
        )?;
        Ok(())
    }

    pub fn insert_order(&self, order: &Order) -> Result<()> {
        let conn = Connection::open(&self.path)?;
        conn.execute(
            "INSERT OR REPLACE INTO orders (id, template_id, custom_message, selected_message,
                logo_url, signature_url, cropped_signature_url, production_combined_pdf_path,
                production_combined_pdf_public_url, production_combined_pdf_generated_at, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                order.id,
                order.template_id,
                order.custom_message,
                order.selected_message,
                order.logo_url,
                order.signature_url,
                order.cropped_signature_url,
                order.production_combined_pdf_path,
                order.production_combined_pdf_public_url,
                order.production_combined_pdf_generated_at,
                order.version,
            ],
        )?;
        Ok(())
    }

    /// Runs `f` with a fresh connection on the blocking thread pool.
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Connection) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || f(Connection::open(path)?))
            .await
            .map_err(|e| RenderError::Internal(format!("database task failed: {}", e)))?
    }
}

fn read_order(conn: &Connection, order_id: &str) -> Result<Option<Order>> {
    let order = conn
        .query_row(
            "SELECT id, template_id, custom_message, selected_message, logo_url, signature_url,
                    cropped_signature_url, production_combined_pdf_path,
                    production_combined_pdf_public_url, production_combined_pdf_generated_at, version
             FROM orders WHERE id = ?1",
            params![order_id],
            |row| {
                Ok(Order {
                    id: row.get(0)?,
                    template_id: row.get(1)?,
                    custom_message: row.get(2)?,
                    selected_message: row.get(3)?,
                    logo_url: row.get(4)?,
                    signature_url: row.get(5)?,
                    cropped_signature_url: row.get(6)?,
                    production_combined_pdf_path: row.get(7)?,
                    production_combined_pdf_public_url: row.get(8)?,
                    production_combined_pdf_generated_at: row.get(9)?,
                    version: row.get(10)?,
                })
            },
        )
        .optional()?;
    Ok(order)
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        let order_id = order_id.to_string();
        self.with_connection(move |conn| read_order(&conn, &order_id))
            .await
    }

    async fn get_template(&self, template_id: &str) -> Result<Option<Template>> {
        let template_id = template_id.to_string();
        self.with_connection(move |conn| {
            let template = conn
                .query_row(
                    "SELECT id, name, preview_url FROM templates WHERE id = ?1",
                    params![template_id],
                    |row| {
                        Ok(Template {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            preview_url: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(template)
        })
        .await
    }

    async fn record_combined_pdf(
        &self,
        order_id: &str,
        expected_version: i64,
        record: &CombinedPdfRecord,
    ) -> Result<bool> {
        let order_id = order_id.to_string();
        let record = record.clone();
        self.with_connection(move |conn| {
            let updated = conn.execute(
                "UPDATE orders
                 SET production_combined_pdf_path = ?1,
                     production_combined_pdf_public_url = ?2,
                     production_combined_pdf_generated_at = ?3,
                     version = version + 1
                 WHERE id = ?4 AND version = ?5",
                params![
                    record.production_combined_pdf_path,
                    record.production_combined_pdf_public_url,
                    record.production_combined_pdf_generated_at,
                    order_id,
                    expected_version,
                ],
            )?;
            Ok(updated == 1)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, SqliteOrderStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteOrderStore::open(dir.path().join("orders.sqlite")).unwrap();
        (dir, store)
    }

    fn record(path: &str) -> CombinedPdfRecord {
        CombinedPdfRecord {
            production_combined_pdf_path: path.to_string(),
            production_combined_pdf_public_url: format!("https://cdn.test/{}", path),
            production_combined_pdf_generated_at: "2026-10-16T09:00:00Z".to_string(),
        }
    }

    #[actix_web::test]
    async fn reads_orders_and_templates() {
        let (_dir, store) = store();
        store
            .insert_template(&Template {
                id: "t-1".into(),
                name: Some("Snowfall".into()),
                preview_url: Some("templates/snowfall.png".into()),
            })
            .unwrap();
        store
            .insert_order(&Order {
                id: "o-1".into(),
                template_id: "t-1".into(),
                custom_message: Some("Warm wishes".into()),
                ..Default::default()
            })
            .unwrap();

        let order = store.get_order("o-1").await.unwrap().unwrap();
        assert_eq!(order.effective_message(), "Warm wishes");
        let template = store.get_template("t-1").await.unwrap().unwrap();
        assert_eq!(template.preview_url.as_deref(), Some("templates/snowfall.png"));
        assert!(store.get_order("missing").await.unwrap().is_none());
        assert!(store.get_template("missing").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn stale_version_is_rejected() {
        let (_dir, store) = store();
        store
            .insert_order(&Order {
                id: "o-2".into(),
                template_id: "t-1".into(),
                ..Default::default()
            })
            .unwrap();

        assert!(store.record_combined_pdf("o-2", 0, &record("cards/a.pdf")).await.unwrap());
        assert!(!store.record_combined_pdf("o-2", 0, &record("cards/b.pdf")).await.unwrap());

        let order = store.get_order("o-2").await.unwrap().unwrap();
        assert_eq!(order.version, 1);
        assert_eq!(order.production_combined_pdf_path.as_deref(), Some("cards/a.pdf"));
    }
}
