//! Print-and-mail greeting card renderer.
//!
//! Builds card HTML from an order, converts it to PDF through a remote
//! Chromium service, optionally rotates the pages for the mail vendor and
//! stores the result.

pub mod config;
pub mod error;
pub mod gotenberg;
pub mod inline;
pub mod layout;
pub mod message;
pub mod orders;
pub mod pipeline;
pub mod rotate;
pub mod services;
pub mod storage;

use std::sync::Arc;

use crate::config::{AppConfig, OrdersBackend};
use crate::error::Result;
use crate::gotenberg::GotenbergClient;
use crate::inline::ImageInliner;
use crate::orders::{OrderStore, SqliteOrderStore, SupabaseOrderStore};
use crate::pipeline::{CardRenderer, PipelineSettings};
use crate::storage::{ObjectStorage, SupabaseStorage};

/// Wires the production collaborators described by `config`.
pub fn build_renderer(config: &AppConfig) -> Result<CardRenderer> {
    let client = reqwest::Client::builder().build()?;

    let storage: Arc<dyn ObjectStorage> = Arc::new(SupabaseStorage::new(
        &config.supabase_url,
        &config.supabase_service_role_key,
        client.clone(),
    ));
    let orders: Arc<dyn OrderStore> = match config.orders.backend {
        OrdersBackend::Supabase => Arc::new(SupabaseOrderStore::new(
            &config.supabase_url,
            &config.supabase_service_role_key,
            client.clone(),
        )),
        OrdersBackend::Sqlite => Arc::new(SqliteOrderStore::open(&config.orders.sqlite_path)?),
    };
    let converter = Arc::new(GotenbergClient::new(
        &config.gotenberg_url,
        &config.gotenberg_api_key,
        &config.render.wait_delay,
        client.clone(),
    ));
    let inliner = ImageInliner::new(
        storage.clone(),
        client,
        &config.storage.assets_bucket,
        config.legacy_uploads.clone(),
    )?;

    Ok(CardRenderer::new(
        orders,
        storage,
        converter,
        inliner,
        PipelineSettings {
            pdf_bucket: config.storage.pdf_bucket.clone(),
            signed_url_ttl: config.signed_url_ttl(),
        },
    ))
}
