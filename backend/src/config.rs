//! Service configuration.
//!
//! Values are layered: built-in defaults, then `config/default.toml` when it
//! exists, then the process environment. Nested keys use `__` in environment
//! variable names (`SERVER__PORT=9000`). The four credentials of the external
//! services have no default, so a missing one fails startup.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub gotenberg_url: String,
    pub gotenberg_api_key: String,
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub render: RenderConfig,
    pub legacy_uploads: LegacyUploadsConfig,
    pub orders: OrdersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub json_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding logos, signatures and template art.
    pub assets_bucket: String,
    /// Bucket receiving generated PDFs.
    pub pdf_bucket: String,
    pub signed_url_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Client-side delay the render service waits before printing, e.g. `2s`.
    pub wait_delay: String,
}

/// Uploads under `prefix` were historically served by another host.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyUploadsConfig {
    pub prefix: String,
    #[serde(default)]
    pub host: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdersBackend {
    Supabase,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
    pub backend: OrdersBackend,
    pub sqlite_path: String,
}

impl AppConfig {
    /// Loads the configuration from `config/default.toml` and the environment.
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            );
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Builds the configuration from an explicit set of environment-style
    /// variables, ignoring the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let builder = Self::defaults()?.add_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true)
                .source(Some(vars)),
        );
        Ok(builder.build()?.try_deserialize()?)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.json_limit_bytes", 10 * 1024 * 1024)?
            .set_default("storage.assets_bucket", "order-assets")?
            .set_default("storage.pdf_bucket", "card-pdfs")?
            .set_default("storage.signed_url_ttl_secs", 3600)?
            .set_default("render.wait_delay", "2s")?
            .set_default("legacy_uploads.prefix", "/lovable-uploads/")?
            .set_default("orders.backend", "supabase")?
            .set_default("orders.sqlite_path", "orders.sqlite")?)
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.storage.signed_url_ttl_secs)
    }
}
