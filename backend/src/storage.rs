//! Object storage for card assets and generated PDFs.
//!
//! The pipeline only depends on the [`ObjectStorage`] trait. Production uses
//! [`SupabaseStorage`], which talks to the Supabase Storage REST API with the
//! service-role key.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{RenderError, Result};

/// Bytes of a stored object plus the content type the store reported.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn download(&self, bucket: &str, path: &str) -> Result<StoredObject>;

    /// Stores `bytes` at `path`, replacing any existing object.
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<()>;

    async fn signed_url(&self, bucket: &str, path: &str, ttl: Duration) -> Result<String>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

pub struct SupabaseStorage {
    base_url: String,
    service_key: String,
    client: Client,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, service_key: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            client,
        }
    }

    /// `{base}/storage/v1/object/{kind...}/{bucket}/{path}` with every path
    /// segment percent-encoded.
    fn object_url(&self, kind: &[&str], bucket: &str, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RenderError::Storage(format!("invalid storage URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| RenderError::Storage("storage URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["storage", "v1", "object"])
            .extend(kind)
            .push(bucket)
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn download(&self, bucket: &str, path: &str) -> Result<StoredObject> {
        let url = self.object_url(&[], bucket, path)?;
        let response = self.authorized(self.client.get(url)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(RenderError::Storage(format!(
                "object {}/{} not found",
                bucket, path
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Storage(format!(
                "download of {}/{} failed ({}): {}",
                bucket, path, status, body
            )));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok(StoredObject {
            bytes,
            content_type,
        })
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = self.object_url(&[], bucket, path)?;
        let response = self
            .authorized(self.client.post(url))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Storage(format!(
                "upload of {}/{} failed ({}): {}",
                bucket, path, status, body
            )));
        }
        Ok(())
    }

    async fn signed_url(&self, bucket: &str, path: &str, ttl: Duration) -> Result<String> {
        let url = self.object_url(&["sign"], bucket, path)?;
        let response = self
            .authorized(self.client.post(url))
            .json(&serde_json::json!({ "expiresIn": ttl.as_secs() }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Storage(format!(
                "signing {}/{} failed ({}): {}",
                bucket, path, status, body
            )));
        }
        let signed: SignedUrlResponse = response.json().await?;
        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        match self.object_url(&["public"], bucket, path) {
            Ok(url) => url.to_string(),
            Err(_) => format!(
                "{}/storage/v1/object/public/{}/{}",
                self.base_url, bucket, path
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        SupabaseStorage::new("https://project.supabase.test/", "key", Client::new())
    }

    #[test]
    fn builds_object_urls() {
        let url = storage()
            .object_url(&[], "card-pdfs", "cards/o-1_gotenberg_1.pdf")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.supabase.test/storage/v1/object/card-pdfs/cards/o-1_gotenberg_1.pdf"
        );
    }

    #[test]
    fn encodes_path_segments() {
        let url = storage()
            .object_url(&["sign"], "order-assets", "logos/acme logo.png")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.supabase.test/storage/v1/object/sign/order-assets/logos/acme%20logo.png"
        );
    }

    #[test]
    fn public_url_has_public_segment() {
        assert_eq!(
            storage().public_url("card-pdfs", "cards/a.pdf"),
            "https://project.supabase.test/storage/v1/object/public/card-pdfs/cards/a.pdf"
        );
    }
}
