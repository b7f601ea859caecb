//! # Image Inlining
//!
//! Turns a logo, signature or template-art reference into a
//! `data:<mime>;base64,...` URL so that the render service never needs to
//! reach our origins.
//!
//! ## Resolution order
//!
//! 1. `data:` URLs are returned untouched.
//! 2. Supabase storage URLs (`.../storage/v1/object/[public|sign|authenticated/]{bucket}/{path}`)
//!    and bare object keys (`logos/acme.png`) are downloaded from storage.
//! 3. Anything else is fetched over HTTP, trying the literal URL, then the URL
//!    resolved against the caller's origin, then the legacy upload host for
//!    paths under the legacy upload prefix.
//!
//! The MIME type comes from the response header when it names an image,
//! otherwise from the magic bytes (PNG, JPEG, WEBP), otherwise from the file
//! extension, defaulting to PNG.

use std::io::Write;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::write::EncoderStringWriter;
use image::ImageFormat;
use log::{debug, warn};
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

use crate::config::LegacyUploadsConfig;
use crate::error::{RenderError, Result};
use crate::storage::ObjectStorage;

/// Size of the slices fed to the base64 encoder.
const ENCODE_CHUNK_BYTES: usize = 8 * 1024;
const DEFAULT_MIME: &str = "image/png";

/// Raw image bytes and whatever content type the source announced.
struct FetchedImage {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Where an image reference points.
#[derive(Debug, PartialEq, Eq)]
enum ImageSource {
    DataUrl,
    Storage { bucket: String, path: String },
    Http,
}

pub struct ImageInliner {
    storage: Arc<dyn ObjectStorage>,
    client: Client,
    assets_bucket: String,
    storage_url: Regex,
    legacy: LegacyUploadsConfig,
}

impl ImageInliner {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        client: Client,
        assets_bucket: &str,
        legacy: LegacyUploadsConfig,
    ) -> Result<Self> {
        let storage_url = Regex::new(
            r"^(?:https?://[^/]+)?/storage/v1/object/(?:public/|sign/|authenticated/)?([^/?#]+)/([^?#]+)",
        )
        .map_err(|e| RenderError::Internal(format!("Regex error: {}", e)))?;
        Ok(Self {
            storage,
            client,
            assets_bucket: assets_bucket.to_string(),
            storage_url,
            legacy,
        })
    }

    /// Inlines an optional asset. Every failure is logged and reported as
    /// `None`, so a broken logo never fails a render on its own.
    pub async fn inline(&self, source: &str, origin: Option<&str>) -> Option<String> {
        match self.try_inline(source, origin).await {
            Ok(data_url) => Some(data_url),
            Err(e) => {
                warn!("Could not inline image '{}': {}", source, e);
                None
            }
        }
    }

    /// Inlines an asset the caller cannot do without.
    pub async fn try_inline(&self, source: &str, origin: Option<&str>) -> Result<String> {
        let source = source.trim();
        if source.is_empty() {
            return Err(RenderError::Storage("empty image reference".to_string()));
        }

        let fetched = match self.classify(source) {
            ImageSource::DataUrl => return Ok(source.to_string()),
            ImageSource::Storage { bucket, path } => {
                debug!("Inlining {} from storage bucket {}", path, bucket);
                let object = self.storage.download(&bucket, &path).await?;
                FetchedImage {
                    bytes: object.bytes,
                    content_type: object.content_type,
                }
            }
            ImageSource::Http => self.fetch_http(source, origin).await?,
        };

        if fetched.bytes.is_empty() {
            return Err(RenderError::Storage(format!("image '{}' is empty", source)));
        }
        let mime = detect_mime(fetched.content_type.as_deref(), &fetched.bytes, source);
        Ok(to_data_url(&mime, &fetched.bytes))
    }

    fn classify(&self, source: &str) -> ImageSource {
        if source.starts_with("data:") {
            return ImageSource::DataUrl;
        }
        if let Some(caps) = self.storage_url.captures(source) {
            let path = caps[2].to_string();
            let path = urlencoding::decode(&path)
                .map(|p| p.into_owned())
                .unwrap_or(path);
            return ImageSource::Storage {
                bucket: caps[1].to_string(),
                path,
            };
        }
        let is_url = source.starts_with("http://")
            || source.starts_with("https://")
            || source.starts_with('/')
            || source.starts_with("./")
            || source.starts_with("../");
        if is_url {
            ImageSource::Http
        } else {
            ImageSource::Storage {
                bucket: self.assets_bucket.clone(),
                path: source.to_string(),
            }
        }
    }

    /// Candidate URLs for an HTTP asset, in the order they are tried.
    fn http_candidates(&self, source: &str, origin: Option<&str>) -> Vec<Url> {
        let mut candidates = Vec::new();
        if let Ok(url) = Url::parse(source) {
            candidates.push(url);
        }
        if let Some(resolved) = origin
            .and_then(|o| Url::parse(o).ok())
            .and_then(|base| base.join(source).ok())
        {
            candidates.push(resolved);
        }
        if let Some(host) = &self.legacy.host {
            let path = Url::parse(source)
                .map(|u| u.path().to_string())
                .unwrap_or_else(|_| source.to_string());
            if path.starts_with(&self.legacy.prefix) {
                if let Some(url) = Url::parse(host).ok().and_then(|h| h.join(&path).ok()) {
                    candidates.push(url);
                }
            }
        }
        candidates.dedup();
        candidates
    }

    async fn fetch_http(&self, source: &str, origin: Option<&str>) -> Result<FetchedImage> {
        let candidates = self.http_candidates(source, origin);
        if candidates.is_empty() {
            return Err(RenderError::Storage(format!(
                "no way to resolve '{}' without an origin",
                source
            )));
        }

        let mut last_error = String::new();
        for url in candidates {
            debug!("Fetching image {}", url);
            match self.client.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    let content_type = response
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let bytes = response.bytes().await?.to_vec();
                    return Ok(FetchedImage {
                        bytes,
                        content_type,
                    });
                }
                Ok(response) => last_error = format!("{} returned {}", url, response.status()),
                Err(e) => last_error = format!("{}: {}", url, e),
            }
            warn!("Image candidate failed, trying next: {}", last_error);
        }
        Err(RenderError::Storage(format!(
            "image '{}' unavailable ({})",
            source, last_error
        )))
    }
}

/// Picks the MIME type for `bytes`: trusted header, magic bytes, extension.
pub fn detect_mime(header: Option<&str>, bytes: &[u8], source: &str) -> String {
    if let Some(mime) = header
        .and_then(|h| h.split(';').next())
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| h.starts_with("image/"))
    {
        return mime;
    }

    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => return "image/png".to_string(),
        Ok(ImageFormat::Jpeg) => return "image/jpeg".to_string(),
        Ok(ImageFormat::WebP) => return "image/webp".to_string(),
        _ => {}
    }

    let path = source.split(['?', '#']).next().unwrap_or(source);
    mime_guess::from_path(path)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME.to_string())
}

/// Base64-encodes `bytes` chunk by chunk into a data URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    let prefix = format!("data:{};base64,", mime);
    let mut encoder = EncoderStringWriter::from_consumer(prefix, &BASE64);
    for chunk in bytes.chunks(ENCODE_CHUNK_BYTES) {
        // Writing into a String cannot fail.
        let _ = encoder.write_all(chunk);
    }
    encoder.into_inner()
}
