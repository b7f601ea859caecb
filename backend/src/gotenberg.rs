//! Client for the Chromium-based HTML-to-PDF conversion service.
//!
//! Generated HTML is posted as the `index.html` file part of
//! `/forms/chromium/convert/html`; live pages go through
//! `/forms/chromium/convert/url`. Page size always matches the layout, with
//! zero margins and the CSS `@page` size preferred.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::error::{RenderError, Result};
use crate::layout::geometry::PageSize;

const HTML_ROUTE: &str = "/forms/chromium/convert/html";
const URL_ROUTE: &str = "/forms/chromium/convert/url";

/// Anything that can turn a card document into PDF bytes.
#[async_trait]
pub trait PdfConverter: Send + Sync {
    async fn convert_html(&self, html: String, paper: PageSize) -> Result<Vec<u8>>;

    async fn convert_url(&self, url: &str, paper: PageSize) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct GotenbergClient {
    base_url: String,
    api_key: String,
    wait_delay: String,
    client: Client,
}

impl GotenbergClient {
    pub fn new(base_url: &str, api_key: &str, wait_delay: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            wait_delay: wait_delay.to_string(),
            client,
        }
    }

    /// Plain form fields sent with every conversion.
    fn form_fields(&self, paper: PageSize, url_mode: bool) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("paperWidth", paper.width_in.to_string()),
            ("paperHeight", paper.height_in.to_string()),
            ("marginTop", "0".to_string()),
            ("marginBottom", "0".to_string()),
            ("marginLeft", "0".to_string()),
            ("marginRight", "0".to_string()),
            ("landscape", "false".to_string()),
            ("preferCssPageSize", "true".to_string()),
            ("waitDelay", self.wait_delay.clone()),
        ];
        if url_mode {
            fields.push(("emulatedMediaType", "print".to_string()));
        }
        fields
    }

    async fn send(&self, route: &str, mut form: Form, paper: PageSize, url_mode: bool) -> Result<Vec<u8>> {
        for (name, value) in self.form_fields(paper, url_mode) {
            form = form.text(name, value);
        }

        let endpoint = format!("{}{}", self.base_url, route);
        log::info!(
            "Converting to PDF via {} ({}in x {}in)",
            endpoint,
            paper.width_in,
            paper.height_in
        );
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .header("X-Api-Key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RenderError::RenderService {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl PdfConverter for GotenbergClient {
    async fn convert_html(&self, html: String, paper: PageSize) -> Result<Vec<u8>> {
        let part = Part::text(html)
            .file_name("index.html")
            .mime_str("text/html")?;
        let form = Form::new().part("files", part);
        self.send(HTML_ROUTE, form, paper, false).await
    }

    async fn convert_url(&self, url: &str, paper: PageSize) -> Result<Vec<u8>> {
        let form = Form::new().text("url", url.to_string());
        self.send(URL_ROUTE, form, paper, true).await
    }
}
