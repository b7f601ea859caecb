//! # Card Rendering Pipeline
//!
//! Drives one render request from order id to stored PDF.
//!
//! ## Workflow
//!
//! 1.  **Lookup**: the order and its template are loaded; either one missing
//!     fails the request.
//! 2.  **Inlining**: template art, logo and signature are turned into data
//!     URLs concurrently. The effective signature is the cropped one when
//!     present. Strictness depends on the request (see `AssetPolicy`).
//! 3.  **Layout**: front and/or inside documents are generated; when both are
//!     requested they are composed into one page.
//! 4.  **Conversion**: the document goes to the PDF converter. In `url` mode
//!     the caller's live page is converted instead. `debug` mode stops before
//!     this step and hands back the HTML.
//! 5.  **Rotation**: production combined renders with `rotate` get the mail
//!     vendor page rotation, best effort.
//! 6.  **Storage**: the PDF is uploaded under a fresh timestamped key, and a
//!     signed plus a public URL are produced.
//! 7.  **Write-back**: production combined renders that are not
//!     `previewOnly` record the public URL on the order, guarded by the
//!     order's version.
//!
//! Renders are never cached or deduplicated: every call uploads a new file.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::model::order::{CombinedPdfRecord, Order};
use common::model::template::Template;
use common::requests::{
    BatchRenderRequest, CardSection, Orientation, RenderFormat, RenderMode, RenderRequest,
};
use common::responses::{BatchRenderResponse, RenderResponse, StoredPdf};
use log::{debug, error, info};

use crate::error::{RenderError, Result};
use crate::gotenberg::PdfConverter;
use crate::inline::ImageInliner;
use crate::layout::compose::compose;
use crate::layout::dom::HtmlDocument;
use crate::layout::geometry::PageSize;
use crate::layout::{generate_document, CardContent, CardFace, LayoutConfig};
use crate::orders::OrderStore;
use crate::rotate::rotate_for_mail_vendor;
use crate::storage::ObjectStorage;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Result of a render request.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    Stored(RenderResponse),
    /// `debug` mode: the generated document, not converted or stored.
    Html(String),
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub pdf_bucket: String,
    pub signed_url_ttl: Duration,
}

/// Which image failures abort a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AssetPolicy {
    template_art_required: bool,
    referenced_assets_required: bool,
}

impl AssetPolicy {
    fn for_request(format: RenderFormat, only: CardSection) -> Self {
        let production = format == RenderFormat::Production;
        Self {
            template_art_required: production && only.includes_front(),
            referenced_assets_required: production && only == CardSection::FrontAndInside,
        }
    }
}

/// Hands out millisecond timestamps that never repeat within the process.
#[derive(Debug, Default)]
struct ArtifactClock {
    last: AtomicI64,
}

impl ArtifactClock {
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

pub struct CardRenderer {
    orders: Arc<dyn OrderStore>,
    storage: Arc<dyn ObjectStorage>,
    converter: Arc<dyn PdfConverter>,
    inliner: ImageInliner,
    settings: PipelineSettings,
    clock: ArtifactClock,
}

impl CardRenderer {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        storage: Arc<dyn ObjectStorage>,
        converter: Arc<dyn PdfConverter>,
        inliner: ImageInliner,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            orders,
            storage,
            converter,
            inliner,
            settings,
            clock: ArtifactClock::default(),
        }
    }

    pub async fn render(&self, request: &RenderRequest) -> Result<RenderOutput> {
        validate(request)?;
        info!(
            "Render request: order={} only={:?} format={:?} mode={:?} orientation={:?}",
            request.order_id, request.only, request.format, request.mode, request.orientation
        );

        let (order, template) = self.load_order(&request.order_id).await?;
        let config = layout_config(request.format, request.orientation);

        let pdf = match request.mode {
            RenderMode::Url => {
                // validate() guarantees the URL is present.
                let url = request.full_url.as_deref().unwrap_or_default();
                let paper = paper_for(request.only, config);
                self.converter.convert_url(url, paper).await?
            }
            RenderMode::Html | RenderMode::Debug => {
                let policy = AssetPolicy::for_request(request.format, request.only);
                let content = self
                    .card_content(&order, &template, request.only, policy, request.origin.as_deref())
                    .await?;
                let document = build_document(request.only, &content, config);
                if request.mode == RenderMode::Debug {
                    return Ok(RenderOutput::Html(document.to_html()));
                }
                self.converter.convert_html(document.to_html(), document.page).await?
            }
        };

        let pdf = if request.rotate && request.is_production_combined() {
            rotate_for_mail_vendor(pdf)
        } else {
            pdf
        };

        let pdf_path = format!("cards/{}_gotenberg_{}.pdf", order.id, self.clock.next_stamp());
        let stored = self.store(&pdf_path, pdf).await?;

        if request.is_production_combined() && !request.preview_only {
            self.record_combined(&order, &stored).await?;
        }

        info!("Render finished: order={} path={}", order.id, stored.pdf_path);
        Ok(RenderOutput::Stored(RenderResponse {
            success: true,
            pdf_path: stored.pdf_path,
            download_url: stored.download_url,
            public_url: stored.public_url,
            message: "PDF generated successfully".to_string(),
        }))
    }

    /// Renders the front and the inside of an order as two separate PDFs.
    pub async fn render_separately(&self, request: &BatchRenderRequest) -> Result<BatchRenderResponse> {
        if request.order_id.trim().is_empty() {
            return Err(RenderError::InvalidRequest("orderId is required".to_string()));
        }
        info!(
            "Separate render request: order={} format={:?}",
            request.order_id, request.format
        );

        let (order, template) = self.load_order(&request.order_id).await?;
        let config = layout_config(request.format, request.orientation);
        let policy = AssetPolicy::for_request(request.format, CardSection::Front);
        let content = self
            .card_content(
                &order,
                &template,
                CardSection::FrontAndInside,
                policy,
                request.origin.as_deref(),
            )
            .await?;

        let front = generate_document(CardFace::Front, &content, config);
        let inside = generate_document(CardFace::Inside, &content, config);
        let (front_pdf, inside_pdf) = futures_util::try_join!(
            self.converter.convert_html(front.to_html(), front.page),
            self.converter.convert_html(inside.to_html(), inside.page),
        )?;

        let stamp = self.clock.next_stamp();
        let front = self
            .store(&format!("cards/{}_front_{}.pdf", order.id, stamp), front_pdf)
            .await?;
        let inside = self
            .store(&format!("cards/{}_inside_{}.pdf", order.id, stamp), inside_pdf)
            .await?;

        Ok(BatchRenderResponse {
            success: true,
            front,
            inside,
            message: "PDFs generated successfully".to_string(),
        })
    }

    async fn load_order(&self, order_id: &str) -> Result<(Order, Template)> {
        let order = self
            .orders
            .get_order(order_id)
            .await?
            .ok_or_else(|| RenderError::OrderNotFound(order_id.to_string()))?;
        let template = self
            .orders
            .get_template(&order.template_id)
            .await?
            .ok_or_else(|| RenderError::TemplateNotFound(order.template_id.clone()))?;
        Ok((order, template))
    }

    /// Inlines every image the requested faces show.
    async fn card_content(
        &self,
        order: &Order,
        template: &Template,
        only: CardSection,
        policy: AssetPolicy,
        origin: Option<&str>,
    ) -> Result<CardContent> {
        let art_source = if only.includes_front() {
            non_empty(template.preview_url.as_deref())
        } else {
            None
        };
        let (logo_source, signature_source) = if only.includes_inside() {
            (order.effective_logo(), order.effective_signature())
        } else {
            (None, None)
        };

        if art_source.is_none() && policy.template_art_required {
            return Err(RenderError::TemplateImageUnavailable(format!(
                "template {} has no preview image",
                template.id
            )));
        }

        let (art, logo, signature) = futures_util::join!(
            self.inline_asset(art_source, origin, policy.template_art_required),
            self.inline_asset(logo_source, origin, policy.referenced_assets_required),
            self.inline_asset(signature_source, origin, policy.referenced_assets_required),
        );

        let template_art = art.map_err(|e| {
            error!("Template image failed for order {}: {}", order.id, e);
            RenderError::TemplateImageUnavailable(format!(
                "{} ({})",
                art_source.unwrap_or_default(),
                e
            ))
        })?;
        let logo = logo.map_err(|e| required_asset_error(&order.id, "logo", logo_source, e))?;
        let signature = signature
            .map_err(|e| required_asset_error(&order.id, "signature", signature_source, e))?;

        debug!(
            "Inlined assets for order {}: art={} logo={} signature={}",
            order.id,
            template_art.is_some(),
            logo.is_some(),
            signature.is_some()
        );
        Ok(CardContent {
            message: order.effective_message().to_string(),
            logo,
            signature,
            template_art,
        })
    }

    async fn inline_asset(
        &self,
        source: Option<&str>,
        origin: Option<&str>,
        required: bool,
    ) -> Result<Option<String>> {
        match source {
            None => Ok(None),
            Some(source) if required => self.inliner.try_inline(source, origin).await.map(Some),
            Some(source) => Ok(self.inliner.inline(source, origin).await),
        }
    }

    async fn store(&self, pdf_path: &str, pdf: Vec<u8>) -> Result<StoredPdf> {
        let bucket = &self.settings.pdf_bucket;
        let size = pdf.len();
        self.storage
            .upload(bucket, pdf_path, pdf, PDF_CONTENT_TYPE)
            .await?;
        info!("Uploaded {} bytes to {}/{}", size, bucket, pdf_path);

        let download_url = self
            .storage
            .signed_url(bucket, pdf_path, self.settings.signed_url_ttl)
            .await?;
        let public_url = self.storage.public_url(bucket, pdf_path);
        Ok(StoredPdf {
            pdf_path: pdf_path.to_string(),
            download_url,
            public_url,
        })
    }

    async fn record_combined(&self, order: &Order, stored: &StoredPdf) -> Result<()> {
        let record = CombinedPdfRecord {
            production_combined_pdf_path: stored.pdf_path.clone(),
            production_combined_pdf_public_url: stored.public_url.clone(),
            production_combined_pdf_generated_at: Utc::now().to_rfc3339(),
        };
        if self
            .orders
            .record_combined_pdf(&order.id, order.version, &record)
            .await?
        {
            info!("Recorded combined production PDF on order {}", order.id);
            Ok(())
        } else {
            Err(RenderError::ConcurrentRegeneration(order.id.clone()))
        }
    }
}

fn validate(request: &RenderRequest) -> Result<()> {
    if request.order_id.trim().is_empty() {
        return Err(RenderError::InvalidRequest("orderId is required".to_string()));
    }
    if request.mode == RenderMode::Url && non_empty(request.full_url.as_deref()).is_none() {
        return Err(RenderError::InvalidRequest(
            "fullUrl is required in url mode".to_string(),
        ));
    }
    Ok(())
}

/// Production always prints on a full sheet.
fn layout_config(format: RenderFormat, orientation: Orientation) -> LayoutConfig {
    LayoutConfig::new(format, format == RenderFormat::Production, orientation)
}

fn build_document(only: CardSection, content: &CardContent, config: LayoutConfig) -> HtmlDocument {
    match only {
        CardSection::Front => generate_document(CardFace::Front, content, config),
        CardSection::Inside => generate_document(CardFace::Inside, content, config),
        CardSection::FrontAndInside => compose(
            generate_document(CardFace::Front, content, config),
            generate_document(CardFace::Inside, content, config),
        ),
    }
}

/// Page size of the document `build_document` would produce.
fn paper_for(only: CardSection, config: LayoutConfig) -> PageSize {
    let sheet = config.geometry().overall;
    match only {
        CardSection::FrontAndInside => PageSize::new(sheet.width_in, sheet.height_in * 2.0),
        _ => sheet,
    }
}

fn required_asset_error(
    order_id: &str,
    kind: &'static str,
    source: Option<&str>,
    cause: RenderError,
) -> RenderError {
    error!("Required {} failed for order {}: {}", kind, order_id, cause);
    RenderError::AssetUnavailable {
        kind,
        path: source.unwrap_or_default().to_string(),
        reason: cause.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
