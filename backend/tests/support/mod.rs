#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use backend::config::LegacyUploadsConfig;
use backend::error::{RenderError, Result};
use backend::gotenberg::PdfConverter;
use backend::inline::ImageInliner;
use backend::layout::geometry::PageSize;
use backend::orders::OrderStore;
use backend::pipeline::{CardRenderer, PipelineSettings};
use backend::storage::{ObjectStorage, StoredObject};
use common::model::order::{CombinedPdfRecord, Order};
use common::model::template::Template;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub mod http_stub;

pub const ASSETS_BUCKET: &str = "order-assets";
pub const PDF_BUCKET: &str = "card-pdfs";
pub const PNG_BYTES: [u8; 12] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

#[derive(Default)]
pub struct MemoryOrders {
    orders: Mutex<HashMap<String, Order>>,
    templates: Mutex<HashMap<String, Template>>,
    records: Mutex<Vec<(String, CombinedPdfRecord)>>,
    /// Simulates another writer touching the order right after it was read.
    race_after_read: AtomicBool,
}

impl MemoryOrders {
    pub fn insert_order(&self, order: Order) {
        self.orders.lock().unwrap().insert(order.id.clone(), order);
    }

    pub fn insert_template(&self, template: Template) {
        self.templates
            .lock()
            .unwrap()
            .insert(template.id.clone(), template);
    }

    pub fn order(&self, id: &str) -> Order {
        self.orders.lock().unwrap()[id].clone()
    }

    pub fn records(&self) -> Vec<(String, CombinedPdfRecord)> {
        self.records.lock().unwrap().clone()
    }

    pub fn race_after_read(&self) {
        self.race_after_read.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderStore for MemoryOrders {
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        let mut orders = self.orders.lock().unwrap();
        let found = orders.get(order_id).cloned();
        if self.race_after_read.load(Ordering::SeqCst) {
            if let Some(order) = orders.get_mut(order_id) {
                order.version += 1;
            }
        }
        Ok(found)
    }

    async fn get_template(&self, template_id: &str) -> Result<Option<Template>> {
        Ok(self.templates.lock().unwrap().get(template_id).cloned())
    }

    async fn record_combined_pdf(
        &self,
        order_id: &str,
        expected_version: i64,
        record: &CombinedPdfRecord,
    ) -> Result<bool> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.get_mut(order_id) else {
            return Ok(false);
        };
        if order.version != expected_version {
            return Ok(false);
        }
        order.production_combined_pdf_path = Some(record.production_combined_pdf_path.clone());
        order.production_combined_pdf_public_url =
            Some(record.production_combined_pdf_public_url.clone());
        order.production_combined_pdf_generated_at =
            Some(record.production_combined_pdf_generated_at.clone());
        order.version += 1;
        self.records
            .lock()
            .unwrap()
            .push((order_id.to_string(), record.clone()));
        Ok(true)
    }
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub bucket: String,
    pub path: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    uploads: Mutex<Vec<Upload>>,
}

impl MemoryStorage {
    pub fn put(&self, bucket: &str, path: &str, bytes: &[u8], content_type: &str) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), path.to_string()),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: Some(content_type.to_string()),
            },
        );
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn download(&self, bucket: &str, path: &str) -> Result<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| RenderError::Storage(format!("object {}/{} not found", bucket, path)))
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.uploads.lock().unwrap().push(Upload {
            bucket: bucket.to_string(),
            path: path.to_string(),
            bytes,
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    async fn signed_url(&self, bucket: &str, path: &str, ttl: Duration) -> Result<String> {
        Ok(format!(
            "https://storage.test/sign/{}/{}?expires={}",
            bucket,
            path,
            ttl.as_secs()
        ))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://storage.test/public/{}/{}", bucket, path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Html { html: String, paper: PageSize },
    Url { url: String, paper: PageSize },
}

pub struct RecordingConverter {
    output: Vec<u8>,
    calls: Mutex<Vec<Conversion>>,
}

impl RecordingConverter {
    pub fn new(output: Vec<u8>) -> Self {
        Self {
            output,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Conversion> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfConverter for RecordingConverter {
    async fn convert_html(&self, html: String, paper: PageSize) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push(Conversion::Html { html, paper });
        Ok(self.output.clone())
    }

    async fn convert_url(&self, url: &str, paper: PageSize) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(Conversion::Url {
            url: url.to_string(),
            paper,
        });
        Ok(self.output.clone())
    }
}

pub struct Harness {
    pub orders: Arc<MemoryOrders>,
    pub storage: Arc<MemoryStorage>,
    pub converter: Arc<RecordingConverter>,
    pub renderer: CardRenderer,
}

/// A renderer over in-memory collaborators, seeded with template `t-1`
/// (art stored at `templates/snow.png`) and logo `logos/acme.png`.
pub fn harness(converter_output: Vec<u8>) -> Harness {
    let orders = Arc::new(MemoryOrders::default());
    let storage = Arc::new(MemoryStorage::default());
    let converter = Arc::new(RecordingConverter::new(converter_output));

    orders.insert_template(Template {
        id: "t-1".into(),
        name: Some("Snowfall".into()),
        preview_url: Some("templates/snow.png".into()),
    });
    storage.put(ASSETS_BUCKET, "templates/snow.png", &PNG_BYTES, "image/png");
    storage.put(ASSETS_BUCKET, "logos/acme.png", &PNG_BYTES, "image/png");

    let inliner = ImageInliner::new(
        storage.clone(),
        reqwest::Client::new(),
        ASSETS_BUCKET,
        LegacyUploadsConfig {
            prefix: "/lovable-uploads/".into(),
            host: None,
        },
    )
    .unwrap();
    let renderer = CardRenderer::new(
        orders.clone(),
        storage.clone(),
        converter.clone(),
        inliner,
        PipelineSettings {
            pdf_bucket: PDF_BUCKET.into(),
            signed_url_ttl: Duration::from_secs(600),
        },
    );

    Harness {
        orders,
        storage,
        converter,
        renderer,
    }
}

pub fn order(id: &str) -> Order {
    Order {
        id: id.into(),
        template_id: "t-1".into(),
        custom_message: Some(
            "Happy Holidays from all of us to you and your family this season.".into(),
        ),
        logo_url: Some("logos/acme.png".into()),
        ..Default::default()
    }
}

/// A valid PDF with `num_pages` pages.
pub fn sample_pdf(num_pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();
    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 738.into(), 1008.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => num_pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

pub fn page_rotations(pdf: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|id| {
            doc.get_dictionary(*id)
                .unwrap()
                .get(b"Rotate")
                .and_then(|o| o.as_i64())
                .unwrap_or(0)
        })
        .collect()
}
