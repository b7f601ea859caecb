use serde::{Deserialize, Serialize};

/// A single customer purchase, as stored in the `orders` table.
///
/// Only the fields the card renderer reads (and the three derived
/// `production_combined_pdf_*` columns it writes back) are modelled here.
/// Any other columns on the row are ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub template_id: String,
    /// Free text typed by the customer. Wins over `selected_message`.
    #[serde(default)]
    pub custom_message: Option<String>,
    /// One of the predefined greetings picked in the wizard.
    #[serde(default)]
    pub selected_message: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub signature_url: Option<String>,
    /// Signature after the customer cropped it. Wins over `signature_url`.
    #[serde(default)]
    pub cropped_signature_url: Option<String>,
    #[serde(default)]
    pub production_combined_pdf_path: Option<String>,
    #[serde(default)]
    pub production_combined_pdf_public_url: Option<String>,
    #[serde(default)]
    pub production_combined_pdf_generated_at: Option<String>,
    /// Row version used to detect concurrent regenerations of the combined PDF.
    #[serde(default)]
    pub version: i64,
}

impl Order {
    /// The greeting printed inside the card, or an empty string.
    pub fn effective_message(&self) -> &str {
        non_empty(&self.custom_message)
            .or_else(|| non_empty(&self.selected_message))
            .unwrap_or("")
    }

    pub fn effective_logo(&self) -> Option<&str> {
        non_empty(&self.logo_url)
    }

    pub fn effective_signature(&self) -> Option<&str> {
        non_empty(&self.cropped_signature_url).or_else(|| non_empty(&self.signature_url))
    }
}

/// Derived columns written after a full production combined render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedPdfRecord {
    pub production_combined_pdf_path: String,
    pub production_combined_pdf_public_url: String,
    /// RFC 3339 timestamp.
    pub production_combined_pdf_generated_at: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
