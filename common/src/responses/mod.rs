use serde::{Deserialize, Serialize};

/// Successful response of `POST /generate-card-gotenberg`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub success: bool,
    pub pdf_path: String,
    /// Time-limited signed URL.
    pub download_url: String,
    pub public_url: String,
    pub message: String,
}

/// One stored PDF of a batch render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredPdf {
    pub pdf_path: String,
    pub download_url: String,
    pub public_url: String,
}

/// Successful response of `POST /generate-card-pdfs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchRenderResponse {
    pub success: bool,
    pub front: StoredPdf,
    pub inside: StoredPdf,
    pub message: String,
}

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
