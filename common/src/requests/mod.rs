use serde::{Deserialize, Serialize};

/// Which faces of the card a render covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardSection {
    #[serde(rename = "front")]
    Front,
    #[serde(rename = "inside")]
    Inside,
    #[default]
    #[serde(rename = "front+inside")]
    FrontAndInside,
}

impl CardSection {
    pub fn includes_front(self) -> bool {
        matches!(self, CardSection::Front | CardSection::FrontAndInside)
    }

    pub fn includes_inside(self) -> bool {
        matches!(self, CardSection::Inside | CardSection::FrontAndInside)
    }
}

/// `Preview` is a simplified on-screen approximation, `Production` the exact
/// sheet geometry the print vendor expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Preview,
    Production,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Render a live page (`full_url`) instead of generated HTML.
    Url,
    #[default]
    Html,
    /// Return the generated HTML without converting or storing anything.
    Debug,
}

/// Request payload for `POST /generate-card-gotenberg`.
///
/// Only `order_id` is mandatory; everything else has a default that yields a
/// preview of the whole card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub order_id: String,
    #[serde(default)]
    pub only: CardSection,
    #[serde(default)]
    pub mode: RenderMode,
    #[serde(default)]
    pub format: RenderFormat,
    /// Origin of the calling page, used to resolve relative asset URLs.
    #[serde(default)]
    pub origin: Option<String>,
    /// Page to render when `mode` is `url`.
    #[serde(default)]
    pub full_url: Option<String>,
    #[serde(default)]
    pub rotate: bool,
    #[serde(default)]
    pub orientation: Orientation,
    /// When set, the combined production PDF is not recorded on the order.
    #[serde(default)]
    pub preview_only: bool,
}

impl RenderRequest {
    pub fn is_production_combined(&self) -> bool {
        self.format == RenderFormat::Production && self.only == CardSection::FrontAndInside
    }
}

/// Request payload for `POST /generate-card-pdfs`: front and inside as two
/// separate documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchRenderRequest {
    pub order_id: String,
    #[serde(default)]
    pub format: RenderFormat,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub origin: Option<String>,
}
