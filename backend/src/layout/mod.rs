//! # Card Layouts
//!
//! Pure functions turning card content into self-contained HTML documents
//! sized to an exact physical page.
//!
//! - `front`: the cover art, either framed on a single panel (preview) or on
//!   one half of a print sheet next to a blank half (production).
//! - `inside`: greeting, logo and signature stacked at fixed heights.
//! - `compose`: stacks two generated documents into one taller page.
//!
//! Images are always passed in as `data:` URLs; the generated HTML never
//! references remote resources.

pub mod compose;
pub mod dom;
pub mod front;
pub mod geometry;
pub mod inside;

use common::requests::{Orientation, RenderFormat};

use self::dom::HtmlDocument;
use self::geometry::SheetGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Front,
    Inside,
}

/// Everything that selects a layout variant and its page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub format: RenderFormat,
    pub spread: bool,
    pub orientation: Orientation,
}

impl LayoutConfig {
    pub fn new(format: RenderFormat, spread: bool, orientation: Orientation) -> Self {
        Self {
            format,
            spread,
            orientation,
        }
    }

    pub fn geometry(&self) -> SheetGeometry {
        SheetGeometry::select(self.format, self.spread, self.orientation)
    }
}

/// Card content with every image already inlined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardContent {
    pub message: String,
    pub logo: Option<String>,
    pub signature: Option<String>,
    pub template_art: Option<String>,
}

pub fn generate_document(face: CardFace, content: &CardContent, config: LayoutConfig) -> HtmlDocument {
    match face {
        CardFace::Front => front::front_document(content, config),
        CardFace::Inside => inside::inside_document(content, config),
    }
}

pub fn generate(face: CardFace, content: &CardContent, config: LayoutConfig) -> String {
    generate_document(face, content, config).to_html()
}
