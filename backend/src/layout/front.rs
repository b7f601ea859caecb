//! Front cover of the card.
//!
//! Preview shows the template art framed on a single panel. Production puts
//! it unframed on the second half of the sheet, next to a blank half.

use super::dom::{Element, HtmlDocument};
use super::geometry::SheetGeometry;
use super::{CardContent, LayoutConfig};
use common::requests::RenderFormat;

const FRONT_STYLES: &str = "\
.front-sheet { position: relative; overflow: hidden; background: #ffffff; }
.front-blank { position: absolute; background: #ffffff; }
.front-panel { position: absolute; overflow: hidden; }
.front-frame { width: 100%; height: 100%; overflow: hidden; }
.front-frame.framed { border: 1px solid #d9d9d9; border-radius: 4px; }
.front-art { display: block; width: 100%; height: 100%; object-fit: cover; }
.front-art-placeholder { width: 100%; height: 100%; background: #f3f3f3; }
";

/// The card cover.
///
/// Preview renders the art inside a bordered frame filling a single panel.
/// Production renders a whole sheet with the art on the second half and the
/// first half left white, so that the printed sheet folds into a card.
pub fn front_document(content: &CardContent, config: LayoutConfig) -> HtmlDocument {
    let geometry = config.geometry();
    let framed = config.format == RenderFormat::Preview;
    log::debug!(
        "Front layout: {:?} sheet {}x{} framed={}",
        geometry.arrangement,
        geometry.overall.width_in,
        geometry.overall.height_in,
        framed
    );

    let art = match &content.template_art {
        Some(data_url) => Element::new("img")
            .class("front-art")
            .attr("src", data_url.as_str())
            .attr("alt", "Card front"),
        None => Element::new("div").class("front-art-placeholder"),
    };
    let frame = Element::new("div")
        .class(if framed { "front-frame framed" } else { "front-frame" })
        .child(art);

    HtmlDocument {
        title: "Card front".to_string(),
        page: geometry.overall,
        styles: vec![FRONT_STYLES.to_string()],
        body: vec![sheet(&geometry, "front", frame).into()],
    }
}

/// Sheet wrapper shared by both faces: blank half (if any) plus a content box.
pub(super) fn sheet(geometry: &SheetGeometry, prefix: &str, content: Element) -> Element {
    let mut sheet = Element::new("div").class(&format!("{}-sheet", prefix)).style(format!(
        "width: {}; height: {};",
        geometry.overall.width_css(),
        geometry.overall.height_css()
    ));
    if geometry.has_blank_half() {
        sheet = sheet.child(
            Element::new("div")
                .class(&format!("{}-blank", prefix))
                .style(geometry.blank_box_css()),
        );
    }
    sheet.child(
        Element::new("div")
            .class(&format!("{}-panel", prefix))
            .style(geometry.content_box_css())
            .child(content),
    )
}
