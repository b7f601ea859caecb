//! Inside page: greeting, optional logo and optional signature, each
//! centered at a fixed height of the content box.

use super::dom::{Element, HtmlDocument, Node};
use super::front::sheet;
use super::{CardContent, LayoutConfig};
use crate::message::format_message_with_line_break;

/// Vertical anchors inside the content box, as a share of its height.
const MESSAGE_TOP_PCT: u32 = 28;
const LOGO_TOP_PCT: u32 = 56;
const SIGNATURE_TOP_PCT: u32 = 68;

const INSIDE_STYLES: &str = "\
.inside-sheet { position: relative; overflow: hidden; background: #ffffff; }
.inside-blank { position: absolute; background: #ffffff; }
.inside-panel { position: absolute; overflow: hidden; background: #ffffff; }
.inside-row { position: absolute; left: 0; right: 0; display: flex; justify-content: center; }
.inside-message { padding: 0 0.5in; font-family: Georgia, 'Times New Roman', serif; font-size: 16pt; line-height: 1.4; color: #222222; text-align: center; }
.inside-logo-img { display: block; max-width: 45%; max-height: 0.9in; object-fit: contain; }
.inside-signature-img { display: block; max-width: 40%; max-height: 0.6in; object-fit: contain; }
";

/// The inside page: message, then optional logo, then optional signature.
pub fn inside_document(content: &CardContent, config: LayoutConfig) -> HtmlDocument {
    let geometry = config.geometry();
    log::debug!(
        "Inside layout: {:?} sheet {}x{} logo={} signature={}",
        geometry.arrangement,
        geometry.overall.width_in,
        geometry.overall.height_in,
        content.logo.is_some(),
        content.signature.is_some()
    );

    let mut rows = vec![row(MESSAGE_TOP_PCT, message_block(&content.message))];
    if let Some(logo) = &content.logo {
        rows.push(row(
            LOGO_TOP_PCT,
            Element::new("img")
                .class("inside-logo-img")
                .attr("src", logo.as_str())
                .attr("alt", "Logo"),
        ));
    }
    if let Some(signature) = &content.signature {
        rows.push(row(
            SIGNATURE_TOP_PCT,
            Element::new("img")
                .class("inside-signature-img")
                .attr("src", signature.as_str())
                .attr("alt", "Signature"),
        ));
    }

    let grid = Element::new("div")
        .style("position: relative; width: 100%; height: 100%;")
        .children(rows);

    HtmlDocument {
        title: "Card inside".to_string(),
        page: geometry.overall,
        styles: vec![INSIDE_STYLES.to_string()],
        body: vec![sheet(&geometry, "inside", grid).into()],
    }
}

fn row(top_pct: u32, content: Element) -> Element {
    Element::new("div")
        .class("inside-row")
        .style(format!("top: {}%;", top_pct))
        .child(content)
}

/// `<span>first</span><br/><span>second</span>` for long greetings.
fn message_block(message: &str) -> Element {
    let formatted = format_message_with_line_break(message);
    let lines: Vec<Node> = if formatted.should_break {
        vec![
            Element::new("span").text(formatted.first_line).into(),
            Element::new("br").into(),
            Element::new("span").text(formatted.second_line).into(),
        ]
    } else {
        vec![Element::new("span").text(formatted.first_line).into()]
    };
    Element::new("div").class("inside-message").children(lines)
}
