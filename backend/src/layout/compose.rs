//! Stacks two generated documents into a single, taller page.
//!
//! Both inputs keep their own stylesheet. Class names are prefixed per face,
//! so the rules can simply be concatenated.

use super::dom::{Element, HtmlDocument, Node};
use super::geometry::{inches, PageSize};

const COMPOSED_STYLES: &str = "\
.composed { display: flex; flex-direction: column; overflow: hidden; }
.composed-part { position: relative; flex: none; overflow: hidden; }
";

/// Places `first` above `second`. The page is as wide as the wider input
/// and as tall as both together; each input gets its share of the height.
pub fn compose(first: HtmlDocument, second: HtmlDocument) -> HtmlDocument {
    let page = PageSize::new(
        first.page.width_in.max(second.page.width_in),
        first.page.height_in + second.page.height_in,
    );
    log::debug!(
        "Composing '{}' + '{}' into {}x{}",
        first.title,
        second.title,
        page.width_in,
        page.height_in
    );

    let mut styles = first.styles;
    styles.extend(second.styles);
    styles.push(COMPOSED_STYLES.to_string());

    let sections = [
        part(first.page.height_in, page.height_in, first.body),
        part(second.page.height_in, page.height_in, second.body),
    ];
    let wrapper = Element::new("div")
        .class("composed")
        .style(format!(
            "width: {}; height: {};",
            page.width_css(),
            page.height_css()
        ))
        .children(sections);

    HtmlDocument {
        title: format!("{} + {}", first.title, second.title),
        page,
        styles,
        body: vec![wrapper.into()],
    }
}

fn part(height_in: f64, total_in: f64, body: Vec<Node>) -> Element {
    Element::new("section")
        .class("composed-part")
        .style(format!(
            "height: {}%; min-height: {};",
            height_in / total_in * 100.0,
            inches(height_in)
        ))
        .children(body)
}
