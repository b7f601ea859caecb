//! Minimal typed HTML tree.
//!
//! Layouts are built as [`Element`] trees and only turned into text at the
//! very end, so that documents can be merged structurally (see
//! [`super::compose`]). Text and attribute values are escaped on output.

use std::fmt::Write;

use super::geometry::PageSize;

/// Elements rendered without a closing tag.
const VOID_TAGS: [&str; 3] = ["br", "img", "meta"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn style(self, style: impl Into<String>) -> Self {
        self.attr("style", style)
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    fn render(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        if VOID_TAGS.contains(&self.tag) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.render(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

impl Node {
    fn render(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.render(out),
            Node::Text(text) => out.push_str(&escape_text(text)),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A complete, self-contained HTML page of a fixed physical size.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlDocument {
    pub title: String,
    pub page: PageSize,
    /// CSS rules, one entry per layout contributing to the document.
    pub styles: Vec<String>,
    pub body: Vec<Node>,
}

impl HtmlDocument {
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(4096);
        let width = self.page.width_css();
        let height = self.page.height_css();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n");
        let _ = writeln!(out, "<title>{}</title>", escape_text(&self.title));
        out.push_str("<style>\n");
        let _ = writeln!(out, "@page {{ size: {} {}; margin: 0; }}", width, height);
        let _ = writeln!(
            out,
            "html, body {{ margin: 0; padding: 0; width: {}; height: {}; background: #ffffff; }}",
            width, height
        );
        out.push_str(
            "* { box-sizing: border-box; -webkit-print-color-adjust: exact; print-color-adjust: exact; }\n",
        );
        for rules in &self.styles {
            out.push_str(rules);
            if !rules.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str("</style>\n</head>\n<body>\n");
        for node in &self.body {
            node.render(&mut out);
            out.push('\n');
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
