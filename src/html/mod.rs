//! # HTML Tree
//!
//! Blog bodies arrive as arbitrary, possibly malformed HTML. We parse them
//! with html5ever (through `scraper`), which repairs broken markup the way a
//! browser would, then copy the result into a small owned tree of
//! [`Node`]s. Everything downstream walks that tree with plain `match`es.
//!
//! ```text
//! raw html
//!    ↓
//! [normalize]  strip disallowed elements, collapse whitespace
//!    ↓
//! [parse]      html5ever fragment → Vec<Node>
//!    ↓
//! [extract]    typed visitor → Vec<Block>
//! ```

pub mod extract;
pub mod normalize;

use scraper::{ElementRef, Html};

/// Elements that are removed with their whole subtree.
pub const DISALLOWED_TAGS: &[&str] = &[
    "script", "style", "img", "noscript", "iframe", "object", "embed", "video", "audio",
    "source", "track", "svg", "template", "picture", "canvas", "head", "title", "meta", "link",
];

/// Elements that flow inside a line of text rather than starting a new block.
pub const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "font", "i",
    "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strike", "strong", "sub", "sup",
    "time", "tt", "u", "var", "wbr",
];

/// Deeper subtrees are flattened into a single text node.
const MAX_DEPTH: usize = 256;

/// A parsed HTML node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element { tag: String, children: Vec<Node> },
    Text { value: String },
}

impl Node {
    pub fn element(tag: &str, children: Vec<Node>) -> Self {
        Node::Element {
            tag: tag.to_string(),
            children,
        }
    }

    pub fn text(value: &str) -> Self {
        Node::Text {
            value: value.to_string(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            Node::Text { .. } => None,
        }
    }

    /// Text nodes and inline elements.
    pub fn is_inline(&self) -> bool {
        match self {
            Node::Text { .. } => true,
            Node::Element { tag, .. } => INLINE_TAGS.contains(&tag.as_str()),
        }
    }

    /// Whitespace-only text node.
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Text { value } if value.trim().is_empty())
    }

    /// All descendant text, in document order. `<br>` reads as a space.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out, false);
        out
    }

    /// Like [`Node::text_content`], but every non-inline element is padded
    /// with a double space so block boundaries survive flattening.
    pub fn block_text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out, true);
        out
    }

    fn push_text(&self, out: &mut String, mark_blocks: bool) {
        match self {
            Node::Text { value } => out.push_str(value),
            Node::Element { tag, children } => {
                if tag == "br" {
                    out.push(' ');
                    return;
                }
                let boundary = mark_blocks && !self.is_inline();
                if boundary {
                    out.push_str("  ");
                }
                for child in children {
                    child.push_text(out, mark_blocks);
                }
                if boundary {
                    out.push_str("  ");
                }
            }
        }
    }
}

/// Parse an HTML fragment into owned nodes.
///
/// Disallowed elements, comments and processing instructions are dropped.
pub fn parse(html: &str) -> Vec<Node> {
    if html.trim().is_empty() {
        return Vec::new();
    }
    let fragment = Html::parse_fragment(html);
    convert_children(fragment.root_element(), 0)
}

fn convert_children(element: ElementRef<'_>, depth: usize) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in element.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let value: &str = text;
                if !value.is_empty() {
                    nodes.push(Node::text(value));
                }
            }
            scraper::Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    if let Some(node) = convert_element(el, depth + 1) {
                        nodes.push(node);
                    }
                }
            }
            _ => {}
        }
    }
    nodes
}

fn convert_element(element: ElementRef<'_>, depth: usize) -> Option<Node> {
    let tag = element.value().name();
    if DISALLOWED_TAGS.contains(&tag) {
        return None;
    }
    let children = if depth >= MAX_DEPTH {
        let flattened: String = element.text().collect();
        vec![Node::text(&flattened)]
    } else {
        convert_children(element, depth)
    };
    Some(Node::element(tag, children))
}
