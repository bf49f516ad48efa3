//! # Block Extraction
//!
//! Turns the parsed tree into a flat, ordered stream of typed [`Block`]s.
//!
//! The walk is a visitor over [`Node`]:
//!
//! - Block-level semantic elements (`h1`-`h6`, `p`, `li`, `blockquote`)
//!   emit their full text and claim their subtree. Nothing inside them is
//!   emitted a second time.
//! - Runs of inline content between block-level elements are collected and
//!   emitted together. A run that is a single `strong`/`b` becomes
//!   `Emphasis`; anything else is the catch-all paragraph and needs more
//!   than 20 characters to count.
//! - Every other element is a container: it never emits its own
//!   concatenated text, the visitor just descends. This is what keeps a
//!   heading from reappearing inside the text of its enclosing `div`.
//!
//! On top of that, every candidate passes two filters: text of 10
//! characters or less is noise (headings are exempt, they are short by
//! nature), and text already emitted during this call is skipped.

#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use super::normalize::collapse_whitespace;
use super::{parse, Node};
use crate::model::{Block, BlockKind};

/// Candidates this short (in characters) are noise.
pub const NOISE_THRESHOLD: usize = 10;
/// Catch-all runs need more than this many characters.
pub const CATCH_ALL_THRESHOLD: usize = 20;
/// Substituted when no text at all could be recovered.
pub const PLACEHOLDER: &str = "No content available";
pub const BULLET: &str = "• ";

static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("block separator regex"));

/// Extract blocks from normalized HTML.
///
/// Never returns an empty vector: when the tree yields nothing the plain
/// text is split into pseudo-paragraphs, and when even that is empty a
/// single placeholder paragraph is returned.
pub fn extract(normalized_html: &str) -> Vec<Block> {
    let nodes = parse(normalized_html);
    let mut extraction = Extraction::default();

    extraction.visit_children(&nodes);

    if extraction.blocks.is_empty() {
        debug!("no structured blocks found, falling back to plain text");
        extraction.fallback(&nodes);
    }

    if extraction.blocks.is_empty() {
        warn!("content is empty or unreadable, substituting placeholder");
        extraction
            .blocks
            .push(Block::new(BlockKind::Paragraph, PLACEHOLDER));
    }

    debug!("extracted {} blocks", extraction.blocks.len());
    extraction.blocks
}

/// State for one extraction call. Never shared between calls.
#[derive(Default)]
struct Extraction {
    seen: HashSet<String>,
    blocks: Vec<Block>,
}

impl Extraction {
    fn visit_children(&mut self, children: &[Node]) {
        let mut run: Vec<&Node> = Vec::new();

        for child in children {
            if child.is_inline() && !bears_block(child) {
                run.push(child);
                continue;
            }

            self.flush(&mut run);

            if let Node::Element { tag, children } = child {
                match block_kind(tag) {
                    Some(kind) => self.visit_block(kind, child),
                    None => self.visit_children(children),
                }
            }
        }

        self.flush(&mut run);
    }

    fn visit_block(&mut self, kind: BlockKind, node: &Node) {
        let text = collapse_whitespace(&node.text_content());
        match kind {
            BlockKind::Paragraph => {
                let kind = classify_paragraph(&text);
                self.emit(kind, text.clone(), text);
            }
            BlockKind::ListItem => {
                let display = format!("{BULLET}{text}");
                self.emit(kind, text, display);
            }
            _ => self.emit(kind, text.clone(), text),
        }
    }

    /// Emit a pending inline run, if any.
    fn flush(&mut self, run: &mut Vec<&Node>) {
        if run.is_empty() {
            return;
        }
        let nodes = std::mem::take(run);

        let raw: String = nodes.iter().map(|n| n.text_content()).collect();
        let text = collapse_whitespace(&raw);

        let significant: Vec<&&Node> = nodes.iter().filter(|n| !n.is_blank()).collect();
        let lone_bold =
            significant.len() == 1 && matches!(significant[0].tag(), Some("strong" | "b"));

        if lone_bold {
            self.emit(BlockKind::Emphasis, text.clone(), text);
        } else if text.chars().count() > CATCH_ALL_THRESHOLD {
            let kind = classify_paragraph(&text);
            self.emit(kind, text.clone(), text);
        }
    }

    /// Apply the noise and duplicate filters, then record the block.
    fn emit(&mut self, kind: BlockKind, key: String, display: String) {
        let threshold = match kind {
            BlockKind::Heading(_) => 0,
            _ => NOISE_THRESHOLD,
        };
        if key.chars().count() <= threshold {
            return;
        }
        if !self.seen.insert(key) {
            return;
        }
        self.blocks.push(Block::new(kind, display));
    }

    /// Split the plain text on block boundaries and runs of two or more
    /// whitespace characters.
    fn fallback(&mut self, nodes: &[Node]) {
        let flat: String = nodes.iter().map(Node::block_text).collect();
        for piece in BLOCK_SEPARATOR.split(&flat) {
            let text = collapse_whitespace(piece);
            if text.is_empty() || !self.seen.insert(text.clone()) {
                continue;
            }
            self.blocks.push(Block::new(BlockKind::Paragraph, text));
        }
    }
}

/// Kind for block-level semantic tags; `None` for everything else.
fn block_kind(tag: &str) -> Option<BlockKind> {
    match tag {
        "h1" => Some(BlockKind::Heading(1)),
        "h2" => Some(BlockKind::Heading(2)),
        "h3" => Some(BlockKind::Heading(3)),
        "h4" => Some(BlockKind::Heading(4)),
        "h5" => Some(BlockKind::Heading(5)),
        "h6" => Some(BlockKind::Heading(6)),
        "p" => Some(BlockKind::Paragraph),
        "li" => Some(BlockKind::ListItem),
        "blockquote" => Some(BlockKind::Quote),
        _ => None,
    }
}

/// A paragraph opening with a quotation mark reads as a quote.
fn classify_paragraph(text: &str) -> BlockKind {
    if text.starts_with('"') || text.starts_with('“') {
        BlockKind::Quote
    } else {
        BlockKind::Paragraph
    }
}

/// Whether the node is, or contains, a block-level semantic element.
fn bears_block(node: &Node) -> bool {
    match node {
        Node::Text { .. } => false,
        Node::Element { tag, children } => {
            block_kind(tag).is_some() || children.iter().any(bears_block)
        }
    }
}
