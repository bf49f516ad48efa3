//! # Folio
//!
//! A page-native PDF renderer for blog posts.
//!
//! A blog record carries a title, some metadata and a body of arbitrary,
//! often messy HTML. Folio turns it into a fixed-size, paginated PDF: a
//! cover page, content pages with a running header band, per-block styling,
//! and a `Page i of N` footer.
//!
//! There is no browser and no CSS. The body is reduced to a flat stream of
//! typed blocks, each block is wrapped with standard-font metrics, and the
//! pagination engine decides page by page where every block goes. Blocks are
//! kept whole by default; a block never gets sliced after the fact.
//!
//! ## Architecture
//!
//! ```text
//! BlogRecord (JSON/API)
//!       ↓
//!   [html::normalize]  strip scripts, styles, media; collapse whitespace
//!       ↓
//!   [html::extract]    typed visitor → Vec<Block>
//!       ↓
//!   [layout]           lead + blocks → pages (uses [text] for wrapping)
//!       ↓
//!   [render]           cover, header band, styles, footer post-pass
//!       ↓
//!   [pdf] / [output]   PDF bytes + file name
//! ```
//!
//! Every call builds its own state; nothing is shared between calls.

pub mod config;
pub mod error;
pub mod font;
pub mod html;
pub mod layout;
pub mod model;
pub mod output;
pub mod pdf;
pub mod render;
pub mod style;
pub mod text;

use log::debug;

pub use config::RenderConfig;
pub use error::{FolioError, Result};
pub use model::{Block, BlockKind, BlogRecord};
pub use output::Artifact;

use layout::{build_flow, PaginationEngine};
use render::{CoverMeta, Document, DocumentRenderer};

/// Render a blog record to a PDF with the default configuration.
///
/// This is the primary entry point.
pub fn generate(record: &BlogRecord) -> Result<Artifact> {
    generate_with(record, &RenderConfig::default())
}

/// Render a blog record to a PDF.
pub fn generate_with(record: &BlogRecord, config: &RenderConfig) -> Result<Artifact> {
    let document = render_document(record, config)?;
    output::assemble(&document)
}

/// Render a blog record described as JSON to a PDF.
pub fn generate_json(json: &str) -> Result<Artifact> {
    let record: BlogRecord = serde_json::from_str(json)?;
    generate(&record)
}

/// Extract the typed blocks of an HTML body.
pub fn extract_blocks(raw_html: &str) -> Vec<Block> {
    let normalized = html::normalize::normalize(raw_html);
    html::extract::extract(&normalized)
}

/// Run the pipeline up to the drawable document, without serializing it.
pub fn render_document(record: &BlogRecord, config: &RenderConfig) -> Result<Document> {
    config.validate()?;

    let blocks = extract_blocks(&record.html_content);
    debug!("record {:?}: {} blocks", record.id, blocks.len());

    let flow = build_flow(record, &blocks, config.include_lead);
    let pagination = PaginationEngine::new(config).paginate(&flow)?;

    DocumentRenderer::new(config).render(&pagination, &CoverMeta::from_record(record))
}
