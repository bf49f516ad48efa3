//! # Document Model
//!
//! The input record, the typed block stream the extractor produces, and the
//! page geometry everything downstream is measured against.
//!
//! Geometry is expressed in *page units*. With the default A4 page a unit is
//! one millimetre; font sizes stay in points and are converted with
//! [`PageConfig::pt_to_unit`] when text is measured.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post as handed over by the blog-serving API.
///
/// Read-only to the engine. `html_content` may be empty, malformed, or carry
/// scripts and media; it is never executed, only stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub html_content: String,
}

impl BlogRecord {
    /// Title to print, "Untitled" when blank.
    pub fn display_title(&self) -> &str {
        non_blank(&self.title).unwrap_or("Untitled")
    }

    pub fn display_author(&self) -> &str {
        non_blank(&self.author_name).unwrap_or("Unknown Author")
    }

    pub fn display_category(&self) -> &str {
        non_blank(&self.category).unwrap_or("Uncategorized")
    }

    pub fn display_subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref().and_then(non_blank)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// What a block of extracted text means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// `h1`..`h6`; the level is kept for styling.
    Heading(u8),
    Paragraph,
    /// Text already carries the bullet prefix.
    ListItem,
    Quote,
    /// A standalone bold run (`strong` / `b`).
    Emphasis,
}

/// A typed unit of extracted text.
///
/// `text` is whitespace-normalized and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Configuration for a page: size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default)]
    pub size: PageSize,

    /// Page margins in page units.
    #[serde(default = "default_margin")]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: default_margin(),
        }
    }
}

fn default_margin() -> Edges {
    Edges::uniform(20.0)
}

impl PageConfig {
    /// Points per page unit (millimetres).
    pub const UNIT_TO_PT: f64 = 72.0 / 25.4;

    /// Page units per point.
    pub fn pt_to_unit(&self) -> f64 {
        1.0 / Self::UNIT_TO_PT
    }

    pub fn width(&self) -> f64 {
        self.size.dimensions().0
    }

    pub fn height(&self) -> f64 {
        self.size.dimensions().1
    }

    /// Usable line width: page width minus both side margins.
    pub fn content_width(&self) -> f64 {
        self.width() - self.margin.horizontal()
    }

    /// Lowest y a line box may reach.
    pub fn bottom_limit(&self) -> f64 {
        self.height() - self.margin.bottom
    }
}

/// Standard page sizes in millimetres.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in page units.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}
