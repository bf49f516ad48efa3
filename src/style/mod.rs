//! # Style Table
//!
//! Fixed per-role typography. Every block kind, every lead element and every
//! band has exactly one style, so a block looks the same on whichever page it
//! lands. Sizes are in points; spacing is in page units.

use crate::model::BlockKind;
use serde::{Deserialize, Serialize};

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to 0.0..=1.0 for PDF color operators.
    pub fn unit(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

/// Font size, weight, color and the gap left after a text element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub bold: bool,
    pub color: Color,
    pub spacing_after: f64,
}

impl TextStyle {
    const fn new(font_size: f64, bold: bool, color: Color, spacing_after: f64) -> Self {
        Self {
            font_size,
            bold,
            color,
            spacing_after,
        }
    }
}

/// A stroked horizontal rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleStyle {
    pub color: Color,
    pub line_width: f64,
}

/// The fixed style table.
pub struct Theme;

impl Theme {
    // ── Body blocks ────────────────────────────────────────────
    pub const HEADING: TextStyle = TextStyle::new(14.0, true, Color::rgb(50, 50, 150), 8.0);
    pub const SUBHEADING: TextStyle = TextStyle::new(12.0, true, Color::rgb(100, 50, 150), 6.0);
    pub const PARAGRAPH: TextStyle = TextStyle::new(10.0, false, Color::rgb(60, 60, 60), 6.0);
    pub const LIST_ITEM: TextStyle = TextStyle::new(10.0, false, Color::rgb(60, 60, 60), 4.0);
    pub const EMPHASIS: TextStyle = TextStyle::new(10.0, true, Color::rgb(40, 40, 40), 4.0);
    pub const QUOTE: TextStyle = TextStyle::new(11.0, true, Color::rgb(100, 50, 150), 6.0);

    // ── Lead (top of the first content page) ───────────────────
    pub const LEAD_TITLE: TextStyle = TextStyle::new(18.0, true, Color::rgb(30, 30, 100), 10.0);
    pub const LEAD_SUBTITLE: TextStyle = TextStyle::new(12.0, false, Color::rgb(80, 80, 80), 8.0);
    pub const LEAD_META: TextStyle = TextStyle::new(10.0, false, Color::rgb(100, 100, 100), 15.0);
    pub const DIVIDER: RuleStyle = RuleStyle {
        color: Color::rgb(200, 200, 200),
        line_width: 0.5,
    };
    /// Space below the divider before the first block.
    pub const DIVIDER_SPACING: f64 = 15.0;

    // ── Cover page ─────────────────────────────────────────────
    pub const COVER_TITLE: TextStyle = TextStyle::new(24.0, true, Color::rgb(30, 30, 100), 0.0);
    pub const COVER_BYLINE: TextStyle = TextStyle::new(14.0, false, Color::rgb(80, 80, 80), 0.0);
    /// Baseline distance between wrapped cover title lines.
    pub const COVER_TITLE_LEADING: f64 = 10.0;

    // ── Bands ──────────────────────────────────────────────────
    pub const HEADER_FILL: Color = Color::rgb(240, 240, 240);
    pub const HEADER_HEIGHT: f64 = 30.0;
    /// Gap between the header band and the first content line.
    pub const HEADER_GAP: f64 = 15.0;
    pub const HEADER_BASELINE: f64 = 20.0;
    pub const HEADER_BRAND: TextStyle = TextStyle::new(16.0, true, Color::rgb(50, 50, 150), 0.0);
    pub const HEADER_LABEL: TextStyle = TextStyle::new(8.0, false, Color::rgb(100, 100, 100), 0.0);

    pub const FOOTER_RULE: RuleStyle = RuleStyle {
        color: Color::rgb(220, 220, 220),
        line_width: 0.5,
    };
    /// Distance of the footer rule from the page bottom.
    pub const FOOTER_RULE_OFFSET: f64 = 15.0;
    /// Distance of the footer baseline from the page bottom.
    pub const FOOTER_BASELINE_OFFSET: f64 = 8.0;
    pub const FOOTER_TEXT: TextStyle = TextStyle::new(8.0, false, Color::rgb(100, 100, 100), 0.0);

    /// Style for an extracted block.
    pub fn block(kind: BlockKind) -> TextStyle {
        match kind {
            BlockKind::Heading(level) if level <= 4 => Self::HEADING,
            BlockKind::Heading(_) => Self::SUBHEADING,
            BlockKind::Paragraph => Self::PARAGRAPH,
            BlockKind::ListItem => Self::LIST_ITEM,
            BlockKind::Emphasis => Self::EMPHASIS,
            BlockKind::Quote => Self::QUOTE,
        }
    }
}
