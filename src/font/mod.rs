//! # Font Management
//!
//! Folio only draws with the standard PDF fonts, which need no embedding.
//! Text is encoded as WinAnsi; the same code drives both measurement and the
//! bytes written into content streams, so a line never measures differently
//! from how it prints.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use serde::{Deserialize, Serialize};

/// Font family selectable in the render configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Courier,
}

/// The standard PDF faces Folio can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &StandardFontMetrics::HELVETICA,
            Self::HelveticaBold => &StandardFontMetrics::HELVETICA_BOLD,
            Self::Courier => &StandardFontMetrics::COURIER,
            Self::CourierBold => &StandardFontMetrics::COURIER_BOLD,
        }
    }
}

/// Resolves (family, weight) pairs to faces for one render.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontContext {
    family: FontFamily,
}

impl FontContext {
    pub fn new(family: FontFamily) -> Self {
        Self { family }
    }

    pub fn resolve(&self, bold: bool) -> StandardFont {
        match (self.family, bold) {
            (FontFamily::Helvetica, false) => StandardFont::Helvetica,
            (FontFamily::Helvetica, true) => StandardFont::HelveticaBold,
            (FontFamily::Courier, false) => StandardFont::Courier,
            (FontFamily::Courier, true) => StandardFont::CourierBold,
        }
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, bold: bool, font_size: f64) -> f64 {
        self.resolve(bold).metrics().measure_string(text, font_size)
    }
}

/// WinAnsi code for a character; `?` when the character has none.
pub fn winansi_code(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

/// Encode a string as WinAnsi bytes.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars().map(winansi_code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_context_helvetica_space() {
        let ctx = FontContext::new(FontFamily::Helvetica);
        let w = ctx.measure_string(" ", false, 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_font_context_bold_wider() {
        let ctx = FontContext::default();
        let regular = ctx.measure_string("Folio", false, 12.0);
        let bold = ctx.measure_string("Folio", true, 12.0);
        assert!(bold > regular, "Bold text should be wider than regular");
    }

    #[test]
    fn test_resolve_courier() {
        let ctx = FontContext::new(FontFamily::Courier);
        assert_eq!(ctx.resolve(true).pdf_name(), "Courier-Bold");
        assert_eq!(ctx.resolve(false).pdf_name(), "Courier");
    }

    #[test]
    fn test_winansi_mapping() {
        assert_eq!(winansi_code('A'), b'A');
        assert_eq!(winansi_code('é'), 0xE9);
        assert_eq!(winansi_code('•'), 0x95);
        assert_eq!(winansi_code('’'), 0x92);
        assert_eq!(winansi_code('漢'), b'?');
        assert_eq!(encode_winansi("a•b"), vec![b'a', 0x95, b'b']);
    }
}
