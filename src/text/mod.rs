//! # Text Measurement
//!
//! Greedy word wrapping against a fixed content width.
//!
//! Widths come from the standard font metrics in [`crate::font`], summed in
//! integer 1/1000 em before scaling to page units, so identical input always
//! produces identical lines.

use crate::error::{FolioError, Result};
use crate::font::FontContext;

/// A wrapped line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    /// Width in page units.
    pub width: f64,
}

/// Tolerance for comparing summed widths against the available width.
const EPSILON: f64 = 1e-9;

pub struct TextMeasurer {
    fonts: FontContext,
    pt_to_unit: f64,
}

impl TextMeasurer {
    pub fn new(fonts: FontContext, pt_to_unit: f64) -> Self {
        Self { fonts, pt_to_unit }
    }

    pub fn fonts(&self) -> &FontContext {
        &self.fonts
    }

    /// Width of `text` in page units.
    pub fn measure(&self, text: &str, bold: bool, font_size: f64) -> Result<f64> {
        let scale = self.scale(bold, font_size)?;
        Ok(self.em_units(text, bold) as f64 * scale)
    }

    /// Break `text` into lines no wider than `available_width`.
    ///
    /// Words are separated by whitespace and never split. A single word wider
    /// than the available width gets a line of its own and overflows it.
    /// Empty or whitespace-only text yields no lines.
    pub fn wrap(
        &self,
        text: &str,
        bold: bool,
        font_size: f64,
        available_width: f64,
    ) -> Result<Vec<Line>> {
        if !available_width.is_finite() || available_width <= 0.0 {
            return Err(FolioError::Measurement(format!(
                "available width must be positive, got {available_width}"
            )));
        }
        let scale = self.scale(bold, font_size)?;
        let space = self.em_units(" ", bold);

        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_units: u64 = 0;

        for word in text.split_whitespace() {
            let word_units = self.em_units(word, bold);
            if current.is_empty() {
                current.push_str(word);
                current_units = word_units;
                continue;
            }

            let candidate = current_units + space + word_units;
            if candidate as f64 * scale <= available_width + EPSILON {
                current.push(' ');
                current.push_str(word);
                current_units = candidate;
            } else {
                lines.push(Line {
                    text: std::mem::take(&mut current),
                    width: current_units as f64 * scale,
                });
                current.push_str(word);
                current_units = word_units;
            }
        }

        if !current.is_empty() {
            lines.push(Line {
                text: current,
                width: current_units as f64 * scale,
            });
        }

        Ok(lines)
    }

    fn em_units(&self, text: &str, bold: bool) -> u64 {
        let metrics = self.fonts.resolve(bold).metrics();
        text.chars()
            .map(|ch| u64::from(metrics.code_width(crate::font::winansi_code(ch))))
            .sum()
    }

    /// Page units per 1/1000 em at `font_size`.
    fn scale(&self, bold: bool, font_size: f64) -> Result<f64> {
        if !font_size.is_finite() || font_size <= 0.0 {
            let face = self.fonts.resolve(bold).pdf_name();
            return Err(FolioError::Measurement(format!(
                "cannot measure {face} at size {font_size}"
            )));
        }
        Ok(font_size * self.pt_to_unit / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontFamily;
    use crate::model::PageConfig;

    fn measurer() -> TextMeasurer {
        TextMeasurer::new(FontContext::new(FontFamily::Helvetica), PageConfig::default().pt_to_unit())
    }

    #[test]
    fn test_single_line() {
        let m = measurer();
        let lines = m.wrap("Hello world", false, 10.0, 170.0).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello world");
        assert!(lines[0].width > 0.0 && lines[0].width < 170.0);
    }

    #[test]
    fn test_line_break_at_space() {
        let m = measurer();
        let text = "The quick brown fox jumps over the lazy dog again and again";
        let lines = m.wrap(text, false, 10.0, 40.0).unwrap();
        assert!(lines.len() > 1, "Should wrap into multiple lines");
        for line in &lines {
            assert!(line.width <= 40.0 + EPSILON, "{} is too wide", line.text);
        }
        let rejoined: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(rejoined.join(" "), text);
    }

    #[test]
    fn test_long_word_overflows_on_its_own_line() {
        let m = measurer();
        let lines = m
            .wrap("a supercalifragilisticexpialidocious b", false, 10.0, 15.0)
            .unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "supercalifragilisticexpialidocious");
        assert!(lines[1].width > 15.0);
    }

    #[test]
    fn test_empty_string() {
        let m = measurer();
        assert!(m.wrap("", false, 10.0, 100.0).unwrap().is_empty());
        assert!(m.wrap("   ", false, 10.0, 100.0).unwrap().is_empty());
    }

    #[test]
    fn test_deterministic() {
        let m = measurer();
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod";
        let a = m.wrap(text, true, 14.0, 60.0).unwrap();
        let b = m.wrap(text, true, 14.0, 60.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bold_text_wraps_earlier() {
        let m = measurer();
        let text = "wide bold words wrap sooner than regular ones do";
        let regular = m.wrap(text, false, 12.0, 50.0).unwrap();
        let bold = m.wrap(text, true, 12.0, 50.0).unwrap();
        assert!(bold.len() >= regular.len());
    }

    #[test]
    fn test_invalid_size_is_measurement_failure() {
        let m = measurer();
        assert!(matches!(
            m.wrap("text", false, f64::NAN, 100.0),
            Err(FolioError::Measurement(_))
        ));
        assert!(matches!(
            m.wrap("text", false, 10.0, 0.0),
            Err(FolioError::Measurement(_))
        ));
    }

    #[test]
    fn test_measure_matches_line_width() {
        let m = measurer();
        let lines = m.wrap("Page 3 of 12", false, 8.0, 100.0).unwrap();
        let measured = m.measure("Page 3 of 12", false, 8.0).unwrap();
        assert!((lines[0].width - measured).abs() < 1e-9);
    }

    #[test]
    fn test_huge_word_does_not_overflow_units() {
        let m = measurer();
        // 5M x 944 units is past u32::MAX.
        let word = "W".repeat(5_000_000);
        let lines = m.wrap(&word, false, 10.0, 170.0).unwrap();
        assert_eq!(lines.len(), 1);
        let expected = 5_000_000.0 * 944.0 * 10.0 * m.pt_to_unit / 1000.0;
        assert!((lines[0].width - expected).abs() / expected < 1e-9);
    }
}
