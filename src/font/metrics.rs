//! Advance widths for the standard PDF fonts Folio draws with.
//!
//! Widths are in 1/1000 em, taken from the Adobe AFM files and indexed by
//! WinAnsi code so that what we measure is exactly what the PDF viewer
//! draws. Accented Latin-1 letters measure as their base letter.

use unicode_normalization::UnicodeNormalization;

/// Helvetica, codes 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold, codes 32..=126.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

/// Metrics for one standard font face.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    ascii: &'static [u16; 95],
    bold: bool,
    /// Fixed advance for monospaced faces.
    fixed: Option<u16>,
    pub ascender: i16,
}

impl StandardFontMetrics {
    pub const HELVETICA: Self = Self {
        ascii: &HELVETICA_ASCII,
        bold: false,
        fixed: None,
        ascender: 718,
    };

    pub const HELVETICA_BOLD: Self = Self {
        ascii: &HELVETICA_BOLD_ASCII,
        bold: true,
        fixed: None,
        ascender: 718,
    };

    pub const COURIER: Self = Self {
        ascii: &HELVETICA_ASCII,
        bold: false,
        fixed: Some(600),
        ascender: 629,
    };

    pub const COURIER_BOLD: Self = Self {
        ascii: &HELVETICA_BOLD_ASCII,
        bold: true,
        fixed: Some(600),
        ascender: 629,
    };

    /// Advance width of a WinAnsi code in 1/1000 em.
    pub fn code_width(&self, code: u8) -> u16 {
        if let Some(w) = self.fixed {
            return w;
        }
        match code {
            32..=126 => self.ascii[(code - 32) as usize],
            0x80..=0xFF => self.high_width(code),
            _ => 0,
        }
    }

    /// Advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let code = super::winansi_code(ch);
        self.code_width(code) as f64 / 1000.0 * font_size
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        let units: u64 = text
            .chars()
            .map(|ch| u64::from(self.code_width(super::winansi_code(ch))))
            .sum();
        units as f64 / 1000.0 * font_size
    }

    fn high_width(&self, code: u8) -> u16 {
        let (regular, bold) = match code {
            0x80 => (556, 556),
            0x82 => (222, 278),
            0x83 => (556, 556),
            0x84 => (333, 500),
            0x85 | 0x89 | 0x8C | 0x97 | 0x99 => (1000, 1000),
            0x86 | 0x87 | 0x96 => (556, 556),
            0x88 | 0x8B | 0x98 | 0x9B => (333, 333),
            0x8A | 0x9F => (667, 667),
            0x8E => (611, 611),
            0x91 | 0x92 => (222, 278),
            0x93 | 0x94 => (333, 500),
            0x95 => (350, 350),
            0x9A => (500, 556),
            0x9C => (944, 944),
            0x9E => (500, 500),
            0xA0 | 0xB7 => (278, 278),
            0xA1 | 0xA8 | 0xAD | 0xAF | 0xB2 | 0xB3 | 0xB4 | 0xB8 | 0xB9 => (333, 333),
            0xA2..=0xA5 | 0xA7 | 0xAB | 0xBB => (556, 556),
            0xA6 => (260, 280),
            0xA9 | 0xAE => (737, 737),
            0xAA => (370, 370),
            0xAC | 0xB1 | 0xD7 | 0xF7 => (584, 584),
            0xB0 => (400, 400),
            0xB5 => (556, 611),
            0xB6 => (537, 556),
            0xBA => (365, 365),
            0xBC..=0xBE => (834, 834),
            0xBF => (611, 611),
            0xC6 => (1000, 1000),
            0xD0 => (722, 722),
            0xD8 => (778, 778),
            0xDE => (667, 667),
            0xDF | 0xF8 => (611, 611),
            0xE6 => (889, 889),
            0xF0 | 0xFE => (556, 611),
            0xC0..=0xFF => return self.base_letter_width(code),
            _ => (556, 556),
        };
        if self.bold {
            bold
        } else {
            regular
        }
    }

    /// Accented Latin-1 letters take the width of their base letter.
    fn base_letter_width(&self, code: u8) -> u16 {
        let ch = char::from(code);
        let mut buf = [0u8; 4];
        let s: &str = ch.encode_utf8(&mut buf);
        match s.nfd().next() {
            Some(base) if base.is_ascii_graphic() => self.ascii[(base as u8 - 32) as usize],
            _ => 556,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_space_and_letters() {
        let m = StandardFontMetrics::HELVETICA;
        assert_eq!(m.code_width(b' '), 278);
        assert_eq!(m.code_width(b'i'), 222);
        assert_eq!(m.code_width(b'W'), 944);
        assert_eq!(m.code_width(b'~'), 584);
    }

    #[test]
    fn test_bold_is_wider_for_lowercase() {
        let regular = StandardFontMetrics::HELVETICA.measure_string("hello", 12.0);
        let bold = StandardFontMetrics::HELVETICA_BOLD.measure_string("hello", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_accented_letter_measures_as_base() {
        let m = StandardFontMetrics::HELVETICA;
        assert_eq!(m.char_width('é', 10.0), m.char_width('e', 10.0));
        assert_eq!(m.char_width('Ü', 10.0), m.char_width('U', 10.0));
    }

    #[test]
    fn test_bullet_and_dashes() {
        let m = StandardFontMetrics::HELVETICA;
        assert!((m.char_width('•', 10.0) - 3.5).abs() < 1e-9);
        assert!((m.char_width('—', 10.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_courier_is_monospaced() {
        let m = StandardFontMetrics::COURIER;
        assert_eq!(m.measure_string("iiii", 10.0), m.measure_string("WWWW", 10.0));
        assert!((m.measure_string("abc", 10.0) - 18.0).abs() < 1e-9);
    }
}
