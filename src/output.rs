//! Final artifact: PDF bytes plus the file name to save them under.

use log::debug;

use crate::error::Result;
use crate::pdf::PdfWriter;
use crate::render::Document;

/// A finished PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Serialize a rendered document.
pub fn assemble(document: &Document) -> Result<Artifact> {
    let bytes = PdfWriter::new().write(document)?;
    let filename = slugify_filename(&document.metadata.title);
    debug!("assembled {} ({} bytes)", filename, bytes.len());
    Ok(Artifact { bytes, filename })
}

/// `"Hello, World!"` becomes `hello_world_.pdf`.
///
/// Every run of characters other than ASCII letters and digits turns into a
/// single underscore, at either end too. A title with no letters or digits
/// falls back to `document.pdf`.
pub fn slugify_filename(title: &str) -> String {
    if !title.chars().any(|ch| ch.is_ascii_alphanumeric()) {
        return "document.pdf".to_string();
    }

    let mut stem = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    format!("{stem}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_basic() {
        assert_eq!(slugify_filename("Hello, World!"), "hello_world_.pdf");
        assert_eq!(slugify_filename("Rust 2024: What's New"), "rust_2024_what_s_new.pdf");
    }

    #[test]
    fn test_slug_keeps_edge_runs_and_collapses() {
        assert_eq!(slugify_filename("  --Intro--  "), "_intro_.pdf");
        assert_eq!(slugify_filename("a   b"), "a_b.pdf");
    }

    #[test]
    fn test_slug_fallback() {
        assert_eq!(slugify_filename(""), "document.pdf");
        assert_eq!(slugify_filename("!!!"), "document.pdf");
        assert_eq!(slugify_filename("日本語"), "document.pdf");
    }

    #[test]
    fn test_slug_drops_accents() {
        assert_eq!(slugify_filename("Café Culture"), "caf_culture.pdf");
    }
}
