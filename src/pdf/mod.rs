//! # PDF Serializer
//!
//! Takes rendered pages and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. Only the standard Type1 fonts are
//! used, so nothing has to be embedded and the subset of the format we need
//! stays small.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Page geometry is in page units with y growing downwards; it is converted
//! to points with y growing upwards while the content streams are written.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{FolioError, Result};
use crate::font::{encode_winansi, StandardFont};
use crate::model::PageConfig;
use crate::render::{Document, DrawCommand, Metadata, Page};

pub struct PdfWriter {
    /// Points per page unit.
    scale: f64,
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Fonts in resource order: `/F0`, `/F1`, ...
    font_objects: Vec<(StandardFont, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            scale: PageConfig::UNIT_TO_PT,
        }
    }

    /// Write a rendered document to a PDF byte vector. The cover is page 1.
    pub fn write(&self, document: &Document) -> Result<Vec<u8>> {
        let pages: Vec<&Page> = document.all_pages().collect();
        check_geometry(&pages)?;

        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then content streams and page objects
        for _ in 0..3 {
            builder.objects.push(PdfObject { data: vec![] });
        }

        self.register_fonts(&mut builder, &pages);
        let font_resources = Self::build_font_resource_dict(&builder.font_objects);

        let mut page_obj_ids: Vec<usize> = Vec::new();

        for page in &pages {
            let content = self.build_content_stream(page, &builder.font_objects);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_obj_id = builder.objects.len();
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: content_data });

            let page_obj_id = builder.objects.len();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width * self.scale,
                page.height * self.scale,
                content_obj_id,
                font_resources
            );
            builder.objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.objects.len();
        builder.objects.push(PdfObject {
            data: Self::build_info_dict(&document.metadata).into_bytes(),
        });

        Ok(Self::serialize(&builder, info_obj_id))
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &Page, font_objects: &[(StandardFont, usize)]) -> String {
        let mut stream = String::new();
        for command in &page.elements {
            self.write_command(&mut stream, command, page.height, font_objects);
        }
        stream
    }

    /// Write a single draw command as PDF operators.
    fn write_command(
        &self,
        stream: &mut String,
        command: &DrawCommand,
        page_height: f64,
        font_objects: &[(StandardFont, usize)],
    ) {
        let k = self.scale;
        match command {
            DrawCommand::Fill {
                x,
                y,
                width,
                height,
                color,
            } => {
                let (r, g, b) = color.unit();
                let _ = write!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                    r,
                    g,
                    b,
                    x * k,
                    (page_height - y - height) * k,
                    width * k,
                    height * k
                );
            }

            DrawCommand::Stroke {
                x1,
                y1,
                x2,
                y2,
                color,
                line_width,
            } => {
                let (r, g, b) = color.unit();
                let _ = write!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    r,
                    g,
                    b,
                    line_width * k,
                    x1 * k,
                    (page_height - y1) * k,
                    x2 * k,
                    (page_height - y2) * k
                );
            }

            DrawCommand::Text {
                x,
                baseline,
                text,
                font,
                font_size,
                color,
            } => {
                let (r, g, b) = color.unit();
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    r,
                    g,
                    b,
                    Self::font_index(*font, font_objects),
                    font_size,
                    x * k,
                    (page_height - baseline) * k,
                    Self::escape_pdf_string(text)
                );
            }
        }
    }

    /// Each face used anywhere in the document gets one font object.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[&Page]) {
        let mut fonts: Vec<StandardFont> = pages
            .iter()
            .flat_map(|page| page.elements.iter())
            .filter_map(|command| match command {
                DrawCommand::Text { font, .. } => Some(*font),
                _ => None,
            })
            .collect();

        // Sort for deterministic ordering, then dedup
        fonts.sort();
        fonts.dedup();

        // Always have at least Helvetica
        if fonts.is_empty() {
            fonts.push(StandardFont::Helvetica);
        }

        for font in fonts {
            let obj_id = builder.objects.len();
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            builder.objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            builder.font_objects.push((font, obj_id));
        }
    }

    fn build_font_resource_dict(font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resource index (`/F0`, `/F1`, ...) of a registered face.
    fn font_index(font: StandardFont, font_objects: &[(StandardFont, usize)]) -> usize {
        font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0)
    }

    fn build_info_dict(metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        let _ = write!(info, "/Title ({}) ", Self::escape_pdf_string(&metadata.title));
        let _ = write!(info, "/Author ({}) ", Self::escape_pdf_string(&metadata.author));
        let _ = write!(info, "/Subject ({}) ", Self::escape_pdf_string(&metadata.subject));
        let _ = write!(
            info,
            "/Producer (Folio {}) /Creator (Folio) ",
            env!("CARGO_PKG_VERSION")
        );
        let _ = write!(
            info,
            "/CreationDate (D:{}) >>",
            metadata.created_at.format("%Y%m%d%H%M%SZ")
        );
        info
    }

    /// Encode as WinAnsi and escape for a PDF literal string. Bytes outside
    /// ASCII are written as octal escapes so the stream stays 7-bit.
    fn escape_pdf_string(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for byte in encode_winansi(s) {
            match byte {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(byte as char),
                _ => {
                    let _ = write!(out, "\\{:03o}", byte);
                }
            }
        }
        out
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

/// Every coordinate must be finite for the operators to parse.
fn check_geometry(pages: &[&Page]) -> Result<()> {
    if pages.len() < 2 {
        return Err(FolioError::Assembly(
            "document has no content pages".to_string(),
        ));
    }
    for page in pages {
        let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
        let ok = finite(&[page.width, page.height])
            && page.elements.iter().all(|command| match command {
                DrawCommand::Fill {
                    x,
                    y,
                    width,
                    height,
                    ..
                } => finite(&[*x, *y, *width, *height]),
                DrawCommand::Stroke {
                    x1,
                    y1,
                    x2,
                    y2,
                    line_width,
                    ..
                } => finite(&[*x1, *y1, *x2, *y2, *line_width]),
                DrawCommand::Text {
                    x,
                    baseline,
                    font_size,
                    ..
                } => finite(&[*x, *baseline, *font_size]),
            });
        if !ok {
            return Err(FolioError::Assembly(format!(
                "page {} has a non-finite coordinate",
                page.index
            )));
        }
    }
    Ok(())
}
