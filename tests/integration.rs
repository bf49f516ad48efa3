//! Integration tests for the Folio rendering pipeline.
//!
//! These tests exercise the full path from a blog record to PDF output.
//! They verify:
//! - Identical records give identical bytes
//! - No text is emitted twice and none is lost between blocks and pages
//! - Every placed line stays above the bottom margin
//! - Footers count content pages correctly
//! - Empty, malformed and hostile HTML still produce a document

use std::collections::{BTreeMap, HashSet};

use folio::layout::LineSource;
use folio::render::{Document, DrawCommand};
use folio::{extract_blocks, generate, generate_json, generate_with, render_document};
use folio::{Block, BlockKind, BlogRecord, FolioError, RenderConfig};

// ─── Helpers ────────────────────────────────────────────────────

fn record(html: &str) -> BlogRecord {
    BlogRecord {
        id: "post-1".to_string(),
        title: "A Post About Pages".to_string(),
        subtitle: None,
        author_name: "Sam Rivera".to_string(),
        category: "perspective".to_string(),
        created_at: "2024-03-05T10:00:00Z".parse().unwrap(),
        html_content: html.to_string(),
    }
}

fn long_html(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "<h3>Section {i}</h3><p>{}</p>",
                format!("Paragraph {i} explains one more detail of the layout engine. ").repeat(5)
            )
        })
        .collect()
}

fn render(html: &str) -> Document {
    render_document(&record(html), &RenderConfig::default()).unwrap()
}

/// Text of every line placed for each block, keyed by block index.
fn lines_by_block(doc: &Document) -> BTreeMap<usize, Vec<String>> {
    let mut map: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for page in &doc.pages {
        for line in &page.content {
            if let LineSource::Block(i) = line.source {
                map.entry(i).or_default().push(line.text.clone());
            }
        }
    }
    map
}

/// Decompressed content streams of a PDF, in file order.
fn content_streams(bytes: &[u8]) -> Vec<String> {
    let mut streams = Vec::new();
    let mut rest = bytes;
    while let Some(start) = find(rest, b"stream\n") {
        let body = &rest[start + 7..];
        let Some(end) = find(body, b"\nendstream") else {
            break;
        };
        let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(&body[..end]).unwrap();
        streams.push(String::from_utf8_lossy(&inflated).into_owned());
        rest = &body[end + 10..];
    }
    streams
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(
        bytes.windows(5).any(|w| w == b"%%EOF"),
        "Missing %%EOF marker"
    );
    assert!(
        bytes.windows(4).any(|w| w == b"xref"),
        "Missing xref table"
    );
    assert!(
        bytes.windows(7).any(|w| w == b"trailer"),
        "Missing trailer"
    );
}

// ─── Basic Pipeline Tests ───────────────────────────────────────

#[test]
fn test_generate_produces_valid_pdf() {
    let artifact = generate(&record("<p>Hello from the body of the post.</p>")).unwrap();
    assert_valid_pdf(&artifact.bytes);
    assert_eq!(artifact.filename, "a_post_about_pages.pdf");
}

#[test]
fn test_generate_json_round() {
    let json = r#"{
        "id": "x",
        "title": "From JSON",
        "authorName": "Ada",
        "category": "tech",
        "createdAt": "2024-01-02T03:04:05Z",
        "htmlContent": "<p>Body text that is long enough.</p>"
    }"#;
    let artifact = generate_json(json).unwrap();
    assert_valid_pdf(&artifact.bytes);
    assert_eq!(artifact.filename, "from_json.pdf");
}

#[test]
fn test_cover_is_first_pdf_page() {
    let artifact = generate(&record("<p>Hello from the body of the post.</p>")).unwrap();
    let streams = content_streams(&artifact.bytes);
    assert_eq!(streams.len(), 2);
    assert!(streams[0].contains("(By Sam Rivera) Tj"));
    assert!(streams[0].contains("(March 5, 2024) Tj"));
    assert!(!streams[0].contains("QuestMeraki"));
    assert!(streams[1].contains("(QuestMeraki) Tj"));
    assert!(streams[1].contains("(Page 1 of 1) Tj"));
}

#[test]
fn test_lead_on_first_content_page() {
    let artifact = generate(&record("<p>Hello from the body of the post.</p>")).unwrap();
    let streams = content_streams(&artifact.bytes);
    assert!(streams[1]
        .contains("(Author: Sam Rivera | Category: perspective | Date: 3/5/2024) Tj"));
}

// ─── Properties ─────────────────────────────────────────────────

#[test]
fn test_deterministic_bytes() {
    let rec = record(&long_html(25));
    let a = generate(&rec).unwrap();
    let b = generate(&rec).unwrap();
    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a.filename, b.filename);
}

#[test]
fn test_concurrent_generates_are_identical() {
    let short = record(&long_html(3));
    let long = record(&long_html(25));
    let expected = generate(&long).unwrap();

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let rec = if i % 2 == 0 { &long } else { &short };
                s.spawn(move || generate(rec).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results[0].bytes, expected.bytes);
    assert_eq!(results[2].bytes, expected.bytes);
    assert_eq!(results[1].bytes, results[3].bytes);
    assert_ne!(results[1].bytes, expected.bytes);
}

#[test]
fn test_no_duplicated_text() {
    let html = "<article><section><div><h2>Getting Started Guide</h2>\
                <p>Install the tool, then run it once.</p>\
                <div><p>Install the tool, then run it once.</p></div></div></section>\
                <ul><li>First list entry</li><li>Second list entry</li></ul></article>";
    let blocks = extract_blocks(html);

    let mut seen = HashSet::new();
    for block in &blocks {
        assert!(seen.insert(block.text.clone()), "{:?} emitted twice", block.text);
    }
    let heading_hits = blocks
        .iter()
        .filter(|b| b.text.contains("Getting Started Guide"))
        .count();
    assert_eq!(heading_hits, 1);
}

#[test]
fn test_lines_reconstruct_blocks() {
    let html = long_html(30);
    let blocks = extract_blocks(&html);
    let doc = render(&html);

    let placed = lines_by_block(&doc);
    assert_eq!(placed.len(), blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(placed[&i].join(" "), block.text, "block {i} lost text");
    }
}

#[test]
fn test_page_capacity() {
    let doc = render(&long_html(40));
    for page in &doc.pages {
        for line in page.content.iter().filter(|l| !l.overflow) {
            assert!(
                line.y + line.line_height <= 297.0 - 20.0 + 1e-6,
                "line {:?} on page {} crosses the bottom margin",
                line.text,
                page.index
            );
            assert!(line.y >= 45.0 - 1e-9);
        }
    }
}

#[test]
fn test_footer_counts() {
    let doc = render(&long_html(40));
    let k = doc.pages.len();
    assert!(k > 2);
    for (i, page) in doc.pages.iter().enumerate() {
        let footer = page.bands.footer.as_ref().unwrap();
        assert_eq!(footer.right, format!("Page {} of {}", i + 1, k));
        assert_eq!(footer.left, "QuestMeraki");
    }
    assert!(doc.cover_page.bands.footer.is_none());
}

#[test]
fn test_empty_content_gets_placeholder() {
    for html in ["", "   ", "<div></div>", "<script>only()</script>"] {
        let blocks = extract_blocks(html);
        assert_eq!(blocks, vec![Block::new(BlockKind::Paragraph, "No content available")]);
        let artifact = generate(&record(html)).unwrap();
        assert_valid_pdf(&artifact.bytes);
    }
}

#[test]
fn test_custom_elements_do_not_truncate_body() {
    let html = "<p>First paragraph that is long enough.</p>\
                <video-player src=\"x\"></video-player>\
                <p>Second paragraph that must survive.</p>\
                <template-card>Card body text that is quite long</template-card>";
    let texts: Vec<String> = extract_blocks(html).into_iter().map(|b| b.text).collect();
    assert_eq!(texts[0], "First paragraph that is long enough.");
    assert!(texts.iter().any(|t| t == "Second paragraph that must survive."));
    assert!(texts.iter().any(|t| t.contains("Card body text that is quite long")));
}

// ─── Scenarios ──────────────────────────────────────────────────

#[test]
fn test_heading_and_paragraph_on_one_page() {
    let html = "<h2>Intro</h2><p>Hello world</p>";
    assert_eq!(
        extract_blocks(html),
        vec![
            Block::new(BlockKind::Heading(2), "Intro"),
            Block::new(BlockKind::Paragraph, "Hello world"),
        ]
    );
    let doc = render(html);
    assert_eq!(doc.pages.len(), 1);
    assert_eq!(doc.all_pages().count(), 2);
}

#[test]
fn test_long_content_spans_pages_without_splitting_blocks() {
    let doc = render(&long_html(40));
    assert!(doc.pages.len() > 1);

    let mut first_page: BTreeMap<usize, usize> = BTreeMap::new();
    for page in &doc.pages {
        for line in &page.content {
            if let LineSource::Block(i) = line.source {
                let owner = *first_page.entry(i).or_insert(page.index);
                assert_eq!(owner, page.index, "block {i} split across pages");
            }
        }
    }
}

#[test]
fn test_script_is_stripped_everywhere() {
    let html = "<script>alert(1)</script><p>Safe text</p>";
    assert_eq!(
        extract_blocks(html),
        vec![Block::new(BlockKind::Paragraph, "Safe text")]
    );

    let doc = render(html);
    for page in doc.all_pages() {
        for element in &page.elements {
            if let DrawCommand::Text { text, .. } = element {
                assert!(!text.contains("alert"));
            }
        }
    }

    let artifact = generate(&record(html)).unwrap();
    for stream in content_streams(&artifact.bytes) {
        assert!(!stream.contains("alert"));
    }
    assert!(content_streams(&artifact.bytes)[1].contains("(Safe text) Tj"));
}

// ─── Configuration & Errors ─────────────────────────────────────

#[test]
fn test_letter_page_without_lead() {
    let config = RenderConfig::from_json(
        r#"{"page": {"size": "Letter"}, "includeLead": false, "brand": "Acme"}"#,
    )
    .unwrap();
    let doc = render_document(&record("<p>Only the body is printed here.</p>"), &config).unwrap();
    assert_eq!(doc.pages[0].width, 215.9);
    assert_eq!(doc.pages[0].content.len(), 1);
    assert_eq!(doc.pages[0].bands.footer.as_ref().unwrap().left, "Acme");
}

#[test]
fn test_split_lines_policy() {
    let config = RenderConfig::from_json(
        r#"{"breakPolicy": {"splitLines": {"minOrphanLines": 2, "minWidowLines": 2}}}"#,
    )
    .unwrap();
    let html = long_html(30);
    let blocks = extract_blocks(&html);
    let doc = render_document(&record(&html), &config).unwrap();
    let placed = lines_by_block(&doc);
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(placed[&i].join(" "), block.text);
    }
    let artifact = generate_with(&record(&html), &config).unwrap();
    assert_valid_pdf(&artifact.bytes);
}

#[test]
fn test_invalid_json_is_invalid_record() {
    let err = generate_json("{\"title\": \"missing date\"}").unwrap_err();
    assert!(matches!(err, FolioError::InvalidRecord { .. }));
    assert_eq!(
        err.user_message(),
        "Failed to generate document. Please try again."
    );
}

#[test]
fn test_impossible_margins_are_config_error() {
    let config = RenderConfig::from_json(r#"{"page": {"margin": {"top": 20, "right": 120, "bottom": 20, "left": 120}}}"#);
    assert!(matches!(config, Err(FolioError::Config(_))));
}

#[test]
fn test_unicode_text_survives() {
    let html = "<p>Caf\u{e9} cr\u{e8}me and “quotes” — with a dash.</p>";
    let artifact = generate(&record(html)).unwrap();
    assert_valid_pdf(&artifact.bytes);
    let streams = content_streams(&artifact.bytes);
    assert!(streams[1].contains("(Caf\\351 cr\\350me and \\223quotes\\224 \\227 with a dash.) Tj"));
}
