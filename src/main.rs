//! # Folio CLI
//!
//! Usage:
//!   folio record.json -o post.pdf
//!   folio record.json --config config.json
//!   cat record.json | folio -o post.pdf
//!   folio --example > record.json
//!
//! Without `-o` the PDF is written to `<slugified title>.pdf`. Set
//! `RUST_LOG=debug` to see what each stage did.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use folio::{BlogRecord, RenderConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_record_json());
        return;
    }

    if let Err(message) = run(&args) {
        eprintln!("✗ {message}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).map_err(|e| format!("Failed to read {}: {e}", args[1]))?
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        buf
    };

    let config = match flag_value(args, "--config") {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {path}: {e}"))?;
            RenderConfig::from_json(&json).map_err(|e| e.to_string())?
        }
        None => RenderConfig::default(),
    };

    let record: BlogRecord = serde_json::from_str(&input)
        .map_err(|e| folio::FolioError::from(e).to_string())?;

    let artifact = folio::generate_with(&record, &config).map_err(|e| e.to_string())?;

    let output_path = flag_value(args, "-o")
        .map(str::to_string)
        .unwrap_or_else(|| artifact.filename.clone());

    fs::write(&output_path, &artifact.bytes)
        .map_err(|e| format!("Failed to write {output_path}: {e}"))?;
    eprintln!(
        "✓ Written {} bytes to {}",
        artifact.bytes.len(),
        output_path
    );
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn example_record_json() -> &'static str {
    r##"{
  "id": "64f1c0ffee",
  "title": "Why Page-Native Layout Matters",
  "subtitle": "Notes from rebuilding our export pipeline",
  "authorName": "Sam Rivera",
  "category": "perspective",
  "createdAt": "2024-03-05T10:00:00Z",
  "htmlContent": "<h2>Intro</h2><p>Most exporters render an endless canvas and slice it into pages afterwards. That is where headings get orphaned and paragraphs get cut in half.</p><blockquote>The page is the unit of layout.</blockquote><h3>What we changed</h3><ul><li>Blocks are measured before they are placed.</li><li>A block that does not fit moves to the next page whole.</li><li>Footers are painted once the page count is known.</li></ul><strong>Every page now reads cleanly.</strong><p>Scripts, styles and images in the body are stripped before any of this happens.</p><script>alert('never rendered')</script>"
}
"##
}
