//! Structured error types for the Folio rendering pipeline.
//!
//! Four variants cover the real failure sources: record parsing, invalid
//! configuration, text measurement and PDF assembly. Empty or malformed HTML
//! is not among them; the extractor recovers from it locally.

use thiserror::Error;

/// The one message shown to end users, whatever went wrong.
pub const GENERIC_FAILURE: &str = "Failed to generate document. Please try again.";

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as a blog record or configuration.
    #[error("Failed to parse input: {source}{}", hint_suffix(.hint))]
    InvalidRecord {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// Page geometry or another setting makes rendering impossible.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Text could not be measured for the requested font and size.
    #[error("Measurement error: {0}")]
    Measurement(String),
    /// The PDF byte stream could not be produced.
    #[error("Assembly error: {0}")]
    Assembly(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl FolioError {
    /// Text for the call boundary. Never exposes internal state.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected shape. Check field names and types (createdAt must be RFC 3339).".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::InvalidRecord { source: e, hint }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
