//! Raw HTML cleanup, run before parsing.
//!
//! Removes elements that must never reach the document (scripts, styles,
//! images and other embedded media), then flattens every kind of whitespace
//! noise into single spaces.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Paired elements removed with their content. An unterminated opening tag
/// swallows the rest of the input. The name must end at whitespace, `/` or
/// `>` so custom elements such as `<video-player>` are left alone.
static PAIRED_DISALLOWED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        "script", "style", "noscript", "iframe", "object", "video", "audio", "svg", "template",
    ]
    .iter()
    .map(|tag| {
        Regex::new(&format!(r"(?is)<{tag}(?:[\s/][^>]*)?>.*?(?:</{tag}\s*>|\z)"))
            .expect("paired element regex")
    })
    .collect()
});

/// Void elements removed on their own.
static VOID_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:img|embed|source|track)(?:[\s/][^>]*)?>").expect("void element regex")
});

/// Stray closing tags left behind by the void pattern, e.g. `</img>`.
static STRAY_CLOSERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:img|embed|source|track)\s*>").expect("stray closer regex")
});

static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("comment regex"));

/// Strip disallowed elements and whitespace noise from raw HTML.
///
/// Never fails. Empty or whitespace-only input gives an empty string.
pub fn normalize(raw_html: &str) -> String {
    if raw_html.trim().is_empty() {
        return String::new();
    }

    let mut html = COMMENTS.replace_all(raw_html, " ").into_owned();
    for pattern in PAIRED_DISALLOWED.iter() {
        html = pattern.replace_all(&html, " ").into_owned();
    }
    html = VOID_DISALLOWED.replace_all(&html, " ").into_owned();
    html = STRAY_CLOSERS.replace_all(&html, " ").into_owned();

    collapse_whitespace(&html)
}

/// NFC-normalize, drop control and zero-width characters, collapse every
/// whitespace run (including no-break spaces) to one space, and trim.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.nfc() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if ch.is_control() || is_invisible(ch) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }

    out
}

fn is_invisible(ch: char) -> bool {
    matches!(
        ch,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    )
}
