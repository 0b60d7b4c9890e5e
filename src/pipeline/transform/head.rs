//! Renderer artifact removal.
//!
//! Runs on the raw rendered HTML before inlining:
//! - the `&#182;` anchor glyph emitted after headings
//! - `<link rel="stylesheet">` tags (styles arrive inline instead, and a
//!   link to a local stylesheet would dangle on the blog host)
//! - the whole `<head>` block, which repeats the global CSS the inliner
//!   already receives separately
//!
//! All patterns are case-insensitive and match across newlines.

use std::sync::LazyLock;

use regex::Regex;

static PILCROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&#182;|&para;").expect("pilcrow pattern is valid"));

static STYLESHEET_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<link\b[^>]*\brel\s*=\s*["']?stylesheet\b[^>]*>"#)
        .expect("link pattern is valid")
});

static HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head\b.*?</head\s*>").expect("head pattern is valid"));

/// Strip renderer artifacts from raw HTML.
pub fn preclean_html(html: &str) -> String {
    let html = PILCROW.replace_all(html, "");
    let html = STYLESHEET_LINK.replace_all(&html, "");
    HEAD.replace_all(&html, "").into_owned()
}
