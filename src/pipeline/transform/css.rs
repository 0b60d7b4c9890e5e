//! Stylesheet normalization.
//!
//! The inliner understands plain selectors only, so rules it could never
//! evaluate are dropped up front instead of being half-applied:
//!
//! 1. comments (they may contain markup that confuses later patterns)
//! 2. rules whose selector uses a functional pseudo-class (`:not(...)`,
//!    `:nth-child(...)`), together with their declaration block
//! 3. rules whose selector uses the general-sibling combinator `~`
//!
//! This is a filter, not a parser: anything that does not match one of the
//! patterns is passed through unchanged.

use std::sync::LazyLock;

use regex::Regex;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"));

/// A selector prelude with `ident(` followed by its block. The prelude may not
/// cross `{`, `}` or `;`, so functions inside declarations never match, and
/// it may not contain `@`, so at-rule preludes are left alone.
static FUNCTIONAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^@{};]*[\w\-]\([^{};]*\{[^{}]*\}").expect("functional pattern is valid")
});

static SIBLING_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^@{};]*~[^{};]*\{[^{}]*\}").expect("sibling pattern is valid")
});

/// Remove constructs a simple selector-matching inliner cannot handle.
pub fn normalize_css(css: &str) -> String {
    let css = COMMENT.replace_all(css, "");
    let css = FUNCTIONAL_RULE.replace_all(&css, "");
    SIBLING_RULE.replace_all(&css, "").into_owned()
}
