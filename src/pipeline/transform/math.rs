//! `$`/`$$` math delimiter rewrite.
//!
//! Runs after every other HTML mutation: the directive contains literal
//! `&`, which any later serialization pass would escape to `&amp;`.
//!
//! Two passes:
//!
//! 1. Delimited spans are wrapped in sentinels, `@beginlatex@...@endlatex1@`
//!    for `$...$` and `@beginlatex@...@endlatex2@` for `$$...$$`. A span
//!    closes at the first matching run of the same width; backslash escapes
//!    (`\$`) never open or close a span.
//! 2. Sentinels are replaced by the directive prefix and the inline or
//!    block suffix.
//!
//! Unmatched delimiters are left as literal text.

use crate::config::{MathDirective, MathMode};

const BEGIN: &str = "@beginlatex@";
const END_INLINE: &str = "@endlatex1@";
const END_BLOCK: &str = "@endlatex2@";

/// Rewrite math delimiters according to `mode`.
pub fn rewrite_math(html: &str, mode: &MathMode) -> String {
    match mode {
        MathMode::Disabled => html.to_string(),
        MathMode::Directive(directive) => expand_sentinels(&mark_spans(html), directive),
    }
}

/// Wrap every delimited span in sentinels.
fn mark_spans(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 64);
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i = skip_escape(text, i),
            b'$' => {
                let width = if bytes.get(i + 1) == Some(&b'$') { 2 } else { 1 };
                let body = i + width;
                match find_closer(text, body, width) {
                    Some(end) => {
                        out.push_str(&text[copied..i]);
                        out.push_str(BEGIN);
                        out.push_str(&text[body..end]);
                        out.push_str(if width == 1 { END_INLINE } else { END_BLOCK });
                        i = end + width;
                        copied = i;
                    }
                    None => i = body,
                }
            }
            _ => i += 1,
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Offset just past the escape sequence whose backslash is at `i`.
fn skip_escape(text: &str, i: usize) -> usize {
    text[i + 1..]
        .chars()
        .next()
        .map_or(i + 1, |c| i + 1 + c.len_utf8())
}

/// Offset of the first unescaped run of `width` dollars at or after `from`.
fn find_closer(text: &str, from: usize, width: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let delimiter = &b"$$"[..width];
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j = skip_escape(text, j),
            b'$' if bytes[j..].starts_with(delimiter) => return Some(j),
            _ => j += 1,
        }
    }
    None
}

fn expand_sentinels(text: &str, directive: &MathDirective) -> String {
    text.replace(BEGIN, MathDirective::PREFIX)
        .replace(END_INLINE, &directive.inline_suffix())
        .replace(END_BLOCK, &directive.block_suffix())
}
