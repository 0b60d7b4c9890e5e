//! Styling hook removal.
//!
//! Once styles are inline, `class` and `id` only serve stylesheets the blog
//! host will never load, and any `<style>` block left in the body would be
//! stripped (or shown as text) by the host anyway.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::pipeline::scan::rewrite_elements;

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("style pattern is valid")
});

const STRIPPED: &[&str] = &["class", "id"];

/// Delete every `<style>...</style>` block.
pub fn remove_style_blocks(html: &str) -> String {
    STYLE_BLOCK.replace_all(html, "").into_owned()
}

/// Remove `class` and `id` from every element. Safe to run repeatedly.
pub fn strip_attributes(html: &str) -> Result<String> {
    rewrite_elements(html, |element, _| {
        for name in STRIPPED {
            element.remove_attr(name);
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(html: &str) -> String {
        strip_attributes(html).unwrap()
    }

    #[test]
    fn test_strips_class_and_id() {
        let html = r#"<div class="cell" id="c1"><p CLASS='x' style="color: red">t</p><br id=b></div>"#;
        assert_eq!(
            strip(html),
            r#"<div><p style="color: red">t</p><br></div>"#
        );
    }

    #[test]
    fn test_strip_is_idempotent() {
        let html = r#"<section id="s"><span class="a b">x</span><em>y</em></section>"#;
        let once = strip(html);
        assert_eq!(strip(&once), once);
        assert_eq!(strip("<em>y</em>"), "<em>y</em>");
    }

    #[test]
    fn test_strip_leaves_text_alone() {
        let html = r#"<pre>class="keep" id="keep"</pre><script>el.id = "x"; el.className = "y";</script>"#;
        assert_eq!(strip(html), html);
    }

    #[test]
    fn test_strip_keeps_named_entities() {
        let html = r#"<img class="fig" alt="caf&eacute; &mdash; plot" title="&copy; 2024">"#;
        assert_eq!(
            strip(html),
            r#"<img alt="caf&eacute; &mdash; plot" title="&copy; 2024">"#
        );
    }

    #[test]
    fn test_remove_style_blocks() {
        let html = "<div><STYLE type=\"text/css\">\n.a { color: red }\n</style><p>x</p><style>p{}</style ></div>";
        assert_eq!(remove_style_blocks(html), "<div><p>x</p></div>");
    }

    #[test]
    fn test_structure_after_strip() {
        let html = r#"<div class="a"><ul id="l"><li class="i">1</li><li>2</li></ul></div>"#;
        let out = strip(html);
        let dom = tl::parse(&out, tl::ParserOptions::default()).unwrap();
        let mut tags = 0;
        for node in dom.nodes() {
            if let tl::Node::Tag(tag) = node {
                tags += 1;
                for (key, _) in tag.attributes().iter() {
                    let key: &str = key.as_ref();
                    assert!(key != "class" && key != "id", "{out}");
                }
            }
        }
        assert_eq!(tags, 5);
    }
}
