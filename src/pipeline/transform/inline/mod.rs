//! CSS inlining.
//!
//! Merges stylesheet rules into `style` attributes of the elements they
//! match. Resolution follows the usual cascade:
//!
//! 1. normal declarations, by specificity, then source order
//! 2. the element's own `style` attribute
//! 3. `!important` declarations, by specificity, then source order
//!
//! Later entries override earlier ones; each property appears once in the
//! resulting attribute.

mod selector;
mod stylesheet;

use crate::error::Result;
use crate::log;
use crate::logger::Logger;
use crate::pipeline::scan::{Element, rewrite_elements};
use stylesheet::{Declaration, StyleRule, parse_rules};

/// Elements that never render and never receive inline styles.
const NON_RENDERED: &[&str] = &[
    "head", "meta", "title", "link", "base", "script", "style", "template",
];

/// Inline `css` into `html`.
///
/// Empty CSS leaves the HTML untouched. Selectors outside the supported
/// grammar are skipped and reported through `logger`.
pub fn inline_css(html: &str, css: &str, logger: &Logger) -> Result<String> {
    if css.trim().is_empty() {
        return Ok(html.to_string());
    }

    let rules = parse_rules(css)?;

    let skipped: usize = rules.iter().map(|rule| rule.skipped).sum();
    if skipped > 0 {
        log!(logger, "inline"; "skipped {} unsupported selector{}", skipped, if skipped == 1 { "" } else { "s" });
    }
    if rules.iter().all(|rule| rule.selectors.is_empty()) {
        return Ok(html.to_string());
    }

    let mut styled = 0usize;
    let html = rewrite_elements(html, |element, ancestors| {
        if apply_rules(element, ancestors, &rules) {
            styled += 1;
        }
        Ok(())
    })?;

    log!(logger, "inline"; "{} rules inlined into {} elements", rules.len(), styled);
    Ok(html)
}

/// Resolve and write the `style` attribute. Returns whether anything matched.
fn apply_rules(element: &mut Element, ancestors: &[Element], rules: &[StyleRule]) -> bool {
    if NON_RENDERED.contains(&element.name.as_str()) {
        return false;
    }

    let mut matched: Vec<(u32, usize, &Declaration)> = Vec::new();
    for (index, rule) in rules.iter().enumerate() {
        for selector in rule.selectors.iter().filter(|s| s.matches(element, ancestors)) {
            let specificity = selector.specificity();
            matched.extend(rule.declarations.iter().map(|decl| (specificity, index, decl)));
        }
    }

    if matched.is_empty() {
        return false;
    }

    // Stable: declarations of one rule keep their order.
    matched.sort_by_key(|(specificity, rule, _)| (*specificity, *rule));

    let mut style = InlineStyle::default();
    for (_, _, decl) in matched.iter().filter(|(_, _, d)| !d.important) {
        style.set(&decl.property, decl.value.clone());
    }
    if let Some(existing) = element.attr("style") {
        for decl in split_declarations(existing).filter_map(|text| Declaration::parse(text, false)) {
            style.set(&decl.property, decl.value);
        }
    }
    for (_, _, decl) in matched.iter().filter(|(_, _, d)| d.important) {
        style.set(&decl.property, format!("{} !important", decl.value));
    }

    element.set_attr("style", style.to_string());
    true
}

/// Ordered property map; setting an existing property replaces it in place.
#[derive(Debug, Default)]
struct InlineStyle {
    properties: Vec<(String, String)>,
}

impl InlineStyle {
    fn set(&mut self, property: &str, value: String) {
        match self.properties.iter_mut().find(|(p, _)| p == property) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((property.to_string(), value)),
        }
    }
}

impl std::fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (property, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{property}: {value}")?;
        }
        Ok(())
    }
}

/// Split a `style` attribute on `;`, ignoring semicolons inside parentheses
/// or quotes (`url(data:...;base64,...)`).
fn split_declarations(style: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);
    parts.into_iter().filter(|part| !part.trim().is_empty())
}
