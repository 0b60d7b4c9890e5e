//! Start-tag rewriting over an HTML string.
//!
//! The transforms only ever touch start tags (styles, `src`, `class`/`id`),
//! so instead of round-tripping through a DOM they stream the markup through
//! `lol_html` and edit just the attributes they change. Text, comments,
//! `<script>` and `<style>` bodies and every untouched attribute keep their
//! source bytes, which keeps later textual stages (the math rewrite)
//! independent of any serializer.
//!
//! An ancestor stack is kept for selector matching. An end tag pops its
//! element and anything opened inside it that was never closed.

use std::cell::RefCell;
use std::rc::Rc;

use lol_html::errors::RewritingError;
use lol_html::{RewriteStrSettings, element, rewrite_str};

use crate::error::{ConvertError, Result};

// =============================================================================
// Element
// =============================================================================

/// A start tag as seen by the transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub name: String,
    /// Attributes in source order, values entity-decoded.
    attrs: Vec<(String, String)>,
    /// Attributes set or removed since the tag was read.
    touched: Vec<String>,
}

impl Element {
    fn read(element: &lol_html::html_content::Element<'_, '_>) -> Self {
        let attrs = element
            .attributes()
            .iter()
            .map(|attr| {
                let value = html_escape::decode_html_entities(&attr.value()).into_owned();
                (attr.name(), value)
            })
            .collect();
        Self {
            name: element.tag_name().to_ascii_lowercase(),
            attrs,
            touched: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn new(name: &str, attrs: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), (*v).to_string()))
                .collect(),
            touched: Vec::new(),
        }
    }

    /// Attribute value. Boolean attributes read as `""`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute, keeping its position.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self.touch(name);
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(k, _)| k != name);
        let removed = self.attrs.len() != before;
        if removed {
            self.touch(name);
        }
        removed
    }

    fn touch(&mut self, name: &str) {
        if !self.touched.iter().any(|t| t == name) {
            self.touched.push(name.to_string());
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

// =============================================================================
// Rewriting
// =============================================================================

/// Visit every start tag in document order.
///
/// `visit` receives the element and its open ancestors (outermost first).
/// Only attributes it sets or removes are written back; everything else is
/// copied as is. The first error aborts the walk.
pub fn rewrite_elements<F>(html: &str, mut visit: F) -> Result<String>
where
    F: FnMut(&mut Element, &[Element]) -> Result<()>,
{
    let stack: Rc<RefCell<Vec<Element>>> = Rc::default();

    let handler = element!("*", |el| {
        let mut element = Element::read(el);
        visit(&mut element, &stack.borrow()[..])?;

        for name in &element.touched {
            match element.attr(name) {
                Some(value) => {
                    el.set_attribute(name, &html_escape::encode_double_quoted_attribute(value))?;
                }
                None => el.remove_attribute(name),
            }
        }

        // Void and self-closing tags never become ancestors.
        if let Some(handlers) = el.end_tag_handlers() {
            let depth = stack.borrow().len();
            let open = Rc::clone(&stack);
            handlers.push(Box::new(move |_end| {
                open.borrow_mut().truncate(depth);
                Ok(())
            }));
            element.touched.clear();
            stack.borrow_mut().push(element);
        }
        Ok(())
    });

    let settings = RewriteStrSettings {
        element_content_handlers: vec![handler],
        ..RewriteStrSettings::new()
    };

    rewrite_str(html, settings).map_err(|err| match err {
        RewritingError::ContentHandlerError(inner) => match inner.downcast::<ConvertError>() {
            Ok(err) => *err,
            Err(other) => ConvertError::Rewrite(other.to_string()),
        },
        other => ConvertError::Rewrite(other.to_string()),
    })
}
