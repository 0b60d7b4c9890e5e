//! Stylesheet flattening via lightningcss.
//!
//! Produces the top-level style rules in source order, selectors converted
//! to the supported grammar and declarations serialized back to text. At-rules (`@media`, `@font-face`,
//! ...) have no inline equivalent and are skipped.

use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use super::selector::Selector;
use crate::error::{ConvertError, Result};

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    /// Split `property: value` text. `None` if there is no colon.
    pub fn parse(text: &str, important: bool) -> Option<Self> {
        let (property, value) = text.split_once(':')?;
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self {
            property: property.to_ascii_lowercase(),
            value: value.to_string(),
            important,
        })
    }
}

/// A style rule: its supported selectors and declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selectors: Vec<Selector>,
    /// Selectors of the list that fall outside the grammar.
    pub skipped: usize,
    pub declarations: Vec<Declaration>,
}

/// Parse CSS into its top-level style rules.
pub fn parse_rules(css: &str) -> Result<Vec<StyleRule>> {
    let options = ParserOptions {
        error_recovery: true,
        ..ParserOptions::default()
    };
    let sheet =
        StyleSheet::parse(css, options).map_err(|e| ConvertError::Stylesheet(e.to_string()))?;

    let mut rules = Vec::new();
    for rule in &sheet.rules.0 {
        let CssRule::Style(style) = rule else {
            continue;
        };

        let list = &style.selectors.0;
        let selectors: Vec<Selector> = list.iter().filter_map(Selector::from_parsed).collect();

        let block = &style.declarations;
        let properties = block
            .declarations
            .iter()
            .map(|p| (p, false))
            .chain(block.important_declarations.iter().map(|p| (p, true)));

        let mut declarations = Vec::new();
        for (property, important) in properties {
            let text = property
                .to_css_string(false, PrinterOptions::default())
                .map_err(|e| ConvertError::Stylesheet(e.to_string()))?;
            declarations.extend(Declaration::parse(&text, important));
        }

        rules.push(StyleRule {
            skipped: list.len() - selectors.len(),
            selectors,
            declarations,
        });
    }

    Ok(rules)
}
