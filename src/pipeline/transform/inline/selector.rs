//! Supported selector grammar.
//!
//! ```text
//! selector  := compound (combinator compound)*
//! compound  := (type | '*')? ('.' class | '#' id)*
//! combinator:= whitespace (descendant) | '>' (child)
//! ```
//!
//! Selectors arrive already parsed by lightningcss. Anything with other
//! components (pseudo-classes, attribute selectors, `+`, `~`) is rejected
//! by [`Selector::from_parsed`] and skipped.

use lightningcss::selector::{Combinator as CssCombinator, Component, Selector as CssSelector};

use crate::pipeline::scan::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        self.tag.as_ref().is_none_or(|tag| *tag == element.name)
            && self.ids.iter().all(|id| element.id() == Some(id.as_str()))
            && self.classes.iter().all(|class| element.has_class(class))
    }
}

/// A supported selector, compounds ordered left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
    specificity: u32,
}

impl Selector {
    /// Convert a lightningcss selector, `None` if it falls outside the grammar.
    pub fn from_parsed(selector: &CssSelector<'_>) -> Option<Self> {
        let mut compounds = vec![Compound::default()];
        let mut combinators = Vec::new();

        for component in selector.iter_raw_parse_order_from(0) {
            let combinator = match component {
                Component::Combinator(CssCombinator::Descendant) => Some(Combinator::Descendant),
                Component::Combinator(CssCombinator::Child) => Some(Combinator::Child),
                _ => None,
            };
            if let Some(combinator) = combinator {
                combinators.push(combinator);
                compounds.push(Compound::default());
                continue;
            }

            let current = compounds.last_mut()?;
            match component {
                Component::LocalName(name) => current.tag = Some(name.lower_name.0.to_string()),
                Component::ID(id) => current.ids.push(id.0.to_string()),
                Component::Class(class) => current.classes.push(class.0.to_string()),
                // `*` and the implicit namespace match every element
                Component::ExplicitUniversalType
                | Component::ExplicitAnyNamespace
                | Component::DefaultNamespace(_) => {}
                _ => return None,
            }
        }

        Some(Self {
            compounds,
            combinators,
            specificity: selector.specificity(),
        })
    }

    /// Packed `(ids, classes, types)` specificity; compares like the tuple.
    pub fn specificity(&self) -> u32 {
        self.specificity
    }

    /// Whether `element`, nested inside `ancestors` (outermost first), matches.
    pub fn matches(&self, element: &Element, ancestors: &[Element]) -> bool {
        self.match_at(self.compounds.len() - 1, element, ancestors)
    }

    fn match_at(&self, index: usize, element: &Element, ancestors: &[Element]) -> bool {
        if !self.compounds[index].matches(element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => ancestors
                .split_last()
                .is_some_and(|(parent, rest)| self.match_at(index - 1, parent, rest)),
            Combinator::Descendant => (0..ancestors.len())
                .rev()
                .any(|i| self.match_at(index - 1, &ancestors[i], &ancestors[..i])),
        }
    }
}
