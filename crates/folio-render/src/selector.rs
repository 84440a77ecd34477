//! Selector matching over the content tree.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//!
//! Only the subset style sheet keys need in practice is understood: type,
//! class, id and universal selectors, compounds of them, and the descendant
//! and child combinators. [`Selector::parse`] returns `None` for anything
//! else, and such a selector never matches.

use crate::content::{ContentId, ContentTree, ElementNode};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    Type(String),
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,
}

impl SimpleSelector {
    fn matches(&self, element: &ElementNode) -> bool {
        match self {
            Self::Type(name) => element.tag().eq_ignore_ascii_case(name),
            Self::Class(class) => element.classes().contains(class.as_str()),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Universal => true,
        }
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    Child,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// Stored subject first: `ul > li a` is `[a]`, then `(Descendant, [li])`,
/// then `(Child, [ul])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    subject: Vec<SimpleSelector>,
    combinators: Vec<(Combinator, Vec<SimpleSelector>)>,
}

impl Selector {
    /// Parse a single selector (no commas).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut compounds: Vec<Vec<SimpleSelector>> = Vec::new();
        let mut combinators: Vec<Combinator> = Vec::new();
        let mut pending: Option<Combinator> = None;

        let mut chars = raw.trim().chars().peekable();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_whitespace() || c == '>' {
                let _ = chars.next();
                if c == '>' {
                    pending = Some(Combinator::Child);
                } else if pending.is_none() {
                    pending = Some(Combinator::Descendant);
                }
                continue;
            }

            let mut compound = Vec::new();
            while let Some(&c) = chars.peek() {
                let simple = match c {
                    '*' => {
                        let _ = chars.next();
                        SimpleSelector::Universal
                    }
                    '.' => {
                        let _ = chars.next();
                        SimpleSelector::Class(take_ident(&mut chars)?)
                    }
                    '#' => {
                        let _ = chars.next();
                        SimpleSelector::Id(take_ident(&mut chars)?)
                    }
                    c if is_ident_char(c) => SimpleSelector::Type(take_ident(&mut chars)?),
                    c if c.is_ascii_whitespace() || c == '>' => break,
                    // Attribute selectors, pseudo-classes, sibling combinators.
                    _ => return None,
                };
                compound.push(simple);
            }

            if let Some(combinator) = pending.take() {
                if compounds.is_empty() {
                    return None;
                }
                combinators.push(combinator);
            }
            compounds.push(compound);
        }

        if pending == Some(Combinator::Child) {
            return None;
        }

        let subject = compounds.pop()?;
        let combinators = combinators.into_iter().rev().zip(compounds.into_iter().rev()).collect();
        Some(Self {
            subject,
            combinators,
        })
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    #[must_use]
    pub fn matches(&self, tree: &ContentTree, node: ContentId) -> bool {
        if !compound_matches(&self.subject, tree, node) {
            return false;
        }

        let mut current = node;
        for (combinator, compound) in &self.combinators {
            let next = match combinator {
                Combinator::Descendant => tree
                    .ancestors(current)
                    .find(|&ancestor| compound_matches(compound, tree, ancestor)),
                Combinator::Child => tree
                    .parent(current)
                    .filter(|&parent| compound_matches(compound, tree, parent)),
            };
            match next {
                Some(id) => current = id,
                None => return false,
            }
        }
        true
    }
}

fn compound_matches(compound: &[SimpleSelector], tree: &ContentTree, node: ContentId) -> bool {
    tree.element(node)
        .is_some_and(|element| compound.iter().all(|simple| simple.matches(element)))
}

/// [CSS Syntax § 4.2 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(c) = chars.next_if(|&c| is_ident_char(c)) {
        ident.push(c);
    }
    (!ident.is_empty()).then_some(ident)
}
