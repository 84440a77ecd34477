//! The closed tag vocabulary renderers are dispatched over.
//!
//! [§ 4 The elements of HTML](https://html.spec.whatwg.org/multipage/#toc-semantics)
//!
//! Any element whose tag is not listed here cannot be rendered; dispatch
//! rejects it with [`RenderError::UnknownTag`](crate::RenderError::UnknownTag).

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A renderable HTML tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum Tag {
    // Document metadata
    Head,
    Title,
    Meta,
    Link,
    Style,
    Script,
    Noscript,
    Template,

    // Sections and grouping
    Html,
    Body,
    Div,
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Section,
    Article,
    Header,
    Footer,
    Nav,
    Main,
    Aside,
    Blockquote,
    Pre,
    Hr,
    Figure,
    Figcaption,
    Ul,
    Ol,
    Li,

    // Text-level semantics
    A,
    Span,
    B,
    Strong,
    I,
    Em,
    U,
    S,
    Del,
    Ins,
    Small,
    Sub,
    Sup,
    Code,
    Mark,
    Label,
    Br,

    // Embedded content
    Img,
    Svg,

    // Tabular data
    Table,
    Caption,
    Thead,
    Tbody,
    Tfoot,
    Tr,
    Td,
    Th,
}

/// How a tag renders by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    /// Produces nothing and never renders its children.
    Metadata,
    /// A container primitive.
    Block,
    /// A text-run primitive; flows with neighbouring text.
    Inline,
    /// Has a dedicated renderer.
    Special,
}

impl Tag {
    /// The lowercase tag name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Default rendering category.
    #[must_use]
    pub const fn category(self) -> TagCategory {
        match self {
            Self::Head
            | Self::Title
            | Self::Meta
            | Self::Link
            | Self::Style
            | Self::Script
            | Self::Noscript
            | Self::Template => TagCategory::Metadata,

            Self::Span
            | Self::B
            | Self::Strong
            | Self::I
            | Self::Em
            | Self::U
            | Self::S
            | Self::Del
            | Self::Ins
            | Self::Small
            | Self::Sub
            | Self::Sup
            | Self::Code
            | Self::Mark
            | Self::Label => TagCategory::Inline,

            Self::A
            | Self::Br
            | Self::Li
            | Self::Img
            | Self::Svg
            | Self::Table
            | Self::Tr
            | Self::Td
            | Self::Th => TagCategory::Special,

            _ => TagCategory::Block,
        }
    }

    /// Whether the tag flows inline with text. Links count as inline even
    /// though they have their own renderer.
    #[must_use]
    pub const fn is_inline(self) -> bool {
        matches!(self.category(), TagCategory::Inline) || matches!(self, Self::A)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Tag::from_str("td"), Ok(Tag::Td));
        assert_eq!(Tag::from_str("TABLE"), Ok(Tag::Table));
        assert!(Tag::from_str("marquee").is_err());
    }

    #[test]
    fn names_round_trip() {
        for tag in Tag::iter() {
            assert_eq!(Tag::from_str(tag.name()), Ok(tag));
        }
    }

    #[test]
    fn classifies_tags() {
        assert_eq!(Tag::Style.category(), TagCategory::Metadata);
        assert_eq!(Tag::Em.category(), TagCategory::Inline);
        assert_eq!(Tag::Td.category(), TagCategory::Special);
        assert_eq!(Tag::Blockquote.category(), TagCategory::Block);
        assert!(Tag::A.is_inline());
        assert!(!Tag::Img.is_inline());
    }
}
