//! Output primitives handed to the layout engine.
//!
//! The vocabulary is deliberately small: containers, text runs, literal
//! strings, hyperlinks, images and a minimal vector subset. Everything
//! serializes to JSON with a `type` tag; image bytes are base64 encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use folio_css::StyleMap;
use serde::{Serialize, Serializer};

/// One node of the output primitive tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Primitive {
    /// Renders nothing.
    Empty,

    /// A layout container.
    View {
        /// Cascaded style list; later entries override earlier ones.
        style: Vec<StyleMap>,
        /// `false` keeps the container on a single page.
        wrap: bool,
        /// Child primitives.
        children: Vec<Primitive>,
    },

    /// A run of text.
    Text {
        /// Cascaded style list.
        style: Vec<StyleMap>,
        /// Literal strings and nested runs.
        children: Vec<Primitive>,
    },

    /// A bare string inside a text run.
    Literal {
        /// The string content.
        text: String,
    },

    /// A hyperlink around its children.
    Link {
        /// Cascaded style list.
        style: Vec<StyleMap>,
        /// Link target.
        src: String,
        /// Linked content.
        children: Vec<Primitive>,
    },

    /// An image.
    Image {
        /// Cascaded style list.
        style: Vec<StyleMap>,
        /// Where the image bytes come from.
        source: ImageSource,
    },

    /// A vector graphic.
    Svg {
        /// Cascaded style list.
        style: Vec<StyleMap>,
        /// Shapes, drawn in order.
        children: Vec<SvgShape>,
    },
}

impl Primitive {
    /// A wrapping container.
    #[must_use]
    pub const fn view(style: Vec<StyleMap>, children: Vec<Self>) -> Self {
        Self::View {
            style,
            wrap: true,
            children,
        }
    }

    /// A container that must not be split across pages.
    #[must_use]
    pub const fn unbreakable(style: Vec<StyleMap>, children: Vec<Self>) -> Self {
        Self::View {
            style,
            wrap: false,
            children,
        }
    }

    /// A text run.
    #[must_use]
    pub const fn text(style: Vec<StyleMap>, children: Vec<Self>) -> Self {
        Self::Text { style, children }
    }

    /// A literal string.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal { text: text.into() }
    }

    /// Whether this is [`Primitive::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Child primitives of a container, text run or link.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::View { children, .. } | Self::Text { children, .. } | Self::Link { children, .. } => {
                children
            }
            _ => &[],
        }
    }

    /// Style list of a styled primitive.
    #[must_use]
    pub fn style(&self) -> &[StyleMap] {
        match self {
            Self::View { style, .. }
            | Self::Text { style, .. }
            | Self::Link { style, .. }
            | Self::Image { style, .. }
            | Self::Svg { style, .. } => style,
            Self::Empty | Self::Literal { .. } => &[],
        }
    }

    /// Concatenated literal text of this primitive and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Self::Literal { text } = self {
            out.push_str(text);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }
}

/// Image payload of [`Primitive::Image`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ImageSource {
    /// A remote URL the output engine fetches itself.
    Url(String),
    /// Raw image bytes.
    Data(#[serde(serialize_with = "serialize_base64")] Vec<u8>),
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// Shapes inside [`Primitive::Svg`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SvgShape {
    /// A transformed group.
    Group {
        /// SVG transform list, e.g. `scale(1) translate(100,10)`.
        transform: String,
        /// Grouped shapes.
        children: Vec<SvgShape>,
    },
    /// A closed polygon.
    Polygon {
        /// Fill color.
        fill: String,
        /// Space-separated `x,y` pairs.
        points: String,
    },
}
