//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Only the token kinds that can appear in style sheets and style attributes
//! are modelled; `<unicode-range-token>` is not produced.

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// CSS tokens as defined by the CSS Syntax Module Level 3 specification.
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// "`<ident-token>`"
    Ident(String),

    /// "`<function-token>`"
    /// "has a value composed of one or more code points, followed by U+0028 LEFT PARENTHESIS"
    Function(String),

    /// "`<at-keyword-token>`"
    AtKeyword(String),

    /// "`<hash-token>`"
    /// "has a value composed of one or more code points, preceded by U+0023 NUMBER SIGN (#)"
    Hash(String),

    /// "`<string-token>`"
    String(String),

    /// "`<bad-string-token>`"
    /// "represents a parsing error"
    BadString,

    /// "`<url-token>`"
    Url(String),

    /// "`<bad-url-token>`"
    /// "represents a parsing error"
    BadUrl,

    /// "`<delim-token>`"
    /// "has a value composed of a single code point"
    Delim(char),

    /// "`<number-token>`"
    Number {
        /// "a numeric value"
        value: f64,
        /// The integer value if the type flag is "integer".
        int_value: Option<i64>,
    },

    /// "`<percentage-token>`"
    Percentage {
        /// "a numeric value"
        value: f64,
        /// The integer value if the type flag is "integer".
        int_value: Option<i64>,
    },

    /// "`<dimension-token>`"
    /// "has a numeric value, a type flag, and a unit"
    Dimension {
        /// "a numeric value"
        value: f64,
        /// The integer value if the type flag is "integer".
        int_value: Option<i64>,
        /// "a unit"
        unit: String,
    },

    /// "`<whitespace-token>`"
    Whitespace,

    /// "`<CDO-token>`" (`<!--`)
    CDO,

    /// "`<CDC-token>`" (`-->`)
    CDC,

    /// "`<colon-token>`"
    Colon,

    /// "`<semicolon-token>`"
    Semicolon,

    /// "`<comma-token>`"
    Comma,

    /// `<[-token>`
    LeftBracket,

    /// `<]-token>`
    RightBracket,

    /// `<(-token>`
    LeftParen,

    /// `<)-token>`
    RightParen,

    /// `<{-token>`
    LeftBrace,

    /// `<}-token>`
    RightBrace,

    /// End of file - signals end of input
    EOF,
}

impl CSSToken {
    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
    ///
    /// Append this token's CSS text to `out`.
    ///
    /// NOTE: Simplified. Whitespace serializes as a single space and
    /// identifiers are written without re-escaping.
    pub fn write_css(&self, out: &mut String) {
        match self {
            Self::Ident(v) => out.push_str(v),
            Self::Function(name) => {
                out.push_str(name);
                out.push('(');
            }
            Self::AtKeyword(v) => {
                out.push('@');
                out.push_str(v);
            }
            Self::Hash(v) => {
                out.push('#');
                out.push_str(v);
            }
            Self::String(v) => {
                out.push('"');
                out.push_str(v);
                out.push('"');
            }
            Self::Url(v) => {
                out.push_str("url(");
                out.push_str(v);
                out.push(')');
            }
            Self::Delim(c) => out.push(*c),
            Self::Number { value, int_value } => push_number(out, *value, *int_value),
            Self::Percentage { value, int_value } => {
                push_number(out, *value, *int_value);
                out.push('%');
            }
            Self::Dimension {
                value,
                int_value,
                unit,
            } => {
                push_number(out, *value, *int_value);
                out.push_str(unit);
            }
            Self::Whitespace => out.push(' '),
            Self::CDO => out.push_str("<!--"),
            Self::CDC => out.push_str("-->"),
            Self::Colon => out.push(':'),
            Self::Semicolon => out.push(';'),
            Self::Comma => out.push(','),
            Self::LeftBracket => out.push('['),
            Self::RightBracket => out.push(']'),
            Self::LeftParen => out.push('('),
            Self::RightParen => out.push(')'),
            Self::LeftBrace => out.push('{'),
            Self::RightBrace => out.push('}'),
            Self::BadString | Self::BadUrl | Self::EOF => {}
        }
    }
}

/// Integers keep their literal digits; other numbers use the shortest `f64` form.
fn push_number(out: &mut String, value: f64, int_value: Option<i64>) {
    match int_value {
        Some(i) => out.push_str(&i.to_string()),
        None => out.push_str(&value.to_string()),
    }
}

impl fmt::Display for CSSToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadString => write!(f, "<bad-string>"),
            Self::BadUrl => write!(f, "<bad-url>"),
            Self::EOF => write!(f, "<EOF>"),
            other => {
                let mut text = String::new();
                other.write_css(&mut text);
                write!(f, "'{text}'")
            }
        }
    }
}
