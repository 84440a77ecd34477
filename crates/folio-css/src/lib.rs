//! CSS handling for the Folio pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - Comment handling, escape sequences, numeric tokens
//!   - Parse errors are recorded rather than silently recovered
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style sheets and declaration lists, strict: malformed input is rejected
//!   - `!important` detection, at-rule skipping
//!
//! - **Style vocabulary**
//!   - [`Property`], [`StyleValue`], [`StyleMap`] and [`StylesheetTable`]
//!
//! - **Conversion** of `<style>` blocks and `style` attributes into style
//!   maps, with the unsupported-property fallback and diagnostics
//!
//! - **Translation** of host computed values into the output value grammar
//!
//! # Not Implemented
//!
//! - Specificity, inheritance and media queries: the host's computed style
//!   already resolves them

/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Supported properties, values and style maps.
pub mod properties;
/// `<style>` block and `style` attribute conversion.
pub mod stylesheet;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// Computed-value translation.
pub mod translate;

pub use parser::{
    CSSParser, ComponentValue, Declaration, ParseError, StyleRule, Stylesheet, parse_css,
    parse_declarations,
};
pub use properties::{COMPUTED_PROPERTIES, Property, StyleMap, StyleValue, StylesheetTable};
pub use stylesheet::{camelize, convert_declarations, parse_inline_style, parse_stylesheet};
pub use tokenizer::{CSSToken, CSSTokenizer, TokenizerError};
pub use translate::{ElementKind, FALLBACK_FONT_FAMILY, TranslateError, translate};
