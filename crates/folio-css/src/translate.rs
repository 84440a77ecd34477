//! Computed-value translation.
//!
//! Maps a raw computed CSS value from the host into the value grammar the
//! output engine accepts. Multi-value shorthands are cut down to their first
//! token, functional colors are kept whole.

use thiserror::Error;

use crate::properties::Property;

/// Font family used when a computed `font-family` has no usable word, e.g.
/// a quoted family name.
pub const FALLBACK_FONT_FAMILY: &str = "Helvetica";

/// Kind of content node a value is translated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// An element node.
    Element,
    /// A bare text run.
    Text,
}

/// Errors from [`translate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The value has no word-like token to keep.
    #[error("\"{value}\" is not a valid value for {property}")]
    InvalidValue {
        /// Property being translated.
        property: Property,
        /// The raw computed value.
        value: String,
    },
}

/// Translate `raw` for `property` on a node of `kind`.
///
/// Returns `Ok(None)` when the property must be left out of the style map:
/// the value is `none`, or the property never applies to `kind`.
///
/// # Errors
///
/// Returns [`TranslateError::InvalidValue`] if no word-like token can be
/// extracted from `raw`.
pub fn translate(
    property: Property,
    kind: ElementKind,
    raw: &str,
) -> Result<Option<String>, TranslateError> {
    let value = raw.trim();
    if value == "none" || !applies_to(property, kind) {
        return Ok(None);
    }

    // The output engine renders line boxes with a fixed baseline.
    if property == Property::LineHeight {
        return Ok(Some("1".to_string()));
    }

    if let Some(color) = leading_rgb(value) {
        return Ok(Some(color));
    }

    let word = first_word(value);
    if word.is_empty() {
        return if property == Property::FontFamily {
            Ok(Some(FALLBACK_FONT_FAMILY.to_string()))
        } else {
            Err(TranslateError::InvalidValue {
                property,
                value: raw.to_string(),
            })
        };
    }

    if property == Property::FlexGrow && word == "0" {
        return Ok(Some("1".to_string()));
    }

    Ok(Some(word.to_string()))
}

/// Per-kind filter. Properties not listed apply to every kind.
const fn applies_to(property: Property, kind: ElementKind) -> bool {
    !matches!(
        (property, kind),
        (
            Property::Width
                | Property::Height
                | Property::MinWidth
                | Property::MinHeight
                | Property::MaxWidth
                | Property::MaxHeight,
            ElementKind::Text
        )
    )
}

/// A leading `rgb(...)`/`rgba(...)` with its arguments normalized to
/// `", "` separators.
fn leading_rgb(value: &str) -> Option<String> {
    let open = value.find('(')?;
    let name = &value[..open];
    if !(name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba")) {
        return None;
    }
    let close = open + value[open..].find(')')?;
    let args: Vec<&str> = value[open + 1..close].split(',').map(str::trim).collect();
    Some(format!("{name}({})", args.join(", ")))
}

/// Leading run of word characters of the first whitespace-separated token.
fn first_word(value: &str) -> &str {
    let token = value.split_whitespace().next().unwrap_or_default();
    let end = token
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%' | '#' | '-')))
        .unwrap_or(token.len());
    &token[..end]
}
