//! The output format's style vocabulary.
//!
//! A [`StyleMap`] only ever holds [`Property`] keys: anything a style sheet
//! names outside this list is dropped before it reaches a map. Property names
//! use the camelCase spelling of the output engine (`backgroundColor`,
//! `borderTopWidth`, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A supported style property.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum Property {
    // Flexbox
    AlignContent,
    AlignItems,
    AlignSelf,
    Flex,
    FlexDirection,
    FlexWrap,
    FlexFlow,
    FlexGrow,
    FlexShrink,
    FlexBasis,
    JustifyContent,
    Gap,
    RowGap,
    ColumnGap,
    Order,

    // Layout
    Bottom,
    Display,
    Left,
    Position,
    Right,
    Top,
    Overflow,
    ZIndex,

    // Dimension
    Height,
    MaxHeight,
    MaxWidth,
    MinHeight,
    MinWidth,
    Width,

    // Color
    BackgroundColor,
    Color,
    Opacity,

    // Text
    FontSize,
    FontFamily,
    FontStyle,
    FontWeight,
    LetterSpacing,
    LineHeight,
    MaxLines,
    TextAlign,
    TextDecoration,
    TextDecorationColor,
    TextDecorationStyle,
    TextIndent,
    TextOverflow,
    TextTransform,
    VerticalAlign,

    // Sizing/positioning
    ObjectFit,
    ObjectPosition,
    ObjectPositionX,
    ObjectPositionY,

    // Margin/padding
    Margin,
    MarginHorizontal,
    MarginVertical,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Padding,
    PaddingHorizontal,
    PaddingVertical,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,

    // Transformations
    Transform,
    TransformOrigin,
    TransformOriginX,
    TransformOriginY,

    // Borders
    Border,
    BorderWidth,
    BorderColor,
    BorderStyle,
    BorderTop,
    BorderTopColor,
    BorderTopStyle,
    BorderTopWidth,
    BorderRight,
    BorderRightColor,
    BorderRightStyle,
    BorderRightWidth,
    BorderBottom,
    BorderBottomColor,
    BorderBottomStyle,
    BorderBottomWidth,
    BorderLeft,
    BorderLeftColor,
    BorderLeftStyle,
    BorderLeftWidth,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderBottomRightRadius,
    BorderBottomLeftRadius,
    BorderRadius,

    // Tables
    BorderCollapse,
    BorderSpacing,
}

impl Property {
    /// The camelCase name, e.g. `borderTopWidth`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The CSS (dash-case) name, e.g. `border-top-width`.
    #[must_use]
    pub fn css_name(self) -> String {
        let mut out = String::new();
        for c in self.name().chars() {
            if c.is_ascii_uppercase() {
                out.push('-');
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

/// The properties the content-tree builder reads from the host's computed
/// style for every element.
///
/// Shorthands (`flex`, `margin`, `padding`, `border`, `borderTop`, ...) and
/// `letterSpacing` are left out: the host resolves them into longhands.
pub const COMPUTED_PROPERTIES: &[Property] = &[
    Property::AlignContent,
    Property::AlignItems,
    Property::AlignSelf,
    Property::FlexDirection,
    Property::FlexWrap,
    Property::FlexFlow,
    Property::FlexGrow,
    Property::FlexShrink,
    Property::FlexBasis,
    Property::JustifyContent,
    Property::Order,
    Property::Bottom,
    Property::Display,
    Property::Left,
    Property::Position,
    Property::Right,
    Property::Top,
    Property::Overflow,
    Property::ZIndex,
    Property::Height,
    Property::MaxHeight,
    Property::MaxWidth,
    Property::MinHeight,
    Property::MinWidth,
    Property::Width,
    Property::BackgroundColor,
    Property::Color,
    Property::Opacity,
    Property::FontSize,
    Property::FontFamily,
    Property::FontStyle,
    Property::FontWeight,
    Property::LineHeight,
    Property::MaxLines,
    Property::TextAlign,
    Property::TextDecoration,
    Property::TextDecorationColor,
    Property::TextDecorationStyle,
    Property::TextIndent,
    Property::TextOverflow,
    Property::TextTransform,
    Property::ObjectFit,
    Property::ObjectPosition,
    Property::ObjectPositionX,
    Property::ObjectPositionY,
    Property::MarginHorizontal,
    Property::MarginVertical,
    Property::MarginTop,
    Property::MarginRight,
    Property::MarginBottom,
    Property::MarginLeft,
    Property::PaddingHorizontal,
    Property::PaddingVertical,
    Property::PaddingTop,
    Property::PaddingRight,
    Property::PaddingBottom,
    Property::PaddingLeft,
    Property::Transform,
    Property::TransformOrigin,
    Property::TransformOriginX,
    Property::TransformOriginY,
    Property::BorderWidth,
    Property::BorderColor,
    Property::BorderStyle,
    Property::BorderTopColor,
    Property::BorderTopStyle,
    Property::BorderTopWidth,
    Property::BorderRightColor,
    Property::BorderRightStyle,
    Property::BorderRightWidth,
    Property::BorderBottomColor,
    Property::BorderBottomStyle,
    Property::BorderBottomWidth,
    Property::BorderLeftColor,
    Property::BorderLeftStyle,
    Property::BorderLeftWidth,
    Property::BorderTopLeftRadius,
    Property::BorderTopRightRadius,
    Property::BorderBottomRightRadius,
    Property::BorderBottomLeftRadius,
    Property::BorderRadius,
];

/// A translated style value: text in the output vocabulary, or a plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// A number, e.g. a `flexBasis` derived from `colspan`.
    Number(f64),
    /// Any other value, e.g. `12px`, `rgb(1, 2, 3)`, `bold`.
    Text(String),
}

impl StyleValue {
    /// The value as text, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Whether this is the number zero or the text `0`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Number(n) => n.abs() < f64::EPSILON,
            Self::Text(text) => text == "0",
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Resolved property → value mapping in the output format's vocabulary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap {
    entries: BTreeMap<Property, StyleValue>,
}

impl StyleMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, property: Property, value: impl Into<StyleValue>) -> Self {
        let _ = self.insert(property, value);
        self
    }

    /// Set `property`, returning the previous value.
    pub fn insert(&mut self, property: Property, value: impl Into<StyleValue>) -> Option<StyleValue> {
        self.entries.insert(property, value.into())
    }

    /// Remove `property`, returning its value.
    pub fn remove(&mut self, property: Property) -> Option<StyleValue> {
        self.entries.remove(&property)
    }

    /// Value of `property`, if set.
    #[must_use]
    pub fn get(&self, property: Property) -> Option<&StyleValue> {
        self.entries.get(&property)
    }

    /// Whether `property` is set.
    #[must_use]
    pub fn contains(&self, property: Property) -> bool {
        self.entries.contains_key(&property)
    }

    /// Number of properties set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in property order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, &StyleValue)> {
        self.entries.iter().map(|(property, value)| (*property, value))
    }

    /// Copy every entry of `other` into `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Self) {
        for (property, value) in &other.entries {
            let _ = self.entries.insert(*property, value.clone());
        }
    }

    /// Fold a style list into one map, later entries overriding earlier ones.
    #[must_use]
    pub fn merged(list: &[Self]) -> Self {
        list.iter().fold(Self::new(), |mut combined, style| {
            combined.merge(style);
            combined
        })
    }
}

impl FromIterator<(Property, StyleValue)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (Property, StyleValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Selector → style mapping produced from one `<style>` block or author
/// style sheet.
///
/// Entries keep first-insertion order; inserting a selector again replaces
/// its style in place, so the last occurrence in the source wins. Serializes
/// as a JSON object in table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StylesheetTable {
    entries: Vec<(String, StyleMap)>,
}

impl StylesheetTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style for `selector`, replacing any previous entry.
    pub fn insert(&mut self, selector: impl Into<String>, style: StyleMap) {
        let selector = selector.into();
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| *s == selector) {
            entry.1 = style;
        } else {
            self.entries.push((selector, style));
        }
    }

    /// Style recorded for exactly `selector`.
    #[must_use]
    pub fn get(&self, selector: &str) -> Option<&StyleMap> {
        self.entries
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, style)| style)
    }

    /// Iterate `(selector, style)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleMap)> {
        self.entries.iter().map(|(s, style)| (s.as_str(), style))
    }

    /// Number of selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no selectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for StylesheetTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (selector, style) in &self.entries {
            map.serialize_entry(selector, style)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn names_round_trip_through_camel_case() {
        assert_eq!(Property::ZIndex.name(), "zIndex");
        assert_eq!(Property::from_str("borderTopWidth"), Ok(Property::BorderTopWidth));
        assert_eq!(Property::from_str("objectPositionX"), Ok(Property::ObjectPositionX));
        assert!(Property::from_str("unknownProp").is_err());
    }

    #[test]
    fn css_names_are_dash_case() {
        assert_eq!(Property::FlexGrow.css_name(), "flex-grow");
        assert_eq!(Property::BorderTopLeftRadius.css_name(), "border-top-left-radius");
    }

    #[test]
    fn later_styles_override_on_merge() {
        let merged = StyleMap::merged(&[
            StyleMap::new().with(Property::Color, "red").with(Property::Width, "1px"),
            StyleMap::new().with(Property::Color, "blue"),
        ]);
        assert_eq!(merged.get(Property::Color), Some(&StyleValue::from("blue")));
        assert_eq!(merged.get(Property::Width), Some(&StyleValue::from("1px")));
    }

    #[test]
    fn table_replaces_selector_in_place() {
        let mut table = StylesheetTable::new();
        table.insert("p", StyleMap::new().with(Property::Color, "red"));
        table.insert("h1", StyleMap::new());
        table.insert("p", StyleMap::new().with(Property::Color, "blue"));

        let selectors: Vec<&str> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(selectors, vec!["p", "h1"]);
        assert_eq!(
            table.get("p").and_then(|s| s.get(Property::Color)),
            Some(&StyleValue::from("blue"))
        );
    }
}
