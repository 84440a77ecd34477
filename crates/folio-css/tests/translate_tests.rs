//! Integration tests for computed-value translation.

use folio_css::{COMPUTED_PROPERTIES, ElementKind, FALLBACK_FONT_FAMILY, Property, translate};

fn on_element(property: Property, raw: &str) -> Option<String> {
    translate(property, ElementKind::Element, raw).unwrap()
}

#[test]
fn test_translation_is_idempotent() {
    let samples = [
        (Property::Color, "rgb(0, 0, 0)"),
        (Property::Color, "rgba(1,2,3) solid"),
        (Property::BorderTopStyle, "solid none"),
        (Property::MarginLeft, "12px 4px"),
        (Property::FontWeight, "700"),
        (Property::Opacity, "0.5"),
        (Property::Width, "50%"),
        (Property::FontFamily, "\"Open Sans\", serif"),
        (Property::FontFamily, "Georgia, serif"),
        (Property::FlexGrow, "0"),
        (Property::LineHeight, "normal"),
        (Property::BackgroundColor, "#fff"),
    ];
    for (property, raw) in samples {
        let once = on_element(property, raw).unwrap();
        let twice = on_element(property, &once).unwrap();
        assert_eq!(once, twice, "{property} \"{raw}\"");
    }
}

#[test]
fn test_leading_rgb_is_kept_whole() {
    assert_eq!(on_element(Property::Color, "rgba(1, 2, 3)"), Some("rgba(1, 2, 3)".into()));
    assert_eq!(on_element(Property::BorderTopColor, "rgba(1,2,3) solid"), Some("rgba(1, 2, 3)".into()));
}

#[test]
fn test_none_is_dropped_for_every_property() {
    for &property in COMPUTED_PROPERTIES {
        assert_eq!(on_element(property, "none"), None, "{property}");
        let text = translate(property, ElementKind::Text, "none").unwrap();
        assert_eq!(text, None, "{property}");
    }
}

#[test]
fn test_flex_grow_zero_becomes_one() {
    assert_eq!(on_element(Property::FlexGrow, "0"), Some("1".into()));
    assert_eq!(on_element(Property::FlexGrow, "2"), Some("2".into()));
}

#[test]
fn test_line_height_is_fixed() {
    assert_eq!(on_element(Property::LineHeight, "1.5"), Some("1".into()));
    assert_eq!(on_element(Property::LineHeight, "24px"), Some("1".into()));
}

#[test]
fn test_font_family_first_word() {
    assert_eq!(on_element(Property::FontFamily, "Georgia, serif"), Some("Georgia".into()));
    assert_eq!(
        on_element(Property::FontFamily, "'Times New Roman'"),
        Some(FALLBACK_FONT_FAMILY.into())
    );
}

#[test]
fn test_dimensions_only_apply_to_elements() {
    for property in [
        Property::Width,
        Property::Height,
        Property::MinWidth,
        Property::MinHeight,
        Property::MaxWidth,
        Property::MaxHeight,
    ] {
        assert_eq!(translate(property, ElementKind::Text, "10px").unwrap(), None);
        assert_eq!(on_element(property, "10px"), Some("10px".into()));
    }
}

#[test]
fn test_invalid_value_is_an_error() {
    let err = translate(Property::MarginTop, ElementKind::Element, "").unwrap_err();
    assert_eq!(err.to_string(), "\"\" is not a valid value for marginTop");
}

#[test]
fn test_words_keep_decimals_units_and_hashes() {
    assert_eq!(on_element(Property::Opacity, "0.5"), Some("0.5".into()));
    assert_eq!(on_element(Property::FontSize, "12.5px"), Some("12.5px".into()));
    assert_eq!(on_element(Property::Width, "50% auto"), Some("50%".into()));
    assert_eq!(on_element(Property::BackgroundColor, "#a0b1c2"), Some("#a0b1c2".into()));
    assert_eq!(on_element(Property::MarginTop, "-4px"), Some("-4px".into()));
    assert_eq!(on_element(Property::FontFamily, "Georgia, serif"), Some("Georgia".into()));
}
