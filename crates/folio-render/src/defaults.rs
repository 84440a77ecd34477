//! Default per-tag styles.
//!
//! A small user-agent style sheet in the spirit of
//! [HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html),
//! restricted to properties the output engine understands. Parsed once on
//! first use.

use std::sync::OnceLock;

use folio_common::NullSink;
use folio_css::{StyleMap, StylesheetTable, parse_stylesheet};

const DEFAULT_CSS: &str = r"
body { font-size: 12px; }
h1 { font-size: 32px; margin-top: 21px; margin-bottom: 21px; font-weight: bold; }
h2 { font-size: 24px; margin-top: 20px; margin-bottom: 20px; font-weight: bold; }
h3 { font-size: 19px; margin-top: 18px; margin-bottom: 18px; font-weight: bold; }
h4 { font-size: 16px; margin-top: 21px; margin-bottom: 21px; font-weight: bold; }
h5 { font-size: 13px; margin-top: 22px; margin-bottom: 22px; font-weight: bold; }
h6 { font-size: 11px; margin-top: 24px; margin-bottom: 24px; font-weight: bold; }
p { margin-top: 12px; margin-bottom: 12px; }
blockquote { margin-top: 12px; margin-bottom: 12px; margin-left: 40px; margin-right: 40px; }
pre { font-family: Courier; margin-top: 12px; margin-bottom: 12px; }
code { font-family: Courier; }
ul { margin-top: 12px; margin-bottom: 12px; padding-left: 20px; }
ol { margin-top: 12px; margin-bottom: 12px; padding-left: 20px; }
li { display: flex; flex-direction: row; }
b { font-weight: bold; }
strong { font-weight: bold; }
i { font-style: italic; }
em { font-style: italic; }
u { text-decoration: underline; }
ins { text-decoration: underline; }
s { text-decoration: line-through; }
del { text-decoration: line-through; }
small { font-size: 10px; }
sub { vertical-align: sub; }
sup { vertical-align: super; }
mark { background-color: yellow; }
a { color: blue; text-decoration: underline; }
hr { margin-top: 8px; margin-bottom: 8px; border-bottom-width: 1px; border-bottom-style: solid; border-bottom-color: gray; }
table { display: flex; flex-direction: column; }
thead { display: flex; flex-direction: column; }
tbody { display: flex; flex-direction: column; }
tfoot { display: flex; flex-direction: column; }
tr { display: flex; flex-direction: row; }
td { flex-basis: 1px; flex-grow: 1; }
th { flex-basis: 1px; flex-grow: 1; font-weight: bold; }
";

/// The parsed default sheet.
#[must_use]
pub fn default_styles() -> &'static StylesheetTable {
    static STYLES: OnceLock<StylesheetTable> = OnceLock::new();
    STYLES.get_or_init(|| parse_stylesheet(DEFAULT_CSS, &NullSink))
}

/// Default style for `tag`, if the sheet has one.
#[must_use]
pub fn default_style(tag: &str) -> Option<&'static StyleMap> {
    default_styles().get(tag)
}

#[cfg(test)]
mod tests {
    use folio_common::CollectingSink;
    use folio_css::Property;

    use super::*;

    #[test]
    fn default_sheet_uses_only_supported_properties() {
        let sink = CollectingSink::new();
        let table = parse_stylesheet(DEFAULT_CSS, &sink);
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert_eq!(&table, default_styles());
    }

    #[test]
    fn looks_up_by_tag() {
        let h1 = default_style("h1").unwrap();
        assert_eq!(h1.get(Property::FontWeight).and_then(|v| v.as_text()), Some("bold"));
        assert!(default_style("span").is_none());
    }
}
