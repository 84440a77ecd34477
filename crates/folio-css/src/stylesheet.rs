//! Style sheet and `style` attribute conversion.
//!
//! Turns parsed declarations into [`StyleMap`]s in the output vocabulary.
//! Both entry points recover from malformed CSS: the whole input is
//! discarded, a [`DiagnosticKind::ParseFailure`](folio_common::DiagnosticKind)
//! is emitted and an empty result is returned.

use std::str::FromStr;

use folio_common::{Diagnostic, DiagnosticSink};

use crate::parser::{Declaration, parse_css, parse_declarations};
use crate::properties::{Property, StyleMap, StylesheetTable};

/// Diagnostic source used for `<style>` blocks that fail to parse.
const STYLESHEET_SOURCE: &str = "style";

/// Parse a `<style>` block (or author style sheet) into a selector table.
///
/// Every selector of a rule receives that rule's style; a selector seen again
/// later replaces the earlier entry.
pub fn parse_stylesheet(text: &str, sink: &dyn DiagnosticSink) -> StylesheetTable {
    let mut table = StylesheetTable::new();

    let stylesheet = match parse_css(text) {
        Ok(stylesheet) => stylesheet,
        Err(e) => {
            sink.emit(Diagnostic::parse_failure(STYLESHEET_SOURCE, text, e.to_string()));
            return table;
        }
    };

    for rule in &stylesheet.rules {
        let style = convert_declarations(&rule.declarations, &rule.selectors.join(", "), sink);
        for selector in &rule.selectors {
            table.insert(selector.clone(), style.clone());
        }
    }

    table
}

/// Parse the value of a `style` attribute on a `tag` element.
///
/// `tag` names the element in diagnostics.
pub fn parse_inline_style(text: &str, tag: &str, sink: &dyn DiagnosticSink) -> StyleMap {
    match parse_declarations(text.trim()) {
        Ok(declarations) => convert_declarations(&declarations, tag, sink),
        Err(e) => {
            sink.emit(Diagnostic::parse_failure(tag, text, e.to_string()));
            StyleMap::new()
        }
    }
}

/// Convert declarations into a style map, dropping (and reporting)
/// properties outside the supported vocabulary.
///
/// A later declaration of the same property overrides an earlier one.
pub fn convert_declarations(
    declarations: &[Declaration],
    source: &str,
    sink: &dyn DiagnosticSink,
) -> StyleMap {
    let mut style = StyleMap::new();

    for declaration in declarations {
        let value = declaration.value_text();
        if value.is_empty() {
            continue;
        }

        let name = camelize(&declaration.name.to_ascii_lowercase());
        let property = Property::from_str(&name)
            .ok()
            .or_else(|| is_background_color(&name, &value).then_some(Property::BackgroundColor));

        match property {
            Some(property) => {
                let _ = style.insert(property, value);
            }
            None => sink.emit(Diagnostic::unsupported_property(
                source,
                declaration.name.as_str(),
                value,
            )),
        }
    }

    style
}

/// Dash-case to camelCase: every `-`, `_` or `.` is removed and the
/// character after it upper-cased (`-webkit-box` becomes `WebkitBox`).
#[must_use]
pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Fallback for unsupported properties whose value is clearly a color.
///
/// `background: <word>` (optionally `#`-prefixed) and any bare integer
/// `rgb()`/`rgba()` or `hsl()`/`hsla()` value are taken as a background color.
fn is_background_color(property: &str, value: &str) -> bool {
    (property == "background" && is_color_word(value))
        || is_color_function(value, &["rgb(", "rgba("], |c| c.is_ascii_digit() || matches!(c, ',' | ' '))
        || is_color_function(value, &["hsl(", "hsla("], |c| {
            c.is_ascii_digit() || matches!(c, '.' | '%' | ',' | ' ')
        })
}

/// `#?[A-Za-z0-9]+`
fn is_color_word(value: &str) -> bool {
    let word = value.strip_prefix('#').unwrap_or(value);
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `name([allowed]+)` for one of `prefixes`, ASCII case-insensitive.
fn is_color_function(value: &str, prefixes: &[&str], allowed: impl Fn(char) -> bool) -> bool {
    prefixes.iter().any(|prefix| {
        value
            .get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .and_then(|_| value[prefix.len()..].strip_suffix(')'))
            .is_some_and(|args| !args.is_empty() && args.chars().all(&allowed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camelizes_dash_case() {
        assert_eq!(camelize("background-color"), "backgroundColor");
        assert_eq!(camelize("-webkit-box-flex"), "WebkitBoxFlex");
        assert_eq!(camelize("color"), "color");
    }

    #[test]
    fn recognizes_color_fallbacks() {
        assert!(is_background_color("background", "#fafafa"));
        assert!(is_background_color("background", "red"));
        assert!(!is_background_color("background", "url(a.png) no-repeat"));
        assert!(is_background_color("outlineColor", "rgb(1, 2, 3)"));
        assert!(is_background_color("outlineColor", "HSLA(10, 50%, 20%, 0.5)"));
        assert!(!is_background_color("outlineColor", "rgba(1, 2, 3, 0.5)"));
        assert!(!is_background_color("outlineColor", "rgb()"));
    }
}
