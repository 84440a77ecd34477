//! Integration tests for content-tree construction.

use folio_common::{CollectingSink, DiagnosticKind, NullSink};
use folio_css::{Property, StyleValue};
use folio_dom::{AttributesMap, ComputedStyleMap, DomTree, ElementData, NodeId, NodeType};
use folio_render::{BuildError, ContentNode, ContentTree, build, build_content_tree, collect_stylesheets};

/// Helper to create element node types
fn make_element(tag: &str, attrs: &[(&str, &str)]) -> NodeType {
    let mut map = AttributesMap::new();
    for (name, value) in attrs {
        let _ = map.insert((*name).to_string(), (*value).to_string());
    }
    NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: map,
    })
}

fn text(value: &str) -> NodeType {
    NodeType::Text(value.to_string())
}

fn element_tags(tree: &ContentTree) -> Vec<(String, usize)> {
    tree.children(tree.root())
        .iter()
        .filter_map(|&id| tree.element(id))
        .map(|e| (e.tag().to_string(), e.index_of_type()))
        .collect()
}

#[test]
fn test_index_of_type_ignores_interleaved_tags() {
    let mut dom = DomTree::new();
    let ul = dom.append(NodeId::ROOT, make_element("ul", &[]));
    let _ = dom.append(ul, make_element("li", &[]));
    let _ = dom.append(ul, text("\n"));
    let _ = dom.append(ul, make_element("p", &[]));
    let _ = dom.append(ul, make_element("li", &[]));
    let _ = dom.append(ul, NodeType::Comment("c".to_string()));
    let _ = dom.append(ul, make_element("p", &[]));
    let _ = dom.append(ul, make_element("LI", &[]));

    let tree = build_content_tree(&dom, ul, None, &NullSink).unwrap();
    assert_eq!(
        element_tags(&tree),
        vec![
            ("li".to_string(), 0),
            ("p".to_string(), 0),
            ("li".to_string(), 1),
            ("p".to_string(), 1),
            ("li".to_string(), 2),
        ]
    );
}

#[test]
fn test_index_of_type_is_per_parent() {
    let mut dom = DomTree::new();
    let body = dom.append(NodeId::ROOT, make_element("body", &[]));
    let first = dom.append(body, make_element("ol", &[]));
    let _ = dom.append(first, make_element("li", &[]));
    let second = dom.append(body, make_element("ol", &[]));
    let _ = dom.append(second, make_element("li", &[]));

    let tree = build_content_tree(&dom, body, None, &NullSink).unwrap();
    for &ol in tree.children(tree.root()) {
        let li = tree.children(ol)[0];
        assert_eq!(tree.element(li).unwrap().index_of_type(), 0);
        assert_eq!(tree.parent(li), Some(ol));
    }
}

#[test]
fn test_inline_style_with_unsupported_property() {
    let mut dom = DomTree::new();
    let p = dom.append(
        NodeId::ROOT,
        make_element("p", &[("style", "color: red; unknown-prop: 5px")]),
    );
    let _ = dom.append(p, text("hi"));
    let computed = ComputedStyleMap::new()
        .with(p, "display", "block")
        .with(p, "color", "red");

    let sink = CollectingSink::new();
    let tree = build_content_tree(&dom, p, Some(&computed), &sink).unwrap();

    let element = tree.element(tree.root()).unwrap();
    assert_eq!(element.tag(), "p");
    assert_eq!(element.style().len(), 1);
    let style = &element.style()[0];
    assert_eq!(style.get(Property::Color), Some(&StyleValue::from("red")));
    assert!(style.iter().all(|(property, _)| property.name() != "unknownProp"));

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnsupportedProperty);
    assert_eq!(diagnostics[0].property.as_deref(), Some("unknown-prop"));

    assert_eq!(element.children().len(), 1);
    assert_eq!(tree.text(element.children()[0]), Some("hi"));
}

#[test]
fn test_display_none_prunes_subtree() {
    let mut dom = DomTree::new();
    let body = dom.append(NodeId::ROOT, make_element("body", &[]));
    let div = dom.append(body, make_element("div", &[("style", "display:none")]));
    let span = dom.append(div, make_element("span", &[("style", "bogus: 1")]));
    let _ = dom.append(span, text("x"));
    let computed = ComputedStyleMap::new()
        .with(body, "display", "block")
        .with(div, "display", "none")
        .with(span, "display", "inline");

    let sink = CollectingSink::new();
    let tree = build_content_tree(&dom, body, Some(&computed), &sink).unwrap();

    let children = tree.children(tree.root());
    assert_eq!(children.len(), 1);
    assert_eq!(tree.get(children[0]), Some(&ContentNode::Text(String::new())));
    assert!(sink.is_empty());
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_display_none_without_computed_style() {
    let mut dom = DomTree::new();
    let body = dom.append(NodeId::ROOT, make_element("body", &[]));
    let div = dom.append(body, make_element("div", &[("style", "display: none")]));
    let _ = dom.append(div, text("x"));

    let tree = build_content_tree(&dom, body, None, &NullSink).unwrap();
    let child = tree.children(tree.root())[0];
    assert_eq!(tree.text(child), Some(""));
}

#[test]
fn test_computed_values_are_translated_and_override_inline() {
    let mut dom = DomTree::new();
    let div = dom.append(
        NodeId::ROOT,
        make_element("div", &[("style", "color: blue; margin-top: 4px")]),
    );
    let computed = ComputedStyleMap::new()
        .with(div, "color", "rgb(255,0,0)")
        .with(div, "flex-grow", "0")
        .with(div, "line-height", "24px")
        .with(div, "font-family", "\"Open Sans\", sans-serif")
        .with(div, "border-top-style", "none")
        .with(div, "transform", "");

    let tree = build_content_tree(&dom, div, Some(&computed), &NullSink).unwrap();
    let style = &tree.element(tree.root()).unwrap().style()[0];

    let get = |property| style.get(property).and_then(StyleValue::as_text);
    assert_eq!(get(Property::Color), Some("rgb(255, 0, 0)"));
    assert_eq!(get(Property::MarginTop), Some("4px"));
    assert_eq!(get(Property::FlexGrow), Some("1"));
    assert_eq!(get(Property::LineHeight), Some("1"));
    assert_eq!(get(Property::FontFamily), Some("Helvetica"));
    assert!(!style.contains(Property::BorderTopStyle));
    assert!(!style.contains(Property::Transform));
}

#[test]
fn test_untranslatable_computed_value_is_fatal() {
    let mut dom = DomTree::new();
    let div = dom.append(NodeId::ROOT, make_element("div", &[]));
    let computed = ComputedStyleMap::new().with(div, "color", "\"red\"");

    let err = build_content_tree(&dom, div, Some(&computed), &NullSink).unwrap_err();
    assert!(matches!(err, BuildError::InvalidValue(_)));
}

#[test]
fn test_document_node_is_unsupported() {
    let mut dom = DomTree::new();
    let _ = dom.append(NodeId::ROOT, make_element("html", &[]));

    let err = build_content_tree(&dom, NodeId::ROOT, None, &NullSink).unwrap_err();
    assert_eq!(err, BuildError::UnsupportedNodeKind { kind: "document" });
}

#[test]
fn test_doctype_below_root_is_unsupported() {
    let mut dom = DomTree::new();
    let div = dom.append(NodeId::ROOT, make_element("div", &[]));
    let _ = dom.append(div, NodeType::DocumentType("html".to_string()));

    let err = build_content_tree(&dom, div, None, &NullSink).unwrap_err();
    assert_eq!(err, BuildError::UnsupportedNodeKind { kind: "doctype" });
}

#[test]
fn test_collect_stylesheets() {
    let mut dom = DomTree::new();
    let html = dom.append(NodeId::ROOT, make_element("html", &[]));
    let head = dom.append(html, make_element("head", &[]));
    let first = dom.append(head, make_element("style", &[]));
    let _ = dom.append(first, text("  p { color: red }  "));
    let _ = dom.append(first, text("em { font-style: italic }"));
    let empty = dom.append(head, make_element("style", &[]));
    let _ = dom.append(empty, text("   "));
    let body = dom.append(html, make_element("body", &[]));
    let second = dom.append(body, make_element("style", &[]));
    let _ = dom.append(second, text("h1 { font-size: 20px }"));

    let sheets = collect_stylesheets(&dom, html, &NullSink);
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0].len(), 2);
    assert!(sheets[0].get("em").is_some());
    assert!(sheets[1].get("h1").is_some());
}

#[test]
fn test_build_returns_tree_and_sheets() {
    let mut dom = DomTree::new();
    let html = dom.append(NodeId::ROOT, make_element("html", &[]));
    let style = dom.append(html, make_element("style", &[]));
    let _ = dom.append(style, text("p { color: red"));

    let sink = CollectingSink::new();
    let document = build(&dom, html, None, &sink).unwrap();
    assert_eq!(document.stylesheets.len(), 1);
    assert!(document.stylesheets[0].is_empty());
    assert_eq!(document.tree.element(document.tree.root()).unwrap().tag(), "html");
    assert!(matches!(
        sink.diagnostics()[0].kind,
        DiagnosticKind::ParseFailure { .. }
    ));
}
