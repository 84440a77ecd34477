//! Integration tests for the host document tree and computed-style snapshot.

use folio_dom::{
    AttributesMap, ComputedStyleMap, ComputedStyleProvider, DomTree, ElementData, NodeId,
    NodeType,
};

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

/// `<html><head><style>p{}</style></head><body><p>a</p><STYLE>b{}</STYLE></body></html>`
fn sample_tree() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let html = tree.append(NodeId::ROOT, make_element("html", &[]));
    let head = tree.append(html, make_element("head", &[]));
    let style = tree.append(head, make_element("style", &[]));
    let _ = tree.append(style, NodeType::Text("p{}".to_string()));
    let body = tree.append(html, make_element("body", &[]));
    let p = tree.append(body, make_element("p", &[("class", "lead  intro")]));
    let _ = tree.append(p, NodeType::Text("a".to_string()));
    let upper = tree.append(body, make_element("STYLE", &[]));
    let _ = tree.append(upper, NodeType::Text("b{}".to_string()));
    (tree, html, p)
}

#[test]
fn test_new_tree_has_document_root() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
    assert!(tree.document_element().is_none());
}

#[test]
fn test_append_sets_parent_and_children() {
    let (tree, html, p) = sample_tree();
    assert_eq!(tree.parent(html), Some(NodeId::ROOT));
    assert_eq!(tree.children(NodeId::ROOT), &[html]);
    assert_eq!(tree.document_element(), Some(html));

    let ancestors: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(ancestors.len(), 3);
    assert_eq!(ancestors.last(), Some(&NodeId::ROOT));
}

#[test]
fn test_elements_by_tag_name_in_tree_order() {
    let (tree, _, _) = sample_tree();
    let styles = tree.elements_by_tag_name(NodeId::ROOT, "style");
    assert_eq!(styles.len(), 2);

    let texts: Vec<&str> = styles
        .iter()
        .filter_map(|&id| tree.children(id).first().and_then(|&t| tree.as_text(t)))
        .collect();
    assert_eq!(texts, vec!["p{}", "b{}"]);
}

#[test]
fn test_descendants_is_preorder() {
    let (tree, html, _) = sample_tree();
    let tags: Vec<&str> = tree
        .descendants(html)
        .filter_map(|id| tree.as_element(id).map(|e| e.tag_name.as_str()))
        .collect();
    assert_eq!(tags, vec!["html", "head", "style", "body", "p", "STYLE"]);
}

#[test]
fn test_class_list_and_attributes() {
    let (tree, _, p) = sample_tree();
    let element = tree.as_element(p).unwrap();
    let classes = element.classes();
    assert!(classes.contains("lead"));
    assert!(classes.contains("intro"));
    assert_eq!(classes.len(), 2);
    assert_eq!(tree.attribute(p, "class"), Some("lead  intro"));
    assert_eq!(tree.attribute(p, "id"), None);
}

#[test]
fn test_append_child_ignores_foreign_ids() {
    let mut tree = DomTree::new();
    tree.append_child(NodeId::ROOT, NodeId(42));
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_computed_style_map_lookup() {
    let (_, html, p) = sample_tree();
    let styles = ComputedStyleMap::new()
        .with(p, "display", "block")
        .with(p, "color", "rgb(255, 0, 0)");

    assert_eq!(styles.computed_value(p, "display").as_deref(), Some("block"));
    assert_eq!(
        styles.computed_value(p, "color").as_deref(),
        Some("rgb(255, 0, 0)")
    );
    assert_eq!(styles.computed_value(p, "width"), None);
    assert_eq!(styles.computed_value(html, "display"), None);
}

#[test]
fn test_node_kind_names() {
    assert_eq!(NodeType::Document.kind_name(), "document");
    assert_eq!(NodeType::DocumentType("html".into()).kind_name(), "doctype");
    assert_eq!(NodeType::Comment(String::new()).kind_name(), "comment");
}
