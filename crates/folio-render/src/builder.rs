//! Content-tree construction from a host document.
//!
//! The walk is depth-first over the host tree. Each element gets exactly one
//! style map, assembled from its `style` attribute and, when the host offers
//! computed style, the translated computed values of every property in
//! [`COMPUTED_PROPERTIES`]. Elements whose computed `display` is `none` are
//! replaced by an empty text run, subtree and all.

use std::collections::HashMap;

use folio_common::DiagnosticSink;
use folio_css::{
    COMPUTED_PROPERTIES, ElementKind, StyleMap, StylesheetTable, parse_declarations,
    parse_inline_style, parse_stylesheet, translate,
};
use folio_dom::{ComputedStyleProvider, DomTree, ElementData, NodeId, NodeType};

use crate::content::{ContentId, ContentNode, ContentTree, ElementNode};
use crate::error::BuildError;

/// Output of [`build`]: the content tree plus the document's style sheets.
#[derive(Debug, Clone)]
pub struct ContentDocument {
    /// One table per non-empty `<style>` element, in document order.
    pub stylesheets: Vec<StylesheetTable>,
    /// The content tree rooted at the converted host root.
    pub tree: ContentTree,
}

/// Build the content tree for `root` and collect its `<style>` sheets.
///
/// # Errors
///
/// See [`build_content_tree`].
pub fn build(
    dom: &DomTree,
    root: NodeId,
    computed: Option<&dyn ComputedStyleProvider>,
    sink: &dyn DiagnosticSink,
) -> Result<ContentDocument, BuildError> {
    let stylesheets = collect_stylesheets(dom, root, sink);
    let tree = build_content_tree(dom, root, computed, sink)?;
    Ok(ContentDocument { stylesheets, tree })
}

/// Convert the host subtree at `root` into a [`ContentTree`].
///
/// `computed` is the host's computed-style accessor. Without one, elements
/// carry only their `style` attribute and visibility is read from it.
///
/// # Errors
///
/// - [`BuildError::UnsupportedNodeKind`] if the subtree contains a document
///   or doctype node.
/// - [`BuildError::InvalidValue`] if a computed value cannot be translated.
pub fn build_content_tree(
    dom: &DomTree,
    root: NodeId,
    computed: Option<&dyn ComputedStyleProvider>,
    sink: &dyn DiagnosticSink,
) -> Result<ContentTree, BuildError> {
    let mut builder = TreeBuilder {
        dom,
        computed,
        sink,
        nodes: Vec::new(),
    };
    let root = builder.convert(root, None)?;
    Ok(ContentTree::from_parts(builder.nodes, root))
}

/// Parse every `<style>` element under `root` into a [`StylesheetTable`].
///
/// The text children of each element are trimmed and joined with newlines;
/// elements with no text are skipped. Hidden subtrees (such as `<head>`)
/// are searched too.
pub fn collect_stylesheets(
    dom: &DomTree,
    root: NodeId,
    sink: &dyn DiagnosticSink,
) -> Vec<StylesheetTable> {
    dom.elements_by_tag_name(root, "style")
        .into_iter()
        .map(|style| {
            dom.children(style)
                .iter()
                .filter_map(|&child| dom.as_text(child))
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|text| !text.is_empty())
        .map(|text| parse_stylesheet(&text, sink))
        .collect()
}

struct TreeBuilder<'a> {
    dom: &'a DomTree,
    computed: Option<&'a dyn ComputedStyleProvider>,
    sink: &'a dyn DiagnosticSink,
    nodes: Vec<ContentNode>,
}

impl TreeBuilder<'_> {
    fn convert(&mut self, id: NodeId, parent: Option<ContentId>) -> Result<ContentId, BuildError> {
        let dom = self.dom;
        let Some(node) = dom.get(id) else {
            return Err(BuildError::UnsupportedNodeKind { kind: "missing" });
        };

        match &node.node_type {
            NodeType::Text(text) => Ok(self.push(ContentNode::Text(text.clone()))),
            NodeType::Comment(_) => Ok(self.push(ContentNode::Text(String::new()))),
            NodeType::Element(data) => self.convert_element(id, data, parent),
            other => Err(BuildError::UnsupportedNodeKind {
                kind: other.kind_name(),
            }),
        }
    }

    fn convert_element(
        &mut self,
        id: NodeId,
        data: &ElementData,
        parent: Option<ContentId>,
    ) -> Result<ContentId, BuildError> {
        if self.is_hidden(id, data) {
            return Ok(self.push(ContentNode::Text(String::new())));
        }

        let tag = data.tag_name.to_ascii_lowercase();
        let style = self.element_style(id, data, &tag)?;
        let this = self.push(ContentNode::Element(ElementNode {
            tag,
            style: vec![style],
            children: Vec::new(),
            attributes: data.attrs.clone(),
            index_of_type: 0,
            parent,
        }));

        let dom = self.dom;
        let mut children = Vec::with_capacity(dom.children(id).len());
        for &child in dom.children(id) {
            children.push(self.convert(child, Some(this))?);
        }
        self.assign_index_of_type(&children);

        if let Some(ContentNode::Element(element)) = self.nodes.get_mut(this.0) {
            element.children = children;
        }
        Ok(this)
    }

    /// Computed `display: none`. Without a computed-style accessor the
    /// element's own `style` attribute decides.
    fn is_hidden(&self, id: NodeId, data: &ElementData) -> bool {
        if let Some(computed) = self.computed {
            return computed
                .computed_value(id, "display")
                .is_some_and(|display| display.trim() == "none");
        }

        data.attrs
            .get("style")
            .and_then(|style| parse_declarations(style).ok())
            .and_then(|declarations| {
                declarations
                    .into_iter()
                    .rev()
                    .find(|d| d.name.eq_ignore_ascii_case("display"))
            })
            .is_some_and(|display| display.value_text() == "none")
    }

    fn element_style(
        &self,
        id: NodeId,
        data: &ElementData,
        tag: &str,
    ) -> Result<StyleMap, BuildError> {
        let mut style = data
            .attrs
            .get("style")
            .map(|text| parse_inline_style(text, tag, self.sink))
            .unwrap_or_default();

        let Some(computed) = self.computed else {
            return Ok(style);
        };

        for &property in COMPUTED_PROPERTIES {
            let Some(raw) = computed.computed_value(id, &property.css_name()) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }
            if let Some(value) = translate(property, ElementKind::Element, &raw)? {
                let _ = style.insert(property, value);
            }
        }

        Ok(style)
    }

    /// [Selectors § 4.11 :nth-of-type](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    ///
    /// Per-parent, per-tag running counters over element children.
    fn assign_index_of_type(&mut self, children: &[ContentId]) {
        let mut counters: HashMap<String, usize> = HashMap::new();
        for child in children {
            if let Some(ContentNode::Element(element)) = self.nodes.get_mut(child.0) {
                let counter = counters.entry(element.tag.clone()).or_insert(0);
                element.index_of_type = *counter;
                *counter += 1;
            }
        }
    }

    fn push(&mut self, node: ContentNode) -> ContentId {
        let id = ContentId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}
