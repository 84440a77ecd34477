//! The styled content tree.
//!
//! An arena of [`ContentNode`]s built once per render pass from a host
//! document snapshot. The tree is read-only after construction; the builder
//! is the only code that can create one.

use std::collections::{HashMap, HashSet};

use folio_css::StyleMap;

/// Index of a node in a [`ContentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub usize);

/// A node of the content tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    /// An element with its style and children.
    Element(ElementNode),
    /// A text run. Empty for comments and pruned subtrees.
    Text(String),
}

/// An element of the content tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub(crate) tag: String,
    pub(crate) style: Vec<StyleMap>,
    pub(crate) children: Vec<ContentId>,
    pub(crate) attributes: HashMap<String, String>,
    pub(crate) index_of_type: usize,
    pub(crate) parent: Option<ContentId>,
}

impl ElementNode {
    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The node's own style list. Built with exactly one entry.
    #[must_use]
    pub fn style(&self) -> &[StyleMap] {
        &self.style
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[ContentId] {
        &self.children
    }

    /// All attributes copied from the host element.
    #[must_use]
    pub const fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Value of attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Zero-based count of preceding siblings with the same tag.
    #[must_use]
    pub const fn index_of_type(&self) -> usize {
        self.index_of_type
    }

    /// The enclosing element, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<ContentId> {
        self.parent
    }

    /// [§ 3.2.6 The id attribute](https://html.spec.whatwg.org/multipage/dom.html#the-id-attribute)
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// [§ 3.2.6 The class attribute](https://html.spec.whatwg.org/multipage/dom.html#classes)
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attribute("class")
            .map(|s| s.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-backed content tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTree {
    nodes: Vec<ContentNode>,
    root: ContentId,
}

impl ContentTree {
    pub(crate) const fn from_parts(nodes: Vec<ContentNode>, root: ContentId) -> Self {
        Self { nodes, root }
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> ContentId {
        self.root
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: ContentId) -> Option<&ContentNode> {
        self.nodes.get(id.0)
    }

    /// Get element data if the node is an element.
    #[must_use]
    pub fn element(&self, id: ContentId) -> Option<&ElementNode> {
        match self.get(id)? {
            ContentNode::Element(element) => Some(element),
            ContentNode::Text(_) => None,
        }
    }

    /// Get the text if the node is a text run.
    #[must_use]
    pub fn text(&self, id: ContentId) -> Option<&str> {
        match self.get(id)? {
            ContentNode::Text(text) => Some(text),
            ContentNode::Element(_) => None,
        }
    }

    /// Children of `id`; empty for text runs.
    #[must_use]
    pub fn children(&self, id: ContentId) -> &[ContentId] {
        self.element(id).map(ElementNode::children).unwrap_or_default()
    }

    /// Enclosing element of `id`.
    #[must_use]
    pub fn parent(&self, id: ContentId) -> Option<ContentId> {
        self.element(id)?.parent
    }

    /// Iterate from the parent of `id` up to the root.
    #[must_use]
    pub fn ancestors(&self, id: ContentId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// [DOM § 4.9 closest()](https://dom.spec.whatwg.org/#dom-element-closest)
    ///
    /// "Returns the first (starting at element) inclusive ancestor that
    /// matches selectors". Here the selector is a bare tag name.
    #[must_use]
    pub fn closest(&self, id: ContentId, tag: &str) -> Option<ContentId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&candidate| self.element(candidate).is_some_and(|e| e.tag == tag))
    }
}

/// Iterator over ancestors, see [`ContentTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a ContentTree,
    current: Option<ContentId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ContentId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
