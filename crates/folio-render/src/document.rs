//! The render pass: build, acquire, compose.
//!
//! 1. The host subtree is converted into a [`ContentTree`] and its `<style>`
//!    sheets are parsed.
//! 2. Every local or embedded image is acquired; the pass waits for all of
//!    them.
//! 3. The tree is walked top-down. For each element the cascaded style list
//!    is assembled and the registered renderer is invoked.
//!
//! The cascade handed to a renderer is: the default style for the tag
//! (unless [`RenderOptions::reset_styles`]), the matching entries of every
//! option style sheet and then every document style sheet in table order,
//! and finally the element's own style.

use std::str::FromStr;

use folio_common::DiagnosticSink;
use folio_css::{StyleMap, StylesheetTable, parse_stylesheet};
use folio_dom::{ComputedStyleProvider, DomTree, NodeId};
use serde::{Deserialize, Serialize};

use crate::builder::{ContentDocument, build};
use crate::content::{ContentId, ContentNode, ContentTree, ElementNode};
use crate::defaults::default_style;
use crate::error::{PipelineError, RenderError};
use crate::images::{DefaultImageAcquirer, ImageAcquirer, ImageStore, acquire_all, collect_image_sources};
use crate::primitive::Primitive;
use crate::registry::{RenderContext, RendererRegistry};
use crate::selector::Selector;
use crate::tag::Tag;

/// Render-pass configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Collapse runs of whitespace in text to a single space.
    pub collapse_whitespace: bool,
    /// Skip the built-in per-tag styles.
    pub reset_styles: bool,
    /// Extra author CSS, applied before the document's own sheets.
    pub stylesheets: Vec<String>,
    /// Style of the outermost container.
    pub style: StyleMap,
    /// Base for resolving relative image sources.
    pub base_url: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            reset_styles: false,
            stylesheets: Vec::new(),
            style: StyleMap::new(),
            base_url: None,
        }
    }
}

impl RenderOptions {
    /// Load options from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or unknown style
    /// properties.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A configured render pipeline.
pub struct Pipeline {
    options: RenderOptions,
    registry: RendererRegistry,
    acquirer: Box<dyn ImageAcquirer>,
}

impl Pipeline {
    /// A pipeline with the built-in renderers and image acquirer.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            registry: RendererRegistry::default(),
            acquirer: Box::new(DefaultImageAcquirer),
        }
    }

    /// Replace the renderer registry.
    #[must_use]
    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the image acquirer.
    #[must_use]
    pub fn with_acquirer(mut self, acquirer: impl ImageAcquirer + 'static) -> Self {
        self.acquirer = Box::new(acquirer);
        self
    }

    /// The pipeline's options.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render the host subtree at `root` into a primitive tree.
    ///
    /// The result is a container styled with [`RenderOptions::style`]
    /// holding the rendered root.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Build`] if the content tree cannot be built
    /// and [`PipelineError::Render`] if dispatch fails.
    pub fn render(
        &self,
        dom: &DomTree,
        root: NodeId,
        computed: Option<&dyn ComputedStyleProvider>,
        sink: &dyn DiagnosticSink,
    ) -> Result<Primitive, PipelineError> {
        let ContentDocument {
            stylesheets: document_sheets,
            tree,
        } = build(dom, root, computed, sink)?;

        let mut stylesheets: Vec<StylesheetTable> = self
            .options
            .stylesheets
            .iter()
            .map(|css| parse_stylesheet(css, sink))
            .collect();
        stylesheets.extend(document_sheets);

        let sources = collect_image_sources(&tree);
        let images = acquire_all(
            self.acquirer.as_ref(),
            &sources,
            self.options.base_url.as_deref(),
            sink,
        );
        log::debug!(
            "rendering {} content nodes with {} style sheets and {} images",
            tree.len(),
            stylesheets.len(),
            images.len()
        );

        let composer = Composer::new(&tree, &stylesheets, &images, &self.registry, &self.options);
        let content = composer.render_node(tree.root())?;
        Ok(Primitive::view(vec![self.options.style.clone()], vec![content]))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Render the host subtree at `root` with the built-in renderers.
///
/// # Errors
///
/// See [`Pipeline::render`].
pub fn render_document(
    dom: &DomTree,
    root: NodeId,
    computed: Option<&dyn ComputedStyleProvider>,
    options: &RenderOptions,
    sink: &dyn DiagnosticSink,
) -> Result<Primitive, PipelineError> {
    Pipeline::new(options.clone()).render(dom, root, computed, sink)
}

struct Composer<'a> {
    tree: &'a ContentTree,
    stylesheets: &'a [StylesheetTable],
    rules: Vec<(Option<Selector>, &'a StyleMap)>,
    images: &'a ImageStore,
    registry: &'a RendererRegistry,
    options: &'a RenderOptions,
}

impl<'a> Composer<'a> {
    fn new(
        tree: &'a ContentTree,
        stylesheets: &'a [StylesheetTable],
        images: &'a ImageStore,
        registry: &'a RendererRegistry,
        options: &'a RenderOptions,
    ) -> Self {
        let rules = stylesheets
            .iter()
            .flat_map(StylesheetTable::iter)
            .map(|(selector, style)| (Selector::parse(selector), style))
            .collect();
        Self {
            tree,
            stylesheets,
            rules,
            images,
            registry,
            options,
        }
    }

    fn render_node(&self, id: ContentId) -> Result<Primitive, RenderError> {
        match self.tree.get(id) {
            None => Ok(Primitive::Empty),
            Some(ContentNode::Text(text)) => Ok(Primitive::literal(if self.options.collapse_whitespace {
                collapse_whitespace(text)
            } else {
                text.clone()
            })),
            Some(ContentNode::Element(element)) => {
                let style = self.cascade(id, element);
                let children = || self.render_children(element);
                let ctx = RenderContext::new(
                    self.tree,
                    id,
                    element,
                    &style,
                    self.stylesheets,
                    self.images,
                    &children,
                );
                self.registry.dispatch(element.tag(), &ctx)
            }
        }
    }

    fn cascade(&self, id: ContentId, element: &ElementNode) -> Vec<StyleMap> {
        let mut style = Vec::new();
        if !self.options.reset_styles {
            style.extend(default_style(element.tag()).cloned());
        }
        style.extend(
            self.rules
                .iter()
                .filter(|(selector, _)| {
                    selector
                        .as_ref()
                        .is_some_and(|selector| selector.matches(self.tree, id))
                })
                .map(|(_, rule)| (*rule).clone()),
        );
        style.extend_from_slice(element.style());
        style
    }

    /// Children of block-level elements have consecutive inline content
    /// (text and inline elements) bundled into one anonymous text run.
    fn render_children(&self, element: &ElementNode) -> Result<Vec<Primitive>, RenderError> {
        if is_inline_tag(element.tag()) {
            return element
                .children()
                .iter()
                .map(|&child| self.render_node(child))
                .collect();
        }

        let mut out = Vec::with_capacity(element.children().len());
        let mut run = Vec::new();
        for &child in element.children() {
            let primitive = self.render_node(child)?;
            if self.is_inline(child) {
                run.push(primitive);
            } else {
                flush_run(&mut run, &mut out);
                out.push(primitive);
            }
        }
        flush_run(&mut run, &mut out);
        Ok(out)
    }

    fn is_inline(&self, id: ContentId) -> bool {
        match self.tree.get(id) {
            Some(ContentNode::Text(_)) => true,
            Some(ContentNode::Element(element)) => is_inline_tag(element.tag()),
            None => false,
        }
    }
}

fn is_inline_tag(tag: &str) -> bool {
    Tag::from_str(tag).is_ok_and(Tag::is_inline)
}

/// Move a pending inline run into `out` as one text primitive, unless it
/// holds nothing but whitespace.
fn flush_run(run: &mut Vec<Primitive>, out: &mut Vec<Primitive>) {
    if run.iter().all(is_blank) {
        run.clear();
        return;
    }
    out.push(Primitive::text(Vec::new(), std::mem::take(run)));
}

fn is_blank(primitive: &Primitive) -> bool {
    match primitive {
        Primitive::Literal { text } => text.trim().is_empty(),
        Primitive::Empty => true,
        _ => false,
    }
}

/// [CSS Text § 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
///
/// Every run of white space becomes a single space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), " a b ");
        assert_eq!(collapse_whitespace("ab"), "ab");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn options_default_from_empty_json() {
        let options = RenderOptions::from_json("{}").unwrap();
        assert_eq!(options, RenderOptions::default());
        assert!(options.collapse_whitespace);
    }

    #[test]
    fn options_from_json() {
        let options = RenderOptions::from_json(
            r#"{"resetStyles": true, "stylesheets": ["p { color: red }"], "style": {"fontSize": "10px"}, "baseUrl": "https://x.test/"}"#,
        )
        .unwrap();
        assert!(options.reset_styles);
        assert!(options.collapse_whitespace);
        assert_eq!(options.stylesheets.len(), 1);
        assert_eq!(options.base_url.as_deref(), Some("https://x.test/"));
        assert!(!options.style.is_empty());
    }

    #[test]
    fn options_reject_unknown_properties() {
        assert!(RenderOptions::from_json(r#"{"style": {"cursor": "pointer"}}"#).is_err());
    }
}
