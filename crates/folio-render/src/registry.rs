//! Tag → renderer dispatch.
//!
//! A [`RendererRegistry`] maps every [`Tag`] to a [`Renderer`]. The default
//! registry covers the whole vocabulary; custom renderers replace entries per
//! tag. Dispatch on a string that is not a [`Tag`], or on a tag the registry
//! has no entry for, fails with [`RenderError::UnknownTag`].

use std::collections::HashMap;
use std::str::FromStr;

use folio_css::{StyleMap, StylesheetTable};
use strum::IntoEnumIterator;

use crate::content::{ContentId, ContentTree, ElementNode};
use crate::error::RenderError;
use crate::images::ImageStore;
use crate::primitive::Primitive;
use crate::renderers;
use crate::tag::{Tag, TagCategory};

/// Lazily renders the children of the node being dispatched.
pub type ChildRenderer<'a> = dyn Fn() -> Result<Vec<Primitive>, RenderError> + 'a;

/// Everything a renderer sees for one element.
pub struct RenderContext<'a> {
    /// The tree the element lives in.
    pub tree: &'a ContentTree,
    /// Id of the element.
    pub node: ContentId,
    /// The element itself.
    pub element: &'a ElementNode,
    /// Cascaded style list: defaults, matching sheet rules, then the
    /// element's own style.
    pub style: &'a [StyleMap],
    /// All style sheets of the render pass.
    pub stylesheets: &'a [StylesheetTable],
    /// Image bytes acquired before rendering.
    pub images: &'a ImageStore,
    children: &'a ChildRenderer<'a>,
}

impl<'a> RenderContext<'a> {
    /// Create a context for `element` (the node `node` of `tree`).
    #[must_use]
    pub fn new(
        tree: &'a ContentTree,
        node: ContentId,
        element: &'a ElementNode,
        style: &'a [StyleMap],
        stylesheets: &'a [StylesheetTable],
        images: &'a ImageStore,
        children: &'a ChildRenderer<'a>,
    ) -> Self {
        Self {
            tree,
            node,
            element,
            style,
            stylesheets,
            images,
            children,
        }
    }

    /// Render the element's children. Renderers that drop their content
    /// never call this.
    ///
    /// # Errors
    ///
    /// Propagates the first error from rendering a child.
    pub fn render_children(&self) -> Result<Vec<Primitive>, RenderError> {
        (self.children)()
    }

    /// The cascaded style list as an owned vector.
    #[must_use]
    pub fn style_list(&self) -> Vec<StyleMap> {
        self.style.to_vec()
    }

    /// The enclosing element.
    #[must_use]
    pub fn parent(&self) -> Option<&'a ElementNode> {
        self.element.parent().and_then(|id| self.tree.element(id))
    }
}

/// Renders one element into one primitive.
pub trait Renderer: Send + Sync {
    /// Render the element described by `ctx`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when a structural precondition fails.
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Primitive, RenderError>;
}

impl<F> Renderer for F
where
    F: Fn(&RenderContext<'_>) -> Result<Primitive, RenderError> + Send + Sync,
{
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
        self(ctx)
    }
}

/// Tag-keyed renderer table.
pub struct RendererRegistry {
    renderers: HashMap<Tag, Box<dyn Renderer>>,
}

impl RendererRegistry {
    /// A registry with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Set the renderer for `tag`, replacing any previous one.
    pub fn register(&mut self, tag: Tag, renderer: impl Renderer + 'static) {
        let _ = self.renderers.insert(tag, Box::new(renderer));
    }

    /// Builder-style variant of [`RendererRegistry::register`].
    #[must_use]
    pub fn with(mut self, tag: Tag, renderer: impl Renderer + 'static) -> Self {
        self.register(tag, renderer);
        self
    }

    /// Whether `tag` has a renderer.
    #[must_use]
    pub fn contains(&self, tag: Tag) -> bool {
        self.renderers.contains_key(&tag)
    }

    /// Render `ctx.element` with the renderer registered for `tag`.
    ///
    /// # Errors
    ///
    /// - [`RenderError::UnknownTag`] if `tag` is not a [`Tag`] or has no
    ///   renderer.
    /// - Any error the renderer returns.
    pub fn dispatch(&self, tag: &str, ctx: &RenderContext<'_>) -> Result<Primitive, RenderError> {
        let renderer = Tag::from_str(tag)
            .ok()
            .and_then(|tag| self.renderers.get(&tag))
            .ok_or_else(|| RenderError::UnknownTag {
                tag: tag.to_string(),
            })?;
        renderer.render(ctx)
    }
}

impl Default for RendererRegistry {
    /// Every tag mapped to its built-in renderer.
    fn default() -> Self {
        let mut registry = Self::empty();
        for tag in Tag::iter() {
            match tag.category() {
                TagCategory::Metadata => registry.register(tag, renderers::render_noop),
                TagCategory::Block => registry.register(tag, renderers::render_block),
                TagCategory::Inline => registry.register(tag, renderers::render_inline),
                TagCategory::Special => {}
            }
        }
        registry
            .with(Tag::A, renderers::render_link)
            .with(Tag::Br, renderers::render_line_break)
            .with(Tag::Li, renderers::render_list_item)
            .with(Tag::Img, renderers::render_image)
            .with(Tag::Svg, renderers::render_svg)
            .with(Tag::Table, renderers::render_table)
            .with(Tag::Tr, renderers::render_row)
            .with(Tag::Td, renderers::render_cell)
            .with(Tag::Th, renderers::render_cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_is_exhaustive() {
        let registry = RendererRegistry::default();
        for tag in Tag::iter() {
            assert!(registry.contains(tag), "{tag} has no renderer");
        }
    }

    #[test]
    fn empty_registry_has_nothing() {
        let registry = RendererRegistry::empty();
        assert!(!registry.contains(Tag::Div));
    }
}
