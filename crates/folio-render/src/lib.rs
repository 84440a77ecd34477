//! Content-tree construction and renderer dispatch.
//!
//! # Scope
//!
//! This crate implements:
//! - **Content tree** - an arena of styled element and text nodes built from
//!   a host document, with per-parent `index_of_type` counters
//!   - `display: none` pruning, inline `style` parsing, computed-value
//!     translation, `<style>` sheet collection
//!
//! - **Renderer dispatch** over the closed [`Tag`] vocabulary
//!   - Block, inline, list item, line break, link, image, table, row, cell
//!     and vector renderers
//!   - Table border-collapse handling and ordered-list numbering
//!
//! - **Images** - two-phase acquisition (collect, then acquire all before
//!   rendering), with SVG rasterization via `resvg`
//!
//! - **Pipeline** - [`Pipeline`] / [`render_document`]: the cascade of default,
//!   option and document styles, whitespace collapsing and inline bundling
//!
//! # Not Implemented
//!
//! - Layout and pagination: primitives go to an external engine
//! - Selector specificity: sheet rules apply in table order

/// Content-tree construction from a host document.
pub mod builder;
/// The content tree.
pub mod content;
/// Default per-tag styles.
pub mod defaults;
/// The render pass.
pub mod document;
/// Error types.
pub mod error;
/// Image acquisition.
pub mod images;
/// Output primitives.
pub mod primitive;
/// Tag → renderer dispatch.
pub mod registry;
/// Built-in renderers.
pub mod renderers;
/// Selector matching over the content tree.
pub mod selector;
/// The tag vocabulary.
pub mod tag;

pub use builder::{ContentDocument, build, build_content_tree, collect_stylesheets};
pub use content::{ContentId, ContentNode, ContentTree, ElementNode};
pub use document::{Pipeline, RenderOptions, render_document};
pub use error::{BuildError, ImageError, PipelineError, RenderError};
pub use images::{
    DefaultImageAcquirer, ImageAcquirer, ImageStore, acquire_all, collect_image_sources,
    rasterize_svg,
};
pub use primitive::{ImageSource, Primitive, SvgShape};
pub use registry::{ChildRenderer, RenderContext, Renderer, RendererRegistry};
pub use selector::Selector;
pub use tag::{Tag, TagCategory};
