//! Error types for tree construction, dispatch and image acquisition.
//!
//! Parse-level problems never show up here: they are reported through the
//! diagnostic sink and degrade to empty styles. Everything in this module is
//! fatal to the call that returns it.

use folio_common::net::{DataUrlError, NetError};
use folio_css::TranslateError;
use thiserror::Error;

/// Errors from building a content tree out of a host document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The host tree contains a node the builder cannot classify, e.g. a
    /// document or doctype node below the root.
    #[error("unsupported node kind: {kind}")]
    UnsupportedNodeKind {
        /// Kind name of the offending node.
        kind: &'static str,
    },

    /// A computed value had nothing the output vocabulary can accept.
    #[error(transparent)]
    InvalidValue(#[from] TranslateError),
}

/// Errors from renderer dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No renderer exists for the tag.
    #[error("no renderer registered for <{tag}>")]
    UnknownTag {
        /// The tag as it appears in the content tree.
        tag: String,
    },

    /// A table cell has no enclosing `table`.
    #[error("<{tag}> element rendered outside of a table")]
    CellOutsideTable {
        /// The cell's tag (`td` or `th`).
        tag: String,
    },
}

/// Errors from acquiring image bytes.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The `src` attribute is missing or empty.
    #[error("no image source found")]
    EmptySource,

    /// HTTP fetch failed.
    #[error(transparent)]
    Fetch(#[from] NetError),

    /// A `data:` URL could not be decoded.
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),

    /// An SVG payload could not be rasterized.
    #[error("failed to rasterize SVG: {0}")]
    Rasterize(String),

    /// The acquisition thread panicked.
    #[error("image acquisition panicked")]
    Panicked,

    /// A local file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a full render pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The content tree could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Dispatch failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
