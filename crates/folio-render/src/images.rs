//! Image acquisition.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
//!
//! Images are resolved in two phases. [`collect_image_sources`] lists every
//! local or embedded `src` in the content tree, and [`acquire_all`] turns
//! them into bytes (concurrently, joined before returning) and stores them
//! in an [`ImageStore`]. Rendering only reads the finished store, so an image
//! is either present or known to have failed.
//!
//! Remote (`http`) sources are left to the output engine.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::panic::{self, AssertUnwindSafe};

use folio_common::net::{DataUrl, fetch_bytes};
use folio_common::url::{file_url_path, is_data_url, is_remote, resolve_url};
use folio_common::{Diagnostic, DiagnosticSink};
use rayon::prelude::*;

use crate::content::ContentTree;
use crate::error::ImageError;
use crate::tag::Tag;

/// Turns an image reference into raw bytes.
pub trait ImageAcquirer: Send + Sync {
    /// Acquire the bytes for `reference` (already resolved against the base
    /// URL).
    ///
    /// # Errors
    ///
    /// Returns an [`ImageError`] describing why no bytes are available.
    fn acquire(&self, reference: &str) -> Result<Vec<u8>, ImageError>;
}

/// Fetches over HTTP, decodes `data:` URLs and reads local files (plain
/// paths or `file:` URLs). SVG payloads are rasterized to PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImageAcquirer;

impl ImageAcquirer for DefaultImageAcquirer {
    fn acquire(&self, reference: &str) -> Result<Vec<u8>, ImageError> {
        if reference.trim().is_empty() {
            return Err(ImageError::EmptySource);
        }

        let (bytes, svg_hint) = if is_data_url(reference) {
            let data = DataUrl::parse(reference)?;
            (data.decode()?, data.media_type().starts_with("image/svg"))
        } else if is_remote(reference) {
            (fetch_bytes(reference)?, has_svg_extension(reference))
        } else {
            let path = file_url_path(reference).unwrap_or_else(|| reference.to_string());
            let bytes = fs::read(&path).map_err(|source| ImageError::Io { path, source })?;
            (bytes, has_svg_extension(reference))
        };

        if svg_hint || looks_like_svg(&bytes) {
            rasterize_svg(&bytes)
        } else {
            Ok(bytes)
        }
    }
}

/// Render an SVG document onto an offscreen pixmap and encode it as PNG.
///
/// # Errors
///
/// Returns [`ImageError::Rasterize`] if the SVG cannot be parsed, has no
/// area, or the PNG cannot be encoded.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rasterize_svg(svg: &[u8]) -> Result<Vec<u8>, ImageError> {
    let tree = usvg::Tree::from_data(svg, &usvg::Options::default())
        .map_err(|e| ImageError::Rasterize(e.to_string()))?;

    let size = tree.size();
    let (width, height) = (size.width().ceil() as u32, size.height().ceil() as u32);
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ImageError::Rasterize("SVG has zero-size dimensions".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ImageError::Rasterize(e.to_string()))
}

/// `.svg` path extension, ignoring query and fragment.
fn has_svg_extension(reference: &str) -> bool {
    let path = reference.split(['#', '?']).next().unwrap_or_default();
    std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Sniff the first bytes (after leading whitespace) for an XML or SVG
/// prologue.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let head = &bytes[start..bytes.len().min(start + 256)];
    head.starts_with(b"<?xml") || head.starts_with(b"<svg")
}

/// Acquired image bytes, keyed by the `src` attribute as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageStore {
    images: HashMap<String, Vec<u8>>,
}

impl ImageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the bytes for `src`.
    pub fn insert(&mut self, src: impl Into<String>, bytes: Vec<u8>) {
        let _ = self.images.insert(src.into(), bytes);
    }

    /// Bytes for `src`, if they were acquired.
    #[must_use]
    pub fn get(&self, src: &str) -> Option<&[u8]> {
        self.images.get(src).map(Vec::as_slice)
    }

    /// Number of stored images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether nothing was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Every distinct non-remote `img` source in `tree`, in tree order.
///
/// Missing `src` attributes count as the empty source.
#[must_use]
pub fn collect_image_sources(tree: &ContentTree) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        let Some(element) = tree.element(id) else {
            continue;
        };
        if element.tag() == Tag::Img.name() {
            let src = element.attribute("src").unwrap_or_default();
            if !is_remote(src) && seen.insert(src) {
                sources.push(src.to_string());
            }
        }
        stack.extend(element.children().iter().rev());
    }

    sources
}

/// Acquire every source on the rayon thread pool and wait for all of them.
///
/// Each source is resolved against `base_url` before being handed to
/// `acquirer`. Failures (including a panicking acquirer) are reported to
/// `sink` as [`DiagnosticKind::ImageUnavailable`](folio_common::DiagnosticKind)
/// and left out of the store.
pub fn acquire_all(
    acquirer: &dyn ImageAcquirer,
    sources: &[String],
    base_url: Option<&str>,
    sink: &dyn DiagnosticSink,
) -> ImageStore {
    let results: Vec<(&String, Result<Vec<u8>, ImageError>)> = sources
        .par_iter()
        .map(|src| {
            let resolved = resolve_url(src, base_url);
            let result = panic::catch_unwind(AssertUnwindSafe(|| acquirer.acquire(&resolved)))
                .unwrap_or(Err(ImageError::Panicked));
            (src, result)
        })
        .collect();

    let mut store = ImageStore::new();
    for (src, result) in results {
        match result {
            Ok(bytes) => {
                log::debug!("acquired {} bytes for image '{src}'", bytes.len());
                store.insert(src.clone(), bytes);
            }
            Err(e) => sink.emit(Diagnostic::image_unavailable(src.clone(), e.to_string())),
        }
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_svg_by_extension() {
        assert!(has_svg_extension("icons/logo.svg"));
        assert!(has_svg_extension("https://x.test/logo.SVG?v=2#top"));
        assert!(!has_svg_extension("photo.png"));
    }

    #[test]
    fn sniffs_svg_prologue() {
        assert!(looks_like_svg(b"  <svg xmlns='http://www.w3.org/2000/svg'/>"));
        assert!(looks_like_svg(b"<?xml version='1.0'?><svg/>"));
        assert!(!looks_like_svg(b"\x89PNG\r\n"));
        assert!(!looks_like_svg(b""));
    }
}
