//! Common utilities for the Folio document pipeline.
//!
//! This crate provides shared infrastructure used by all pipeline components:
//! - **Diagnostics** - structured events for unsupported styles, parse failures
//!   and unavailable images, routed to an injected sink
//! - **Networking** - blocking HTTP fetch and `data:` URL decoding
//! - **URLs** - remote/relative reference helpers

pub mod diagnostics;
pub mod net;
pub mod url;

pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, NullSink, TerminalSink,
};
