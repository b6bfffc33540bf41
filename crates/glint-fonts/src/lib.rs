//! Font metrics for glint.
//!
//! This crate feeds the layout engine: it parses BMFont JSON descriptors
//! (the format emitted by the msdf-bmfont toolchain) into
//! `glint_text::FontMetrics` and keeps them in a registry keyed by face
//! name. It knows nothing about textures or GPUs; atlas pages are exposed
//! as file names for a backend to resolve.

#![deny(warnings)]

mod bmfont;
mod fallback;
mod registry;

pub use bmfont::*;
pub use fallback::*;
pub use registry::*;

use thiserror::Error;

/// Errors from descriptor parsing and loading.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font descriptor: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse font descriptor: {0}")]
    Parse(#[from] serde_json::Error),
}
