//! # glint-text
//!
//! Backend-agnostic MSDF text layout and quad generation.
//!
//! This crate turns a string, a bitmap-font glyph atlas description, and a
//! set of layout options into flat, renderer-ready vertex/UV/index buffers.
//! It has zero dependencies on any specific graphics API. Rendering is
//! handled by separate backend crates like `glint-wgpu`; font metrics come
//! from a provider crate like `glint-fonts`.

mod color;
mod debug;
mod error;
mod font;
mod layout;
mod primitives;
mod quad;
mod style;
mod text;

pub use color::*;
pub use debug::*;
pub use error::*;
pub use font::*;
pub use layout::*;
pub use primitives::*;
pub use quad::*;
pub use style::*;
pub use text::*;
