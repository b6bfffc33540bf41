//! # glint-wgpu
//!
//! WGPU rendering backend for glint text.
//!
//! The core crate produces flat position/UV/index buffers and a shading
//! parameter bundle; this crate owns everything GPU-side: the MSDF render
//! pipeline, the atlas texture, uniform upload, and draw submission. It
//! consumes the core's buffers verbatim and never re-derives layout.

mod atlas;
mod renderer;
mod uniforms;
mod vertex;

pub use atlas::*;
pub use renderer::*;
pub use uniforms::*;
pub use vertex::*;
