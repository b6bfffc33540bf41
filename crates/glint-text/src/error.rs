use thiserror::Error;

/// Errors surfaced by the text component.
///
/// Missing glyphs are deliberately not an error: unknown character codes
/// are skipped during layout. Atlas resolution failures degrade to
/// placeholder textures and zero-area UVs in the backend instead of
/// failing the layout call.
#[derive(Debug, Error)]
pub enum TextError {
    /// The requested face name is not known to the font provider.
    #[error("invalid font face: {0}")]
    InvalidFontFace(String),
}
