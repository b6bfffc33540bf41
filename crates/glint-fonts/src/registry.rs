//! Face-name-keyed font registry.
//!
//! Metrics are parsed once, wrapped in `Arc`, and handed out read-only to
//! every text instance that asks. The registry also remembers each face's
//! atlas page paths so a backend can resolve the textures; a face with no
//! resolvable pages still lays out fine and degrades to a placeholder
//! texture at render time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_text::{FontMetrics, FontProvider};

use crate::bmfont::FontDescriptor;
use crate::FontError;

#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, Arc<FontMetrics>>,
    pages: HashMap<String, Vec<PathBuf>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register already-built metrics under their face name.
    ///
    /// Re-registering a face replaces it; instances holding the old `Arc`
    /// keep laying out against the metrics they resolved.
    pub fn register(&mut self, metrics: FontMetrics) -> Arc<FontMetrics> {
        let face = metrics.face.clone();
        let metrics = Arc::new(metrics);
        log::info!(
            "registered font face {face:?} ({} glyphs)",
            metrics.glyph_count()
        );
        self.fonts.insert(face, metrics.clone());
        metrics
    }

    /// Register metrics together with atlas page paths.
    pub fn register_with_pages(
        &mut self,
        metrics: FontMetrics,
        pages: Vec<PathBuf>,
    ) -> Arc<FontMetrics> {
        let face = metrics.face.clone();
        let metrics = self.register(metrics);
        self.pages.insert(face, pages);
        metrics
    }

    /// Parse a BMFont JSON descriptor and register it.
    pub fn register_json(&mut self, json: &str) -> Result<Arc<FontMetrics>, FontError> {
        let descriptor = FontDescriptor::from_json(json)?;
        let pages: Vec<PathBuf> = descriptor.page_names().iter().map(PathBuf::from).collect();
        Ok(self.register_with_pages(descriptor.into_metrics(), pages))
    }

    /// Load a BMFont JSON descriptor from disk and register it. Page paths
    /// resolve relative to the descriptor's directory.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<FontMetrics>, FontError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let descriptor = FontDescriptor::from_json(&json)?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let pages: Vec<PathBuf> = descriptor
            .page_names()
            .iter()
            .map(|name| dir.join(name))
            .collect();
        if pages.is_empty() {
            log::warn!(
                "font descriptor {path:?} lists no atlas pages; glyphs will render blank"
            );
        }
        Ok(self.register_with_pages(descriptor.into_metrics(), pages))
    }

    /// Register the built-in synthetic fallback face.
    pub fn register_fallback(&mut self) -> Arc<FontMetrics> {
        self.register(crate::fallback::fallback_metrics())
    }

    pub fn get(&self, face: &str) -> Option<Arc<FontMetrics>> {
        self.fonts.get(face).cloned()
    }

    pub fn contains(&self, face: &str) -> bool {
        self.fonts.contains_key(face)
    }

    pub fn faces(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// Atlas page paths recorded for a face, if any.
    pub fn atlas_pages(&self, face: &str) -> Option<&[PathBuf]> {
        self.pages.get(face).map(Vec::as_slice)
    }
}

impl FontProvider for FontRegistry {
    fn font(&self, face: &str) -> Option<Arc<FontMetrics>> {
        self.get(face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FALLBACK_FACE;

    const SAMPLE: &str = r#"{
        "pages": ["sample.png"],
        "chars": [{"id": 65, "x": 0, "y": 0, "width": 20, "height": 24,
                   "xoffset": 1, "yoffset": 4, "xadvance": 18}],
        "info": {"face": "Sample", "size": 42},
        "common": {"lineHeight": 53, "scaleW": 512, "scaleH": 256}
    }"#;

    #[test]
    fn test_register_json_and_lookup() {
        let mut registry = FontRegistry::new();
        registry.register_json(SAMPLE).unwrap();

        assert!(registry.contains("Sample"));
        let metrics = registry.font("Sample").unwrap();
        assert_eq!(metrics.nominal_size, 42.0);
        assert_eq!(
            registry.atlas_pages("Sample").unwrap(),
            [PathBuf::from("sample.png")]
        );
    }

    #[test]
    fn test_unknown_face_is_none() {
        let registry = FontRegistry::new();
        assert!(registry.font("missing").is_none());
        assert!(registry.atlas_pages("missing").is_none());
    }

    #[test]
    fn test_fallback_registration() {
        let mut registry = FontRegistry::new();
        registry.register_fallback();
        assert!(registry.contains(FALLBACK_FACE));
    }

    #[test]
    fn test_shared_metrics_are_the_same_allocation() {
        let mut registry = FontRegistry::new();
        registry.register_json(SAMPLE).unwrap();
        let a = registry.font("Sample").unwrap();
        let b = registry.font("Sample").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
