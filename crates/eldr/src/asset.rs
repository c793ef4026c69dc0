//! Image loading and caching.
//!
//! [`ImageCache`] decodes images from disk once and hands out references to
//! the decoded RGBA pixels. Texture upload is the renderer's job; the cache
//! only owns CPU-side pixel data.

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use log::debug;

use crate::error::AssetError;

/// A decoded image keyed by the path it was loaded from.
pub struct ImageCache {
    images: HashMap<String, RgbaImage>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
        }
    }

    /// Load and decode an image, or return the cached copy.
    pub fn get_or_load(&mut self, path: &str) -> Result<&RgbaImage, AssetError> {
        if !self.images.contains_key(path) {
            debug!("loading image `{path}`");
            let bytes = std::fs::read(Path::new(path)).map_err(|source| AssetError::Io {
                path: path.to_string(),
                source,
            })?;
            let decoded = image::load_from_memory(&bytes)
                .map_err(|source| AssetError::Decode {
                    path: path.to_string(),
                    source,
                })?
                .to_rgba8();
            self.images.insert(path.to_string(), decoded);
        }
        Ok(&self.images[path])
    }

    /// Fetch a previously loaded image without touching the filesystem.
    pub fn get(&self, path: &str) -> Result<&RgbaImage, AssetError> {
        self.images
            .get(path)
            .ok_or_else(|| AssetError::NotCached(path.to_string()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.images.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let mut cache = ImageCache::new();
        let err = cache.get_or_load("/nonexistent/sprite.png").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn get_without_load_is_not_cached() {
        let cache = ImageCache::new();
        let err = cache.get("sprite.png").unwrap_err();
        assert!(matches!(err, AssetError::NotCached(_)));
        assert!(err.to_string().contains("sprite.png"));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let dir = std::env::temp_dir().join("eldr-asset-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("not-an-image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let mut cache = ImageCache::new();
        let err = cache.get_or_load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }
}
