use std::fmt;
use std::path::{Path, PathBuf};

use crate::coords::Vec2;

/// Error returned by [`SpriteImage::load`].
#[derive(Debug)]
pub struct SpriteLoadError {
    pub path: PathBuf,
    pub source: image::ImageError,
}

impl fmt::Display for SpriteLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load sprite {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for SpriteLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Straight-alpha sRGB pixels, row-major, 4 bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for SpriteImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl SpriteImage {
    /// Decodes a PNG, JPEG, BMP or GIF file (format is sniffed from content).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpriteLoadError> {
        let path = path.as_ref();
        let decoded = image::ImageReader::open(path)
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.with_guessed_format().map_err(image::ImageError::IoError))
            .and_then(|reader| reader.decode())
            .map_err(|source| SpriteLoadError { path: path.to_path_buf(), source })?;

        let rgba = decoded.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Opaque handle into a [`SpriteStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SpriteId(pub(crate) usize);

impl SpriteId {
    /// Position in the owning store; stable for the store's lifetime.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns every decoded sprite for the lifetime of the canvas.
#[derive(Debug, Default)]
pub struct SpriteStore {
    images: Vec<SpriteImage>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: SpriteImage) -> SpriteId {
        let id = SpriteId(self.images.len());
        self.images.push(image);
        id
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<SpriteId, SpriteLoadError> {
        let image = SpriteImage::load(path)?;
        Ok(self.insert(image))
    }

    pub fn get(&self, id: SpriteId) -> Option<&SpriteImage> {
        self.images.get(id.0)
    }

    /// Recovers the id stored at `index`, if that slot is occupied.
    pub fn id_at(&self, index: usize) -> Option<SpriteId> {
        (index < self.images.len()).then_some(SpriteId(index))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, w: u32, h: u32) {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn loads_png_dimensions_and_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ball.png");
        write_png(&path, 3, 2);

        let image = SpriteImage::load(&path).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.rgba.len(), 3 * 2 * 4);
        assert_eq!(&image.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SpriteImage::load("/nope/ghost.png").unwrap_err();
        assert_eq!(err.path, PathBuf::from("/nope/ghost.png"));
        assert!(err.to_string().contains("ghost.png"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(SpriteImage::load(&path).is_err());
    }

    #[test]
    fn store_hands_out_distinct_ids() {
        let mut store = SpriteStore::new();
        let a = store.insert(SpriteImage { width: 1, height: 1, rgba: vec![0; 4] });
        let b = store.insert(SpriteImage { width: 2, height: 1, rgba: vec![0; 8] });
        assert_ne!(a, b);
        assert_eq!(store.get(b).map(|i| i.width), Some(2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.id_at(b.index()), Some(b));
        assert_eq!(store.id_at(2), None);
    }
}
