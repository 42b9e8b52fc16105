use std::fmt;
use std::path::Path;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Well-known locations of a sans-serif TrueType font.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Holds the single font all script text is drawn with.
///
/// Owned by the canvas and handed to the text renderer each frame so glyphs
/// can be rasterized on demand.
#[derive(Default)]
pub struct FontSystem {
    font: Option<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the first readable font from [`SYSTEM_FONT_PATHS`].
    ///
    /// Finding none is not an error; text draws are then skipped.
    pub fn with_system_font() -> Self {
        let mut system = Self::new();
        for path in SYSTEM_FONT_PATHS {
            let Ok(bytes) = std::fs::read(Path::new(path)) else { continue };
            match system.load_font(&bytes) {
                Ok(()) => {
                    log::debug!("loaded font {path}");
                    return system;
                }
                Err(e) => log::debug!("skipping {path}: {e}"),
            }
        }
        log::warn!("no system font found; text will not be drawn");
        system
    }

    /// Parses a TrueType/OpenType font and makes it the active font.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<(), FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        self.font = Some(font);
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub(crate) fn font(&self) -> Option<&fontdue::Font> {
        self.font.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_font(b"not a font").unwrap_err();
        assert!(err.to_string().starts_with("font load error"));
        assert!(!fonts.has_font());
    }
}
