//! Sprites and parsed maps keyed by manifest entry.

use std::collections::HashMap;
use std::path::Path;

use sprig_formats::{mapdesc, MapObject};

use crate::backend::{Backend, SpriteHandle};
use crate::error::{HostError, Result};
use crate::manifest::ProjectManifest;

/// Populated once before the first frame and read-only afterwards.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    sprites: HashMap<String, SpriteHandle>,
    maps: HashMap<String, Vec<MapObject>>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every sprite and map the manifest lists, relative to `root`.
    pub fn load(root: &Path, manifest: &ProjectManifest, backend: &mut dyn Backend) -> Result<Self> {
        let mut registry = Self::new();
        for entry in &manifest.sprites {
            registry.load_sprite(root, entry, backend)?;
        }
        for entry in &manifest.maps {
            registry.load_map(root, entry)?;
        }
        Ok(registry)
    }

    /// Loads `sprites/<entry>` under `root`, keyed by [`asset_key`].
    /// Later entries with the same key replace earlier ones.
    pub fn load_sprite(
        &mut self,
        root: &Path,
        entry: &str,
        backend: &mut dyn Backend,
    ) -> Result<SpriteHandle> {
        let path = ProjectManifest::sprite_path(root, entry);
        if !path.is_file() {
            return Err(HostError::MissingFile { what: "sprite", path });
        }
        let handle = backend
            .load_sprite(&path)
            .map_err(|source| HostError::Backend { path: path.clone(), source })?;
        let key = asset_key(entry);
        log::info!("loaded sprite '{key}' from {}", path.display());
        self.sprites.insert(key.to_string(), handle);
        Ok(handle)
    }

    /// Loads `maps/<entry>` under `root`, keyed by [`asset_key`].
    pub fn load_map(&mut self, root: &Path, entry: &str) -> Result<usize> {
        let path = ProjectManifest::map_path(root, entry);
        let objects = mapdesc::parse_file(&path).map_err(|e| HostError::from_load("map", e))?;
        let key = asset_key(entry);
        let count = objects.len();
        log::info!("loaded map '{key}' ({count} objects) from {}", path.display());
        self.maps.insert(key.to_string(), objects);
        Ok(count)
    }

    pub fn sprite(&self, name: &str) -> Option<SpriteHandle> {
        self.sprites.get(name).copied()
    }

    pub fn map(&self, name: &str) -> Option<&[MapObject]> {
        self.maps.get(name).map(Vec::as_slice)
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }
}

/// Registry key for a manifest entry: the entry as written, minus its
/// extension. Directories stay part of the key, so `ui/x.png` is `ui/x`.
/// Leading dots of the file name do not start an extension.
pub fn asset_key(entry: &str) -> &str {
    let name_start = entry.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let name = &entry[name_start..];
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(dot) => &entry[..name_start + leading_dots + dot],
        None => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingBackend;

    fn touch(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn same_key_last_loaded_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sprites/foo.png", "");
        touch(dir.path(), "sprites/foo.bmp", "");

        let mut backend = RecordingBackend::default();
        let mut registry = AssetRegistry::new();
        let _png = registry.load_sprite(dir.path(), "foo.png", &mut backend).unwrap();
        let bmp = registry.load_sprite(dir.path(), "foo.bmp", &mut backend).unwrap();

        assert_eq!(registry.sprite("foo"), Some(bmp));
        assert_eq!(registry.sprite_count(), 1);
    }

    #[test]
    fn subdirectories_stay_in_the_key() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sprites/ui/x.png", "");
        touch(dir.path(), "sprites/hud/x.png", "");
        touch(dir.path(), "maps/levels/one.map", "@rect\n");

        let manifest = ProjectManifest {
            sprites: vec!["ui/x.png".into(), "hud/x.png".into()],
            maps: vec!["levels/one.map".into()],
            ..sample_manifest()
        };
        let mut backend = RecordingBackend::default();
        let registry = AssetRegistry::load(dir.path(), &manifest, &mut backend).unwrap();

        assert!(registry.sprite("ui/x").is_some());
        assert!(registry.sprite("hud/x").is_some());
        assert_ne!(registry.sprite("ui/x"), registry.sprite("hud/x"));
        assert!(registry.sprite("x").is_none());
        assert_eq!(registry.sprite_count(), 2);
        assert!(registry.map("levels/one").is_some());
    }

    #[test]
    fn keys_strip_only_the_last_extension() {
        assert_eq!(asset_key("ball.png"), "ball");
        assert_eq!(asset_key("ui/x.png"), "ui/x");
        assert_eq!(asset_key("archive.tar.gz"), "archive.tar");
        assert_eq!(asset_key("noext"), "noext");
        assert_eq!(asset_key(".hidden"), ".hidden");
        assert_eq!(asset_key("dir.v2/readme"), "dir.v2/readme");
    }

    #[test]
    fn loads_everything_the_manifest_lists() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sprites/ball.png", "");
        touch(dir.path(), "maps/court.map", "@rect\n.pos vec2 0 0\n.size vec2 4 4\n");

        let manifest = ProjectManifest {
            sprites: vec!["ball.png".into()],
            maps: vec!["court.map".into()],
            ..sample_manifest()
        };
        let mut backend = RecordingBackend::default();
        let registry = AssetRegistry::load(dir.path(), &manifest, &mut backend).unwrap();

        assert!(registry.sprite("ball").is_some());
        assert_eq!(registry.map("court").map(<[MapObject]>::len), Some(1));
        assert!(registry.map("ball").is_none());
    }

    #[test]
    fn missing_files_are_reported_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::default();

        let manifest = ProjectManifest { sprites: vec!["ghost.png".into()], ..sample_manifest() };
        let err = AssetRegistry::load(dir.path(), &manifest, &mut backend).unwrap_err();
        assert!(matches!(err, HostError::MissingFile { what: "sprite", .. }));

        let manifest = ProjectManifest { maps: vec!["void.map".into()], ..sample_manifest() };
        let err = AssetRegistry::load(dir.path(), &manifest, &mut backend).unwrap_err();
        assert!(matches!(err, HostError::MissingFile { what: "map", .. }));
    }

    fn sample_manifest() -> ProjectManifest {
        ProjectManifest::from_document(&sprig_formats::markup::parse("<project></project>")).unwrap()
    }
}
