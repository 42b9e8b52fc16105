//! Typed view over a parsed `<project>` document.

use std::path::{Path, PathBuf};

use sprig_formats::{markup, Document, Value};

use crate::error::{HostError, Result};

pub const DEFAULT_LANG: &str = "lua";
pub const DEFAULT_SCRIPT: &str = "scripts/main.lua";
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_TITLE: &str = "Untitled Project";

const SPRITE_DIR: &str = "sprites";
const MAP_DIR: &str = "maps";

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectManifest {
    pub title: String,
    pub lang: String,
    /// Script path as written in the manifest, relative to the project root.
    pub script: PathBuf,
    pub sprites: Vec<String>,
    pub maps: Vec<String>,
    pub width: u32,
    pub height: u32,
}

impl ProjectManifest {
    /// Reads the manifest file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let doc = markup::load(path).map_err(|e| HostError::from_load("project manifest", e))?;
        Self::from_document(&doc)
    }

    /// Extracts the manifest fields, applying defaults for absent ones.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let empty = Document::new();
        let project = match doc.get("project") {
            Some(Value::Document(project)) => project,
            // `<project></project>` has no nested tags, so it parses as text.
            Some(Value::Text(text)) if text.trim().is_empty() => &empty,
            Some(_) => {
                return Err(HostError::Manifest("<project> must contain nested tags".into()));
            }
            None => return Err(HostError::Manifest("missing <project> root".into())),
        };

        let text = |path: &str, default: &str| -> String {
            project
                .lookup(path)
                .and_then(Value::as_text)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        let list = |path: &str| -> Vec<String> {
            project
                .lookup(path)
                .map(|v| v.items().into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        };

        Ok(Self {
            title: text("title", DEFAULT_TITLE),
            lang: text("main.lang", DEFAULT_LANG),
            script: PathBuf::from(text("main.path", DEFAULT_SCRIPT)),
            sprites: list("files.sprites"),
            maps: list("files.maps"),
            width: dimension(project, "width", DEFAULT_WIDTH)?,
            height: dimension(project, "height", DEFAULT_HEIGHT)?,
        })
    }

    pub fn sprite_path(root: &Path, file: &str) -> PathBuf {
        root.join(SPRITE_DIR).join(file)
    }

    pub fn map_path(root: &Path, file: &str) -> PathBuf {
        root.join(MAP_DIR).join(file)
    }

    pub fn script_path(&self, root: &Path) -> PathBuf {
        root.join(&self.script)
    }
}

fn dimension(project: &Document, name: &str, default: u32) -> Result<u32> {
    let path = format!("dimensions.{name}");
    let Some(value) = project.lookup(&path) else {
        return Ok(default);
    };
    let raw = value
        .as_text()
        .ok_or_else(|| HostError::Manifest(format!("<{name}> must be a single number")))?;
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(HostError::Manifest(format!("<{name}> is not a positive integer: '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(src: &str) -> Result<ProjectManifest> {
        ProjectManifest::from_document(&markup::parse(src))
    }

    #[test]
    fn defaults_fill_absent_fields() {
        let m = manifest("<project></project>").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(m.title, DEFAULT_TITLE);
        assert_eq!(m.lang, "lua");
        assert_eq!(m.script, PathBuf::from("scripts/main.lua"));
        assert_eq!((m.width, m.height), (800, 600));
        assert!(m.sprites.is_empty() && m.maps.is_empty());
    }

    #[test]
    fn reads_every_field() {
        let m = manifest(
            "<project><title>Pong</title>\
             <main><lang>lua</lang><path>game.lua</path></main>\
             <files><sprites>ball.png\npaddle.png</sprites><maps>court.map</maps></files>\
             <dimensions><width>320</width><height>200</height></dimensions></project>",
        )
        .unwrap();
        assert_eq!(m.title, "Pong");
        assert_eq!(m.script, PathBuf::from("game.lua"));
        assert_eq!(m.sprites, ["ball.png", "paddle.png"]);
        assert_eq!(m.maps, ["court.map"]);
        assert_eq!((m.width, m.height), (320, 200));
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(matches!(manifest("<title>x</title>"), Err(HostError::Manifest(_))));
        assert!(matches!(manifest(""), Err(HostError::Manifest(_))));
    }

    #[test]
    fn empty_root_takes_every_default() {
        for src in ["<project></project>", "<project>  \n\t </project>"] {
            let m = manifest(src).unwrap_or_else(|e| panic!("{src:?}: {e}"));
            assert_eq!(m.title, DEFAULT_TITLE);
            assert_eq!((m.width, m.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        }
    }

    #[test]
    fn plain_text_root_is_an_error() {
        assert!(matches!(manifest("<project>hello</project>"), Err(HostError::Manifest(_))));
        assert!(matches!(
            manifest("<project>a</project><project>b</project>"),
            Err(HostError::Manifest(_))
        ));
    }

    #[test]
    fn bad_dimensions_are_errors() {
        let bad = "<project><dimensions><width>wide</width></dimensions></project>";
        assert!(matches!(manifest(bad), Err(HostError::Manifest(_))));
        let zero = "<project><dimensions><height>0</height></dimensions></project>";
        assert!(matches!(manifest(zero), Err(HostError::Manifest(_))));
    }

    #[test]
    fn asset_paths_use_fixed_subdirectories() {
        let root = Path::new("/games/pong");
        assert_eq!(
            ProjectManifest::sprite_path(root, "ball.png"),
            PathBuf::from("/games/pong/sprites/ball.png")
        );
        assert_eq!(
            ProjectManifest::map_path(root, "court.map"),
            PathBuf::from("/games/pong/maps/court.map")
        );
    }

    #[test]
    fn load_missing_manifest() {
        let err = ProjectManifest::load(Path::new("/no/such/project.xml")).unwrap_err();
        assert!(matches!(err, HostError::MissingFile { what: "project manifest", .. }));
    }
}
