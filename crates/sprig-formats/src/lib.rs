//! Parsers for the two text formats a sprig project is made of.
//!
//! This crate has no runtime dependencies so it can be consumed by
//! linters and editor tooling without pulling in the script runtime or any
//! engine or GPU code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`markup`] | `Document`, `Value`, nested-tag `parse` / `load` |
//! | [`mapdesc`] | `MapObject`, `Property`, `@type` / `.prop` line parser |
//! | [`lexer`] | `TagScanner`, tag-pair matching used by `markup` |
//! | [`error`] | `LoadError` |
//!
//! # Quick start
//!
//! ```rust
//! use sprig_formats::{mapdesc, markup};
//!
//! let doc = markup::parse("<project><title>Demo</title></project>");
//! assert_eq!(doc.lookup("project.title").and_then(|v| v.as_text()), Some("Demo"));
//!
//! let objects = mapdesc::parse_str("@rect\n.pos vec2 10 20\n");
//! assert_eq!(objects[0].kind(), "rect");
//! ```

pub mod error;
pub mod lexer;
pub mod mapdesc;
pub mod markup;

pub use error::LoadError;
pub use mapdesc::{MapObject, Property};
pub use markup::{Document, Value};

#[cfg(test)]
mod manifest_tests {
    use super::*;

    const MANIFEST: &str = r#"
        <project>
            <title>Pong</title>
            <main>
                <lang>lua</lang>
                <path>scripts/main.lua</path>
            </main>
            <files>
                <sprites>
                    ball.png
                    paddle.png
                </sprites>
                <maps>court.map</maps>
            </files>
            <dimensions>
                <width>640</width>
                <height>480</height>
            </dimensions>
        </project>
    "#;

    fn text(doc: &Document, path: &str) -> Option<String> {
        doc.lookup(path).and_then(Value::as_text).map(str::to_string)
    }

    #[test]
    fn full_manifest_shape() {
        let doc = markup::parse(MANIFEST);
        assert_eq!(text(&doc, "project.title").as_deref(), Some("Pong"));
        assert_eq!(text(&doc, "project.main.lang").as_deref(), Some("lua"));
        assert_eq!(text(&doc, "project.dimensions.width").as_deref(), Some("640"));
        assert_eq!(
            doc.lookup("project.files.sprites").map(Value::items),
            Some(vec!["ball.png", "paddle.png"])
        );
        assert_eq!(
            doc.lookup("project.files.maps").map(Value::items),
            Some(vec!["court.map"])
        );
    }

    #[test]
    fn manifest_parses_identically_twice() {
        assert_eq!(markup::parse(MANIFEST), markup::parse(MANIFEST));
    }

    #[test]
    fn manifest_loads_identically_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.xml");
        std::fs::write(&path, MANIFEST).unwrap();

        let first = markup::load(&path).unwrap();
        let second = markup::load(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, markup::parse(MANIFEST));
    }
}
