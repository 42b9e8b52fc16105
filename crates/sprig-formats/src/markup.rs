//! Nested-tag markup used by project manifests.
//!
//! The grammar is permissive: anything that is not a matched `<name>…</name>`
//! pair is ignored, so [`parse`] cannot fail.

use std::fmt;
use std::path::Path;

use crate::error::{read_source, LoadError};
use crate::lexer::TagScanner;

// ── Value ─────────────────────────────────────────────────────────────────

/// Value stored under a tag name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Trimmed single-line inner text.
    Text(String),
    /// Repeated sibling tags, or one tag holding several non-empty lines.
    List(Vec<String>),
    /// Inner text that itself contained tag pairs.
    Document(Document),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Entries of a list, with a lone scalar treated as a one-element list.
    /// Nested documents have no items.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Value::Text(s) if s.is_empty() => Vec::new(),
            Value::Text(s) => vec![s.as_str()],
            Value::List(items) => items.iter().map(String::as_str).collect(),
            Value::Document(_) => Vec::new(),
        }
    }
}

// ── Document ──────────────────────────────────────────────────────────────

/// Tag name → value mapping for one nesting level, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Walks nested documents along a dotted path such as `project.main.lang`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut value = self.get(segments.next()?)?;
        for segment in segments {
            value = value.as_document()?.get(segment)?;
        }
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Stores `value` under `name`. An existing entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Applies the repetition rule for a scalar occurrence of `name`.
    fn push_text(&mut self, name: &str, text: &str) {
        let Some((_, slot)) = self.entries.iter_mut().find(|(n, _)| n == name) else {
            self.entries.push((name.to_string(), Value::Text(text.to_string())));
            return;
        };

        match slot {
            Value::Text(first) => {
                let first = std::mem::take(first);
                *slot = Value::List(vec![first, text.to_string()]);
            }
            Value::List(items) => items.push(text.to_string()),
            Value::Document(_) => *slot = Value::Text(text.to_string()),
        }
    }

    /// Turns every multi-line scalar at this level into a list of its
    /// trimmed, non-empty lines.
    fn split_multiline_text(&mut self) {
        for (_, value) in &mut self.entries {
            let Value::Text(text) = value else { continue };
            let lines: Vec<String> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            if lines.len() > 1 {
                *value = Value::List(lines);
            }
        }
    }

    /// Re-emits the document as markup.
    ///
    /// Lists become repeated sibling tags and nested documents are indented
    /// one level, so parsing the output yields an equal document whenever
    /// no list entry itself spans lines.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out, 0);
        out
    }

    fn write_markup(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        for (name, value) in &self.entries {
            match value {
                Value::Text(text) => {
                    out.push_str(&format!("{indent}<{name}>{text}</{name}>\n"));
                }
                Value::List(items) => {
                    for item in items {
                        out.push_str(&format!("{indent}<{name}>{item}</{name}>\n"));
                    }
                }
                Value::Document(doc) => {
                    out.push_str(&format!("{indent}<{name}>\n"));
                    doc.write_markup(out, depth + 1);
                    out.push_str(&format!("{indent}</{name}>\n"));
                }
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

// ── Entry points ──────────────────────────────────────────────────────────

/// Parses markup text into a [`Document`]. Empty or tag-free input yields an
/// empty document.
pub fn parse(content: &str) -> Document {
    let mut doc = Document::new();

    for pair in TagScanner::new(content) {
        let inner = pair.inner.trim();
        if TagScanner::contains_pair(inner) {
            doc.insert(pair.name, Value::Document(parse(inner)));
        } else {
            doc.push_text(pair.name, inner);
        }
    }

    doc.split_multiline_text();
    doc
}

/// Reads and parses a markup file.
pub fn load(path: impl AsRef<Path>) -> Result<Document, LoadError> {
    let src = read_source(path.as_ref())?;
    Ok(parse(&src))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn list(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_input_is_empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("no tags at all").is_empty());
        assert!(parse("<open>never closed").is_empty());
    }

    #[test]
    fn scalar_is_trimmed() {
        let doc = parse("<title>  My Game \n</title>");
        assert_eq!(doc.get("title"), Some(&text("My Game")));
    }

    #[test]
    fn repetition_preserves_order_and_duplicates() {
        let doc = parse("<root><a>x</a><a>y</a><a>z</a><a>x</a></root>");
        assert_eq!(doc.lookup("root.a"), Some(&list(&["x", "y", "z", "x"])));
    }

    #[test]
    fn two_occurrences_become_list() {
        let doc = parse("<root><a>x</a><a>y</a></root>");
        assert_eq!(doc.lookup("root.a"), Some(&list(&["x", "y"])));
    }

    #[test]
    fn multi_line_scalar_becomes_list() {
        let doc = parse("<root><s>L1\nL2</s><one>\n  only  \n\n</one></root>");
        assert_eq!(doc.lookup("root.s"), Some(&list(&["L1", "L2"])));
        assert_eq!(doc.lookup("root.one"), Some(&text("only")));
    }

    #[test]
    fn multi_line_drops_blank_lines_and_trims() {
        let doc = parse("<files>\n   a.png\n\n \t \n  b.png  \n</files>");
        assert_eq!(doc.get("files"), Some(&list(&["a.png", "b.png"])));
    }

    #[test]
    fn case_sensitive_names() {
        let doc = parse("<A>1</A><a>2</a>");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("A"), Some(&text("1")));
        assert_eq!(doc.get("a"), Some(&text("2")));
    }

    #[test]
    fn nested_documents_recurse() {
        let doc = parse("<project><main><lang>lua</lang><path>main.lua</path></main></project>");
        assert_eq!(doc.lookup("project.main.lang"), Some(&text("lua")));
        assert_eq!(doc.lookup("project.main.path"), Some(&text("main.lua")));
        assert_eq!(doc.lookup("project.missing"), None);
        assert_eq!(doc.lookup("project.main.lang.deeper"), None);
    }

    #[test]
    fn nested_document_replaces_earlier_scalar() {
        let doc = parse("<r><k>plain</k><k><x>1</x></k></r>");
        let k = doc.lookup("r.k").unwrap();
        assert_eq!(k.as_document().and_then(|d| d.get("x")), Some(&text("1")));
    }

    #[test]
    fn scalar_after_nested_document_replaces_it() {
        let doc = parse("<r><k><x>1</x></k><k>plain</k></r>");
        assert_eq!(doc.lookup("r.k"), Some(&text("plain")));
    }

    #[test]
    fn same_name_nesting_pairs_nearest_close() {
        // The outer <a> closes at the first </a>; its inner text `<a>x` has
        // no complete pair, so it stays a scalar.
        let doc = parse("<a><a>x</a></a>");
        assert_eq!(doc.get("a"), Some(&text("<a>x")));
    }

    #[test]
    fn first_position_is_kept_on_repeat() {
        let doc = parse("<a>1</a><b>2</b><a>3</a>");
        let names: Vec<&str> = doc.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn items_treats_scalar_as_single_entry() {
        assert_eq!(text("a.png").items(), ["a.png"]);
        assert!(text("").items().is_empty());
        assert_eq!(list(&["a", "b"]).items(), ["a", "b"]);
        assert!(Value::Document(Document::new()).items().is_empty());
    }

    #[test]
    fn round_trip_single_line_scalars() {
        let src = "<project><title>Demo</title><dimensions><width>320</width>\
                   <height>240</height></dimensions><main><lang>lua</lang></main></project>";
        let doc = parse(src);
        assert_eq!(parse(&doc.to_markup()), doc);
    }

    #[test]
    fn round_trip_lists_as_repeated_siblings() {
        let doc = parse("<files><maps>a.map\nb.map</maps><sprites>x.png</sprites></files>");
        assert_eq!(parse(&doc.to_markup()), doc);
    }

    #[test]
    fn parsing_is_idempotent() {
        let src = "<project><files><sprites>a.png\nb.png</sprites></files></project>";
        assert_eq!(parse(src), parse(src));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let err = load("/definitely/not/here.xml").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }
}
