//! Line-oriented map description format.
//!
//! ```text
//! @rect
//! .pos  vec2 10 20
//! .size vec2 5 5
//! .displayColor color red
//! ```
//!
//! `@<type>` starts an object, `.<name> <declaredType> <value>...` sets a
//! property on the most recent object. Every other line is ignored.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{read_source, LoadError};

/// A property value: a free-form type tag plus raw tokens.
///
/// Tokens are not interpreted here; consumers pick the meaning based on the
/// property name and `declared_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub declared_type: String,
    pub values: Vec<String>,
}

impl Property {
    /// Parses token `index` as a number.
    pub fn number(&self, index: usize) -> Option<f32> {
        self.values.get(index)?.parse().ok()
    }

    /// Parses the first two tokens as an `(x, y)` pair.
    pub fn vec2(&self) -> Option<(f32, f32)> {
        Some((self.number(0)?, self.number(1)?))
    }

    /// First token, if any.
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// One `@type` block and its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    /// Text following `@`, fixed at creation.
    kind: String,
    pub properties: HashMap<String, Property>,
}

impl MapObject {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), properties: HashMap::new() }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Sets a property; re-declaring a name overwrites it.
    pub fn set(&mut self, name: impl Into<String>, property: Property) {
        self.properties.insert(name.into(), property);
    }
}

/// Parses map description text into objects in declaration order.
pub fn parse_str(src: &str) -> Vec<MapObject> {
    let mut objects: Vec<MapObject> = Vec::new();

    for line in src.lines() {
        let line = line.trim();

        if let Some(kind) = line.strip_prefix('@') {
            objects.push(MapObject::new(kind));
            continue;
        }

        if !line.starts_with('.') {
            continue;
        }

        // A property before the first object has nothing to attach to.
        let Some(current) = objects.last_mut() else { continue };

        let mut tokens = line.split_whitespace();
        let (Some(name), Some(declared_type)) = (tokens.next(), tokens.next()) else {
            continue;
        };

        current.set(
            &name[1..],
            Property {
                declared_type: declared_type.to_string(),
                values: tokens.map(str::to_string).collect(),
            },
        );
    }

    objects
}

/// Reads and parses a map description file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<MapObject>, LoadError> {
    let src = read_source(path.as_ref())?;
    Ok(parse_str(&src))
}
