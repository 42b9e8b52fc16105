//! Host functions exposed to scripts, as a fixed descriptor table.
//!
//! Each [`Capability`] names the global table it lives in, the function name
//! inside that table, the maximum number of arguments it accepts and the
//! handler that runs it. [`crate::ScriptHost::inject`] registers every entry
//! of [`CAPABILITIES`] and nothing else, so the table is the whole script
//! surface apart from the key constants.

use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Error as LuaError, Value};
use sprig_engine::paint::Color;
use sprig_formats::MapObject;

use crate::backend::Backend;
use crate::registry::AssetRegistry;

pub const SCREEN: &str = "screen";
pub const KEYBOARD: &str = "keyboard";

/// What a capability handler can reach.
pub struct Bindings {
    pub backend: Rc<RefCell<dyn Backend>>,
    pub registry: Rc<AssetRegistry>,
}

pub type Handler = fn(&Bindings, &Args) -> mlua::Result<Value>;

pub struct Capability {
    pub namespace: &'static str,
    pub name: &'static str,
    pub arity: usize,
    pub handler: Handler,
}

impl Capability {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

pub static CAPABILITIES: &[Capability] = &[
    Capability { namespace: SCREEN, name: "fillRect", arity: 5, handler: fill_rect },
    Capability { namespace: SCREEN, name: "drawRect", arity: 5, handler: draw_rect },
    Capability { namespace: SCREEN, name: "fillRound", arity: 4, handler: fill_round },
    Capability { namespace: SCREEN, name: "drawRound", arity: 4, handler: draw_round },
    Capability { namespace: SCREEN, name: "drawSprite", arity: 5, handler: draw_sprite },
    Capability { namespace: SCREEN, name: "drawText", arity: 5, handler: draw_text },
    Capability { namespace: SCREEN, name: "drawMap", arity: 1, handler: draw_map },
    Capability { namespace: SCREEN, name: "clear", arity: 1, handler: clear },
    Capability { namespace: KEYBOARD, name: "keyDown", arity: 1, handler: key_down },
    Capability { namespace: KEYBOARD, name: "keyPressed", arity: 1, handler: key_pressed },
];

/// Names of the namespaces in registration order, without duplicates.
pub fn namespaces() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for cap in CAPABILITIES {
        if !out.contains(&cap.namespace) {
            out.push(cap.namespace);
        }
    }
    out
}

// ── argument access ───────────────────────────────────────────────────────

/// Positional arguments of one capability call.
pub struct Args {
    function: String,
    values: Vec<Value>,
}

impl Args {
    pub fn new(function: impl Into<String>, values: Vec<Value>) -> Self {
        Self { function: function.into(), values }
    }

    fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&Value::Nil)
    }

    fn bad_argument(&self, index: usize, expected: &str) -> LuaError {
        LuaError::RuntimeError(format!(
            "bad argument #{} to '{}' ({expected} expected, got {})",
            index + 1,
            self.function,
            self.get(index).type_name()
        ))
    }

    pub fn number(&self, index: usize) -> mlua::Result<f32> {
        match self.get(index) {
            Value::Integer(i) => Ok(*i as f32),
            Value::Number(n) => Ok(*n as f32),
            Value::String(s) => s
                .to_string_lossy()
                .trim()
                .parse()
                .map_err(|_| self.bad_argument(index, "number")),
            _ => Err(self.bad_argument(index, "number")),
        }
    }

    pub fn integer(&self, index: usize) -> mlua::Result<i32> {
        match self.get(index) {
            Value::Integer(i) => i32::try_from(*i).map_err(|_| self.bad_argument(index, "key code")),
            Value::Number(n) if n.fract() == 0.0 => Ok(*n as i32),
            _ => Err(self.bad_argument(index, "integer")),
        }
    }

    pub fn string(&self, index: usize) -> mlua::Result<String> {
        match self.get(index) {
            Value::String(s) => Ok(s.to_string_lossy()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(self.bad_argument(index, "string")),
        }
    }

    /// A color name or hex string, or a table `{r, g, b [, a]}` with
    /// 0-255 components given by field name or position. `nil` yields
    /// `default` when one is given.
    pub fn color(&self, index: usize, default: Option<Color>) -> mlua::Result<Color> {
        match (self.get(index), default) {
            (Value::Nil, Some(color)) => Ok(color),
            (Value::String(s), _) => {
                let name = s.to_string_lossy();
                Color::parse(&name)
                    .map_err(|e| LuaError::RuntimeError(format!("{}: {e}", self.function)))
            }
            (Value::Table(t), _) => {
                let component = |key: &str, pos: i64, fallback: Option<f64>| -> mlua::Result<u8> {
                    let named: Option<f64> = t.get(key)?;
                    let positional: Option<f64> = t.get(pos)?;
                    let v = named.or(positional).or(fallback).ok_or_else(|| {
                        LuaError::RuntimeError(format!(
                            "{}: color table is missing '{key}'",
                            self.function
                        ))
                    })?;
                    Ok(v.clamp(0.0, 255.0).round() as u8)
                };
                Ok(Color::from_srgb_u8(
                    component("r", 1, None)?,
                    component("g", 2, None)?,
                    component("b", 3, None)?,
                    component("a", 4, Some(255.0))?,
                ))
            }
            _ => Err(self.bad_argument(index, "color")),
        }
    }
}

// ── screen ────────────────────────────────────────────────────────────────

fn fill_rect(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let color = a.color(4, None)?;
    let (x, y, w, h) = (a.number(0)?, a.number(1)?, a.number(2)?, a.number(3)?);
    b.backend.borrow_mut().fill_rect(x, y, w, h, color);
    Ok(Value::Nil)
}

fn draw_rect(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let color = a.color(4, None)?;
    let (x, y, w, h) = (a.number(0)?, a.number(1)?, a.number(2)?, a.number(3)?);
    b.backend.borrow_mut().stroke_rect(x, y, w, h, color);
    Ok(Value::Nil)
}

fn fill_round(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let color = a.color(3, None)?;
    let (x, y, r) = (a.number(0)?, a.number(1)?, a.number(2)?);
    b.backend.borrow_mut().fill_circle(x, y, r, color);
    Ok(Value::Nil)
}

fn draw_round(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let color = a.color(3, None)?;
    let (x, y, r) = (a.number(0)?, a.number(1)?, a.number(2)?);
    b.backend.borrow_mut().stroke_circle(x, y, r, color);
    Ok(Value::Nil)
}

fn draw_sprite(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let name = a.string(0)?;
    let sprite = b.registry.sprite(&name).ok_or_else(|| {
        LuaError::RuntimeError(format!("{}: sprite '{name}' was not loaded", a.function))
    })?;
    let (x, y, sx, sy) = (a.number(1)?, a.number(2)?, a.number(3)?, a.number(4)?);
    b.backend.borrow_mut().draw_sprite(sprite, x, y, sx, sy);
    Ok(Value::Nil)
}

fn draw_text(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let text = a.string(0)?;
    let color = a.color(4, None)?;
    let (x, y, size) = (a.number(1)?, a.number(2)?, a.number(3)?);
    b.backend.borrow_mut().draw_text(&text, x, y, size, color);
    Ok(Value::Nil)
}

fn draw_map(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let name = a.string(0)?;
    let objects = b.registry.map(&name).ok_or_else(|| {
        LuaError::RuntimeError(format!("{}: map '{name}' was not loaded", a.function))
    })?;
    let mut backend = b.backend.borrow_mut();
    for object in objects {
        replay_object(&mut *backend, object)
            .map_err(|e| LuaError::RuntimeError(format!("{}: map '{name}': {e}", a.function)))?;
    }
    Ok(Value::Nil)
}

fn clear(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let color = a.color(0, Some(Color::BLACK))?;
    b.backend.borrow_mut().clear(color);
    Ok(Value::Nil)
}

/// Draws one map object. Unknown kinds and objects missing the geometry
/// their kind needs draw nothing; only a bad `displayColor` is an error.
pub fn replay_object(backend: &mut dyn Backend, object: &MapObject) -> Result<(), String> {
    let color = map_color(object)?;
    let pos = object.property("pos").and_then(|p| p.vec2());

    match object.kind() {
        "rect" => {
            if let (Some((x, y)), Some((w, h))) = (pos, object.property("size").and_then(|p| p.vec2())) {
                backend.fill_rect(x, y, w, h, color);
            }
        }
        "circle" => {
            if let (Some((x, y)), Some(r)) = (pos, object.property("rad").and_then(|p| p.number(0))) {
                backend.fill_circle(x, y, r, color);
            }
        }
        other => log::trace!("drawMap: ignoring object of type '{other}'"),
    }
    Ok(())
}

/// `.displayColor <type> <name>` or `.displayColor <type> r g b [a]`.
fn map_color(object: &MapObject) -> Result<Color, String> {
    let Some(prop) = object.property("displayColor") else {
        return Ok(Color::BLACK);
    };
    let numbers: Option<Vec<u8>> = (0..prop.values.len())
        .map(|i| prop.number(i).map(|v| v.clamp(0.0, 255.0).round() as u8))
        .collect();
    match numbers.as_deref() {
        Some([r, g, b]) => Ok(Color::from_srgb_u8(*r, *g, *b, 255)),
        Some([r, g, b, a]) => Ok(Color::from_srgb_u8(*r, *g, *b, *a)),
        _ => {
            let name = prop.first().unwrap_or("black");
            Color::parse(name).map_err(|e| e.to_string())
        }
    }
}

// ── keyboard ──────────────────────────────────────────────────────────────

fn key_down(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let code = a.integer(0)?;
    Ok(Value::Boolean(b.backend.borrow().key_down(code)))
}

fn key_pressed(b: &Bindings, a: &Args) -> mlua::Result<Value> {
    let code = a.integer(0)?;
    Ok(Value::Boolean(b.backend.borrow().key_pressed(code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingBackend;
    use sprig_formats::mapdesc;

    fn bindings(registry: AssetRegistry) -> (Rc<RefCell<RecordingBackend>>, Bindings) {
        let backend = Rc::new(RefCell::new(RecordingBackend::default()));
        let bindings = Bindings { backend: backend.clone(), registry: Rc::new(registry) };
        (backend, bindings)
    }

    fn find(namespace: &str, name: &str) -> &'static Capability {
        CAPABILITIES
            .iter()
            .find(|c| c.namespace == namespace && c.name == name)
            .unwrap_or_else(|| panic!("no capability {namespace}.{name}"))
    }

    #[test]
    fn table_is_enumerable_and_unique() {
        let mut names: Vec<String> = CAPABILITIES.iter().map(Capability::qualified_name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(namespaces(), [SCREEN, KEYBOARD]);
        assert_eq!(find(SCREEN, "fillRect").arity, 5);
        assert_eq!(find(SCREEN, "clear").arity, 1);
    }

    #[test]
    fn numbers_accept_integers_floats_and_numeric_strings() {
        let lua = mlua::Lua::new();
        let args = Args::new(
            "t",
            vec![
                Value::Integer(3),
                Value::Number(2.5),
                Value::String(lua.create_string(" 7 ").unwrap()),
                Value::Boolean(true),
            ],
        );
        assert_eq!(args.number(0).unwrap(), 3.0);
        assert_eq!(args.number(1).unwrap(), 2.5);
        assert_eq!(args.number(2).unwrap(), 7.0);
        let err = args.number(3).unwrap_err().to_string();
        assert!(err.contains("bad argument #4 to 't'"), "{err}");
        assert!(args.number(9).is_err());
    }

    #[test]
    fn colors_from_names_and_tables() {
        let lua = mlua::Lua::new();
        let named = lua.create_table().unwrap();
        named.set("r", 255).unwrap();
        named.set("g", 0).unwrap();
        named.set("b", 0).unwrap();
        let positional = lua.create_sequence_from([255, 0, 0, 255]).unwrap();
        let partial = lua.create_sequence_from([1, 2]).unwrap();

        let args = Args::new(
            "t",
            vec![
                Value::String(lua.create_string("red").unwrap()),
                Value::Table(named),
                Value::Table(positional),
                Value::Table(partial),
                Value::String(lua.create_string("mauve-ish").unwrap()),
            ],
        );
        let red = Color::from_srgb_u8(255, 0, 0, 255);
        assert_eq!(args.color(1, None).unwrap(), red);
        assert_eq!(args.color(2, None).unwrap(), red);
        assert!(args.color(0, None).is_ok());
        assert!(args.color(3, None).is_err());
        assert!(args.color(4, None).is_err());
        assert_eq!(args.color(7, Some(Color::WHITE)).unwrap(), Color::WHITE);
        assert!(args.color(7, None).is_err());
    }

    #[test]
    fn clear_defaults_to_black() {
        let (backend, b) = bindings(AssetRegistry::new());
        (find(SCREEN, "clear").handler)(&b, &Args::new("screen.clear", vec![])).unwrap();
        assert_eq!(backend.borrow_mut().take(), ["clear 0.00,0.00,0.00,1.00"]);
    }

    #[test]
    fn key_queries_forward_codes() {
        let (backend, b) = bindings(AssetRegistry::new());
        backend.borrow_mut().down.push(65);
        let down = (find(KEYBOARD, "keyDown").handler)(&b, &Args::new("k", vec![Value::Integer(65)]));
        let pressed =
            (find(KEYBOARD, "keyPressed").handler)(&b, &Args::new("k", vec![Value::Integer(65)]));
        assert!(matches!(down, Ok(Value::Boolean(true))));
        assert!(matches!(pressed, Ok(Value::Boolean(false))));
    }

    #[test]
    fn map_objects_replay_as_fills() {
        let objects = mapdesc::parse_str(
            "@rect\n.pos vec2 1 2\n.size vec2 3 4\n.displayColor color white\n\
             @circle\n.pos vec2 5 6\n.rad int 7\n\
             @tree\n.pos vec2 0 0\n\
             @rect\n.pos vec2 1 1\n\
             @circle\n.pos vec2 0 0\n.rad int 1\n.displayColor rgb 255 0 0\n",
        );
        let mut backend = RecordingBackend::default();
        for object in &objects {
            replay_object(&mut backend, object).unwrap();
        }
        assert_eq!(
            backend.take(),
            [
                "fill_rect 1 2 3 4 1.00,1.00,1.00,1.00",
                "fill_circle 5 6 7 0.00,0.00,0.00,1.00",
                "fill_circle 0 0 1 1.00,0.00,0.00,1.00",
            ]
        );
    }

    #[test]
    fn unknown_display_color_is_an_error() {
        let objects = mapdesc::parse_str("@rect\n.pos vec2 0 0\n.size vec2 1 1\n.displayColor color nope\n");
        let mut backend = RecordingBackend::default();
        assert!(replay_object(&mut backend, &objects[0]).is_err());
        assert!(backend.calls.is_empty());
    }
}
