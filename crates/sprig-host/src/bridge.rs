//! Embedded Lua runtime and its lifecycle.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use mlua::{Function, IntoLuaMulti, Lua, MultiValue, Table, Value};

use crate::capability::{Args, Bindings, CAPABILITIES, KEYBOARD};
use crate::error::{HostError, Result};

/// Globals every script must define as functions.
pub const ENTRY_POINTS: [&str; 3] = ["setup", "update", "draw"];

/// Lifecycle of a [`ScriptHost`]. Each step is only reachable from the one
/// before it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostState {
    Uninitialized,
    Loaded,
    Injected,
    Validated,
    Running,
}

impl HostState {
    fn as_str(self) -> &'static str {
        match self {
            HostState::Uninitialized => "uninitialized",
            HostState::Loaded => "loaded",
            HostState::Injected => "injected",
            HostState::Validated => "validated",
            HostState::Running => "running",
        }
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ScriptHost {
    lua: Lua,
    state: HostState,
}

impl ScriptHost {
    /// A fresh runtime with the safe standard libraries.
    pub fn new() -> Self {
        Self { lua: Lua::new(), state: HostState::Uninitialized }
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    fn expect_state(&self, operation: &'static str, allowed: &[HostState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(HostError::InvalidState { operation, state: self.state.as_str() })
        }
    }

    /// Reads and executes the main script.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        self.expect_state("load a script", &[HostState::Uninitialized])?;
        if !path.is_file() {
            return Err(HostError::MissingFile { what: "script", path: path.to_path_buf() });
        }
        let source = std::fs::read_to_string(path).map_err(|e| HostError::ScriptLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.exec(path, &source)
    }

    /// Executes `source` as the main script; `path` only names the chunk.
    pub fn load_source(&mut self, path: &Path, source: &str) -> Result<()> {
        self.expect_state("load a script", &[HostState::Uninitialized])?;
        self.exec(path, source)
    }

    fn exec(&mut self, path: &Path, source: &str) -> Result<()> {
        self.lua
            .load(source)
            .set_name(format!("@{}", path.display()))
            .exec()
            .map_err(|e| HostError::ScriptLoad { path: path.to_path_buf(), message: e.to_string() })?;
        log::debug!("executed script {}", path.display());
        self.state = HostState::Loaded;
        Ok(())
    }

    /// Installs one global table per capability namespace, replacing any
    /// global of the same name the script defined, plus the key constants.
    pub fn inject(&mut self, bindings: Rc<Bindings>) -> Result<()> {
        self.expect_state("inject capabilities", &[HostState::Loaded])?;
        self.install(&bindings).map_err(|e| HostError::ScriptLoad {
            path: "<host>".into(),
            message: format!("capability injection failed: {e}"),
        })?;
        self.state = HostState::Injected;
        Ok(())
    }

    fn install(&self, bindings: &Rc<Bindings>) -> mlua::Result<()> {
        let mut tables: HashMap<&'static str, Table> = HashMap::new();

        for cap in CAPABILITIES {
            let table = match tables.get(cap.namespace) {
                Some(t) => t.clone(),
                None => {
                    let t = self.lua.create_table()?;
                    tables.insert(cap.namespace, t.clone());
                    t
                }
            };

            let bindings = Rc::clone(bindings);
            let qualified = cap.qualified_name();
            let arity = cap.arity;
            let handler = cap.handler;
            let func = self.lua.create_function(move |_lua, args: MultiValue| {
                if args.len() > arity {
                    return Err(mlua::Error::RuntimeError(format!(
                        "'{qualified}' takes at most {arity} arguments, got {}",
                        args.len()
                    )));
                }
                handler(&bindings, &Args::new(qualified.as_str(), args.into_iter().collect()))
            })?;
            table.set(cap.name, func)?;
        }

        let keyboard = match tables.get(KEYBOARD) {
            Some(t) => t.clone(),
            None => {
                let t = self.lua.create_table()?;
                tables.insert(KEYBOARD, t.clone());
                t
            }
        };
        let codes = bindings.backend.borrow().key_codes();
        for (name, code) in &codes {
            keyboard.set(*name, *code)?;
        }

        let globals = self.lua.globals();
        for (namespace, table) in tables {
            globals.set(namespace, table)?;
        }
        log::debug!("injected {} capabilities and {} key constants", CAPABILITIES.len(), codes.len());
        Ok(())
    }

    /// Confirms every entry point is a function.
    pub fn validate(&mut self) -> Result<()> {
        self.expect_state("validate entry points", &[HostState::Injected])?;
        let globals = self.lua.globals();
        for entry in ENTRY_POINTS {
            let value: Value = globals.get(entry).unwrap_or(Value::Nil);
            if !matches!(value, Value::Function(_)) {
                return Err(HostError::ContractViolation {
                    entry,
                    found: value.type_name().to_string(),
                });
            }
        }
        self.state = HostState::Validated;
        Ok(())
    }

    /// Calls the global function `name`.
    ///
    /// An unbound name is [`HostError::UnboundFunction`]; anything the call
    /// itself raises, including calling a non-function, is
    /// [`HostError::ScriptCall`].
    pub fn call(&self, name: &str, args: impl IntoLuaMulti) -> Result<MultiValue> {
        self.expect_state("call a script function", &[HostState::Validated, HostState::Running])?;
        let value: Value = self.lua.globals().get(name).unwrap_or(Value::Nil);
        let func = match value {
            Value::Nil => return Err(HostError::UnboundFunction(name.to_string())),
            Value::Function(f) => f,
            other => {
                return Err(HostError::ScriptCall {
                    function: name.to_string(),
                    message: format!("attempt to call a {} value", other.type_name()),
                });
            }
        };
        invoke(name, &func, args)
    }

    /// Runs `setup()` once and starts frame dispatch.
    pub fn setup(&mut self) -> Result<()> {
        self.expect_state("run setup", &[HostState::Validated])?;
        self.call("setup", ())?;
        self.state = HostState::Running;
        Ok(())
    }

    pub fn update(&self, dt: f32) -> Result<()> {
        self.expect_state("dispatch update", &[HostState::Running])?;
        self.call("update", dt).map(drop)
    }

    pub fn draw(&self) -> Result<()> {
        self.expect_state("dispatch draw", &[HostState::Running])?;
        self.call("draw", ()).map(drop)
    }

    /// Direct access for embedding code that needs more than the lifecycle.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

impl Default for ScriptHost {
    fn default() -> Self {
        Self::new()
    }
}

fn invoke(name: &str, func: &Function, args: impl IntoLuaMulti) -> Result<MultiValue> {
    func.call::<MultiValue>(args).map_err(|e| HostError::ScriptCall {
        function: name.to_string(),
        message: e.to_string(),
    })
}
