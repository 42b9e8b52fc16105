use std::fmt;
use std::path::PathBuf;

use sprig_formats::LoadError;

/// Every fatal condition the host can run into.
///
/// None of these are recoverable: the caller reports the message once and
/// stops the process.
#[derive(Debug)]
pub enum HostError {
    /// A manifest, script, sprite or map file is not on disk.
    MissingFile { what: &'static str, path: PathBuf },
    /// The manifest is structurally unusable.
    Manifest(String),
    /// `main.lang` names a language other than Lua.
    UnsupportedLanguage(String),
    /// The main script failed while being executed for the first time.
    ScriptLoad { path: PathBuf, message: String },
    /// A required entry point is absent or not callable.
    ContractViolation { entry: &'static str, found: String },
    /// A call targeted a global that is not bound to anything.
    UnboundFunction(String),
    /// A script function raised while being called.
    ScriptCall { function: String, message: String },
    /// A lifecycle operation ran in the wrong order.
    InvalidState { operation: &'static str, state: &'static str },
    /// The rendering backend rejected an asset.
    Backend { path: PathBuf, source: anyhow::Error },
}

impl HostError {
    pub(crate) fn from_load(what: &'static str, err: LoadError) -> Self {
        match err {
            LoadError::NotFound { path } => HostError::MissingFile { what, path },
            LoadError::Io { path, message } => {
                HostError::Manifest(format!("failed to read {what} {}: {message}", path.display()))
            }
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::MissingFile { what, path } => {
                write!(f, "{what} not found: {}", path.display())
            }
            HostError::Manifest(msg) => write!(f, "invalid project manifest: {msg}"),
            HostError::UnsupportedLanguage(lang) => {
                write!(f, "unsupported script language '{lang}' (only 'lua' is available)")
            }
            HostError::ScriptLoad { path, message } => {
                write!(f, "failed to load script {}: {message}", path.display())
            }
            HostError::ContractViolation { entry, found } => {
                write!(f, "script must define a global function '{entry}' (found {found})")
            }
            HostError::UnboundFunction(name) => {
                write!(f, "script function '{name}' is not defined")
            }
            HostError::ScriptCall { function, message } => {
                write!(f, "error in script function '{function}': {message}")
            }
            HostError::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while the script host is {state}")
            }
            HostError::Backend { path, source } => {
                write!(f, "failed to load asset {}: {source:#}", path.display())
            }
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Backend { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_map_to_missing_file() {
        let err = HostError::from_load("map", LoadError::NotFound { path: "maps/a.map".into() });
        assert!(matches!(err, HostError::MissingFile { what: "map", .. }));
        assert_eq!(err.to_string(), "map not found: maps/a.map");
    }

    #[test]
    fn call_errors_name_the_function() {
        let unbound = HostError::UnboundFunction("tick".into());
        let raised = HostError::ScriptCall { function: "tick".into(), message: "boom".into() };
        assert!(unbound.to_string().contains("'tick'"));
        assert!(raised.to_string().contains("boom"));
        assert_ne!(unbound.to_string(), raised.to_string());
    }
}
