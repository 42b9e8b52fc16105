use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use sprig_engine::paint::Color;

use crate::backend::Backend;
use crate::bridge::ScriptHost;
use crate::capability::Bindings;
use crate::error::{HostError, Result};
use crate::manifest::{ProjectManifest, DEFAULT_LANG};
use crate::registry::AssetRegistry;

/// Everything a running project owns: its manifest, the backend, the
/// loaded assets and the script runtime.
///
/// Built once by [`EngineContext::boot`]; afterwards only
/// [`EngineContext::frame`] is called, once per tick.
pub struct EngineContext<B: Backend + 'static> {
    root: PathBuf,
    manifest: ProjectManifest,
    backend: Rc<RefCell<B>>,
    registry: Rc<AssetRegistry>,
    host: ScriptHost,
}

impl<B: Backend + 'static> EngineContext<B> {
    /// Loads the manifest at `manifest_path` and boots the project it
    /// describes. Paths in the manifest resolve against its directory.
    pub fn boot(manifest_path: &Path, backend: Rc<RefCell<B>>) -> Result<Self> {
        let manifest = ProjectManifest::load(manifest_path)?;
        let root = manifest_path.parent().unwrap_or(Path::new("")).to_path_buf();
        Self::boot_with(root, manifest, backend)
    }

    /// Boots from an already-loaded manifest.
    ///
    /// Order: language check, assets, script load, capability injection,
    /// entry point validation, `setup()`. The first failure aborts the boot.
    pub fn boot_with(root: PathBuf, manifest: ProjectManifest, backend: Rc<RefCell<B>>) -> Result<Self> {
        if !manifest.lang.trim().eq_ignore_ascii_case(DEFAULT_LANG) {
            return Err(HostError::UnsupportedLanguage(manifest.lang.clone()));
        }

        let registry = {
            let mut backend = backend.borrow_mut();
            Rc::new(AssetRegistry::load(&root, &manifest, &mut *backend)?)
        };
        log::info!(
            "'{}': {} sprites, {} maps",
            manifest.title,
            registry.sprite_count(),
            registry.map_count()
        );

        let mut host = ScriptHost::new();
        host.load_file(&manifest.script_path(&root))?;
        let backend_dyn: Rc<RefCell<dyn Backend>> = backend.clone();
        host.inject(Rc::new(Bindings { backend: backend_dyn, registry: Rc::clone(&registry) }))?;
        host.validate()?;
        host.setup()?;

        Ok(Self { root, manifest, backend, registry, host })
    }

    /// One tick: clear to black, `update(dt)`, `draw()`.
    pub fn frame(&mut self, dt: f32) -> Result<()> {
        self.backend.borrow_mut().clear(Color::BLACK);
        self.host.update(dt)?;
        self.host.draw()
    }

    /// Calls any global script function by name.
    pub fn call(&self, name: &str, args: impl mlua::IntoLuaMulti) -> Result<mlua::MultiValue> {
        self.host.call(name, args)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &Rc<RefCell<B>> {
        &self.backend
    }
}
