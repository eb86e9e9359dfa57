//! Common test utilities for vfxdirs integration tests.
//!
//! Provides `TestEnv` for isolated config directories and `Sketch`, a small
//! provider whose defaults only read the `Context`.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub use tempfile::TempDir;
use vfxdirs::{Context, ContextOverrides, DirKey, Os, VfxApp};

/// A test environment with an isolated home and config directory.
///
/// Config files are written under `<home>/config-home/vfxdirs/`, and
/// `context()` points `XDG_CONFIG_HOME` there so default loading finds them.
pub struct TestEnv {
    pub home: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated home directory.
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    /// Get the path to the fake home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Directory used as the XDG config home.
    pub fn config_home(&self) -> PathBuf {
        self.home.path().join("config-home")
    }

    /// Write a config file at `<config-home>/vfxdirs/<name>` and return its path.
    pub fn write_config(&self, name: &str, body: &str) -> PathBuf {
        let dir = self.config_home().join("vfxdirs");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    /// A Linux context rooted at this environment, plus extra variables.
    pub fn context(&self, extra: &[(&str, &str)]) -> Context {
        let mut env: Vec<(String, String)> = vec![(
            "XDG_CONFIG_HOME".to_string(),
            self.config_home().to_string_lossy().into_owned(),
        )];
        env.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        Context::from_env(
            &ContextOverrides::new()
                .with_env(env)
                .with_os(Os::Linux)
                .with_home(self.home_path())
                .with_cwd(self.home_path()),
        )
        .unwrap()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Example provider: a sketching app with per-OS prefs and versioned caches.
pub struct Sketch;

impl VfxApp for Sketch {
    fn id(&self) -> &str {
        "sketch"
    }

    fn display_name(&self) -> &str {
        "Sketch"
    }

    fn supported_keys(&self) -> BTreeSet<DirKey> {
        BTreeSet::from([
            DirKey::PREFS,
            DirKey::CACHE,
            DirKey::SCRIPTS,
            DirKey::TEMP,
        ])
    }

    fn default_path(&self, key: &DirKey, ctx: &Context, version: Option<&str>) -> Option<PathBuf> {
        let prefs = match ctx.os() {
            Os::Linux => ctx.home().join(".sketch"),
            Os::MacOs | Os::Windows => ctx.config_home().join("Sketch"),
        };
        let versioned = |dir: PathBuf| match version {
            Some(v) => dir.join(v),
            None => dir,
        };

        if *key == DirKey::PREFS {
            Some(versioned(prefs))
        } else if *key == DirKey::SCRIPTS {
            Some(prefs.join("scripts"))
        } else if *key == DirKey::CACHE {
            Some(versioned(ctx.cache_home().join("sketch")))
        } else if *key == DirKey::TEMP {
            Some(ctx.temp_dir().join("sketch"))
        } else {
            None
        }
    }
}
