//! Provider contract and precedence resolution.
//!
//! ## Path Precedence (highest to lowest)
//!
//! 1. Per-key override: `[apps.<id>.paths] <key> = "..."`
//! 2. Per-app base override: `[apps.<id>] base = "..."`, joined with the key
//! 3. The provider's own OS-aware default derived from [`Context`]
//!
//! A key outside the provider's [`supported_keys`](VfxApp::supported_keys) is
//! only resolvable through a per-key override.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::VfxDirsConfig;
use crate::context::Context;
use crate::keys::DirKey;
use crate::{Error, Result};

/// Tracks where a resolved path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSource {
    /// Per-key entry in the app's `paths` table
    PathOverride,
    /// Derived from the app's `base` override
    BaseOverride,
    /// Provider default for the current OS
    Default,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSource::PathOverride => write!(f, "path-override"),
            PathSource::BaseOverride => write!(f, "base-override"),
            PathSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: PathSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: PathSource) -> Self {
        Self { value, source }
    }
}

/// Capability interface implemented by application providers.
///
/// Implementors supply identity, the keys they understand, and their default
/// derivation. Defaults must only read [`Context`], never the process
/// environment, so providers stay testable with a synthetic context.
pub trait VfxApp {
    /// Stable identifier, matched case-insensitively against `[apps.<id>]`.
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Keys this provider can resolve without a per-key override.
    fn supported_keys(&self) -> BTreeSet<DirKey>;

    /// OS-aware default for a supported key. `None` means the provider has
    /// no default for this key on this OS.
    fn default_path(&self, key: &DirKey, ctx: &Context, version: Option<&str>) -> Option<PathBuf>;

    /// Location of `key` beneath a `base` override.
    fn base_path(&self, base: &Path, key: &DirKey, _version: Option<&str>) -> PathBuf {
        base.join(key.as_str())
    }

    /// Resolve `key` and report which layer supplied the path.
    fn resolve(
        &self,
        key: &DirKey,
        ctx: &Context,
        config: &VfxDirsConfig,
        version: Option<&str>,
    ) -> Result<Resolved<PathBuf>> {
        let app_cfg = config.app(self.id());

        if let Some(path) = app_cfg.and_then(|app| app.path_override(key)) {
            return Ok(Resolved::new(path.to_path_buf(), PathSource::PathOverride));
        }

        if !self.supported_keys().contains(key) {
            return Err(unsupported(self.id(), key));
        }

        if let Some(base) = app_cfg.and_then(|app| app.base()) {
            return Ok(Resolved::new(
                self.base_path(base, key, version),
                PathSource::BaseOverride,
            ));
        }

        match self.default_path(key, ctx, version) {
            Some(path) => Ok(Resolved::new(path, PathSource::Default)),
            None => Err(unsupported(self.id(), key)),
        }
    }

    /// Resolve `key` to a final path.
    fn path(
        &self,
        key: &DirKey,
        ctx: &Context,
        config: &VfxDirsConfig,
        version: Option<&str>,
    ) -> Result<PathBuf> {
        self.resolve(key, ctx, config, version).map(|r| r.value)
    }
}

fn unsupported(app: &str, key: &DirKey) -> Error {
    Error::UnsupportedKey {
        app: app.to_string(),
        key: key.to_string(),
    }
}

/// A context paired with its effective configuration.
///
/// Built once per session; cheap to share by reference across resolutions.
#[derive(Debug, Clone)]
pub struct Resolver {
    ctx: Context,
    config: VfxDirsConfig,
}

impl Resolver {
    pub fn new(ctx: Context, config: VfxDirsConfig) -> Self {
        Self { ctx, config }
    }

    /// Build a resolver from the default config file, if any.
    pub fn from_default_config(ctx: Context) -> Result<Self> {
        let config = VfxDirsConfig::load_default(&ctx, None)?.unwrap_or_default();
        Ok(Self::new(ctx, config))
    }

    /// Layer `higher` over the current configuration.
    pub fn with_overrides(self, higher: &VfxDirsConfig) -> Self {
        Self {
            config: self.config.merged(higher),
            ctx: self.ctx,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> &VfxDirsConfig {
        &self.config
    }

    /// Resolve `key` for `app`, accepting any key-like value.
    pub fn resolve(
        &self,
        app: &dyn VfxApp,
        key: impl Into<DirKey>,
        version: Option<&str>,
    ) -> Result<Resolved<PathBuf>> {
        app.resolve(&key.into(), &self.ctx, &self.config, version)
    }

    pub fn path(
        &self,
        app: &dyn VfxApp,
        key: impl Into<DirKey>,
        version: Option<&str>,
    ) -> Result<PathBuf> {
        self.resolve(app, key, version).map(|r| r.value)
    }
}
