//! vfxdirs - Per-application directory resolution for VFX/DCC tools.
//!
//! This library resolves where an application should keep its prefs, cache,
//! logs, scripts and other directories, honoring OS conventions, environment
//! variables and user overrides from layered TOML configuration files.
//!
//! The pipeline:
//! 1. [`Context`] captures OS and environment facts once.
//! 2. [`VfxDirsConfig`] parses override tables with `~`/`$VAR` expansion.
//! 3. Configuration layers are combined with [`merge`] / [`merge_all`].
//! 4. A [`VfxApp`] provider turns `(key, context, config)` into a path.

pub mod config;
pub mod context;
pub mod keys;
pub mod provider;

pub use config::{
    AppConfig, ConfigError, InstallOverride, RawNode, VfxDirsConfig, default_config_path,
    load_layers, merge, merge_all, supported_app_keys,
};
pub use context::{Context, ContextOverrides, Env, Os};
pub use keys::DirKey;
pub use provider::{PathSource, Resolved, Resolver, VfxApp};


/// Library-level error type for vfxdirs operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config {}: {source}", .path.display())]
    ReadConfig {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {}: {source}", .path.display())]
    Toml {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Could not determine home directory")]
    HomeNotFound,

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("App `{app}` cannot resolve directory key `{key}`")]
    UnsupportedKey { app: String, key: String },
}

/// Result type alias for vfxdirs operations.
pub type Result<T> = std::result::Result<T, Error>;
