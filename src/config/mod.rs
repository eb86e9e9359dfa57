//! Layered per-application override configuration.
//!
//! ## config.toml
//!
//! Located at:
//! - Default: `<config-home>/vfxdirs/config.toml`
//! - Explicit: the path named by `VFXDIRS_CONFIG` in the context's environment
//!
//! ```toml
//! [apps.maya]
//! base = "~/vfx/maya"
//!
//! [apps.maya.install]
//! root = "/opt/autodesk/maya2025"
//! executable = "$MAYA_LOCATION/bin/maya"
//!
//! [apps.maya.paths]
//! scripts = "${STUDIO_ROOT}/maya/scripts"
//! cache = "cache/maya"  # relative to this file's directory
//! ```
//!
//! ## Precedence
//!
//! Any number of sources can be layered in ascending precedence, e.g.
//! site file < user file < programmatic overrides. Per field, the higher
//! layer wins when it sets a value; `paths` tables are unioned key by key.
//!
//! Use the [`loader`] module to read files and [`merge_all`] to layer them.

pub mod expand;
pub mod loader;
pub mod parse;
pub mod raw;
pub mod schema;

pub use loader::{CONFIG_ENV_VAR, default_config_path, load_layers};
pub use raw::RawNode;
pub use schema::{
    AppConfig, InstallOverride, VfxDirsConfig, merge, merge_all, supported_app_keys,
};

/// Structural problems found while parsing a configuration document.
///
/// Every variant names the offending location so users can find it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{location}` must be a TOML table or object")]
    NotATable { location: String },

    #[error("`{location}` must be a string path but got {found}")]
    NotAString {
        location: String,
        found: &'static str,
    },

    #[error("`{location}` cannot be an empty path")]
    EmptyPath { location: String },

    #[error("app id cannot be empty")]
    EmptyAppId,
}

impl ConfigError {
    /// The dotted location of the problem, when there is one.
    pub fn location(&self) -> Option<&str> {
        match self {
            ConfigError::NotATable { location }
            | ConfigError::NotAString { location, .. }
            | ConfigError::EmptyPath { location } => Some(location),
            ConfigError::EmptyAppId => None,
        }
    }
}
