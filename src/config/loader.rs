//! Reading configuration files from disk.
//!
//! A missing file means "no overrides" for [`VfxDirsConfig::load`]; a file
//! that exists but fails to read or parse is always an error.

use std::path::{Path, PathBuf};

use crate::config::expand::escape_dollars;
use crate::config::schema::{VfxDirsConfig, merge_all};
use crate::context::{Context, Env};
use crate::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "VFXDIRS_CONFIG";

/// Directory name under the OS config home.
const PRODUCT_DIR: &str = "vfxdirs";

/// Return the OS-appropriate default config file path.
///
/// `VFXDIRS_CONFIG` in the context's environment takes precedence over
/// `<config-home>/vfxdirs/config.toml`. A relative `VFXDIRS_CONFIG` is taken
/// relative to the context's working directory.
pub fn default_config_path(ctx: &Context) -> PathBuf {
    match ctx.env().get(CONFIG_ENV_VAR).filter(|v| !v.trim().is_empty()) {
        Some(explicit) => ctx.cwd().join(explicit.trim()),
        None => ctx.config_home().join(PRODUCT_DIR).join("config.toml"),
    }
}

impl VfxDirsConfig {
    /// Parse TOML text. Relative paths resolve against `base_dir`, which is
    /// also reported as the source in syntax errors.
    pub fn from_toml_str(
        text: &str,
        base_dir: &Path,
        env: Option<&Env>,
        context: Option<&Context>,
    ) -> Result<Self> {
        let table: toml::Table = toml::from_str(text).map_err(|source| Error::Toml {
            path: base_dir.to_path_buf(),
            source,
        })?;
        Self::from_mapping(&toml::Value::Table(table), base_dir, env, context)
    }

    /// Read and parse a config file. Fails if the file does not exist.
    pub fn from_file(
        path: impl AsRef<Path>,
        env: Option<&Env>,
        context: Option<&Context>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let table: toml::Table = toml::from_str(&text).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_mapping(&toml::Value::Table(table), base_dir, env, context)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields `None`.
    pub fn load(
        path: impl AsRef<Path>,
        env: Option<&Env>,
        context: Option<&Context>,
    ) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, no overrides");
            return Ok(None);
        }
        let config = Self::from_file(path, env, context)?;
        tracing::debug!(path = %path.display(), apps = config.apps().len(), "loaded config");
        Ok(Some(config))
    }

    /// Load the config at [`default_config_path`].
    pub fn load_default(ctx: &Context, env: Option<&Env>) -> Result<Option<Self>> {
        Self::load(default_config_path(ctx), env, Some(ctx))
    }

    /// Serialize this tree back to TOML with fully expanded paths.
    ///
    /// Every `$` left in a path (an unresolved reference, or a literal one)
    /// is written as `$$`, so loading the dump yields the same tree whatever
    /// the loading environment holds.
    pub fn to_toml_string(&self) -> Result<String> {
        let mut value = toml::Value::try_from(self)?;
        escape_strings(&mut value);
        Ok(toml::to_string(&value)?)
    }
}

fn escape_strings(value: &mut toml::Value) {
    match value {
        toml::Value::String(s) => *s = escape_dollars(s),
        toml::Value::Table(table) => table.iter_mut().for_each(|(_, v)| escape_strings(v)),
        toml::Value::Array(items) => items.iter_mut().for_each(escape_strings),
        _ => {}
    }
}

/// Load every existing file in `paths` (ascending precedence) and merge them.
///
/// Missing files are skipped; the first malformed file aborts.
pub fn load_layers<P: AsRef<Path>>(paths: &[P], ctx: &Context) -> Result<VfxDirsConfig> {
    let mut layers = Vec::with_capacity(paths.len());
    for path in paths {
        if let Some(layer) = VfxDirsConfig::load(path, None, Some(ctx))? {
            layers.push(layer);
        }
    }
    Ok(merge_all(layers))
}
