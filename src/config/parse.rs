//! Validation and expansion of raw configuration documents.
//!
//! A document either parses completely or not at all: the first structural
//! problem aborts the whole parse with a [`ConfigError`] naming its location.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::config::ConfigError;
use crate::config::expand::expand_path;
use crate::config::raw::RawNode;
use crate::config::schema::{AppConfig, InstallOverride, VfxDirsConfig, normalize_app_id};
use crate::context::{Context, ContextOverrides, Env};
use crate::keys::DirKey;

/// Where and how raw path strings get expanded.
struct PathExpander<'a> {
    home: &'a Path,
    env: &'a Env,
    base_dir: &'a Path,
}

impl PathExpander<'_> {
    fn parse<N: RawNode>(&self, raw: &N, location: &str) -> std::result::Result<PathBuf, ConfigError> {
        let Some(raw_str) = raw.as_str() else {
            return Err(ConfigError::NotAString {
                location: location.to_string(),
                found: raw.type_name(),
            });
        };

        let trimmed = raw_str.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyPath {
                location: location.to_string(),
            });
        }

        Ok(expand_path(trimmed, self.home, self.env, self.base_dir))
    }

    fn parse_optional<N: RawNode>(
        &self,
        raw: Option<&N>,
        location: &str,
    ) -> std::result::Result<Option<PathBuf>, ConfigError> {
        present(raw).map(|node| self.parse(node, location)).transpose()
    }
}

/// Treat an explicit null the same as a missing key.
fn present<N: RawNode>(node: Option<&N>) -> Option<&N> {
    node.filter(|n| !n.is_null())
}

fn require_table<'n, N: RawNode>(
    node: &'n N,
    location: &str,
) -> std::result::Result<Vec<(&'n str, &'n N)>, ConfigError> {
    node.entries().ok_or_else(|| ConfigError::NotATable {
        location: location.to_string(),
    })
}

impl VfxDirsConfig {
    /// Parse a pre-parsed nested mapping into a configuration tree.
    ///
    /// `base_dir` is the directory containing the config source; relative
    /// paths are resolved against it. A relative `base_dir` is itself taken
    /// relative to the context's working directory, so every parsed path is
    /// absolute. When `context` is `None` one is built
    /// from `env` (or the process environment). When `env` is `None` the
    /// context's environment snapshot is used for `$VAR` expansion.
    pub fn from_mapping<N: RawNode>(
        data: &N,
        base_dir: &Path,
        env: Option<&Env>,
        context: Option<&Context>,
    ) -> Result<Self> {
        require_table(data, "config root")?;

        let owned_ctx;
        let ctx = match context {
            Some(ctx) => ctx,
            None => {
                let overrides = ContextOverrides {
                    env: env.cloned(),
                    ..ContextOverrides::default()
                };
                owned_ctx = Context::from_env(&overrides)?;
                &owned_ctx
            }
        };

        let base_dir = if base_dir.is_absolute() {
            base_dir.to_path_buf()
        } else {
            ctx.cwd().join(base_dir)
        };

        let expander = PathExpander {
            home: ctx.home(),
            env: env.unwrap_or_else(|| ctx.env()),
            base_dir: &base_dir,
        };

        let Some(raw_apps) = present(data.get("apps")) else {
            return Ok(VfxDirsConfig::new());
        };

        let mut apps = BTreeMap::new();
        for (raw_id, raw_app) in require_table(raw_apps, "apps")? {
            let app_id = normalize_app_id(raw_id)?;
            let app = parse_app(&expander, &app_id, raw_app)?;
            apps.insert(app_id, app);
        }

        tracing::debug!(apps = apps.len(), base_dir = %base_dir.display(), "parsed config");
        Ok(VfxDirsConfig::from_apps(apps)?)
    }
}

fn parse_app<N: RawNode>(
    expander: &PathExpander<'_>,
    app_id: &str,
    raw_app: &N,
) -> std::result::Result<AppConfig, ConfigError> {
    let location = format!("apps.{app_id}");
    require_table(raw_app, &location)?;

    let base = expander.parse_optional(raw_app.get("base"), &format!("{location}.base"))?;

    // Install overrides are carried but not consumed until install discovery exists
    let install = match present(raw_app.get("install")) {
        Some(raw_install) => {
            let install_location = format!("{location}.install");
            require_table(raw_install, &install_location)?;
            InstallOverride::new(
                expander.parse_optional(
                    raw_install.get("root"),
                    &format!("{install_location}.root"),
                )?,
                expander.parse_optional(
                    raw_install.get("executable"),
                    &format!("{install_location}.executable"),
                )?,
            )
        }
        None => InstallOverride::default(),
    };

    let mut paths: Vec<(DirKey, PathBuf)> = Vec::new();
    if let Some(raw_paths) = present(raw_app.get("paths")) {
        let paths_location = format!("{location}.paths");
        for (raw_key, raw_value) in require_table(raw_paths, &paths_location)? {
            let path = expander.parse(raw_value, &format!("{paths_location}.{raw_key}"))?;
            paths.push((DirKey::new(raw_key), path));
        }
    }

    Ok(AppConfig::new(base, install, paths))
}
