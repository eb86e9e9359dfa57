//! Override tree types and the layering merge.
//!
//! This module provides:
//! - [`InstallOverride`], [`AppConfig`] and [`VfxDirsConfig`]
//! - Normalization of app ids and directory keys at construction
//! - Pure merge functions, composed bottom-up (install, app, whole tree)

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ConfigError;
use crate::keys::DirKey;

/// Install location overrides for a single application.
///
/// Carried through parsing and merging; nothing consumes these yet because
/// install discovery is not implemented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallOverride {
    /// Installation root directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Main executable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
}

impl InstallOverride {
    pub fn new(root: Option<PathBuf>, executable: Option<PathBuf>) -> Self {
        Self { root, executable }
    }

    /// True when neither field is set.
    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.executable.is_none()
    }

    /// Return a new override where each field of `higher` wins if set.
    pub fn merged(&self, higher: &InstallOverride) -> InstallOverride {
        InstallOverride {
            root: higher.root.clone().or_else(|| self.root.clone()),
            executable: higher
                .executable
                .clone()
                .or_else(|| self.executable.clone()),
        }
    }
}

/// Per-app overrides.
///
/// The `paths` keys are normalized on insertion, so two spellings of the same
/// key collide and lookups never re-normalize stored keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<PathBuf>,

    #[serde(skip_serializing_if = "InstallOverride::is_empty")]
    install: InstallOverride,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    paths: BTreeMap<DirKey, PathBuf>,
}

impl AppConfig {
    /// Build an app config. Later entries in `paths` win on key collision.
    pub fn new<K, I>(base: Option<PathBuf>, install: InstallOverride, paths: I) -> Self
    where
        K: Into<DirKey>,
        I: IntoIterator<Item = (K, PathBuf)>,
    {
        Self {
            base,
            install,
            paths: paths.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Set the base directory override.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Set the install override.
    pub fn with_install(mut self, install: InstallOverride) -> Self {
        self.install = install;
        self
    }

    /// Add a per-key path override.
    pub fn with_path(mut self, key: impl Into<DirKey>, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(key.into(), path.into());
        self
    }

    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    pub fn install(&self) -> &InstallOverride {
        &self.install
    }

    pub fn paths(&self) -> &BTreeMap<DirKey, PathBuf> {
        &self.paths
    }

    /// Look up a per-key override; `key` is normalized first.
    pub fn path_override(&self, key: impl Into<DirKey>) -> Option<&Path> {
        self.paths.get(&key.into()).map(PathBuf::as_path)
    }

    /// True when no override of any kind is set.
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.install.is_empty() && self.paths.is_empty()
    }

    /// Return a new config where `higher` takes precedence over `self`.
    pub fn merged(&self, higher: &AppConfig) -> AppConfig {
        let mut paths = self.paths.clone();
        paths.extend(higher.paths.iter().map(|(k, v)| (k.clone(), v.clone())));

        AppConfig {
            base: higher.base.clone().or_else(|| self.base.clone()),
            install: self.install.merged(&higher.install),
            paths,
        }
    }
}

/// Top-level configuration with per-app override tables.
///
/// App ids are trimmed and lower-cased at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VfxDirsConfig {
    apps: BTreeMap<String, AppConfig>,
}

impl VfxDirsConfig {
    /// An empty configuration (the merge identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(app id, config)` pairs. Later pairs win when ids
    /// normalize equal.
    pub fn from_apps<S, I>(apps: I) -> Result<Self, ConfigError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, AppConfig)>,
    {
        let mut normalized = BTreeMap::new();
        for (app_id, cfg) in apps {
            normalized.insert(normalize_app_id(app_id.as_ref())?, cfg);
        }
        Ok(Self { apps: normalized })
    }

    /// Add or replace one app's overrides.
    pub fn with_app(mut self, app_id: &str, cfg: AppConfig) -> Result<Self, ConfigError> {
        self.apps.insert(normalize_app_id(app_id)?, cfg);
        Ok(self)
    }

    pub fn apps(&self) -> &BTreeMap<String, AppConfig> {
        &self.apps
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Look up an app's overrides; `app_id` is normalized first.
    ///
    /// Returns `None` for ids that are empty after trimming.
    pub fn app(&self, app_id: &str) -> Option<&AppConfig> {
        let id = normalize_app_id(app_id).ok()?;
        self.apps.get(&id)
    }

    /// Look up a per-key override for an app.
    pub fn path_override(&self, app_id: &str, key: impl Into<DirKey>) -> Option<&Path> {
        self.app(app_id)?.path_override(key)
    }

    /// Return a new config where `higher` takes precedence over `self`.
    pub fn merged(&self, higher: &VfxDirsConfig) -> VfxDirsConfig {
        let mut apps = self.apps.clone();
        for (app_id, higher_app) in &higher.apps {
            let merged = match apps.get(app_id) {
                Some(lower_app) => lower_app.merged(higher_app),
                None => higher_app.clone(),
            };
            apps.insert(app_id.clone(), merged);
        }
        VfxDirsConfig { apps }
    }

    /// Like [`merged`](Self::merged), treating `None` as the empty tree.
    pub fn merged_opt(&self, higher: Option<&VfxDirsConfig>) -> VfxDirsConfig {
        match higher {
            Some(higher) => self.merged(higher),
            None => self.clone(),
        }
    }
}

/// Combine two trees; `higher` wins on conflicts.
pub fn merge(lower: &VfxDirsConfig, higher: &VfxDirsConfig) -> VfxDirsConfig {
    lower.merged(higher)
}

/// Fold any number of trees given in ascending precedence.
pub fn merge_all<I>(layers: I) -> VfxDirsConfig
where
    I: IntoIterator<Item = VfxDirsConfig>,
{
    layers
        .into_iter()
        .fold(VfxDirsConfig::new(), |acc, layer| acc.merged(&layer))
}

/// Trim and lower-case an app id, rejecting empty ids.
pub fn normalize_app_id(app_id: &str) -> Result<String, ConfigError> {
    let id = app_id.trim().to_lowercase();
    if id.is_empty() {
        return Err(ConfigError::EmptyAppId);
    }
    Ok(id)
}

/// The well-known keys an app has per-key overrides for. Custom keys are
/// excluded.
pub fn supported_app_keys(config: &VfxDirsConfig, app_id: &str) -> BTreeSet<DirKey> {
    match config.app(app_id) {
        Some(app) => app
            .paths()
            .keys()
            .filter(|k| k.is_well_known())
            .cloned()
            .collect(),
        None => BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::p;

    fn tree(app: &str, cfg: AppConfig) -> VfxDirsConfig {
        VfxDirsConfig::new().with_app(app, cfg).unwrap()
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_app_id_normalized() {
        assert_eq!(normalize_app_id("  Maya ").unwrap(), "maya");
        assert_eq!(normalize_app_id("maya").unwrap(), "maya");
        assert_eq!(normalize_app_id("   "), Err(ConfigError::EmptyAppId));
    }

    #[test]
    fn test_lookups_normalize_input() {
        let cfg = tree("Houdini", AppConfig::default().with_path("Scripts", "/s"));
        assert!(cfg.app(" HOUDINI ").is_some());
        assert_eq!(cfg.path_override("houdini", DirKey::SCRIPTS), Some(Path::new("/s")));
        assert_eq!(cfg.path_override("houdini", " scripts "), Some(Path::new("/s")));
        assert!(cfg.app("").is_none());
    }

    #[test]
    fn test_paths_keys_collide_after_normalization() {
        let app = AppConfig::new(
            None,
            InstallOverride::default(),
            [("Cache", p("/first")), ("cache ", p("/second"))],
        );
        assert_eq!(app.paths().len(), 1);
        assert_eq!(app.path_override(DirKey::CACHE), Some(Path::new("/second")));
    }

    #[test]
    fn test_from_apps_rejects_empty_id() {
        let result = VfxDirsConfig::from_apps([(" ", AppConfig::default())]);
        assert_eq!(result, Err(ConfigError::EmptyAppId));
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_merge_identity() {
        let t = tree(
            "maya",
            AppConfig::default()
                .with_base("/b")
                .with_path(DirKey::CACHE, "/c"),
        );
        let empty = VfxDirsConfig::new();
        assert_eq!(merge(&t, &empty), t);
        assert_eq!(merge(&empty, &t), t);
        assert_eq!(t.merged_opt(None), t);
    }

    #[test]
    fn test_merge_base_precedence() {
        let lower = tree("maya", AppConfig::default().with_base("/lower"));
        let higher = tree("maya", AppConfig::default().with_base("/higher"));
        let merged = merge(&lower, &higher);
        assert_eq!(merged.app("maya").unwrap().base(), Some(Path::new("/higher")));

        let higher_without_base = tree("maya", AppConfig::default().with_path("logs", "/l"));
        let merged = merge(&lower, &higher_without_base);
        assert_eq!(merged.app("maya").unwrap().base(), Some(Path::new("/lower")));
    }

    #[test]
    fn test_merge_path_union() {
        let lower = tree("maya", AppConfig::default().with_path(DirKey::CACHE, "/a"));
        let higher = tree("maya", AppConfig::default().with_path(DirKey::LOGS, "/b"));
        let merged = merge(&lower, &higher);

        let expected: BTreeMap<DirKey, PathBuf> =
            [(DirKey::CACHE, p("/a")), (DirKey::LOGS, p("/b"))].into();
        assert_eq!(merged.app("maya").unwrap().paths(), &expected);

        let higher_cache = tree("maya", AppConfig::default().with_path("cache", "/z"));
        let merged = merge(&lower, &higher_cache);
        assert_eq!(merged.path_override("maya", DirKey::CACHE), Some(Path::new("/z")));
    }

    #[test]
    fn test_merge_install_fields_independent() {
        let lower = tree(
            "nuke",
            AppConfig::default().with_install(InstallOverride::new(
                Some(p("/opt/nuke")),
                Some(p("/opt/nuke/Nuke")),
            )),
        );
        let higher = tree(
            "nuke",
            AppConfig::default().with_install(InstallOverride::new(None, Some(p("/usr/bin/nuke")))),
        );
        let install = merge(&lower, &higher).app("nuke").unwrap().install().clone();
        assert_eq!(install.root, Some(p("/opt/nuke")));
        assert_eq!(install.executable, Some(p("/usr/bin/nuke")));
    }

    #[test]
    fn test_merge_app_union() {
        let lower = tree("maya", AppConfig::default().with_base("/m"));
        let higher = tree("nuke", AppConfig::default().with_base("/n"));
        let merged = merge(&lower, &higher);
        assert_eq!(merged.apps().len(), 2);
        assert_eq!(merged.app("maya"), lower.app("maya"));
        assert_eq!(merged.app("nuke"), higher.app("nuke"));
    }

    #[test]
    fn test_merge_is_associative() {
        let a = tree(
            "maya",
            AppConfig::default()
                .with_base("/a")
                .with_path("cache", "/a/cache")
                .with_path("logs", "/a/logs"),
        );
        let b = tree(
            "maya",
            AppConfig::default()
                .with_path("cache", "/b/cache")
                .with_install(InstallOverride::new(Some(p("/b/root")), None)),
        )
        .with_app("nuke", AppConfig::default().with_base("/b/nuke"))
        .unwrap();
        let c = tree(
            "maya",
            AppConfig::default()
                .with_base("/c")
                .with_install(InstallOverride::new(None, Some(p("/c/exe")))),
        )
        .with_app("nuke", AppConfig::default().with_path("scripts", "/c/s"))
        .unwrap();

        assert_eq!(merge(&merge(&a, &b), &c), merge(&a, &merge(&b, &c)));
        assert_eq!(merge_all([a.clone(), b.clone(), c.clone()]), merge(&merge(&a, &b), &c));
    }

    #[test]
    fn test_merge_is_not_commutative() {
        let lower = tree("maya", AppConfig::default().with_base("/lower"));
        let higher = tree("maya", AppConfig::default().with_base("/higher"));
        assert_ne!(merge(&lower, &higher), merge(&higher, &lower));
    }

    #[test]
    fn test_merge_leaves_inputs_untouched() {
        let lower = tree("maya", AppConfig::default().with_path("cache", "/a"));
        let higher = tree("maya", AppConfig::default().with_path("cache", "/b"));
        let snapshot = lower.clone();
        let _ = merge(&lower, &higher);
        assert_eq!(lower, snapshot);
    }

    #[test]
    fn test_merge_all_empty_is_identity() {
        assert!(merge_all(Vec::<VfxDirsConfig>::new()).is_empty());
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_supported_app_keys_excludes_custom() {
        let cfg = tree(
            "maya",
            AppConfig::default()
                .with_path("scripts", "/s")
                .with_path("Shelves", "/sh"),
        );
        let keys = supported_app_keys(&cfg, "MAYA");
        assert_eq!(keys, BTreeSet::from([DirKey::SCRIPTS]));
        assert!(supported_app_keys(&cfg, "nuke").is_empty());
    }
}
