//! OS and environment facts used during path resolution.
//!
//! A [`Context`] is captured once per resolution session and never mutated.
//! Everything downstream (config parsing, providers) reads OS conventions
//! from it instead of probing the process environment directly, so tests can
//! substitute a fully synthetic context.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{Error, Result};

/// Snapshot of environment variables.
pub type Env = HashMap<String, String>;

/// Operating systems with known directory conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
}

impl Os {
    /// Parse from a tag, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "linux" => Some(Os::Linux),
            "macos" => Some(Os::MacOs),
            "windows" => Some(Os::Windows),
            _ => None,
        }
    }

    /// Convert to tag representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::MacOs => "macos",
            Os::Windows => "windows",
        }
    }

    /// Detect the OS this binary was compiled for.
    pub fn detect() -> Result<Self> {
        Self::parse(std::env::consts::OS)
            .ok_or_else(|| Error::UnsupportedPlatform(std::env::consts::OS.to_string()))
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional inputs replacing the values [`Context::from_env`] would read from the process
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    /// Environment snapshot (defaults to the process environment)
    pub env: Option<Env>,
    /// OS tag (defaults to the compile target)
    pub os: Option<Os>,
    /// Home directory
    pub home: Option<PathBuf>,
    /// Working directory
    pub cwd: Option<PathBuf>,
}

impl ContextOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the environment snapshot.
    pub fn with_env<K, V>(mut self, env: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(env.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Set the OS.
    pub fn with_os(mut self, os: Os) -> Self {
        self.os = Some(os);
        self
    }

    /// Set the home directory.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Set the working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Immutable snapshot of OS identity and environment-derived directories.
#[derive(Debug, Clone)]
pub struct Context {
    os: Os,
    env: Arc<Env>,
    home: PathBuf,
    cwd: PathBuf,
    temp_dir: PathBuf,
    config_home: PathBuf,
    data_home: PathBuf,
    cache_home: PathBuf,
    install_roots: Arc<[PathBuf]>,
}

impl Context {
    /// Build a context from the process environment with no overrides.
    pub fn detect() -> Result<Self> {
        Self::from_env(&ContextOverrides::default())
    }

    /// Build a context, preferring each override over probing.
    pub fn from_env(overrides: &ContextOverrides) -> Result<Self> {
        let env = match &overrides.env {
            Some(env) => env.clone(),
            None => process_env(),
        };

        let os = match overrides.os {
            Some(os) => os,
            None => Os::detect()?,
        };

        let home = match &overrides.home {
            Some(home) => home.clone(),
            None => home_from_env(os, &env)?,
        };

        let cwd = match &overrides.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir()?,
        };

        let temp_dir = std::env::temp_dir();

        let (config_home, data_home, cache_home, install_roots) = match os {
            Os::Linux => (
                env_path(&env, "XDG_CONFIG_HOME").unwrap_or_else(|| home.join(".config")),
                env_path(&env, "XDG_DATA_HOME")
                    .unwrap_or_else(|| home.join(".local").join("share")),
                env_path(&env, "XDG_CACHE_HOME").unwrap_or_else(|| home.join(".cache")),
                vec![
                    PathBuf::from("/opt"),
                    PathBuf::from("/usr/local"),
                    PathBuf::from("/usr"),
                ],
            ),
            Os::MacOs => {
                let library = home.join("Library");
                let support = library.join("Application Support");
                (
                    support.clone(),
                    support,
                    library.join("Caches"),
                    vec![
                        PathBuf::from("/Applications"),
                        PathBuf::from("/Applications/Utilities"),
                    ],
                )
            }
            Os::Windows => {
                let roaming = env_path(&env, "APPDATA")
                    .unwrap_or_else(|| home.join("AppData").join("Roaming"));
                let local = env_path(&env, "LOCALAPPDATA")
                    .unwrap_or_else(|| home.join("AppData").join("Local"));

                let mut roots: Vec<PathBuf> = ["ProgramFiles", "ProgramW6432", "ProgramFiles(x86)"]
                    .iter()
                    .filter_map(|name| env_path(&env, name))
                    .collect();
                if roots.is_empty() {
                    roots.push(PathBuf::from("C:/Program Files"));
                }
                (roaming.clone(), roaming, local, roots)
            }
        };

        tracing::debug!(os = %os, home = %home.display(), "built resolution context");

        Ok(Self {
            os,
            env: Arc::new(env),
            home,
            cwd,
            temp_dir,
            config_home,
            data_home,
            cache_home,
            install_roots: install_roots.into(),
        })
    }

    pub fn os(&self) -> Os {
        self.os
    }

    /// The environment snapshot this context was built from.
    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Per-user configuration root (XDG config home, Application Support, Roaming).
    pub fn config_home(&self) -> &Path {
        &self.config_home
    }

    /// Per-user data root.
    pub fn data_home(&self) -> &Path {
        &self.data_home
    }

    /// Per-user cache root.
    pub fn cache_home(&self) -> &Path {
        &self.cache_home
    }

    /// Conventional install prefixes, most preferred first.
    pub fn install_roots(&self) -> &[PathBuf] {
        &self.install_roots
    }
}

fn process_env() -> Env {
    std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

/// Look up a variable, treating empty values as unset.
fn env_path(env: &Env, name: &str) -> Option<PathBuf> {
    env.get(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn home_from_env(os: Os, env: &Env) -> Result<PathBuf> {
    let var = match os {
        Os::Windows => "USERPROFILE",
        Os::Linux | Os::MacOs => "HOME",
    };
    env_path(env, var)
        .or_else(dirs::home_dir)
        .ok_or(Error::HomeNotFound)
}
