//! Path string expansion for configuration values.
//!
//! Applied in order to every raw path value:
//! 1. a leading `~`, `~/` or `~\` becomes the home directory
//! 2. `$NAME` and `${NAME}` are replaced from the environment snapshot
//! 3. relative results are joined under the config file's directory
//!
//! Unresolved environment references are left verbatim. `$$` stands for a
//! literal `$`, which is how [`escape_dollars`] keeps dumped paths stable.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::context::Env;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\$|\$(\w+)|\$\{([^}]+)\}").expect("Invalid regex"))
}

/// Expand a leading tilde to `home`.
///
/// Only `~` alone or followed by a separator is expanded; `~user` is not.
pub fn expand_user(value: &str, home: &Path) -> String {
    if value == "~" {
        return home.to_string_lossy().into_owned();
    }
    if value.starts_with("~/") || value.starts_with("~\\") {
        return format!("{}{}", home.to_string_lossy(), &value[1..]);
    }
    value.to_string()
}

/// Replace `$NAME` / `${NAME}` references with values from `env`.
pub fn expand_env_vars(value: &str, env: &Env) -> String {
    env_var_pattern()
        .replace_all(value, |caps: &Captures| {
            let whole = &caps[0];
            if whole == "$$" {
                return "$".to_string();
            }
            let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            match name.and_then(|n| env.get(n)) {
                Some(resolved) => resolved.clone(),
                None => {
                    tracing::trace!(reference = whole, "leaving unresolved env reference");
                    whole.to_string()
                }
            }
        })
        .into_owned()
}

/// Double every `$` so [`expand_env_vars`] reads the text back unchanged.
pub fn escape_dollars(value: &str) -> String {
    value.replace('$', "$$")
}

/// Run the full expansion on an already trimmed, non-empty path string.
pub fn expand_path(raw: &str, home: &Path, env: &Env, base_dir: &Path) -> PathBuf {
    let expanded = expand_env_vars(&expand_user(raw, home), env);
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}
