//! Directory-kind identifiers.
//!
//! A [`DirKey`] names an abstract "kind of directory" (prefs, cache, logs, ...).
//! The nine well-known kinds are exposed as associated constants, but callers
//! may build keys from any string; all keys are normalized (trimmed and
//! lower-cased) so that `"Scripts"`, `" scripts "` and [`DirKey::SCRIPTS`]
//! compare equal and hash identically.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A normalized directory-kind identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirKey(Cow<'static, str>);

impl DirKey {
    pub const PREFS: DirKey = DirKey(Cow::Borrowed("prefs"));
    pub const CONFIG: DirKey = DirKey(Cow::Borrowed("config"));
    pub const DATA: DirKey = DirKey(Cow::Borrowed("data"));
    pub const CACHE: DirKey = DirKey(Cow::Borrowed("cache"));
    pub const LOGS: DirKey = DirKey(Cow::Borrowed("logs"));
    pub const TEMP: DirKey = DirKey(Cow::Borrowed("temp"));
    pub const SCRIPTS: DirKey = DirKey(Cow::Borrowed("scripts"));
    pub const PLUGINS: DirKey = DirKey(Cow::Borrowed("plugins"));
    pub const PACKAGES: DirKey = DirKey(Cow::Borrowed("packages"));

    /// All well-known keys, in declaration order.
    pub const ALL: [DirKey; 9] = [
        DirKey::PREFS,
        DirKey::CONFIG,
        DirKey::DATA,
        DirKey::CACHE,
        DirKey::LOGS,
        DirKey::TEMP,
        DirKey::SCRIPTS,
        DirKey::PLUGINS,
        DirKey::PACKAGES,
    ];

    /// Build a key from any string, normalizing it.
    ///
    /// Well-known spellings resolve to the borrowed constant so they never
    /// allocate twice.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = normalize_key(raw.as_ref());
        match Self::ALL.iter().find(|k| k.as_str() == normalized) {
            Some(known) => known.clone(),
            None => DirKey(Cow::Owned(normalized)),
        }
    }

    /// The normalized string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key is one of the nine well-known kinds.
    pub fn is_well_known(&self) -> bool {
        Self::ALL.iter().any(|k| k == self)
    }
}

/// Normalize a raw key string: trim surrounding whitespace, then lower-case.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl std::fmt::Display for DirKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DirKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DirKey::new(s))
    }
}

impl From<&str> for DirKey {
    fn from(raw: &str) -> Self {
        DirKey::new(raw)
    }
}

impl From<String> for DirKey {
    fn from(raw: String) -> Self {
        DirKey::new(raw)
    }
}

impl From<&String> for DirKey {
    fn from(raw: &String) -> Self {
        DirKey::new(raw)
    }
}

impl From<&DirKey> for DirKey {
    fn from(key: &DirKey) -> Self {
        key.clone()
    }
}

impl AsRef<str> for DirKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for DirKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
