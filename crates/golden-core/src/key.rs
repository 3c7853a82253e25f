//! Golden keys and version splicing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier naming a golden artifact, relative to a base directory.
///
/// Keys are kept in URI-reference form: forward slashes, optional
/// percent-encoding. They are resolved as URL references against the base
/// directory, see [`PathResolver::to_file_path`].
///
/// [`PathResolver::to_file_path`]: crate::PathResolver::to_file_path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoldenKey(String);

impl GoldenKey {
    /// Create a key from its URI-reference form.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Full key as given by the caller.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extension of the key's final segment, including the leading dot.
    ///
    /// Empty when the final segment has no dot or only a leading one.
    pub fn extension(&self) -> &str {
        let trimmed = self.0.trim_end_matches('/');
        let file_name = match trimmed.rfind('/') {
            Some(idx) => &trimmed[idx + 1..],
            None => trimmed,
        };
        match file_name.rfind('.') {
            Some(idx) if idx > 0 => &file_name[idx..],
            _ => "",
        }
    }
}

impl fmt::Display for GoldenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoldenKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for GoldenKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for GoldenKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Splice a version number into a key, before its extension.
///
/// Returns the key unchanged when `version` is `None`. Otherwise every
/// occurrence of the extension token is removed from the key, then
/// `.{version}{extension}` is appended. The token is removed wherever it
/// appears, not only as a suffix: `a.png/b.png` at version 1 becomes
/// `a/b.1.png`. Existing goldens on disk were named this way, so the
/// behavior is kept as is.
///
/// # Examples
///
/// ```
/// use golden_core::{versioned_key, GoldenKey};
///
/// let key = GoldenKey::new("foo.png");
/// assert_eq!(versioned_key(&key, None), key);
/// assert_eq!(versioned_key(&key, Some(2)).as_str(), "foo.2.png");
/// ```
pub fn versioned_key(key: &GoldenKey, version: Option<u32>) -> GoldenKey {
    let Some(version) = version else {
        return key.clone();
    };

    let extension = key.extension();
    let stem: String = if extension.is_empty() {
        key.as_str().to_string()
    } else {
        key.as_str().split(extension).collect()
    };

    GoldenKey::new(format!("{stem}.{version}{extension}"))
}
