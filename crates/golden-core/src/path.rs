//! Path styles and golden path resolution.
//!
//! Test locations and golden keys are handled as `file:` URLs: keys are
//! joined onto the URL of the test's directory and the result is turned back
//! into a path of the chosen [`PathStyle`]. Path handling is string based so
//! that either style can be exercised on any host. Only the final
//! [`PathBuf`] handed to the file system is platform specific.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{versioned_key, Error, GoldenKey, Result};

/// Characters escaped inside a single `file://` URI path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// File system path conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// `/` separated, rooted at `/`
    Posix,
    /// `\` separated (`/` also accepted), rooted at a drive or UNC share
    Windows,
}

impl PathStyle {
    /// Style of the host platform.
    pub fn platform() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    /// Get the style name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            PathStyle::Posix => "posix",
            PathStyle::Windows => "windows",
        }
    }

    /// Preferred separator.
    pub fn separator(&self) -> char {
        match self {
            PathStyle::Posix => '/',
            PathStyle::Windows => '\\',
        }
    }

    /// Check if `c` separates path components in this style.
    pub fn is_separator(&self, c: char) -> bool {
        match self {
            PathStyle::Posix => c == '/',
            PathStyle::Windows => c == '/' || c == '\\',
        }
    }

    /// Length of the root prefix of `path` (`/`, `C:\`, `\\server\share\`).
    fn root_len(&self, path: &str) -> usize {
        let bytes = path.as_bytes();
        let is_sep = |b: u8| self.is_separator(b as char);

        match self {
            PathStyle::Posix => usize::from(bytes.first() == Some(&b'/')),
            PathStyle::Windows => {
                if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
                    if bytes.len() >= 3 && is_sep(bytes[2]) {
                        3
                    } else {
                        2
                    }
                } else if bytes.len() >= 2 && is_sep(bytes[0]) && is_sep(bytes[1]) {
                    // \\server\share\
                    let mut seps_seen = 0;
                    for (i, &b) in bytes.iter().enumerate().skip(2) {
                        if is_sep(b) {
                            seps_seen += 1;
                            if seps_seen == 2 {
                                return i + 1;
                            }
                        }
                    }
                    bytes.len()
                } else {
                    usize::from(bytes.first().is_some_and(|&b| is_sep(b)))
                }
            }
        }
    }

    /// Check if `path` is absolute in this style.
    pub fn is_absolute(&self, path: &str) -> bool {
        self.root_len(path) > 0
    }

    /// Containing directory of `path`, without a trailing separator.
    ///
    /// Returns the root itself for entries directly under it and `.` for a
    /// bare file name.
    pub fn dirname(&self, path: &str) -> String {
        let root = self.root_len(path);
        let body = path[root..].trim_end_matches(|c: char| self.is_separator(c));

        match body.rfind(|c: char| self.is_separator(c)) {
            None if root > 0 => path[..root].to_string(),
            None => ".".to_string(),
            Some(idx) => {
                let dir = path[root..root + idx].trim_end_matches(|c: char| self.is_separator(c));
                format!("{}{}", &path[..root], dir)
            }
        }
    }

    /// Join `relative` onto `base`. An absolute `relative` replaces `base`.
    pub fn join(&self, base: &str, relative: &str) -> String {
        if relative.is_empty() {
            return base.to_string();
        }
        if base.is_empty() || self.is_absolute(relative) {
            return relative.to_string();
        }
        if base.ends_with(|c: char| self.is_separator(c)) {
            format!("{base}{relative}")
        } else {
            format!("{base}{}{relative}", self.separator())
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::platform()
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// Directory goldens are resolved against.
///
/// Always absolute and ends with a separator, so a relative key joins
/// directly onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirectory {
    path: String,
    url: Url,
    style: PathStyle,
}

impl BaseDirectory {
    /// Directory path, with trailing separator.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Directory as a `file:` URL, with trailing `/`.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path style the directory was resolved with.
    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// Directory as a host path.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Directory as a `file://` URI string.
    pub fn to_uri(&self) -> String {
        self.url.as_str().to_string()
    }
}

impl fmt::Display for BaseDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Maps test locations and golden keys to file system paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathResolver {
    style: PathStyle,
}

impl PathResolver {
    /// Create a resolver for `style`.
    pub fn new(style: PathStyle) -> Self {
        Self { style }
    }

    /// Resolver for the host platform.
    pub fn platform() -> Self {
        Self::new(PathStyle::platform())
    }

    /// Path style in use.
    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// Directory containing `test_file`.
    ///
    /// `test_file` is a `file:` URL or an absolute path in this resolver's
    /// style.
    pub fn resolve_base(&self, test_file: &str) -> Result<BaseDirectory> {
        if test_file.trim().is_empty() {
            return Err(Error::InvalidTestLocation(
                "test file location is empty".to_string(),
            ));
        }

        // Drive paths such as `C:\x` parse with a one letter scheme.
        let file_path = match Url::parse(test_file) {
            Ok(url) if url.scheme() == "file" => {
                self.url_to_path(&url, Error::InvalidTestLocation)?
            }
            _ => test_file.to_string(),
        };

        if !self.style.is_absolute(&file_path) {
            return Err(Error::InvalidTestLocation(format!(
                "{test_file}: test file location must be absolute"
            )));
        }

        let mut path = self.style.dirname(&file_path);
        if !path.ends_with(|c: char| self.style.is_separator(c)) {
            path.push(self.style.separator());
        }
        let url = self.dir_url(&path)?;

        debug!(test_file, base = %path, "Resolved golden base directory");
        Ok(BaseDirectory {
            path,
            url,
            style: self.style,
        })
    }

    /// Key with `version` spliced in before the extension.
    pub fn apply_version(&self, key: &GoldenKey, version: Option<u32>) -> GoldenKey {
        versioned_key(key, version)
    }

    /// Path of the golden `key` under `base`.
    ///
    /// The key is a URL reference: it may be relative, root relative or a
    /// `file:` URL, and its query and fragment are ignored.
    pub fn to_file_path(&self, base: &BaseDirectory, key: &GoldenKey) -> Result<PathBuf> {
        let url = self.key_url(base, key)?;
        let path = self.url_to_path(&url, Error::InvalidKey)?;
        debug!(key = %key, path = %path, "Resolved golden file path");
        Ok(PathBuf::from(path))
    }

    /// Decoded last path segment of the golden `key` under `base`.
    pub fn file_name(&self, base: &BaseDirectory, key: &GoldenKey) -> Result<String> {
        let url = self.key_url(base, key)?;
        let path = self.url_to_path(&url, Error::InvalidKey)?;
        let name = path
            .rsplit(|c: char| self.style.is_separator(c))
            .next()
            .unwrap_or_default();
        Ok(name.to_string())
    }

    fn key_url(&self, base: &BaseDirectory, key: &GoldenKey) -> Result<Url> {
        base.url
            .join(key.as_str())
            .map_err(|e| Error::InvalidKey(format!("{key}: {e}")))
    }

    /// Path named by a `file:` URL. `invalid` builds the error for URLs
    /// that have no path in this style.
    fn url_to_path(&self, url: &Url, invalid: fn(String) -> Error) -> Result<String> {
        if url.scheme() != "file" {
            return Err(invalid(format!("{url}: not a file URL")));
        }

        let segments = url
            .path_segments()
            .ok_or_else(|| invalid(format!("{url}: URL has no path")))?
            .map(|segment| -> Result<String> {
                let decoded = percent_decode_str(segment)
                    .decode_utf8()
                    .map(Cow::into_owned)
                    .map_err(|_| invalid(format!("{url}: path is not valid UTF-8")))?;
                if decoded.contains(|c: char| self.style.is_separator(c)) {
                    return Err(invalid(format!("{url}: path segment contains a separator")));
                }
                Ok(decoded)
            })
            .collect::<Result<Vec<_>>>()?;

        let host = url.host_str().unwrap_or_default();
        match self.style {
            PathStyle::Posix => {
                if !host.is_empty() {
                    return Err(invalid(format!(
                        "{url}: host '{host}' has no posix path"
                    )));
                }
                Ok(format!("/{}", segments.join("/")))
            }
            PathStyle::Windows => {
                let body = segments.join("\\");
                if !host.is_empty() {
                    Ok(format!("\\\\{host}\\{body}"))
                } else if segments.first().is_some_and(|s| is_drive(s)) {
                    Ok(body)
                } else {
                    Ok(format!("\\{body}"))
                }
            }
        }
    }

    /// `file:` URL of the absolute directory `dir`.
    fn dir_url(&self, dir: &str) -> Result<Url> {
        let is_sep = |c: char| self.style.is_separator(c);
        let trimmed = dir.trim_start_matches(is_sep);
        let unc = self.style == PathStyle::Windows && dir.len() - trimmed.len() >= 2;

        let (host, rest) = match trimmed.find(is_sep) {
            Some(idx) if unc => (&trimmed[..idx], &trimmed[idx + 1..]),
            None if unc => (trimmed, ""),
            _ => ("", trimmed),
        };

        let encoded = rest
            .split(is_sep)
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");

        Url::parse(&format!("file://{host}/{encoded}"))
            .map_err(|e| Error::InvalidTestLocation(format!("{dir}: {e}")))
    }
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posix() -> PathResolver {
        PathResolver::new(PathStyle::Posix)
    }

    fn windows() -> PathResolver {
        PathResolver::new(PathStyle::Windows)
    }

    fn resolve(resolver: PathResolver, test_file: &str, key: &str) -> Result<PathBuf> {
        let base = resolver.resolve_base(test_file)?;
        resolver.to_file_path(&base, &GoldenKey::new(key))
    }

    #[test]
    fn test_resolve_base_posix() {
        let base = posix().resolve_base("/a/b/test.rs").unwrap();
        assert_eq!(base.as_str(), "/a/b/");
        assert_eq!(base.to_uri(), "file:///a/b/");
        assert_eq!(base.style(), PathStyle::Posix);
    }

    #[test]
    fn test_resolve_base_file_uri() {
        let base = posix().resolve_base("file:///a/b%20c/test.rs").unwrap();
        assert_eq!(base.as_str(), "/a/b c/");
        assert_eq!(base.to_uri(), "file:///a/b%20c/");
    }

    #[test]
    fn test_resolve_base_single_slash_file_uri() {
        let base = posix().resolve_base("file:/a/b/test.dart").unwrap();
        assert_eq!(base.as_str(), "/a/b/");
        assert_eq!(
            resolve(posix(), "file:/a/b/test.dart", "c.png").unwrap(),
            PathBuf::from("/a/b/c.png")
        );
    }

    #[test]
    fn test_resolve_base_at_root() {
        let base = posix().resolve_base("/test.rs").unwrap();
        assert_eq!(base.as_str(), "/");
        assert_eq!(base.to_uri(), "file:///");
    }

    #[test]
    fn test_posix_rejects_file_uri_host() {
        let err = posix()
            .resolve_base("file://server/share/test.rs")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTestLocation(_)));
    }

    #[test]
    fn test_empty_test_location() {
        assert!(matches!(
            posix().resolve_base("  ").unwrap_err(),
            Error::InvalidTestLocation(_)
        ));
    }

    #[test]
    fn test_relative_test_location_rejected() {
        assert!(matches!(
            posix().resolve_base("test.rs").unwrap_err(),
            Error::InvalidTestLocation(_)
        ));
        assert!(matches!(
            windows().resolve_base("tests\\test.rs").unwrap_err(),
            Error::InvalidTestLocation(_)
        ));
    }

    #[test]
    fn test_relative_key() {
        assert_eq!(
            resolve(posix(), "/a/b/test.rs", "goldens/c.png").unwrap(),
            PathBuf::from("/a/b/goldens/c.png")
        );
    }

    #[test]
    fn test_parent_segments_are_normalized() {
        assert_eq!(
            resolve(posix(), "/a/b/test.rs", "../c.png").unwrap(),
            PathBuf::from("/a/c.png")
        );
    }

    #[test]
    fn test_root_relative_and_file_url_keys() {
        assert_eq!(
            resolve(posix(), "/a/b/test.rs", "/x/c.png").unwrap(),
            PathBuf::from("/x/c.png")
        );
        assert_eq!(
            resolve(posix(), "/a/b/test.rs", "file:///x/c.png").unwrap(),
            PathBuf::from("/x/c.png")
        );
    }

    #[test]
    fn test_key_query_and_fragment_are_ignored() {
        assert_eq!(
            resolve(posix(), "/a/b/test.rs", "foo.png?v=1#frag").unwrap(),
            PathBuf::from("/a/b/foo.png")
        );
    }

    #[test]
    fn test_key_is_percent_decoded() {
        assert_eq!(
            resolve(posix(), "/a/test.rs", "my%20widget.png").unwrap(),
            PathBuf::from("/a/my widget.png")
        );
        assert_eq!(
            resolve(posix(), "/a/test.rs", "%C3%A9.png").unwrap(),
            PathBuf::from("/a/\u{e9}.png")
        );
    }

    #[test]
    fn test_undecodable_keys_are_rejected() {
        for key in ["%FF.png", "%FE.png"] {
            let err = resolve(posix(), "/a/test.rs", key).unwrap_err();
            assert!(matches!(err, Error::InvalidKey(_)), "{key}: {err}");
        }
    }

    #[test]
    fn test_encoded_separator_is_rejected() {
        let err = resolve(posix(), "/a/test.rs", "x%2Fy.png").unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_non_file_key_is_rejected() {
        let err = resolve(posix(), "/a/test.rs", "https://example.com/x.png").unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_windows_drive_path() {
        let base = windows().resolve_base("C:\\a\\b\\test.rs").unwrap();
        assert_eq!(base.as_str(), "C:\\a\\b\\");
        assert_eq!(base.to_uri(), "file:///C:/a/b/");
        assert_eq!(
            resolve(windows(), "C:\\a\\b\\test.rs", "goldens/c.png").unwrap(),
            PathBuf::from("C:\\a\\b\\goldens\\c.png")
        );
    }

    #[test]
    fn test_windows_file_uri() {
        let base = windows().resolve_base("file:///C:/a/b/test.rs").unwrap();
        assert_eq!(base.as_str(), "C:\\a\\b\\");
    }

    #[test]
    fn test_windows_root_relative_key_keeps_drive() {
        assert_eq!(
            resolve(windows(), "C:\\a\\test.rs", "/x.png").unwrap(),
            PathBuf::from("C:\\x.png")
        );
    }

    #[test]
    fn test_windows_unc_path() {
        let test_file = "\\\\server\\share\\tests\\test.rs";
        let base = windows().resolve_base(test_file).unwrap();
        assert_eq!(base.as_str(), "\\\\server\\share\\tests\\");
        assert_eq!(base.to_uri(), "file://server/share/tests/");
        assert_eq!(
            resolve(windows(), test_file, "c.png").unwrap(),
            PathBuf::from("\\\\server\\share\\tests\\c.png")
        );
    }

    #[test]
    fn test_file_name() {
        let resolver = posix();
        let base = resolver.resolve_base("/a/test.rs").unwrap();
        let name = resolver
            .file_name(&base, &GoldenKey::new("goldens/my%20widget.png"))
            .unwrap();
        assert_eq!(name, "my widget.png");
    }

    #[test]
    fn test_apply_version() {
        let key = posix().apply_version(&GoldenKey::new("foo.png"), Some(2));
        assert_eq!(key.as_str(), "foo.2.png");
    }

    #[test]
    fn test_is_absolute() {
        assert!(PathStyle::Posix.is_absolute("/a"));
        assert!(!PathStyle::Posix.is_absolute("a/b"));
        assert!(!PathStyle::Posix.is_absolute("C:\\a"));
        assert!(PathStyle::Windows.is_absolute("C:\\a"));
        assert!(PathStyle::Windows.is_absolute("\\\\server\\share"));
        assert!(PathStyle::Windows.is_absolute("/a"));
        assert!(!PathStyle::Windows.is_absolute("a\\b"));
    }

    #[test]
    fn test_dirname() {
        assert_eq!(PathStyle::Posix.dirname("/a/b/c.rs"), "/a/b");
        assert_eq!(PathStyle::Posix.dirname("/c.rs"), "/");
        assert_eq!(PathStyle::Posix.dirname("c.rs"), ".");
        assert_eq!(PathStyle::Windows.dirname("C:\\a\\c.rs"), "C:\\a");
        assert_eq!(PathStyle::Windows.dirname("C:\\c.rs"), "C:\\");
    }

    #[test]
    fn test_join() {
        assert_eq!(PathStyle::Posix.join("/a/", "b"), "/a/b");
        assert_eq!(PathStyle::Posix.join("/a", "b"), "/a/b");
        assert_eq!(PathStyle::Posix.join("/a", "/b"), "/b");
        assert_eq!(PathStyle::Windows.join("C:\\a", "b"), "C:\\a\\b");
    }

    #[test]
    fn test_style_serde() {
        let style: PathStyle = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(style, PathStyle::Windows);
        assert_eq!(PathStyle::Posix.to_string(), "posix");
    }
}
