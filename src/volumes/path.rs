//! Platform-aware path handling for in-container destinations
//!
//! The destination syntax depends on the container's OS, not the host's,
//! so the resolver is chosen once from configuration and injected into the
//! parser and manager.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path syntax used inside the job container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// `/`-separated paths rooted at `/`
    #[default]
    Unix,
    /// Drive-letter and UNC paths separated by `\`
    Windows,
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Path operations the volume manager relies on
pub trait PathResolver: Send + Sync {
    /// Join `base` and `path`, cleaning the result lexically
    fn join(&self, base: &str, path: &str) -> String;

    /// Whether `path` is absolute in this syntax
    fn is_abs(&self, path: &str) -> bool;

    /// Whether `path` names the filesystem root
    fn is_root(&self, path: &str) -> bool;
}

/// Lexically clean `rest`, resolving `.` and `..` segments.
///
/// Returns `sep` for a rooted path that collapses to the root and `.`
/// for an empty relative path.
fn clean_segments(rest: &str, sep: char) -> String {
    let rooted = rest.starts_with(sep);
    let mut stack: Vec<&str> = Vec::new();

    for segment in rest.split(sep) {
        match segment {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ if rooted => {}
                _ => stack.push(".."),
            },
            other => stack.push(other),
        }
    }

    let body = stack.join(&sep.to_string());
    match (rooted, body.is_empty()) {
        (true, _) => format!("{}{}", sep, body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// Unix path semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixPath;

impl UnixPath {
    pub fn new() -> Self {
        Self
    }

    fn clean(path: &str) -> String {
        clean_segments(path, '/')
    }
}

impl PathResolver for UnixPath {
    fn join(&self, base: &str, path: &str) -> String {
        let parts: Vec<&str> = [base, path].into_iter().filter(|p| !p.is_empty()).collect();
        if parts.is_empty() {
            return String::new();
        }
        Self::clean(&parts.join("/"))
    }

    fn is_abs(&self, path: &str) -> bool {
        path.starts_with('/')
    }

    fn is_root(&self, path: &str) -> bool {
        !path.is_empty() && Self::clean(path) == "/"
    }
}

/// Windows path semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPath;

impl WindowsPath {
    pub fn new() -> Self {
        Self
    }

    fn normalize(path: &str) -> String {
        path.replace('/', "\\")
    }

    /// Split a normalized path into its volume (`C:` or `\\server\share`) and the rest
    fn split_volume(path: &str) -> (&str, &str) {
        let bytes = path.as_bytes();
        if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
            return path.split_at(2);
        }

        if let Some(unc) = path.strip_prefix("\\\\") {
            // \\server\share[\rest]
            let mut end = 2;
            let mut seen = 0;
            for (i, c) in unc.char_indices() {
                if c == '\\' {
                    seen += 1;
                    if seen == 2 {
                        end = 2 + i;
                        break;
                    }
                }
                end = 2 + i + c.len_utf8();
            }
            return path.split_at(end);
        }

        ("", path)
    }

    fn clean(path: &str) -> String {
        let normalized = Self::normalize(path);
        let (volume, rest) = Self::split_volume(&normalized);
        if rest.is_empty() {
            return volume.to_string();
        }
        let body = clean_segments(rest, '\\');
        if !volume.is_empty() && body == "." {
            return volume.to_string();
        }
        format!("{}{}", volume, body)
    }
}

impl PathResolver for WindowsPath {
    fn join(&self, base: &str, path: &str) -> String {
        let parts: Vec<&str> = [base, path].into_iter().filter(|p| !p.is_empty()).collect();
        if parts.is_empty() {
            return String::new();
        }
        Self::clean(&parts.join("\\"))
    }

    fn is_abs(&self, path: &str) -> bool {
        let normalized = Self::normalize(path);
        if normalized.starts_with("\\\\") {
            return true;
        }
        let bytes = normalized.as_bytes();
        bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
    }

    fn is_root(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let cleaned = Self::clean(path);
        let (volume, rest) = Self::split_volume(&cleaned);
        if volume.starts_with("\\\\") {
            return false;
        }
        rest.is_empty() || rest == "\\"
    }
}

/// Build the resolver for a path style
pub fn resolver_for(style: PathStyle) -> Box<dyn PathResolver> {
    match style {
        PathStyle::Unix => Box::new(UnixPath::new()),
        PathStyle::Windows => Box::new(WindowsPath::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_join() {
        let p = UnixPath::new();
        assert_eq!(p.join("/builds/project", "volume"), "/builds/project/volume");
        assert_eq!(p.join("/builds/project/", "./a/../volume"), "/builds/project/volume");
        assert_eq!(p.join("", "volume"), "volume");
        assert_eq!(p.join("/", ".."), "/");
        assert_eq!(p.join("", ""), "");
    }

    #[test]
    fn unix_is_abs() {
        let p = UnixPath::new();
        assert!(p.is_abs("/volume"));
        assert!(!p.is_abs("volume"));
        assert!(!p.is_abs(""));
    }

    #[test]
    fn unix_is_root() {
        let p = UnixPath::new();
        assert!(p.is_root("/"));
        assert!(p.is_root("//"));
        assert!(p.is_root("/tmp/.."));
        assert!(!p.is_root("/tmp"));
        assert!(!p.is_root(""));
        assert!(!p.is_root("."));
    }

    #[test]
    fn windows_join() {
        let p = WindowsPath::new();
        assert_eq!(p.join("C:\\builds\\project", "volume"), "C:\\builds\\project\\volume");
        assert_eq!(p.join("C:/builds", "a/b"), "C:\\builds\\a\\b");
        assert_eq!(p.join("", "volume"), "volume");
    }

    #[test]
    fn windows_is_abs() {
        let p = WindowsPath::new();
        assert!(p.is_abs("C:\\volume"));
        assert!(p.is_abs("c:/volume"));
        assert!(p.is_abs("\\\\.\\pipe\\docker_engine"));
        assert!(!p.is_abs("volume"));
        assert!(!p.is_abs("C:volume"));
    }

    #[test]
    fn windows_is_root() {
        let p = WindowsPath::new();
        assert!(p.is_root("C:\\"));
        assert!(p.is_root("c:"));
        assert!(p.is_root("D:/"));
        assert!(p.is_root("\\"));
        assert!(!p.is_root("C:\\volume"));
        assert!(!p.is_root("\\\\server\\share"));
    }

    #[test]
    fn path_style_serde() {
        let style: PathStyle = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(style, PathStyle::Windows);
        assert_eq!(PathStyle::default().to_string(), "unix");
    }
}
