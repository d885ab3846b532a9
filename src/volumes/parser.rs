//! Mount specification parsing
//!
//! Turns `[source:]destination[:mode]` strings into [`MountSpec`] records.
//! A spec without a source is a cache request.

use crate::volumes::path::{PathResolver, PathStyle, UnixPath, WindowsPath};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Modes accepted after the destination
const MODES: &[&str] = &["ro", "rw"];

/// Errors produced while parsing a mount specification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty volume specification")]
    Empty,

    #[error("invalid volume specification: {0:?}")]
    InvalidSpec(String),

    #[error("unsupported volume mode: {0:?}")]
    InvalidMode(String),

    #[error("too many parts in volume specification: {0:?}")]
    TooManyParts(String),
}

/// A parsed mount specification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountSpec {
    /// Host path or volume name; `None` requests a cache mount
    pub source: Option<String>,
    /// Path inside the container
    pub destination: String,
    /// Mount mode such as `ro`
    pub mode: Option<String>,
}

impl MountSpec {
    /// A cache request for `destination`
    pub fn cache(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    /// A host bind of `source` onto `destination`
    pub fn bind(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            destination: destination.into(),
            mode: None,
        }
    }

    /// Set the mount mode
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Number of path components: 2 for host binds, 1 for cache requests
    pub fn len(&self) -> usize {
        if self.source.is_some() {
            2
        } else {
            1
        }
    }

    /// Whether this spec asks for a cache mount
    pub fn is_cache(&self) -> bool {
        self.source.is_none()
    }

    /// Render as a bind entry using `source` in place of the spec's own source
    pub fn bind_string(&self, source: &str) -> String {
        match &self.mode {
            Some(mode) if !mode.is_empty() => format!("{}:{}:{}", source, self.destination, mode),
            _ => format!("{}:{}", source, self.destination),
        }
    }
}

impl fmt::Display for MountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{}:", source)?;
        }
        write!(f, "{}", self.destination)?;
        if let Some(mode) = &self.mode {
            write!(f, ":{}", mode)?;
        }
        Ok(())
    }
}

/// Parses mount specifications for one container OS
pub trait VolumeParser: Send + Sync {
    /// Parse a single specification
    fn parse_volume(&self, spec: &str) -> Result<MountSpec, ParseError>;

    /// Path semantics matching this parser's syntax
    fn path(&self) -> &dyn PathResolver;
}

fn is_mode(part: &str) -> bool {
    MODES.iter().any(|m| m.eq_ignore_ascii_case(part))
}

/// Parser for Linux containers
///
/// Accepts `destination`, `destination:mode`, `source:destination` and
/// `source:destination:mode`. A two-part spec whose second part is a mode
/// (`ro`, `rw`, any case) is always a cache with that mode, so `host:ro`
/// never binds onto a container path named `ro`.
#[derive(Debug, Default)]
pub struct LinuxParser {
    path: UnixPath,
}

impl LinuxParser {
    pub fn new() -> Self {
        Self {
            path: UnixPath::new(),
        }
    }
}

impl VolumeParser for LinuxParser {
    fn parse_volume(&self, spec: &str) -> Result<MountSpec, ParseError> {
        if spec.is_empty() {
            return Err(ParseError::Empty);
        }

        let parts: Vec<&str> = spec.split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ParseError::InvalidSpec(spec.to_string()));
        }

        match parts.as_slice() {
            [destination] => Ok(MountSpec::cache(*destination)),
            // Mode wins over a destination spelled like one
            [destination, mode] if is_mode(mode) => {
                Ok(MountSpec::cache(*destination).with_mode(*mode))
            }
            [source, destination] => Ok(MountSpec::bind(*source, *destination)),
            [source, destination, mode] => {
                if !is_mode(mode) {
                    return Err(ParseError::InvalidMode(mode.to_string()));
                }
                Ok(MountSpec::bind(*source, *destination).with_mode(*mode))
            }
            _ => Err(ParseError::TooManyParts(spec.to_string())),
        }
    }

    fn path(&self) -> &dyn PathResolver {
        &self.path
    }
}

const WINDOWS_DIR: &str = r#"(?:[a-zA-Z]:)?[\\/](?:[^\\/:*?"<>|\r\n]+[\\/]?)*"#;
const WINDOWS_RELATIVE: &str = r#"[^\\/:*?"<>|\r\n]+(?:[\\/][^\\/:*?"<>|\r\n]+)*[\\/]?"#;
const WINDOWS_PIPE: &str = r#"\\\\\.\\pipe\\[^\\/:*?"<>|\r\n]+"#;
// Single letters are drive letters, not volume names
const WINDOWS_VOLUME_NAME: &str = r#"[^\\/:*?"<>|\r\n]{2,}"#;

static WINDOWS_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    let source = format!(
        "(?:(?P<source>{}|{}|{}):)?",
        WINDOWS_PIPE, WINDOWS_DIR, WINDOWS_VOLUME_NAME
    );
    let destination = format!(
        "(?P<destination>{}|{}|{})",
        WINDOWS_PIPE, WINDOWS_DIR, WINDOWS_RELATIVE
    );
    let mode = "(?::(?P<mode>(?i:ro|rw)))?";
    let pattern = format!("^{}{}{}$", source, destination, mode);
    Regex::new(&pattern).expect("windows volume pattern is valid")
});

/// Parser for Windows containers
#[derive(Debug, Default)]
pub struct WindowsParser {
    path: WindowsPath,
}

impl WindowsParser {
    pub fn new() -> Self {
        Self {
            path: WindowsPath::new(),
        }
    }
}

impl VolumeParser for WindowsParser {
    fn parse_volume(&self, spec: &str) -> Result<MountSpec, ParseError> {
        if spec.is_empty() {
            return Err(ParseError::Empty);
        }

        let caps = WINDOWS_SPEC
            .captures(spec)
            .ok_or_else(|| ParseError::InvalidSpec(spec.to_string()))?;

        let destination = caps
            .name("destination")
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ParseError::InvalidSpec(spec.to_string()))?;

        Ok(MountSpec {
            source: caps.name("source").map(|m| m.as_str().to_string()),
            destination,
            mode: caps.name("mode").map(|m| m.as_str().to_string()),
        })
    }

    fn path(&self) -> &dyn PathResolver {
        &self.path
    }
}

/// Create the parser for a container path style
pub fn create_parser(style: PathStyle) -> Box<dyn VolumeParser> {
    match style {
        PathStyle::Unix => Box::new(LinuxParser::new()),
        PathStyle::Windows => Box::new(WindowsParser::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_cache_spec() {
        let parsed = LinuxParser::new().parse_volume("/cache").unwrap();
        assert_eq!(parsed, MountSpec::cache("/cache"));
        assert!(parsed.is_cache());
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn linux_cache_spec_with_mode() {
        let parsed = LinuxParser::new().parse_volume("/cache:ro").unwrap();
        assert_eq!(parsed, MountSpec::cache("/cache").with_mode("ro"));
    }

    #[test]
    fn linux_two_parts_ending_in_mode_is_cache() {
        let parser = LinuxParser::new();
        assert_eq!(
            parser.parse_volume("host:ro").unwrap(),
            MountSpec::cache("host").with_mode("ro")
        );
        assert_eq!(
            parser.parse_volume("host:RW").unwrap(),
            MountSpec::cache("host").with_mode("RW")
        );
        // Anything else in second place is a destination
        assert_eq!(
            parser.parse_volume("host:rox").unwrap(),
            MountSpec::bind("host", "rox")
        );
        assert_eq!(
            parser.parse_volume("/host:/ro").unwrap(),
            MountSpec::bind("/host", "/ro")
        );
    }

    #[test]
    fn linux_host_bind() {
        let parsed = LinuxParser::new().parse_volume("/host:/volume").unwrap();
        assert_eq!(parsed, MountSpec::bind("/host", "/volume"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn linux_host_bind_with_mode() {
        let parsed = LinuxParser::new().parse_volume("/host:/volume:RO").unwrap();
        assert_eq!(parsed.mode.as_deref(), Some("RO"));
        assert_eq!(parsed.to_string(), "/host:/volume:RO");
    }

    #[test]
    fn linux_rejects_bad_specs() {
        let parser = LinuxParser::new();
        assert_eq!(parser.parse_volume(""), Err(ParseError::Empty));
        assert_eq!(
            parser.parse_volume("/host::/volume"),
            Err(ParseError::InvalidSpec("/host::/volume".to_string()))
        );
        assert_eq!(
            parser.parse_volume("/host:/volume:zz"),
            Err(ParseError::InvalidMode("zz".to_string()))
        );
        assert_eq!(
            parser.parse_volume("/a:/b:ro:extra"),
            Err(ParseError::TooManyParts("/a:/b:ro:extra".to_string()))
        );
    }

    #[test]
    fn windows_drive_letters() {
        let parsed = WindowsParser::new()
            .parse_volume("C:\\host:C:\\volume:ro")
            .unwrap();
        assert_eq!(parsed, MountSpec::bind("C:\\host", "C:\\volume").with_mode("ro"));
    }

    #[test]
    fn windows_cache_and_named_volume() {
        let parser = WindowsParser::new();
        assert_eq!(
            parser.parse_volume("C:\\cache").unwrap(),
            MountSpec::cache("C:\\cache")
        );
        assert_eq!(
            parser.parse_volume("data:C:\\data").unwrap(),
            MountSpec::bind("data", "C:\\data")
        );
        assert_eq!(parser.parse_volume("volume").unwrap(), MountSpec::cache("volume"));
    }

    #[test]
    fn windows_named_pipe() {
        let parsed = WindowsParser::new()
            .parse_volume("\\\\.\\pipe\\docker_engine:\\\\.\\pipe\\docker_engine")
            .unwrap();
        assert_eq!(parsed.source.as_deref(), Some("\\\\.\\pipe\\docker_engine"));
        assert_eq!(parsed.destination, "\\\\.\\pipe\\docker_engine");
    }

    #[test]
    fn windows_rejects_bad_spec() {
        let parser = WindowsParser::new();
        assert!(matches!(
            parser.parse_volume("C:\\a:C:\\b:zz"),
            Err(ParseError::InvalidSpec(_))
        ));
    }

    #[test]
    fn bind_string_uses_given_source() {
        let spec = MountSpec::cache("/volume").with_mode("ro");
        assert_eq!(spec.bind_string("cache-vol"), "cache-vol:/volume:ro");
        assert_eq!(MountSpec::cache("/v").bind_string("s"), "s:/v");
    }

    #[test]
    fn create_parser_matches_style() {
        let parser = create_parser(PathStyle::Windows);
        assert!(parser.path().is_abs("C:\\x"));
        let parser = create_parser(PathStyle::Unix);
        assert!(parser.path().is_abs("/x"));
    }
}
