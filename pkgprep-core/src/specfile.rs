//! Metadata extraction from RPM-style spec files

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ParseError, ToolError, ToolResult};

/// Marker preceding the package version.
pub const VERSION_MARKER: &str = "Version:";
/// Prefix of the macro line that carries the package name.
pub const DEFINE_MARKER: &str = "%define ";

/// Package facts a manifest template needs from the spec file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMetadata {
    pub version: String,
    pub package_name: String,
}

impl SpecMetadata {
    /// Extract the version and the `%define <name_key>` value from `text`.
    ///
    /// Only the two extracted values must be UTF-8; the rest of the file may
    /// be in any ASCII-compatible encoding.
    pub fn parse(text: &[u8], name_key: &str) -> Result<Self, ParseError> {
        let version = extract_version(text).ok_or(ParseError::VersionNotFound)?;
        let package_name =
            extract_package_name(text, name_key).ok_or_else(|| ParseError::PackageNameNotFound {
                key: name_key.to_string(),
            })?;

        Ok(Self {
            version: decode(version, "version")?,
            package_name: decode(package_name, "package name")?,
        })
    }

    pub fn from_file(path: &Path, name_key: &str) -> ToolResult<Self> {
        let text = fs::read(path).map_err(|e| ToolError::io(path, e))?;
        let meta = Self::parse(&text, name_key)?;
        debug!(
            spec = %path.display(),
            version = %meta.version,
            package_name = %meta.package_name,
            "read spec metadata"
        );
        Ok(meta)
    }
}

/// Bytes after the first `Version:` up to the end of that line, trimmed.
pub fn extract_version(text: &[u8]) -> Option<&[u8]> {
    value_after(text, VERSION_MARKER.as_bytes())
}

/// Bytes after the first `%define <name_key>` up to the end of that line, trimmed.
///
/// The key is matched literally, so `package_name` finds
/// `%define package_name foo` and yields `foo`. A key that is a prefix of a
/// longer macro name matches that macro too.
pub fn extract_package_name<'a>(text: &'a [u8], name_key: &str) -> Option<&'a [u8]> {
    value_after(text, format!("{DEFINE_MARKER}{name_key}").as_bytes())
}

fn value_after<'a>(text: &'a [u8], marker: &[u8]) -> Option<&'a [u8]> {
    let start = find(text, marker)? + marker.len();
    let rest = &text[start..];
    let line = match rest.iter().position(|&b| b == b'\n') {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(trim_ascii_space(line))
}

pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// Same set as C `isspace` in the "C" locale, `\v` and `\f` included.
fn trim_ascii_space(bytes: &[u8]) -> &[u8] {
    let is_space = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c);
    let start = bytes.iter().position(|b| !is_space(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_space(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn decode(bytes: &[u8], field: &'static str) -> Result<String, ParseError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| ParseError::InvalidUtf8 { field })
}
