//! Injecting the host's supported text encodings into a JavaScript module
//!
//! The generated module answers "is this encoding supported?" synchronously,
//! so the list is baked in at build time from `iconv -l` output.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{require_files, ToolError, ToolResult};
use crate::output::write_replacing;

/// Lines starting with this prefix are replaced by the generated table.
pub const ASSIGNMENT_PREFIX: &str = "var encodings = ";

/// Canonical encoding names, each mapped to the marker value `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingSet {
    names: BTreeMap<String, u8>,
}

impl EncodingSet {
    /// Parse a whitespace-separated encoding list such as `iconv -l` prints.
    ///
    /// Each record is `NAME//` or `ALIAS/TARGET//`; the part before the
    /// first `/` is kept. Comma-separated listings are accepted too.
    pub fn parse(raw: &str) -> Self {
        let names = raw
            .split_whitespace()
            .filter_map(|record| {
                let name = record.split('/').next().unwrap_or(record);
                let name = name.trim_end_matches(',');
                (!name.is_empty()).then(|| (name.to_string(), 1))
            })
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// JSON object literal, e.g. `{"UTF-8":1}`.
    pub fn to_json(&self) -> String {
        let map: Map<String, Value> = self
            .names
            .iter()
            .map(|(name, marker)| (name.clone(), Value::from(*marker)))
            .collect();
        Value::Object(map).to_string()
    }
}

/// Run `<program> -l` and return its standard output.
pub fn list_with(program: impl AsRef<OsStr>) -> ToolResult<String> {
    let program = program.as_ref();
    let label = program.to_string_lossy().into_owned();
    let output = Command::new(program)
        .arg("-l")
        .output()
        .map_err(|source| ToolError::Command {
            program: label.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ToolError::CommandFailed {
            program: label,
            status: output.status,
        });
    }

    debug!(program = %label, bytes = output.stdout.len(), "listed encodings");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Replace every `var encodings = ...` line of `source` with the generated table.
///
/// Other lines are copied byte for byte.
pub fn inject(source: &[u8], encodings: &EncodingSet) -> Vec<u8> {
    let replacement = format!("{ASSIGNMENT_PREFIX}{};\n", encodings.to_json());
    let mut out = Vec::with_capacity(source.len() + replacement.len());

    for line in source.split_inclusive(|&b| b == b'\n') {
        if is_assignment(line) {
            out.extend_from_slice(replacement.as_bytes());
        } else {
            out.extend_from_slice(line);
        }
    }

    out
}

fn is_assignment(line: &[u8]) -> bool {
    line.starts_with(ASSIGNMENT_PREFIX.as_bytes())
}

/// Read `source`, inject `encodings` and write the result to `dest`.
pub fn inject_file(source: &Path, dest: &Path, encodings: &EncodingSet) -> ToolResult<()> {
    require_files([source])?;
    if encodings.is_empty() {
        return Err(ToolError::EmptyEncodingList);
    }

    let text = fs::read(source).map_err(|e| ToolError::io(source, e))?;
    if !text.split(|&b| b == b'\n').any(is_assignment) {
        warn!(source = %source.display(), "no encodings assignment line to replace");
    }

    write_replacing(dest, &inject(&text, encodings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_piped_iconv_listing() {
        let raw = "437//\nANSI_X3.4-1968//\nUTF-8//\nUTF8/UTF-8//\n\n";
        let set = EncodingSet::parse(raw);
        assert_eq!(set.len(), 4);
        assert!(set.contains("UTF8"));
        assert!(set.contains("ANSI_X3.4-1968"));
        assert_eq!(set.to_json(), r#"{"437":1,"ANSI_X3.4-1968":1,"UTF-8":1,"UTF8":1}"#);
    }

    #[test]
    fn parses_comma_separated_listing() {
        let set = EncodingSet::parse("437, 500, UTF-8,\n  UTF-16//\n");
        assert_eq!(set.len(), 4);
        assert!(set.contains("500"));
        assert!(set.contains("UTF-16"));
    }

    #[test]
    fn stray_separators_are_dropped() {
        assert!(EncodingSet::parse(" // , \n").is_empty());
    }

    #[test]
    fn replaces_only_assignment_lines() {
        let src = "// var encodings = keep\nvar encodings = {};\nvar x = 1;";
        let set = EncodingSet::parse("UTF-8//");
        let out = inject(src.as_bytes(), &set);
        assert_eq!(
            out,
            b"// var encodings = keep\nvar encodings = {\"UTF-8\":1};\nvar x = 1;"
        );
    }

    #[test]
    fn final_line_without_newline_gains_one() {
        let set = EncodingSet::parse("UTF-8//");
        assert_eq!(inject(b"var encodings = null", &set), b"var encodings = {\"UTF-8\":1};\n");
    }

    #[test]
    fn non_utf8_lines_are_copied_verbatim() {
        let set = EncodingSet::parse("UTF-8//");
        let out = inject(b"// Caf\xe9\nvar encodings = {};\n", &set);
        assert_eq!(out, b"// Caf\xe9\nvar encodings = {\"UTF-8\":1};\n");
    }
}
