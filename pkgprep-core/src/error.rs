//! Error taxonomy shared by every pkgprep build step

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

/// `ENOENT`: a required input file or executable is missing.
pub const EXIT_NOT_FOUND: i32 = 2;
/// `EINVAL`: the caller passed the wrong arguments.
pub const EXIT_USAGE: i32 = 22;
/// Anything else that aborts a build step.
pub const EXIT_FAILURE: i32 = 1;

/// A required value could not be read from a spec file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no `Version:` line found in spec file")]
    VersionNotFound,

    #[error("no `%define {key}` line found in spec file")]
    PackageNameNotFound { key: String },

    #[error("{field} in spec file is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },
}

/// Every way a build step can abort, each mapped to a process exit code.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    Usage(String),

    #[error("no such file: {paths}")]
    NotFound { paths: PathList },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run `{program}`: {source}")]
    Command {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}")]
    CommandFailed { program: String, status: ExitStatus },

    #[error("encoding list is empty")]
    EmptyEncodingList,
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ToolError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code a calling build system should see for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolError::Usage(_) => EXIT_USAGE,
            ToolError::NotFound { .. } => EXIT_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Paths reported by [`ToolError::NotFound`], displayed comma-separated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathList(pub Vec<PathBuf>);

impl fmt::Display for PathList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Fail with [`ToolError::NotFound`] listing every path that is not a regular file.
pub fn require_files<'a, I>(paths: I) -> ToolResult<()>
where
    I: IntoIterator<Item = &'a Path>,
{
    let missing: Vec<PathBuf> = paths
        .into_iter()
        .filter(|p| !p.is_file())
        .map(|p| p.to_path_buf())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ToolError::NotFound {
            paths: PathList(missing),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_errno() {
        assert_eq!(ToolError::Usage("x".into()).exit_code(), 22);
        let not_found = ToolError::NotFound {
            paths: PathList::default(),
        };
        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(ToolError::from(ParseError::VersionNotFound).exit_code(), 1);
    }

    #[test]
    fn not_found_lists_every_missing_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let present = dir.path().join("present.spec");
        std::fs::write(&present, "Version: 1").unwrap();
        let a = dir.path().join("a.xml");
        let b = dir.path().join("b.xml");

        let err = require_files([present.as_path(), a.as_path(), b.as_path()]).unwrap_err();
        match &err {
            ToolError::NotFound { paths } => assert_eq!(paths.0, vec![a.clone(), b.clone()]),
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("a.xml, "), "{msg}");
        assert!(msg.ends_with("b.xml"), "{msg}");
    }

    #[test]
    fn directories_are_not_regular_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(require_files([dir.path()]).is_err());
        assert!(require_files(std::iter::empty::<&Path>()).is_ok());
    }
}
