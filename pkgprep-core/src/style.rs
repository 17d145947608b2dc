//! Locating and running the coding-style checker

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::{PathList, ToolError, ToolResult};

/// File stem of the checker looked up next to the running executable.
pub const CHECKER_NAME: &str = "style-checker";

/// Path of the checker that lives in the same directory as `exe`.
pub fn sibling_checker(exe: &Path) -> PathBuf {
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("{CHECKER_NAME}{}", env::consts::EXE_SUFFIX))
}

/// Resolve the checker: an explicit override wins, otherwise the sibling of
/// the current executable.
pub fn locate_checker(explicit: Option<&Path>) -> ToolResult<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let exe = env::current_exe().map_err(|e| ToolError::io("current executable", e))?;
            sibling_checker(&exe)
        }
    };

    if path.is_file() {
        Ok(path)
    } else {
        Err(ToolError::NotFound {
            paths: PathList(vec![path]),
        })
    }
}

/// Run `checker` with `args`, sharing this process's stdio, and return the
/// exit code to propagate.
pub fn run_checker(checker: &Path, args: &[OsString]) -> ToolResult<i32> {
    debug!(checker = %checker.display(), ?args, "running style checker");
    let status = Command::new(checker)
        .args(args)
        .status()
        .map_err(|source| ToolError::Command {
            program: checker.display().to_string(),
            source,
        })?;

    Ok(exit_code_of(status))
}

/// Exit code a shell would report for `status`.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
