//! Output file helpers

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::info;

use crate::error::{ToolError, ToolResult};

/// Write `contents` to `dest`, replacing any existing file.
///
/// Data lands in a sibling temporary file first and is renamed over `dest`
/// once fully flushed, so readers never observe a partial file. The result
/// keeps the mode of the file it replaces; a new file gets the mode a plain
/// create would give it (`0o666` minus the umask).
pub fn write_replacing(dest: &Path, contents: &[u8]) -> ToolResult<()> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = sibling_tempfile(dir)?;
    if let Ok(existing) = fs::metadata(dest) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| ToolError::io(tmp.path(), e))?;
    }

    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ToolError::io(tmp.path(), e))?;
    tmp.persist(dest).map_err(|e| ToolError::io(dest, e.error))?;

    info!(path = %dest.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

fn sibling_tempfile(dir: &Path) -> ToolResult<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".pkgprep-");

    // The mode passed to open(2) is masked by the umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder.tempfile_in(dir).map_err(|e| ToolError::io(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_existing_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("manifest.xml");
        std::fs::write(&dest, "a much longer previous body").unwrap();

        write_replacing(&dest, b"new").expect("write");

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("nope").join("out.xml");

        let err = write_replacing(&dest, b"x").unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
        assert!(!dest.exists());
    }
}
