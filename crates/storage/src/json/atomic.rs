use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::repository::StorageError;

/// Replace `path` with `contents` so readers see either the old or the new
/// file, never a truncated one.
///
/// The temp file lives in the target's directory so the final rename stays on
/// one filesystem; it is fsynced before the rename.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
