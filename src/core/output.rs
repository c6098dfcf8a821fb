//! Persisting downloaded chart images.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::core::{ChartError, Result, error::ChartErrorKind};

/// Write `bytes` to `path`, replacing whatever was there.
///
/// The bytes land in a temporary file next to the destination first, which is
/// then renamed over it. A failure at any point leaves the destination
/// untouched and the temporary file is removed when dropped.
pub fn write_image(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |source: std::io::Error| {
        ChartError::from(ChartErrorKind::WriteError {
            path: path.to_path_buf(),
            source,
        })
    };

    let parent = parent_dir(path);
    let mut file = NamedTempFile::new_in(&parent).map_err(|e| {
        write_error(e).with_hint(
            (!parent.is_dir()).then(|| format!("directory {} does not exist", parent.display())),
        )
    })?;

    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
