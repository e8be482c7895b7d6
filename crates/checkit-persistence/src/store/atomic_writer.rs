use checkit_core::{CheckitError, CheckitResult};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Write-to-temp-then-rename file access for the config store.
pub struct AtomicWriter;

impl AtomicWriter {
    /// Replaces `path` with `data` in one rename, creating parent directories
    /// as needed. The temp file lives next to the target so the rename stays
    /// on one filesystem.
    pub async fn write_atomic(path: &Path, data: &[u8]) -> CheckitResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).await?;

        let temp_file = tempfile::NamedTempFile::new_in(parent)?;
        fs::write(temp_file.path(), data).await?;
        temp_file
            .persist(path)
            .map_err(|e| CheckitError::Io(e.error))?;

        tracing::debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    /// Reads a file, returning `None` when it does not exist yet.
    pub async fn read_optional(path: &Path) -> CheckitResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
