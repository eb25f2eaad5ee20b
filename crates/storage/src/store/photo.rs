#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError};
use std::path::Path;
use tracing::{debug, info};

/// Reads a photo for import. `Ok(None)` when the file does not exist.
pub fn read_photo_file(path: impl AsRef<Path>) -> Result<Option<Vec<u8>>, StoreError> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => {
            debug!(path = %path.display(), bytes = bytes.len(), "photo read");
            Ok(Some(bytes))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl SqliteStore {
    /// Writes the stored photo of `code` to `path`. Returns `false` when the
    /// type has no photo.
    pub fn export_photo(&self, code: &str, path: impl AsRef<Path>) -> Result<bool, StoreError> {
        let Some(bytes) = self.material_photo(code)? else {
            return Ok(false);
        };
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &bytes)?;
        info!(stock_code = code.trim(), path = %path.display(), bytes = bytes.len(), "photo exported");
        Ok(true)
    }
}
