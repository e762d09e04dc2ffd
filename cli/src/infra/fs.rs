//! Local file reads needed before any remote action.

use std::path::Path;

use anyhow::Result;

use crate::domain::BootstrapError;

/// Read the Chef validation key.
///
/// # Errors
///
/// Returns `BootstrapError::ValidationKey` if the file is missing, unreadable
/// or empty.
pub fn read_validation_key(path: &Path) -> Result<Vec<u8>> {
    let key = std::fs::read(path).map_err(|e| BootstrapError::ValidationKey {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    if key.iter().all(u8::is_ascii_whitespace) {
        return Err(BootstrapError::ValidationKey {
            path: path.display().to_string(),
            reason: "file is empty".to_string(),
        }
        .into());
    }
    Ok(key)
}
