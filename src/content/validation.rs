//! Path validation before a file is opened for paging.
//!
//! Empty files are accepted: a log that has just been created is a perfectly good
//! thing to follow.

use crate::error::{PagerError, Result};
use std::fs::File;
use std::path::Path;

/// Check that `path` exists, is a regular file and is readable.
pub fn validate_file_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PagerError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| PagerError::file_error("Failed to read file metadata", e))?;

    if !metadata.is_file() {
        return Err(PagerError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    File::open(path).map_err(|e| PagerError::file_error("Cannot open file for reading", e))?;

    Ok(())
}
