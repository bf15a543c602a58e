//! Plain file content read with positional I/O.
//!
//! The size is re-read from metadata on every call so an appended log file is
//! picked up without reopening it.

use crate::content::Content;
use crate::error::{PagerError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct FileContent {
    file: File,
    path: PathBuf,
    name: String,
}

impl FileContent {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            PagerError::file_error(format!("Failed to open file: {}", path.display()), e)
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unnamed>")
            .to_string();
        Ok(Self {
            file,
            path: path.to_path_buf(),
            name,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Content for FileContent {
    fn size(&self) -> Result<u64> {
        let metadata = self
            .file
            .metadata()
            .map_err(|e| PagerError::file_error("Failed to stat file", e))?;
        Ok(metadata.len())
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        positional_read(&self.file, buf, offset)
            .map_err(|e| PagerError::file_error(format!("Read failed at offset {}", offset), e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(unix)]
fn positional_read(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
    use std::os::unix::fs::FileExt;
    loop {
        match file.read_at(buf, offset) {
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(windows)]
fn positional_read(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
    use std::os::windows::fs::FileExt;
    loop {
        match file.seek_read(buf, offset) {
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            // Reading past the end is reported as an error on Windows.
            Err(e) if e.raw_os_error() == Some(38) => return Ok(0),
            other => return other,
        }
    }
}
