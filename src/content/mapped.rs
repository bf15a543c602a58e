//! Memory-mapped content for large decompressed inputs.
//!
//! The decompressed bytes live in a temporary file that is kept alive as long as
//! the mapping is.

use crate::content::memory::copy_range;
use crate::content::Content;
use crate::error::{PagerError, Result};
use memmap2::Mmap;
use tempfile::NamedTempFile;

#[derive(Debug)]
pub struct MappedContent {
    mmap: Mmap,
    _temp_file: NamedTempFile,
    name: String,
}

impl MappedContent {
    pub fn from_temp_file(temp_file: NamedTempFile, name: impl Into<String>) -> Result<Self> {
        let handle = temp_file
            .reopen()
            .map_err(|e| PagerError::file_error("Failed to reopen temp file", e))?;

        // SAFETY: the temp file is private to this process and never written after
        // decompression finished.
        let mmap = unsafe {
            Mmap::map(&handle)
                .map_err(|e| PagerError::file_error("Failed to memory map temp file", e))?
        };

        Ok(Self {
            mmap,
            _temp_file: temp_file,
            name: name.into(),
        })
    }
}

impl Content for MappedContent {
    fn size(&self) -> Result<u64> {
        Ok(self.mmap.len() as u64)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        Ok(copy_range(&self.mmap[..], buf, offset))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn maps_temp_file_contents() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"mapped\ncontent\n").unwrap();
        temp.flush().unwrap();

        let content = MappedContent::from_temp_file(temp, "archive.gz").unwrap();
        assert_eq!(content.size().unwrap(), 15);
        assert_eq!(content.name(), "archive.gz");

        let mut buf = [0u8; 7];
        assert_eq!(content.read_at(&mut buf, 7).unwrap(), 7);
        assert_eq!(&buf, b"content");
    }
}
