//! Fixed in-memory content, used for small decompressed inputs and in tests.

use crate::content::Content;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct MemoryContent {
    data: Vec<u8>,
    name: String,
}

impl MemoryContent {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self::named(data, "-")
    }

    pub fn named(data: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            name: name.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Content for MemoryContent {
    fn size(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        Ok(copy_range(&self.data, buf, offset))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Copy as much of `data[offset..]` as fits into `buf`.
pub(crate) fn copy_range(data: &[u8], buf: &mut [u8], offset: u64) -> usize {
    let len = data.len() as u64;
    if offset >= len {
        return 0;
    }
    let start = offset as usize;
    let n = buf.len().min(data.len() - start);
    buf[..n].copy_from_slice(&data[start..start + n]);
    n
}
