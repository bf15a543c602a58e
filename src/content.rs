//! Content sources: random-access byte providers behind the pager.
//!
//! Everything above this layer sees only the [`Content`] trait: a current size and
//! positional reads. Sources may grow between calls (a log being appended to, a pipe
//! still delivering data) but never shrink.

use crate::error::Result;

pub mod compression;
pub mod factory;
pub mod file;
pub mod mapped;
pub mod memory;
pub mod stream;
pub mod validation;

pub use compression::{detect_compression, CompressionType};
pub use factory::{open_content, open_stdin};
pub use file::FileContent;
pub use mapped::MappedContent;
pub use memory::MemoryContent;
pub use stream::StreamContent;

/// Random-access byte provider.
///
/// Reads are independent of each other and never move a shared cursor, so one
/// handle can be used concurrently by any number of background workers.
pub trait Content: Send + Sync {
    /// Current size in bytes. Non-decreasing across calls.
    fn size(&self) -> Result<u64>;

    /// Read up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes read, which is short (possibly zero) at the end of
    /// the currently available data.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize>;

    /// Human readable name for the status line.
    fn name(&self) -> &str {
        "-"
    }

    /// True while more data is known to be on its way, as for a pipe that has not
    /// reached end of stream.
    fn is_arriving(&self) -> bool {
        false
    }

    /// Fill `buf` as far as the available data allows.
    fn read_full_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_at(&mut buf[filled..], offset + filled as u64)?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}
