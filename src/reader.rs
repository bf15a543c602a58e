//! Line materialization over a [`Content`](crate::content::Content) source.
//!
//! Both readers are cheap to construct and hold no state beyond their own buffers,
//! so the pager creates a fresh one for every window fill or search.

pub mod backward;
pub mod forward;

pub use backward::BackwardReader;
pub use forward::ForwardReader;

/// Default chunk size for backward reads.
pub const DEFAULT_BACKWARD_CHUNK: usize = 8 * 1024;
/// Default buffer growth step for forward reads.
pub const DEFAULT_FORWARD_CHUNK: usize = 64 * 1024;

/// A line of content: the bytes of `[offset, offset + len)`, including the
/// trailing newline when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub offset: u64,
    pub bytes: Vec<u8>,
}

impl Line {
    pub fn new(offset: u64, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset one past the last byte.
    pub fn end(&self) -> u64 {
        self.offset + self.len()
    }

    /// Line bytes without the trailing `\n` or `\r\n`.
    pub fn text(&self) -> &[u8] {
        let mut text = &self.bytes[..];
        if let Some(stripped) = text.strip_suffix(b"\n") {
            text = stripped;
            if let Some(stripped) = text.strip_suffix(b"\r") {
                text = stripped;
            }
        }
        text
    }
}
