//! Forward line reader.

use crate::content::Content;
use crate::error::Result;
use crate::reader::{Line, DEFAULT_FORWARD_CHUNK};

/// Reads lines forward from a line boundary.
///
/// A trailing line without a newline is held back: in a file that is still being
/// written, the final line may be incomplete, so it only becomes visible once its
/// newline has arrived. The bytes stay buffered and a later call picks them up.
pub struct ForwardReader<'a> {
    content: &'a dyn Content,
    buf: Vec<u8>,
    /// Start of the next line inside `buf`.
    pos: usize,
    /// Bytes of `buf[pos..scanned]` are known to contain no newline.
    scanned: usize,
    /// Absolute offset of `buf[pos]`.
    line_offset: u64,
    /// Absolute offset of the next byte to read from the content.
    read_offset: u64,
    chunk: usize,
}

impl<'a> ForwardReader<'a> {
    pub fn new(content: &'a dyn Content, offset: u64) -> Self {
        Self::with_chunk_size(content, offset, DEFAULT_FORWARD_CHUNK)
    }

    pub fn with_chunk_size(content: &'a dyn Content, offset: u64, chunk: usize) -> Self {
        Self {
            content,
            buf: Vec::new(),
            pos: 0,
            scanned: 0,
            line_offset: offset,
            read_offset: offset,
            chunk: chunk.max(1),
        }
    }

    /// Offset at which the next line starts.
    pub fn offset(&self) -> u64 {
        self.line_offset
    }

    /// Next complete line, or `None` at the end of the available data.
    pub fn read_line(&mut self) -> Result<Option<Line>> {
        loop {
            if let Some(found) = memchr::memchr(b'\n', &self.buf[self.scanned..]) {
                let end = self.scanned + found + 1;
                let line = Line::new(self.line_offset, &self.buf[self.pos..end]);
                self.line_offset += (end - self.pos) as u64;
                self.pos = end;
                self.scanned = end;
                return Ok(Some(line));
            }
            self.scanned = self.buf.len();

            if self.pos > 0 {
                self.buf.drain(..self.pos);
                self.scanned -= self.pos;
                self.pos = 0;
            }

            let filled = self.buf.len();
            self.buf.resize(filled + self.chunk, 0);
            let n = match self.content.read_at(&mut self.buf[filled..], self.read_offset) {
                Ok(n) => n,
                Err(e) => {
                    self.buf.truncate(filled);
                    return Err(e);
                }
            };
            self.buf.truncate(filled + n);
            self.read_offset += n as u64;

            if n == 0 {
                return Ok(None);
            }
        }
    }
}

impl Iterator for ForwardReader<'_> {
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}
