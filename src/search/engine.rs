//! Blocking scans over the content.
//!
//! Every scan polls its [`CancelToken`] once per line and gives up with
//! [`Scan::Cancelled`] as soon as the token is set. These functions run on the
//! blocking pool; they never touch the model.

use crate::cancel::CancelToken;
use crate::content::Content;
use crate::error::Result;
use crate::reader::{BackwardReader, ForwardReader, DEFAULT_BACKWARD_CHUNK, DEFAULT_FORWARD_CHUNK};
use crate::search::Pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan<T> {
    Found(T),
    /// Reached the end of the data without a result.
    Exhausted,
    Cancelled,
}

/// A content handle, a cancellation token and the reader chunk sizes.
pub struct Scanner<'a> {
    content: &'a dyn Content,
    token: &'a CancelToken,
    forward_chunk: usize,
    backward_chunk: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(content: &'a dyn Content, token: &'a CancelToken) -> Self {
        Self {
            content,
            token,
            forward_chunk: DEFAULT_FORWARD_CHUNK,
            backward_chunk: DEFAULT_BACKWARD_CHUNK,
        }
    }

    pub fn with_chunks(mut self, forward: usize, backward: usize) -> Self {
        self.forward_chunk = forward;
        self.backward_chunk = backward;
        self
    }

    fn forward(&self, offset: u64) -> ForwardReader<'a> {
        ForwardReader::with_chunk_size(self.content, offset, self.forward_chunk)
    }

    fn backward(&self, end: u64) -> BackwardReader<'a> {
        BackwardReader::with_chunk_size(self.content, end, self.backward_chunk)
    }

    /// Start of the first line at or after `start` (forward) or before `start`
    /// (backward) that matches `pattern`.
    pub fn find(&self, pattern: &Pattern, start: u64, direction: Direction) -> Result<Scan<u64>> {
        match direction {
            Direction::Forward => {
                let mut reader = self.forward(start);
                loop {
                    if self.token.is_cancelled() {
                        return Ok(Scan::Cancelled);
                    }
                    match reader.read_line()? {
                        Some(line) if pattern.is_match(line.text()) => {
                            return Ok(Scan::Found(line.offset))
                        }
                        Some(_) => {}
                        None => return Ok(Scan::Exhausted),
                    }
                }
            }
            Direction::Backward => {
                let mut reader = self.backward(start);
                loop {
                    if self.token.is_cancelled() {
                        return Ok(Scan::Cancelled);
                    }
                    match reader.read_line()? {
                        Some(line) if pattern.is_match(line.text()) => {
                            return Ok(Scan::Found(line.offset))
                        }
                        Some(_) => {}
                        None => return Ok(Scan::Exhausted),
                    }
                }
            }
        }
    }

    /// Offset just past the line starting at `offset`, or `offset` at end of data.
    pub fn next_line_start(&self, offset: u64) -> Result<u64> {
        Ok(self
            .forward(offset)
            .read_line()?
            .map_or(offset, |line| line.end()))
    }

    /// Start of the line containing byte `offset`.
    pub fn line_start_at(&self, offset: u64) -> Result<u64> {
        let size = self.content.size()?;
        let end = offset.saturating_add(1).min(size);
        let mut reader = self.backward(end);
        Ok(reader.read_line()?.map_or(0, |line| line.offset))
    }

    /// Start of the line containing the byte `percent`% of the way through.
    pub fn seek_percent(&self, percent: u64) -> Result<Scan<u64>> {
        if self.token.is_cancelled() {
            return Ok(Scan::Cancelled);
        }
        let size = self.content.size()?;
        let target = (size as u128 * percent.min(100) as u128 / 100) as u64;
        Ok(Scan::Found(self.line_start_at(target)?))
    }

    /// Start of the last `lines` lines of the content.
    pub fn last_page(&self, lines: usize) -> Result<Scan<u64>> {
        let size = self.content.size()?;
        let mut reader = self.backward(size);
        let mut top = size;
        for _ in 0..lines.max(1) {
            if self.token.is_cancelled() {
                return Ok(Scan::Cancelled);
            }
            match reader.read_line()? {
                Some(line) => top = line.offset,
                None => break,
            }
        }
        Ok(Scan::Found(top))
    }

    /// Binary search over line starts for the first line whose leading bytes are not
    /// less than `prefix`. Only meaningful for content sorted bytewise.
    pub fn bisect(&self, prefix: &[u8]) -> Result<Scan<u64>> {
        let size = self.content.size()?;
        let mut lo = 0u64;
        let mut hi = size;
        while lo < hi {
            if self.token.is_cancelled() {
                return Ok(Scan::Cancelled);
            }
            let mid = lo + (hi - lo) / 2;
            let start = self.line_start_at(mid)?;
            match self.forward(start).read_line()? {
                None => hi = start,
                Some(line) => {
                    let text = line.text();
                    let head = &text[..text.len().min(prefix.len())];
                    if head < prefix {
                        lo = line.end();
                    } else {
                        hi = start;
                    }
                }
            }
        }
        if lo >= size {
            Ok(Scan::Exhausted)
        } else {
            Ok(Scan::Found(lo))
        }
    }
}
