//! Backward line reader.

use crate::content::Content;
use crate::error::{PagerError, Result};
use crate::reader::{Line, DEFAULT_BACKWARD_CHUNK};

/// Reads lines backward from an exclusive end offset.
///
/// The byte just before the starting offset is assumed to end a line. Chunks are
/// read backward and prepended to an unconsumed tail; each call peels the last line
/// off the tail. A newline in the tail's final position terminates the line that was
/// already returned (or the starting boundary), so it never splits a line.
pub struct BackwardReader<'a> {
    content: &'a dyn Content,
    /// Bytes before this offset have not been read yet. `tail` starts here.
    offset: u64,
    tail: Vec<u8>,
    chunk: usize,
}

impl<'a> BackwardReader<'a> {
    pub fn new(content: &'a dyn Content, end: u64) -> Self {
        Self::with_chunk_size(content, end, DEFAULT_BACKWARD_CHUNK)
    }

    pub fn with_chunk_size(content: &'a dyn Content, end: u64, chunk: usize) -> Self {
        Self {
            content,
            offset: end,
            tail: Vec::new(),
            chunk: chunk.max(1),
        }
    }

    /// Offset one past the line the next call will return.
    pub fn offset(&self) -> u64 {
        self.offset + self.tail.len() as u64
    }

    /// Previous line, or `None` once the start of the content is reached.
    pub fn read_line(&mut self) -> Result<Option<Line>> {
        loop {
            let search_end = self.tail.len().saturating_sub(1);
            if let Some(newline) = memchr::memrchr(b'\n', &self.tail[..search_end]) {
                let start = newline + 1;
                let line = Line::new(self.offset + start as u64, &self.tail[start..]);
                self.tail.truncate(start);
                return Ok(Some(line));
            }

            if self.offset == 0 {
                if self.tail.is_empty() {
                    return Ok(None);
                }
                let bytes = std::mem::take(&mut self.tail);
                return Ok(Some(Line::new(0, bytes)));
            }

            self.pull()?;
        }
    }

    /// Read the chunk preceding the tail and prepend it.
    fn pull(&mut self) -> Result<()> {
        let len = (self.chunk as u64).min(self.offset) as usize;
        let start = self.offset - len as u64;

        let mut chunk = vec![0u8; len + self.tail.len()];
        let got = self.content.read_full_at(&mut chunk[..len], start)?;
        if got < len {
            return Err(PagerError::file_error(
                format!("Content shrank below offset {}", self.offset),
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read"),
            ));
        }
        chunk[len..].copy_from_slice(&self.tail);

        self.tail = chunk;
        self.offset = start;
        Ok(())
    }
}

impl Iterator for BackwardReader<'_> {
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryContent;
    use proptest::prelude::*;

    /// Split the way a forward scan does, keeping an unterminated last line.
    fn forward_split(data: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        let mut start = 0;
        for (i, b) in data.iter().enumerate() {
            if *b == b'\n' {
                lines.push(data[start..=i].to_vec());
                start = i + 1;
            }
        }
        if start < data.len() {
            lines.push(data[start..].to_vec());
        }
        lines
    }

    fn backward_collect(data: &[u8], chunk: usize) -> Vec<Line> {
        let content = MemoryContent::new(data.to_vec());
        let mut lines = BackwardReader::with_chunk_size(&content, data.len() as u64, chunk)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        lines.reverse();
        lines
    }

    fn assert_round_trip(data: &[u8], chunk: usize) {
        let lines = backward_collect(data, chunk);
        let bytes: Vec<Vec<u8>> = lines.iter().map(|l| l.bytes.clone()).collect();
        assert_eq!(bytes, forward_split(data), "chunk size {}", chunk);

        let mut expected_offset = 0;
        for line in &lines {
            assert_eq!(line.offset, expected_offset);
            expected_offset = line.end();
        }
    }

    #[test]
    fn concrete_cases_for_many_chunk_sizes() {
        for chunk in 1..=16 {
            assert!(backward_collect(b"", chunk).is_empty());
            assert_round_trip(b"0123", chunk);
            assert_round_trip(b"0123\n", chunk);
            assert_round_trip(b"01234567890\n", chunk);
            assert_round_trip(b"a\n\nbb\nccc", chunk);
            assert_round_trip(b"\n\n\n", chunk);
        }
    }

    #[test]
    fn starts_from_interior_boundary() {
        let content = MemoryContent::new(b"one\ntwo\nthree\n".to_vec());
        let mut reader = BackwardReader::with_chunk_size(&content, 8, 3);
        assert_eq!(reader.read_line().unwrap(), Some(Line::new(4, b"two\n".to_vec())));
        assert_eq!(reader.offset(), 4);
        assert_eq!(reader.read_line().unwrap(), Some(Line::new(0, b"one\n".to_vec())));
        assert_eq!(reader.read_line().unwrap(), None);
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn interior_offset_yields_line_fragment_first() {
        let content = MemoryContent::new(b"alpha\nbravo\n".to_vec());
        let mut reader = BackwardReader::new(&content, 9);
        let fragment = reader.read_line().unwrap().unwrap();
        assert_eq!(fragment.offset, 6);
        assert_eq!(fragment.bytes, b"bra");
    }

    proptest! {
        #[test]
        fn round_trip_matches_forward_split(
            data in proptest::collection::vec(prop_oneof![Just(b'\n'), Just(b'x'), any::<u8>()], 0..200),
            chunk in 1usize..40,
        ) {
            let lines = backward_collect(&data, chunk);
            let bytes: Vec<Vec<u8>> = lines.iter().map(|l| l.bytes.clone()).collect();
            prop_assert_eq!(bytes, forward_split(&data));
        }
    }
}
