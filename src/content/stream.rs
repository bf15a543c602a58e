//! Growing buffer fed from a stream such as a pipe on stdin.
//!
//! A collector thread appends everything it reads. A read failure on the stream is
//! remembered and surfaced from [`Content::size`], where the growth poller turns it
//! into a fatal reactor stop.

use crate::content::memory::copy_range;
use crate::content::Content;
use crate::error::{PagerError, Result};
use parking_lot::RwLock;
use std::io::Read;
use std::sync::Arc;
use std::thread;

const COLLECT_CHUNK: usize = 64 * 1024;

#[derive(Debug, Default)]
struct StreamState {
    data: Vec<u8>,
    finished: bool,
    failure: Option<(std::io::ErrorKind, String)>,
}

/// Shared, append-only buffer.
#[derive(Debug, Clone, Default)]
pub struct StreamContent {
    state: Arc<RwLock<StreamState>>,
}

impl StreamContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes as if they had arrived on the stream.
    pub fn push(&self, bytes: &[u8]) {
        self.state.write().data.extend_from_slice(bytes);
    }

    /// True once the producer reached end of stream.
    pub fn is_finished(&self) -> bool {
        self.state.read().finished
    }

    fn finish(&self, failure: Option<std::io::Error>) {
        let mut state = self.state.write();
        state.finished = true;
        state.failure = failure.map(|e| (e.kind(), e.to_string()));
    }

    /// Spawn the collector thread draining `reader` into this buffer.
    pub fn spawn_collector<R>(&self, mut reader: R) -> thread::JoinHandle<()>
    where
        R: Read + Send + 'static,
    {
        let content = self.clone();
        thread::spawn(move || {
            let mut chunk = vec![0u8; COLLECT_CHUNK];
            loop {
                match reader.read(&mut chunk) {
                    Ok(0) => {
                        content.finish(None);
                        return;
                    }
                    Ok(n) => content.push(&chunk[..n]),
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        content.finish(Some(e));
                        return;
                    }
                }
            }
        })
    }
}

impl Content for StreamContent {
    fn size(&self) -> Result<u64> {
        let state = self.state.read();
        if let Some((kind, message)) = &state.failure {
            return Err(PagerError::file_error(
                "Reading input stream failed",
                std::io::Error::new(*kind, message.clone()),
            ));
        }
        Ok(state.data.len() as u64)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        Ok(copy_range(&self.state.read().data, buf, offset))
    }

    fn is_arriving(&self) -> bool {
        !self.is_finished()
    }
}
