//! Window top-up workers.
//!
//! A fill reads a bounded number of lines next to one end of a window. The result
//! names the offset it was seeded from so the reactor can drop it if that end of
//! the window has moved in the meantime.

use crate::content::Content;
use crate::logger::Level;
use crate::reactor::ReactorHandle;
use crate::reader::{BackwardReader, ForwardReader, Line};
use crate::search::{Direction, ScanChunks};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FillReport {
    pub direction: Direction,
    /// `after_end()` or `before_start()` at the time the fill was requested.
    pub from: u64,
    /// Forward fills in file order, backward fills nearest first.
    pub lines: Vec<Line>,
    /// A forward fill stopped early at the end of the available data.
    pub reached_end: bool,
}

/// Read up to `count` lines from `from` in `direction`.
pub fn read_lines(
    content: &dyn Content,
    direction: Direction,
    from: u64,
    count: usize,
    chunks: ScanChunks,
) -> crate::error::Result<FillReport> {
    let mut lines = Vec::with_capacity(count);
    match direction {
        Direction::Forward => {
            let mut reader = ForwardReader::with_chunk_size(content, from, chunks.forward);
            while lines.len() < count {
                match reader.read_line()? {
                    Some(line) => lines.push(line),
                    None => break,
                }
            }
        }
        Direction::Backward => {
            let mut reader = BackwardReader::with_chunk_size(content, from, chunks.backward);
            while lines.len() < count {
                match reader.read_line()? {
                    Some(line) => lines.push(line),
                    None => break,
                }
            }
        }
    }
    let reached_end = direction == Direction::Forward && lines.len() < count;
    Ok(FillReport {
        direction,
        from,
        lines,
        reached_end,
    })
}

/// Run [`read_lines`] on the blocking pool and enqueue the report.
pub fn spawn_fill<A>(
    content: Arc<dyn Content>,
    direction: Direction,
    from: u64,
    count: usize,
    chunks: ScanChunks,
    reactor: ReactorHandle<A>,
) where
    A: From<FillReport> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        match read_lines(&*content, direction, from, count, chunks) {
            Ok(report) => {
                reactor.log().record(
                    Level::Trace,
                    "fill",
                    &format!("{:?} from {}: {} lines", direction, from, report.lines.len()),
                );
                reactor.enqueue(A::from(report), "fill.loaded");
            }
            Err(e) => reactor.fail(e),
        }
    });
}
