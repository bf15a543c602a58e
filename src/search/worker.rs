//! Background execution of long operations.
//!
//! A long operation runs on the blocking pool with the cancellation token it was
//! issued. Whatever happens, exactly one [`OperationReport`] is enqueued when it
//! ends; the reactor uses it to settle its in-flight count and checks the attached
//! token before applying the outcome.

use crate::cancel::CancelToken;
use crate::content::Content;
use crate::logger::Level;
use crate::reactor::ReactorHandle;
use crate::search::engine::{Direction, Scan, Scanner};
use crate::search::Pattern;
use std::sync::Arc;

/// A unit of work that may scan an arbitrary amount of the content.
#[derive(Debug, Clone)]
pub enum LongOperation {
    Search {
        pattern: Pattern,
        start: u64,
        direction: Direction,
        /// Skip the line starting at `start` before matching.
        skip_current: bool,
    },
    Seek {
        percent: u64,
    },
    Bisect {
        prefix: Vec<u8>,
    },
    Bottom {
        page: usize,
    },
}

impl LongOperation {
    pub fn name(&self) -> &'static str {
        match self {
            LongOperation::Search { .. } => "search",
            LongOperation::Seek { .. } => "seek",
            LongOperation::Bisect { .. } => "bisect",
            LongOperation::Bottom { .. } => "bottom",
        }
    }

    /// Status message shown when the operation found nothing.
    pub fn not_found_message(&self) -> &'static str {
        match self {
            LongOperation::Search { .. } => "Pattern not found",
            LongOperation::Bisect { .. } => "No line at or after prefix",
            LongOperation::Seek { .. } | LongOperation::Bottom { .. } => "Nothing to show",
        }
    }

    fn run(&self, scanner: &Scanner<'_>) -> crate::error::Result<Scan<u64>> {
        match self {
            LongOperation::Search {
                pattern,
                start,
                direction,
                skip_current,
            } => {
                let start = if *skip_current {
                    scanner.next_line_start(*start)?
                } else {
                    *start
                };
                scanner.find(pattern, start, *direction)
            }
            LongOperation::Seek { percent } => scanner.seek_percent(*percent),
            LongOperation::Bisect { prefix } => scanner.bisect(prefix),
            LongOperation::Bottom { page } => scanner.last_page(*page),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Reposition to this line start.
    MoveTo(u64),
    NotFound(&'static str),
    Cancelled,
    /// An I/O error; the reactor has already been asked to stop.
    Failed,
}

/// Completion of one long operation.
#[derive(Debug, Clone)]
pub struct OperationReport {
    pub token: CancelToken,
    pub operation: &'static str,
    pub outcome: OperationOutcome,
}

/// Reader chunk sizes handed to scans.
#[derive(Debug, Clone, Copy)]
pub struct ScanChunks {
    pub forward: usize,
    pub backward: usize,
}

/// Run `operation` on the blocking pool and report back through `reactor`.
pub fn spawn_long_operation<A>(
    content: Arc<dyn Content>,
    operation: LongOperation,
    token: CancelToken,
    chunks: ScanChunks,
    reactor: ReactorHandle<A>,
) -> tokio::task::JoinHandle<()>
where
    A: From<OperationReport> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let scanner =
            Scanner::new(&*content, &token).with_chunks(chunks.forward, chunks.backward);
        let outcome = match operation.run(&scanner) {
            Ok(Scan::Found(offset)) => OperationOutcome::MoveTo(offset),
            Ok(Scan::Exhausted) => OperationOutcome::NotFound(operation.not_found_message()),
            Ok(Scan::Cancelled) => OperationOutcome::Cancelled,
            Err(e) => {
                reactor.fail(e);
                OperationOutcome::Failed
            }
        };
        reactor.log().record(
            Level::Debug,
            operation.name(),
            &format!("token {} finished: {:?}", token.id(), outcome),
        );
        let report = OperationReport {
            token,
            operation: operation.name(),
            outcome,
        };
        reactor.enqueue(A::from(report), "search.finished");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryContent;
    use crate::reactor::{Dispatcher, Reactor};
    use std::time::Duration;

    struct Collect(Vec<OperationReport>);

    impl Dispatcher for Collect {
        type Action = OperationReport;

        fn dispatch(&mut self, report: OperationReport, reactor: &ReactorHandle<OperationReport>) {
            self.0.push(report);
            reactor.stop(None);
        }
    }

    const CHUNKS: ScanChunks = ScanChunks {
        forward: 16,
        backward: 16,
    };

    async fn run_one(text: &str, operation: LongOperation, token: CancelToken) -> OperationReport {
        let content: Arc<dyn Content> = Arc::new(MemoryContent::new(text.as_bytes()));
        let mut reactor = Reactor::new();
        spawn_long_operation(content, operation, token, CHUNKS, reactor.handle());
        let mut collect = Collect(Vec::new());
        tokio::time::timeout(Duration::from_secs(2), reactor.run(&mut collect))
            .await
            .expect("no report")
            .unwrap();
        collect.0.remove(0)
    }

    #[tokio::test]
    async fn search_reports_match_offset() {
        let operation = LongOperation::Search {
            pattern: Pattern::compile("beta").unwrap(),
            start: 0,
            direction: Direction::Forward,
            skip_current: false,
        };
        let report = run_one("alpha\nbeta\n", operation, CancelToken::new()).await;
        assert_eq!(report.outcome, OperationOutcome::MoveTo(6));
        assert_eq!(report.operation, "search");
    }

    #[tokio::test]
    async fn exhausted_search_reports_not_found() {
        let operation = LongOperation::Search {
            pattern: Pattern::compile("gamma").unwrap(),
            start: 0,
            direction: Direction::Forward,
            skip_current: false,
        };
        let report = run_one("alpha\nbeta\n", operation, CancelToken::new()).await;
        assert_eq!(report.outcome, OperationOutcome::NotFound("Pattern not found"));
    }

    #[tokio::test]
    async fn skipping_current_line_finds_the_next_match() {
        let operation = LongOperation::Search {
            pattern: Pattern::compile("beta").unwrap(),
            start: 0,
            direction: Direction::Forward,
            skip_current: true,
        };
        let report = run_one("beta 1\nalpha\nbeta 2\n", operation, CancelToken::new()).await;
        assert_eq!(report.outcome, OperationOutcome::MoveTo(13));
    }

    #[tokio::test]
    async fn cancelled_operation_still_reports() {
        let token = CancelToken::new();
        token.cancel();
        let report = run_one("a\n", LongOperation::Bottom { page: 3 }, token.clone()).await;
        assert_eq!(report.outcome, OperationOutcome::Cancelled);
        assert!(report.token.same_as(&token));
    }
}
