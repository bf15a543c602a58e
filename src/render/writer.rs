//! Coalescing terminal writer.
//!
//! At most one write is in flight. Snapshots submitted while a write is running
//! replace each other; only the newest one is diffed and written once the running
//! write completes. The write itself runs on the blocking pool, followed by a short
//! settle delay so bursts of renders collapse into a single update.

use crate::error::PagerError;
use crate::logger::Level;
use crate::reactor::ReactorHandle;
use crate::render::screen::{diff, ScreenState};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Destination of terminal bytes, shared with the blocking write task.
pub type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Wrap any writer as a [`Sink`].
pub fn sink<W: Write + Send + 'static>(writer: W) -> Sink {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Enqueued once a dispatched write has been flushed and has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteCompleted;

pub struct ScreenWriter {
    sink: Sink,
    settle: Duration,
    /// Most recently submitted snapshot not yet dispatched.
    pending: Option<ScreenState>,
    /// What the terminal shows, as far as we know.
    baseline: Option<ScreenState>,
    in_flight: Option<ScreenState>,
    /// A forced repaint arrived while a write was in flight.
    invalidated: bool,
    writes: u64,
}

impl ScreenWriter {
    pub fn new(sink: Sink, settle: Duration) -> Self {
        Self {
            sink,
            settle,
            pending: None,
            baseline: None,
            in_flight: None,
            invalidated: false,
            writes: 0,
        }
    }

    /// Submit a snapshot. `force` discards the baseline so the next write repaints
    /// every cell.
    pub fn write<A>(&mut self, state: ScreenState, force: bool, reactor: &ReactorHandle<A>)
    where
        A: From<WriteCompleted> + Send + 'static,
    {
        if force {
            self.baseline = None;
            if self.in_flight.is_some() {
                self.invalidated = true;
            }
        }
        self.pending = Some(state);
        if self.in_flight.is_none() {
            self.dispatch(reactor);
        }
    }

    /// Handle [`WriteCompleted`]: promote the written snapshot and dispatch the next.
    pub fn complete<A>(&mut self, reactor: &ReactorHandle<A>)
    where
        A: From<WriteCompleted> + Send + 'static,
    {
        let written = self.in_flight.take();
        if std::mem::take(&mut self.invalidated) {
            self.baseline = None;
        } else if written.is_some() {
            self.baseline = written;
        }
        if self.pending.is_some() {
            self.dispatch(reactor);
        }
    }

    pub fn is_writing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn baseline(&self) -> Option<&ScreenState> {
        self.baseline.as_ref()
    }

    /// Number of writes dispatched so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn dispatch<A>(&mut self, reactor: &ReactorHandle<A>)
    where
        A: From<WriteCompleted> + Send + 'static,
    {
        let Some(state) = self.pending.take() else {
            return;
        };
        let bytes = diff(self.baseline.as_ref(), &state);
        if bytes.is_empty() {
            self.baseline = Some(state);
            return;
        }

        self.in_flight = Some(state);
        self.writes += 1;
        let sink = Arc::clone(&self.sink);
        let settle = self.settle;
        let reactor = reactor.clone();
        tokio::task::spawn_blocking(move || {
            let result = {
                let mut out = sink.lock();
                out.write_all(&bytes).and_then(|()| out.flush())
            };
            if let Err(e) = result {
                reactor.fail(PagerError::terminal("Failed to write to terminal", e));
                return;
            }
            reactor.log().record(
                Level::Trace,
                "render",
                &format!("wrote {} bytes", bytes.len()),
            );
            std::thread::sleep(settle);
            reactor.enqueue(A::from(WriteCompleted), "render.write_completed");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::{Dispatcher, Reactor};
    use crate::render::style::Style;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    enum Action {
        Show(&'static str, bool),
        Done,
    }

    impl From<WriteCompleted> for Action {
        fn from(_: WriteCompleted) -> Self {
            Action::Done
        }
    }

    struct Harness {
        writer: ScreenWriter,
        completions: usize,
        stop_after: usize,
    }

    fn screen(text: &str) -> ScreenState {
        let mut screen = ScreenState::new(1, 8);
        screen.put_str(0, 0, text.as_bytes(), Style::DEFAULT);
        screen
    }

    impl Dispatcher for Harness {
        type Action = Action;

        fn dispatch(&mut self, action: Action, reactor: &ReactorHandle<Action>) {
            match action {
                Action::Show(text, force) => self.writer.write(screen(text), force, reactor),
                Action::Done => {
                    self.completions += 1;
                    self.writer.complete(reactor);
                    if self.completions == self.stop_after {
                        reactor.stop(None);
                    }
                }
            }
        }
    }

    async fn run(actions: Vec<Action>, stop_after: usize) -> (Harness, Vec<u8>) {
        let buffer = SharedBuffer::default();
        let mut harness = Harness {
            writer: ScreenWriter::new(sink(buffer.clone()), Duration::from_millis(1)),
            completions: 0,
            stop_after,
        };
        let mut reactor = Reactor::new();
        let handle = reactor.handle();
        for action in actions {
            handle.enqueue(action, "test");
        }
        tokio::time::timeout(Duration::from_secs(2), reactor.run(&mut harness))
            .await
            .expect("writer did not settle")
            .unwrap();
        let bytes = buffer.0.lock().clone();
        (harness, bytes)
    }

    #[tokio::test]
    async fn burst_coalesces_to_latest_snapshot() {
        let actions = vec![
            Action::Show("one", false),
            Action::Show("two", false),
            Action::Show("three", false),
        ];
        let (harness, bytes) = run(actions, 2).await;

        // "one" is dispatched at once; "two" is superseded while it is in flight.
        assert_eq!(harness.writer.writes(), 2);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("one"));
        assert!(!text.contains("two"));
        assert!(text.contains("three"));
        assert_eq!(harness.writer.baseline(), Some(&screen("three")));
    }

    #[tokio::test]
    async fn unchanged_snapshot_is_not_written() {
        let actions = vec![Action::Show("same", false)];
        let (mut harness, _) = run(actions, 1).await;

        let reactor: Reactor<Action> = Reactor::new();
        harness.writer.write(screen("same"), false, &reactor.handle());
        assert!(!harness.writer.is_writing());
        assert_eq!(harness.writer.writes(), 1);
    }

    #[tokio::test]
    async fn force_during_write_repaints_everything() {
        let actions = vec![Action::Show("abc", false), Action::Show("abc", true)];
        let (harness, bytes) = run(actions, 2).await;

        assert_eq!(harness.writer.writes(), 2);
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("abc").count(), 2);
    }
}
