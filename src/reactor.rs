//! Single-threaded run-to-completion event loop.
//!
//! The reactor is the only place application state is mutated. Background workers
//! never touch that state: they enqueue plain-data actions through a cloneable
//! [`ReactorHandle`] and the reactor applies them one at a time, in FIFO order,
//! each to completion, followed by the dispatcher's post-action hook (which is
//! where rendering happens).
//!
//! A stop request is checked before every dequeue and therefore wins over queued
//! actions, but never interrupts an action that is already running.

use crate::error::{PagerError, Result};
use crate::logger::{self, Level, SharedLog};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

/// State owner driven by the reactor.
pub trait Dispatcher {
    type Action: Send + 'static;

    /// Apply one action. Must not block.
    fn dispatch(&mut self, action: Self::Action, reactor: &ReactorHandle<Self::Action>);

    /// Runs after every action.
    fn after_action(&mut self, _reactor: &ReactorHandle<Self::Action>) {}
}

/// An action together with the label of whoever enqueued it.
#[derive(Debug)]
pub struct Envelope<A> {
    pub action: A,
    pub source: &'static str,
}

#[derive(Debug, Default)]
struct StopState {
    requested: bool,
    taken: bool,
    error: Option<PagerError>,
}

#[derive(Debug, Default)]
struct StopSignal {
    state: Mutex<StopState>,
    notify: Notify,
}

impl StopSignal {
    /// Record a stop request. Returns false if another request got there first.
    fn request(&self, error: Option<PagerError>) -> bool {
        {
            let mut state = self.state.lock();
            if state.requested {
                return false;
            }
            state.requested = true;
            state.error = error;
        }
        self.notify.notify_one();
        true
    }

    fn take(&self) -> Option<Result<()>> {
        let mut state = self.state.lock();
        if !state.requested || state.taken {
            return None;
        }
        state.taken = true;
        Some(match state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        })
    }

    fn is_requested(&self) -> bool {
        self.state.lock().requested
    }
}

/// Thread-safe entry point into a [`Reactor`].
pub struct ReactorHandle<A> {
    tx: mpsc::UnboundedSender<Envelope<A>>,
    stop: Arc<StopSignal>,
    cycles: Arc<AtomicU64>,
    log: SharedLog,
}

impl<A> Clone for ReactorHandle<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            stop: Arc::clone(&self.stop),
            cycles: Arc::clone(&self.cycles),
            log: Arc::clone(&self.log),
        }
    }
}

impl<A: Send + 'static> ReactorHandle<A> {
    /// Queue `action` for execution on the reactor.
    ///
    /// Returns false when the reactor has already shut down.
    pub fn enqueue(&self, action: A, source: &'static str) -> bool {
        self.tx.send(Envelope { action, source }).is_ok()
    }

    /// Ask the reactor to stop. `None` is a clean shutdown. The first request wins;
    /// later ones are ignored.
    pub fn stop(&self, error: Option<PagerError>) {
        let message = match &error {
            Some(error) => format!("stop requested: {}", error),
            None => "stop requested".to_string(),
        };
        if self.stop.request(error) {
            self.log.record(Level::Debug, "reactor", &message);
        }
    }

    /// Stop the reactor with a fatal error.
    pub fn fail(&self, error: PagerError) {
        self.log.record(Level::Error, "reactor", &error.to_string());
        self.stop(Some(error));
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.is_requested()
    }

    /// Number of actions executed so far.
    pub fn cycle(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> &SharedLog {
        &self.log
    }
}

/// The event loop itself.
pub struct Reactor<A> {
    rx: mpsc::UnboundedReceiver<Envelope<A>>,
    handle: ReactorHandle<A>,
}

impl<A: Send + 'static> Reactor<A> {
    pub fn new() -> Self {
        Self::with_log(logger::noop())
    }

    pub fn with_log(log: SharedLog) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            handle: ReactorHandle {
                tx,
                stop: Arc::new(StopSignal::default()),
                cycles: Arc::new(AtomicU64::new(0)),
                log,
            },
        }
    }

    pub fn handle(&self) -> ReactorHandle<A> {
        self.handle.clone()
    }

    pub fn cycle(&self) -> u64 {
        self.handle.cycle()
    }

    /// Execute queued actions until a stop is requested.
    ///
    /// Returns the error carried by the stop request, or `Ok(())` for a clean stop.
    pub async fn run<D>(&mut self, dispatcher: &mut D) -> Result<()>
    where
        D: Dispatcher<Action = A>,
    {
        loop {
            if let Some(outcome) = self.handle.stop.take() {
                return outcome;
            }

            let envelope = tokio::select! {
                biased;
                _ = self.handle.stop.notify.notified() => continue,
                envelope = self.rx.recv() => envelope,
            };
            // The reactor holds a sender itself, so the channel cannot close.
            let Some(Envelope { action, source }) = envelope else {
                return Ok(());
            };

            let cycle = self.handle.cycles.fetch_add(1, Ordering::SeqCst) + 1;
            self.handle
                .log
                .record(Level::Trace, source, &format!("cycle {}", cycle));

            dispatcher.dispatch(action, &self.handle);
            dispatcher.after_action(&self.handle);
        }
    }
}

impl<A: Send + 'static> Default for Reactor<A> {
    fn default() -> Self {
        Self::new()
    }
}
