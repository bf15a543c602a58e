//! Injectable diagnostic logging.
//!
//! Components never reach for a global logger directly. They are handed an
//! `Arc<dyn EventLog>` at construction; tests use [`NoopLog`] (the default) or a
//! capturing implementation, the binary uses [`FacadeLog`] which forwards to the
//! `log` facade initialised by `env_logger`.

use std::sync::Arc;

/// Severity attached to a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for diagnostic records produced by the reactor and its workers.
pub trait EventLog: Send + Sync {
    fn record(&self, level: Level, source: &str, message: &str);
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLog;

impl EventLog for NoopLog {
    fn record(&self, _level: Level, _source: &str, _message: &str) {}
}

/// Forwards records to the `log` crate facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeLog;

impl EventLog for FacadeLog {
    fn record(&self, level: Level, source: &str, message: &str) {
        let level = match level {
            Level::Trace => log::Level::Trace,
            Level::Debug => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warn => log::Level::Warn,
            Level::Error => log::Level::Error,
        };
        log::log!(target: "rpager", level, "[{}] {}", source, message);
    }
}

/// Shared handle type passed to components.
pub type SharedLog = Arc<dyn EventLog>;

/// The default logger: discards everything.
pub fn noop() -> SharedLog {
    Arc::new(NoopLog)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Captures records so tests can assert on them.
    #[derive(Default)]
    pub struct CaptureLog {
        pub records: Mutex<Vec<(Level, String, String)>>,
    }

    impl EventLog for CaptureLog {
        fn record(&self, level: Level, source: &str, message: &str) {
            self.records
                .lock()
                .push((level, source.to_string(), message.to_string()));
        }
    }

    #[test]
    fn capture_log_keeps_order() {
        let log = CaptureLog::default();
        log.record(Level::Debug, "a", "first");
        log.record(Level::Error, "b", "second");

        let records = log.records.lock();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].1, "a");
        assert_eq!(records[1].0, Level::Error);
    }

    #[test]
    fn noop_log_accepts_records() {
        let log = noop();
        log.record(Level::Info, "test", "ignored");
    }
}
