//! Regex search and the other long-running scans over the content.

pub mod engine;
pub mod pattern;
pub mod worker;

pub use engine::{Direction, Scan, Scanner};
pub use pattern::Pattern;
pub use worker::{
    spawn_long_operation, LongOperation, OperationOutcome, OperationReport, ScanChunks,
};
