//! # rpager - a pager for huge and growing files
//!
//! A `less`-style terminal viewer that shows an arbitrary window of lines from a
//! file far larger than memory, keeps following the file while it grows, and stays
//! responsive while the disk or a pipe is slow.
//!
//! ## Architecture
//!
//! - [`reactor`] - single-threaded event loop; the only place state is mutated
//! - [`content`] - random-access byte sources (files, stdin, decompressed archives)
//! - [`reader`] - forward and backward line readers over a content source
//! - [`model`] - the line windows around the anchor and their repositioning
//! - [`search`] - cancellable background scans (regex search, seek, bisect)
//! - [`render`] - screen composition, minimal diffs and the coalescing writer
//! - [`input`] - key decoding, prompts and the binding table
//! - [`app`] - the dispatcher that wires everything together

pub mod app;
pub mod cancel;
pub mod config;
pub mod content;
pub mod error;
pub mod input;
pub mod logger;
pub mod model;
pub mod reactor;
pub mod reader;
pub mod render;
pub mod search;

pub use app::{Pager, PagerAction};
pub use config::Config;
pub use content::Content;
pub use error::{PagerError, Result};
pub use reactor::{Reactor, ReactorHandle};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
