//! Keyboard and terminal input.
//!
//! [`raw`] turns crossterm events into [`InputEvent`]s on a dedicated thread. Keys
//! go to the open [`Prompt`] if there is one, otherwise through the [`bindings`]
//! table.

pub mod bindings;
pub mod keys;
pub mod prompt;
pub mod raw;

pub use bindings::{lookup, Command};
pub use keys::Key;
pub use prompt::{Prompt, PromptEvent, PromptKind, Submission};
pub use raw::{spawn_input_thread, InputEvent, ScrollDirection};
