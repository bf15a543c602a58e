//! Rendering: model to grid, grid to terminal bytes.
//!
//! [`view::compose`] lays the model out on a [`ScreenState`]; [`screen::diff`]
//! computes the bytes that move the terminal from the last written grid to the new
//! one; [`ScreenWriter`] runs those writes in the background, one at a time.

pub mod screen;
pub mod style;
pub mod view;
pub mod writer;

pub use screen::{diff, ScreenState};
pub use style::{Colour, Style};
pub use view::{compose, Frame};
pub use writer::{sink, ScreenWriter, Sink, WriteCompleted};
