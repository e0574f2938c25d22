//! Buffer module: The cell grid behind every drawing surface.
//!
//! This module contains:
//! - [`Cell`]: One character plus its resolved [`Style`]
//! - [`Buffer`]: A grid of cells representing the screen
//! - [`Rgb`] / [`Modifiers`]: The attribute vocabulary of the surfaces
//! - [`diff`]: Region diffing for minimal ANSI output

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use cell::{Cell, Modifiers, Rgb, Style};
pub use buffer::Buffer;
