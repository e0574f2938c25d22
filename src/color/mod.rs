//! Color module: turning lines into colorized cells.
//!
//! - [`ColorTag`]: color plus optional bold/blink, fixed at rule definition
//! - [`Colorizer`]: ordered regex rules, later rules win on overlap
//! - [`Palette`]: tag to terminal [`Style`](crate::buffer::Style) mapping

mod colorizer;
mod palette;
mod tag;

pub use colorizer::{Colorizer, Rule, DEFAULT_RULES};
pub use palette::Palette;
pub use tag::{Color, ColorCell, ColorTag, Modifier, UnknownColor};
