//! Surface module: the drawing target of the render engine.
//!
//! The renderer only needs four things from a surface: its size, a way to
//! set the ambient attribute, single-character and run draw calls, and a
//! flush of a rectangular region. Creation, teardown and resizing belong to
//! whoever owns the terminal.
//!
//! - [`GridSurface`]: in-memory grid, counts draw calls (tests, benches)
//! - [`TerminalSurface`]: grid plus minimal-ANSI flushes to a writer

mod grid;
mod terminal;

pub use grid::{GridSurface, SurfaceCounters};
pub use terminal::TerminalSurface;

use crate::buffer::Style;
use crate::error::DrawError;
use crate::layout::Rect;

/// A drawing surface.
///
/// Styles follow the curses discipline: `set_style` changes the ambient
/// attribute, and every following draw uses it until the next change.
pub trait Surface {
    /// `(width, height)` in cells.
    fn size(&self) -> (u16, u16);

    /// Set the ambient attribute for subsequent draws.
    fn set_style(&mut self, style: Style);

    /// Draw one character.
    fn draw_char(&mut self, x: u16, y: u16, ch: char) -> Result<(), DrawError>;

    /// Draw a run of characters left to right starting at `(x, y)`.
    ///
    /// The whole run must fit on the row; nothing is drawn otherwise.
    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> Result<(), DrawError>;

    /// Push `region` to the physical display.
    fn flush(&mut self, region: Rect) -> Result<(), DrawError>;

    /// Forget what the physical display shows, so the next flush redraws
    /// every non-blank cell. Called after the display was disturbed.
    fn invalidate(&mut self) -> Result<(), DrawError> {
        Ok(())
    }

    /// Push the whole surface to the physical display.
    fn flush_all(&mut self) -> Result<(), DrawError> {
        let (width, height) = self.size();
        self.flush(Rect::from_size(width, height))
    }
}
