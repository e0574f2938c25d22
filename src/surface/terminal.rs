//! Terminal surface: a grid that flushes minimal ANSI to a writer.
//!
//! Draw calls only touch the back grid. `flush` diffs the requested region
//! against the front grid (what the display shows), accumulates the escape
//! sequences and writes them in a single `write_all`.

use super::{GridSurface, Surface};
use crate::buffer::diff::{render_region, DiffState};
use crate::buffer::{Buffer, Cell, Style};
use crate::error::DrawError;
use crate::layout::Rect;
use std::io::Write;

/// A [`Surface`] backed by a real terminal (or any byte sink).
pub struct TerminalSurface<W: Write> {
    back: GridSurface,
    front: Buffer,
    writer: W,
    state: DiffState,
    output: Vec<u8>,
    bytes_written: u64,
}

impl<W: Write> TerminalSurface<W> {
    /// Create a surface of the given size writing to `writer`.
    ///
    /// The display is assumed blank; the caller clears it during setup.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            back: GridSurface::new(width, height),
            front: Buffer::new(width, height),
            writer,
            state: DiffState::new(),
            output: Vec::with_capacity(65536),
            bytes_written: 0,
        }
    }

    /// Total bytes written so far.
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// The grid as last drawn (not necessarily flushed).
    pub const fn grid(&self) -> &GridSurface {
        &self.back
    }

    /// The grid as currently shown on the display.
    pub const fn front(&self) -> &Buffer {
        &self.front
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (u16, u16) {
        self.back.size()
    }

    fn set_style(&mut self, style: Style) {
        self.back.set_style(style);
    }

    fn draw_char(&mut self, x: u16, y: u16, ch: char) -> Result<(), DrawError> {
        self.back.draw_char(x, y, ch)
    }

    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> Result<(), DrawError> {
        self.back.draw_str(x, y, text)
    }

    fn flush(&mut self, region: Rect) -> Result<(), DrawError> {
        self.output.clear();
        render_region(
            &mut self.front,
            self.back.buffer(),
            region,
            &mut self.output,
            &mut self.state,
        );

        if !self.output.is_empty() {
            self.writer.write_all(&self.output)?;
            self.writer.flush()?;
            self.bytes_written += self.output.len() as u64;
        }
        Ok(())
    }

    /// Clear the display and mark every front cell stale.
    ///
    /// The erase uses the terminal's own colors, which need not match
    /// [`Style::DEFAULT`], so nothing on screen is assumed to match the back
    /// grid until it has been rewritten.
    fn invalidate(&mut self) -> Result<(), DrawError> {
        self.writer.write_all(b"\x1b[0m\x1b[2J")?;
        self.writer.flush()?;
        self.front.fill(Cell::STALE);
        self.state.reset();
        Ok(())
    }
}
