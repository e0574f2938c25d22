//! In-memory grid surface.

use super::Surface;
use crate::buffer::{Buffer, Cell, Style};
use crate::error::DrawError;
use crate::layout::Rect;

/// Draw-call bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceCounters {
    /// `draw_char` plus `draw_str` calls.
    pub draw_calls: u64,
    /// `set_style` calls.
    pub style_sets: u64,
    /// Regions flushed, in order.
    pub flushes: Vec<Rect>,
}

/// A surface that draws into a [`Buffer`] and never leaves memory.
#[derive(Debug, Clone)]
pub struct GridSurface {
    buffer: Buffer,
    style: Style,
    counters: SurfaceCounters,
}

impl GridSurface {
    /// Create a blank surface.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            style: Style::DEFAULT,
            counters: SurfaceCounters::default(),
        }
    }

    /// The drawn cells.
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Draw-call bookkeeping since creation or the last reset.
    pub const fn counters(&self) -> &SurfaceCounters {
        &self.counters
    }

    /// Zero the counters.
    pub fn reset_counters(&mut self) {
        self.counters = SurfaceCounters::default();
    }

    fn out_of_bounds(&self, x: u16, y: u16, text: &str) -> DrawError {
        DrawError::OutOfBounds {
            x,
            y,
            text: text.to_string(),
            width: self.buffer.width(),
            height: self.buffer.height(),
        }
    }
}

impl Surface for GridSurface {
    fn size(&self) -> (u16, u16) {
        (self.buffer.width(), self.buffer.height())
    }

    fn set_style(&mut self, style: Style) {
        self.counters.style_sets += 1;
        self.style = style;
    }

    fn draw_char(&mut self, x: u16, y: u16, ch: char) -> Result<(), DrawError> {
        self.counters.draw_calls += 1;
        if self.buffer.set(x, y, Cell::new(ch).with_style(self.style)) {
            Ok(())
        } else {
            Err(self.out_of_bounds(x, y, ch.encode_utf8(&mut [0; 4])))
        }
    }

    fn draw_str(&mut self, x: u16, y: u16, text: &str) -> Result<(), DrawError> {
        self.counters.draw_calls += 1;
        let len = text.chars().count();
        let fits = y < self.buffer.height()
            && usize::from(x) + len <= usize::from(self.buffer.width());
        if !fits {
            return Err(self.out_of_bounds(x, y, text));
        }
        for (col, ch) in (x..).zip(text.chars()) {
            self.buffer.set(col, y, Cell::new(ch).with_style(self.style));
        }
        Ok(())
    }

    fn flush(&mut self, region: Rect) -> Result<(), DrawError> {
        self.counters.flushes.push(region);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;

    #[test]
    fn test_draw_uses_ambient_style() {
        let mut surface = GridSurface::new(10, 3);
        let green = Style::new(Rgb::new(0, 205, 0), Rgb::BLACK);
        surface.set_style(green);
        surface.draw_str(2, 1, "abc").unwrap();
        surface.draw_char(5, 1, 'd').unwrap();

        assert_eq!(surface.buffer().row_text(1), "  abcd    ");
        assert_eq!(surface.buffer().get(4, 1).map(Cell::style), Some(green));
        assert_eq!(surface.counters().draw_calls, 2);
    }

    #[test]
    fn test_draw_out_of_bounds_reports_position() {
        let mut surface = GridSurface::new(4, 2);
        let err = surface.draw_str(2, 0, "xyz").unwrap_err();
        match err {
            DrawError::OutOfBounds { x, y, text, width, height } => {
                assert_eq!((x, y, width, height), (2, 0, 4, 2));
                assert_eq!(text, "xyz");
            }
            DrawError::Io(_) => panic!("unexpected io error"),
        }
        // Nothing was drawn.
        assert_eq!(surface.buffer().row_text(0), "    ");

        assert!(surface.draw_char(0, 2, 'q').is_err());
    }

    #[test]
    fn test_flush_is_recorded() {
        let mut surface = GridSurface::new(4, 2);
        surface.flush(Rect::column(1, 2)).unwrap();
        surface.flush_all().unwrap();
        assert_eq!(
            surface.counters().flushes,
            vec![Rect::column(1, 2), Rect::from_size(4, 2)]
        );
    }
}
