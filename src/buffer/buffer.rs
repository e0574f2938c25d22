//! Buffer: A grid of cells backing a drawing surface.
//!
//! The buffer uses contiguous memory allocation for cache efficiency.
//! Cells are stored in row-major order.

use super::cell::Cell;
use crate::layout::Rect;

/// A grid of cells representing the drawable screen area.
///
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// All cells are initialized to empty (space with default style).
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Buffer dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full area of the buffer.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Copy the cells inside `rect` from another buffer of the same size.
    pub fn copy_rect_from(&mut self, other: &Self, rect: Rect) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        let rect = rect.clamp_to(self.area());
        for y in rect.y..rect.bottom() {
            let start = (y as usize) * (self.width as usize) + rect.x as usize;
            let end = start + rect.width as usize;
            self.cells[start..end].copy_from_slice(&other.cells[start..end]);
        }
    }

    /// Clear the entire buffer (fill with empty cells).
    pub fn clear(&mut self) {
        self.fill(Cell::EMPTY);
    }

    /// Set every cell to `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Read one row back as text (test and debugging helper).
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(y as usize)
            .map(|row| row.iter().map(Cell::ch).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_new() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.rows().count(), 24);
    }

    #[test]
    #[should_panic]
    fn test_buffer_zero_width() {
        Buffer::new(0, 24);
    }

    #[test]
    fn test_buffer_bounds() {
        let mut buffer = Buffer::new(80, 24);
        assert!(buffer.get(79, 23).is_some());
        assert!(buffer.get(80, 23).is_none());
        assert!(buffer.get(79, 24).is_none());
        assert!(!buffer.set(80, 0, Cell::new('X')));
    }

    #[test]
    fn test_buffer_row_text() {
        let mut buffer = Buffer::new(3, 2);
        buffer.set(0, 1, Cell::new('a'));
        buffer.set(2, 1, Cell::new('c'));
        assert_eq!(buffer.row_text(1), "a c");
        assert_eq!(buffer.row_text(5), "");
    }

    #[test]
    fn test_copy_rect_from_only_touches_rect() {
        let mut front = Buffer::new(4, 3);
        let mut back = Buffer::new(4, 3);
        back.set(1, 0, Cell::new('x'));
        back.set(2, 0, Cell::new('y'));

        front.copy_rect_from(&back, Rect::new(1, 0, 1, 3));

        assert_eq!(front.get(1, 0).map(Cell::ch), Some('x'));
        assert_eq!(front.get(2, 0).map(Cell::ch), Some(' '));
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = Buffer::new(10, 10);
        buffer.set(5, 5, Cell::new('X'));
        buffer.clear();
        assert_eq!(buffer.get(5, 5), Some(&Cell::EMPTY));
    }
}
