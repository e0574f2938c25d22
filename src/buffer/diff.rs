//! Diffing Engine: Generate minimal ANSI sequences for a flushed region.
//!
//! The terminal surface keeps two grids: what the renderer has drawn
//! (`next`) and what the physical display currently shows (`current`).
//! Flushing a region:
//! 1. Compares the two grids inside the region only
//! 2. Generates ANSI escape sequences for changed cells
//! 3. Skips cursor moves when the next changed cell is adjacent
//! 4. Tracks the emitted style to avoid redundant SGR sequences
//!
//! All output is accumulated in a single buffer and written with one syscall.

use super::{Buffer, Cell, Modifiers, Rgb, Style};
use crate::layout::Rect;
use std::io::Write;

/// State tracker for the diffing algorithm.
///
/// This tracks the physical terminal state (cursor position and style)
/// to minimize the number of escape sequences we need to emit.
#[derive(Debug, Clone)]
pub struct DiffState {
    /// Last known cursor X position (0-indexed).
    cursor_x: u16,
    /// Last known cursor Y position (0-indexed).
    cursor_y: u16,
    /// Last emitted style.
    style: Option<Style>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor_x: u16::MAX,
            cursor_y: u16::MAX,
            style: None,
        }
    }

    /// Reset the state (e.g., after a full screen clear).
    pub const fn reset(&mut self) {
        self.style = None;
        // Force cursor move on next write
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
    }
}

/// Result of a diff operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of style change sequences emitted.
    pub style_changes: usize,
}

/// Render the difference between two grids inside `rect`.
///
/// Changed cells are also copied into `current`, so after the call
/// `current` matches `next` within the region.
pub fn render_region(
    current: &mut Buffer,
    next: &Buffer,
    rect: Rect,
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let rect = rect.clamp_to(next.area());

    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let (Some(current_cell), Some(next_cell)) = (current.get(x, y), next.get(x, y)) else {
                continue;
            };

            // Skip if cells are identical
            if current_cell == next_cell {
                continue;
            }

            result.cells_changed += 1;

            // Emit cursor move if not adjacent to last position
            if state.cursor_y != y || state.cursor_x != x {
                emit_cursor_move(output, x, y);
                state.cursor_x = x;
                state.cursor_y = y;
                result.cursor_moves += 1;
            }

            if state.style != Some(next_cell.style()) {
                emit_style(output, next_cell.style(), state.style);
                state.style = Some(next_cell.style());
                result.style_changes += 1;
            }

            emit_cell(output, next_cell);
            state.cursor_x = state.cursor_x.saturating_add(1);
        }
    }

    current.copy_rect_from(next, rect);
    result
}

/// Emit a cursor move sequence.
///
/// Uses the most compact representation:
/// - `\x1b[H` for home (1,1)
/// - `\x1b[{row}H` for column 1
/// - `\x1b[{row};{col}H` otherwise
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    // ANSI uses 1-indexed positions
    let row = u32::from(y) + 1;
    let col = u32::from(x) + 1;

    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

/// Emit the transition from `old` to `new`.
///
/// Dropping a modifier needs a full SGR reset, after which the colors are
/// re-emitted as well.
fn emit_style(output: &mut Vec<u8>, new: Style, old: Option<Style>) {
    let old_mods = old.map_or(Modifiers::empty(), |s| s.modifiers);
    let removed = old_mods.difference(new.modifiers);

    let old = if removed.is_empty() {
        old
    } else {
        output.extend_from_slice(b"\x1b[0m");
        None
    };

    if old.map(|s| s.fg) != Some(new.fg) {
        emit_fg_color(output, new.fg);
    }
    if old.map(|s| s.bg) != Some(new.bg) {
        emit_bg_color(output, new.bg);
    }

    let added = new
        .modifiers
        .difference(old.map_or(Modifiers::empty(), |s| s.modifiers));
    if added.contains(Modifiers::BOLD) {
        output.extend_from_slice(b"\x1b[1m");
    }
    if added.contains(Modifiers::BLINK) {
        output.extend_from_slice(b"\x1b[5m");
    }
}

/// Emit a foreground color sequence (true color).
#[inline]
fn emit_fg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
}

/// Emit a background color sequence (true color).
#[inline]
fn emit_bg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
}

#[inline]
fn emit_cell(output: &mut Vec<u8>, cell: &Cell) {
    let mut utf8 = [0u8; 4];
    output.extend_from_slice(cell.ch().encode_utf8(&mut utf8).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Style {
        Style::new(Rgb::new(255, 0, 0), Rgb::BLACK)
    }

    #[test]
    fn test_diff_identical_buffers() {
        let mut a = Buffer::new(10, 5);
        let b = Buffer::new(10, 5);
        let mut output = Vec::new();
        let mut state = DiffState::new();

        let result = render_region(&mut a, &b, b.area(), &mut output, &mut state);

        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let mut a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.set(5, 2, Cell::new('X'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_region(&mut a, &b, b.area(), &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
        let output_str = String::from_utf8_lossy(&output);
        assert!(output_str.contains("\x1b[3;6H"));
        assert!(output_str.ends_with('X'));
        // The current grid has caught up.
        assert_eq!(a, b);
    }

    #[test]
    fn test_diff_adjacent_cells_single_cursor_move() {
        let mut a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.set(3, 0, Cell::new('A'));
        b.set(4, 0, Cell::new('B'));
        b.set(5, 0, Cell::new('C'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_region(&mut a, &b, b.area(), &mut output, &mut state);

        assert_eq!(result.cells_changed, 3);
        assert_eq!(result.cursor_moves, 1);
    }

    #[test]
    fn test_diff_style_tracking() {
        let mut a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.set(0, 0, Cell::new('A').with_style(red()));
        b.set(1, 0, Cell::new('B').with_style(red()));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_region(&mut a, &b, b.area(), &mut output, &mut state);

        assert_eq!(result.style_changes, 1);
    }

    #[test]
    fn test_diff_region_is_respected() {
        let mut a = Buffer::new(20, 10);
        let mut b = Buffer::new(20, 10);
        b.set(0, 0, Cell::new('X'));
        b.set(10, 5, Cell::new('Y'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_region(&mut a, &b, Rect::column(10, 10), &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
        // Outside the region the current grid is untouched.
        assert_eq!(a.get(0, 0).map(Cell::ch), Some(' '));
    }

    #[test]
    fn test_dropping_modifier_resets() {
        let mut output = Vec::new();
        let bold = red().with_modifiers(Modifiers::BOLD);
        emit_style(&mut output, red(), Some(bold));
        let output_str = String::from_utf8_lossy(&output);
        assert!(output_str.starts_with("\x1b[0m"));
        assert!(output_str.contains("38;2;255;0;0"));
    }

    #[test]
    fn test_cursor_move_optimization() {
        let mut output = Vec::new();
        emit_cursor_move(&mut output, 0, 0);
        assert_eq!(&output, b"\x1b[H");

        output.clear();
        emit_cursor_move(&mut output, 0, 5);
        assert_eq!(&output, b"\x1b[6H");

        output.clear();
        emit_cursor_move(&mut output, 10, 5);
        assert_eq!(&output, b"\x1b[6;11H");
    }
}
