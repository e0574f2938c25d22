//! Frame strategy selection.

/// How a frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Every visible cell, row by row, then one whole-surface flush.
    Full,
    /// Only the lanes that moved, column by column.
    Incremental,
}

/// Pick the strategy for a frame.
///
/// Full when forced, or when strictly more than `threshold` of the lanes
/// advanced; incremental otherwise.
pub fn select_strategy(advanced: usize, lanes: usize, threshold: f64, force: bool) -> Strategy {
    #[allow(clippy::cast_precision_loss)]
    let moved = advanced as f64 > threshold * lanes as f64;
    if force || moved {
        Strategy::Full
    } else {
        Strategy::Incremental
    }
}
