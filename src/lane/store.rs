//! Lane Store: per-lane scroll buffers and similarity history.
//!
//! Appends are bounded by a hard overflow cap and never evict: once a lane is
//! full, new cells are discarded until the renderer has slid the lane forward.
//! Only the renderer trims, so "what has been drawn" is owned in one place.

use crate::cluster::TokenSet;
use crate::color::ColorCell;
use std::collections::VecDeque;

/// Default overflow cap, in cells.
pub const DEFAULT_OVERFLOW_CAP: usize = 1024;

/// Default number of recent token sets kept per lane.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// One vertical column of the display.
#[derive(Debug, Clone, Default)]
pub struct Lane {
    cells: VecDeque<ColorCell>,
    history: VecDeque<TokenSet>,
}

impl Lane {
    /// Buffered cells, oldest first. The head is the top visible row.
    pub const fn cells(&self) -> &VecDeque<ColorCell> {
        &self.cells
    }

    /// Recent token sets, oldest first.
    pub const fn history(&self) -> &VecDeque<TokenSet> {
        &self.history
    }

    /// Number of buffered cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Outcome of admitting a routed line into a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Admission {
    /// Cells appended.
    pub appended: usize,
    /// Cells discarded by the overflow cap.
    pub dropped: usize,
}

/// The fixed set of lanes, created once at startup.
#[derive(Debug, Clone)]
pub struct LaneStore {
    lanes: Vec<Lane>,
    overflow_cap: usize,
    history_capacity: usize,
}

impl LaneStore {
    /// Create `count` empty lanes.
    pub fn new(count: usize, overflow_cap: usize) -> Self {
        Self {
            lanes: vec![Lane::default(); count],
            overflow_cap,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Create `count` lanes already holding `rows` blank cells, so the first
    /// lines scroll in from the bottom of the screen.
    pub fn prefilled(count: usize, overflow_cap: usize, rows: usize) -> Self {
        let blank: VecDeque<_> = std::iter::repeat(ColorCell::BLANK)
            .take(rows.min(overflow_cap))
            .collect();
        let mut store = Self::new(count, overflow_cap);
        for lane in &mut store.lanes {
            lane.cells.clone_from(&blank);
        }
        store
    }

    /// Set how many recent token sets each lane remembers (builder pattern).
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Number of lanes.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Whether there are no lanes.
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// The overflow cap.
    pub const fn overflow_cap(&self) -> usize {
        self.overflow_cap
    }

    /// Read access to one lane.
    pub fn lane(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    /// Iterate all lanes, left to right.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Lane> {
        self.lanes.iter()
    }

    /// Whether a lane can take more cells.
    pub fn has_room(&self, index: usize) -> bool {
        self.lanes
            .get(index)
            .is_some_and(|lane| lane.len() < self.overflow_cap)
    }

    /// Append cells to a lane, keeping only what fits under the cap.
    ///
    /// Returns the number of cells appended.
    pub fn append(&mut self, index: usize, cells: &[ColorCell]) -> usize {
        let cap = self.overflow_cap;
        let Some(lane) = self.lanes.get_mut(index) else {
            return 0;
        };
        let room = cap.saturating_sub(lane.len());
        let taken = cells.len().min(room);
        lane.cells.extend(&cells[..taken]);
        taken
    }

    /// Push a token set into a lane's history, dropping the oldest at
    /// capacity.
    pub fn remember(&mut self, index: usize, tokens: TokenSet) {
        let capacity = self.history_capacity;
        if capacity == 0 {
            return;
        }
        if let Some(lane) = self.lanes.get_mut(index) {
            if lane.history.len() == capacity {
                lane.history.pop_front();
            }
            lane.history.push_back(tokens);
        }
    }

    /// Record a routed line: history plus cells, or nothing at all when the
    /// lane is already at its cap.
    pub fn admit(&mut self, index: usize, tokens: TokenSet, cells: &[ColorCell]) -> Admission {
        if !self.has_room(index) {
            return Admission {
                appended: 0,
                dropped: cells.len(),
            };
        }
        self.remember(index, tokens);
        let appended = self.append(index, cells);
        Admission {
            appended,
            dropped: cells.len() - appended,
        }
    }

    /// Remove up to `count` cells from the head of a lane.
    pub(crate) fn trim_front(&mut self, index: usize, count: usize) -> usize {
        let Some(lane) = self.lanes.get_mut(index) else {
            return 0;
        };
        let count = count.min(lane.cells.len());
        lane.cells.drain(..count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::tokenize;
    use crate::color::{Color, ColorTag};
    use pretty_assertions::assert_eq;

    fn cells(text: &str) -> Vec<ColorCell> {
        text.chars()
            .map(|c| ColorCell::new(c, ColorTag::PLAIN))
            .collect()
    }

    #[test]
    fn test_overflow_drops_new_appends() {
        let mut store = LaneStore::new(4, 10);
        let lines: Vec<ColorCell> = "abcdefghijklmno"
            .chars()
            .map(|c| ColorCell::new(c, ColorTag::new(Color::Green)))
            .collect();

        for cell in &lines {
            store.append(0, std::slice::from_ref(cell));
        }

        let lane = store.lane(0).unwrap();
        assert_eq!(lane.len(), 10);
        // The first ten survive; the last five were discarded, not rotated in.
        let kept: Vec<ColorCell> = lane.cells().iter().copied().collect();
        assert_eq!(kept, lines[..10].to_vec());
        assert!(store.lane(1).unwrap().is_empty());
    }

    #[test]
    fn test_append_truncates_to_cap() {
        let mut store = LaneStore::new(1, 8);
        assert_eq!(store.append(0, &cells("hello")), 5);
        assert_eq!(store.append(0, &cells("world")), 3);
        assert_eq!(store.lane(0).unwrap().len(), 8);
        assert_eq!(store.append(0, &cells("!")), 0);
    }

    #[test]
    fn test_admit_at_cap_skips_history() {
        let mut store = LaneStore::new(1, 4);
        let first = store.admit(0, tokenize("a b"), &cells("abcd"));
        assert_eq!(first, Admission { appended: 4, dropped: 0 });

        let second = store.admit(0, tokenize("c d"), &cells("xy"));
        assert_eq!(second, Admission { appended: 0, dropped: 2 });
        assert_eq!(store.lane(0).unwrap().history().len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut store = LaneStore::new(1, 100).with_history_capacity(2);
        store.remember(0, tokenize("one"));
        store.remember(0, tokenize("two"));
        store.remember(0, tokenize("three"));

        let history: Vec<_> = store.lane(0).unwrap().history().iter().cloned().collect();
        assert_eq!(history, vec![tokenize("two"), tokenize("three")]);
    }

    #[test]
    fn test_default_history_capacity() {
        let mut store = LaneStore::new(1, 100);
        for i in 0..8 {
            store.remember(0, tokenize(&format!("t{i}")));
        }
        assert_eq!(
            store.lane(0).unwrap().history().len(),
            DEFAULT_HISTORY_CAPACITY
        );
    }

    #[test]
    fn test_prefilled_lanes() {
        let store = LaneStore::prefilled(3, 1024, 20);
        assert_eq!(store.len(), 3);
        assert!(store.iter().all(|lane| lane.len() == 20));
        assert!(store
            .iter()
            .all(|lane| lane.cells().iter().all(|c| *c == ColorCell::BLANK)));
    }

    #[test]
    fn test_trim_front() {
        let mut store = LaneStore::new(1, 100);
        store.append(0, &cells("abcdef"));
        assert_eq!(store.trim_front(0, 2), 2);
        assert_eq!(store.lane(0).unwrap().cells().front().map(ColorCell::ch), Some('c'));
        assert_eq!(store.trim_front(0, 50), 4);
        assert!(store.lane(0).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_lane_is_ignored() {
        let mut store = LaneStore::new(2, 10);
        assert_eq!(store.append(5, &cells("x")), 0);
        assert!(!store.has_room(5));
        assert_eq!(store.trim_front(5, 1), 0);
    }
}
