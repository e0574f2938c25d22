//! Render Engine: composes lane buffers into surface draw calls.
//!
//! Each call to [`RenderEngine::render`]:
//! 1. Slides every lane that has reached the visible height forward by a
//!    step proportional to its backlog, so far-behind lanes catch up faster
//!    than real time
//! 2. Picks a strategy from the number of lanes that moved
//! 3. Draws either the whole frame (row by row, one draw per color run) or
//!    just the moved columns (one draw per cell, one flush per column)

use super::strategy::{select_strategy, Strategy};
use crate::buffer::Style;
use crate::color::{ColorCell, ColorTag, Palette};
use crate::error::{ConfigError, DrawError};
use crate::lane::{Lane, LaneStore};
use crate::layout::Rect;
use crate::surface::Surface;
use std::time::{Duration, Instant};
use tracing::trace;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Visible rows per lane.
    pub rows: u16,
    /// Repaint the full frame when more than this fraction of lanes moved.
    pub full_repaint_threshold: f64,
    /// A lane of length `L` slides by `max(1, L / slide_divisor)`.
    pub slide_divisor: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rows: 24,
            full_repaint_threshold: 0.3,
            slide_divisor: 200,
        }
    }
}

impl RenderConfig {
    /// Check the repaint threshold.
    ///
    /// # Errors
    ///
    /// Returns an error when the threshold is NaN or outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.full_repaint_threshold) {
            return Err(ConfigError::InvalidRepaintThreshold(
                self.full_repaint_threshold,
            ));
        }
        Ok(())
    }
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Strategy used.
    pub strategy: Strategy,
    /// Lanes that slid forward.
    pub lanes_advanced: usize,
    /// Cells removed from lane heads.
    pub cells_trimmed: usize,
    /// Draw calls issued.
    pub draw_calls: usize,
    /// Time spent composing and flushing.
    pub duration: Duration,
}

/// Accumulated render statistics.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames rendered.
    pub frames: u64,
    /// Frames drawn with the full strategy.
    pub full_frames: u64,
    /// Frames drawn with the incremental strategy.
    pub incremental_frames: u64,
    /// Total draw calls.
    pub draw_calls: u64,
    /// Total cells trimmed from lane heads.
    pub cells_trimmed: u64,
    /// The most recent frame.
    pub last_frame: Option<FrameReport>,
}

impl RenderStats {
    fn record(&mut self, frame: FrameReport) {
        self.frames += 1;
        match frame.strategy {
            Strategy::Full => self.full_frames += 1,
            Strategy::Incremental => self.incremental_frames += 1,
        }
        self.draw_calls += frame.draw_calls as u64;
        self.cells_trimmed += frame.cells_trimmed as u64;
        self.last_frame = Some(frame);
    }
}

/// Slide step for a lane of `len` cells.
#[inline]
pub fn slide_step(len: usize, divisor: usize) -> usize {
    (len / divisor.max(1)).max(1)
}

/// The render engine. Owns the palette for the lifetime of the display.
#[derive(Debug, Clone)]
pub struct RenderEngine {
    config: RenderConfig,
    palette: Palette,
    needs_full_redraw: bool,
    stats: RenderStats,
}

impl RenderEngine {
    /// Create a render engine. The first frame is always a full repaint.
    pub const fn new(config: RenderConfig, palette: Palette) -> Self {
        Self {
            config,
            palette,
            needs_full_redraw: true,
            stats: RenderStats {
                frames: 0,
                full_frames: 0,
                incremental_frames: 0,
                draw_calls: 0,
                cells_trimmed: 0,
                last_frame: None,
            },
        }
    }

    /// The configuration.
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The palette.
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Accumulated statistics.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Make the next frame a full repaint.
    pub const fn request_full_redraw(&mut self) {
        self.needs_full_redraw = true;
    }

    /// Slide the lanes, then draw the frame.
    ///
    /// A draw error aborts the frame: lanes and rows no longer match the
    /// surface and continuing would hide that.
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        lanes: &mut LaneStore,
        surface: &mut S,
    ) -> Result<FrameReport, DrawError> {
        let start = Instant::now();
        let (advanced, cells_trimmed) = self.advance(lanes);

        let force = std::mem::take(&mut self.needs_full_redraw);
        let strategy = select_strategy(
            advanced.len(),
            lanes.len(),
            self.config.full_repaint_threshold,
            force,
        );

        let draw_calls = match strategy {
            Strategy::Full => self.draw_full(lanes, surface),
            Strategy::Incremental => self.draw_incremental(lanes, &advanced, surface),
        }
        .inspect_err(|_| self.needs_full_redraw = true)?;

        let frame = FrameReport {
            strategy,
            lanes_advanced: advanced.len(),
            cells_trimmed,
            draw_calls,
            duration: start.elapsed(),
        };
        trace!(?frame, "frame rendered");
        self.stats.record(frame);
        Ok(frame)
    }

    /// Slide every lane at or past the visible height.
    fn advance(&self, lanes: &mut LaneStore) -> (Vec<usize>, usize) {
        let rows = usize::from(self.config.rows);
        let mut advanced = Vec::new();
        let mut trimmed = 0;
        for index in 0..lanes.len() {
            let len = lanes.lane(index).map_or(0, Lane::len);
            if len >= rows {
                trimmed += lanes.trim_front(index, slide_step(len, self.config.slide_divisor));
                advanced.push(index);
            }
        }
        (advanced, trimmed)
    }

    fn style(&self, tag: ColorTag) -> Style {
        self.palette.style(tag)
    }

    /// Row by row across all lanes, one draw call per run of equal tags.
    fn draw_full<S: Surface + ?Sized>(
        &self,
        lanes: &LaneStore,
        surface: &mut S,
    ) -> Result<usize, DrawError> {
        let mut draw_calls = 0;
        let mut run = String::new();

        for y in 0..self.config.rows {
            let row = lanes.iter().map(|lane| visible_cell(lane, y));
            let mut x = 0u16;
            let mut run_start = 0u16;
            let mut run_tag: Option<ColorTag> = None;

            for cell in row {
                if run_tag.is_some_and(|tag| tag != cell.tag()) {
                    self.draw_run(surface, run_start, y, run_tag, &run)?;
                    draw_calls += 1;
                    run.clear();
                    run_start = x;
                }
                run_tag = Some(cell.tag());
                run.push(cell.ch());
                x = x.saturating_add(1);
            }
            if run_tag.is_some() {
                self.draw_run(surface, run_start, y, run_tag, &run)?;
                draw_calls += 1;
                run.clear();
            }
        }

        surface.flush_all()?;
        Ok(draw_calls)
    }

    fn draw_run<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        x: u16,
        y: u16,
        tag: Option<ColorTag>,
        text: &str,
    ) -> Result<(), DrawError> {
        surface.set_style(self.style(tag.unwrap_or_default()));
        surface.draw_str(x, y, text)
    }

    /// Only the lanes that moved, one draw call per cell and one flush per
    /// column.
    fn draw_incremental<S: Surface + ?Sized>(
        &self,
        lanes: &LaneStore,
        advanced: &[usize],
        surface: &mut S,
    ) -> Result<usize, DrawError> {
        let mut draw_calls = 0;
        for &index in advanced {
            let Some(lane) = lanes.lane(index) else {
                continue;
            };
            let x = column(index, surface)?;
            for y in 0..self.config.rows {
                let cell = visible_cell(lane, y);
                surface.set_style(self.style(cell.tag()));
                surface.draw_char(x, y, cell.ch())?;
                draw_calls += 1;
            }
            surface.flush(Rect::column(x, self.config.rows))?;
        }
        Ok(draw_calls)
    }
}

/// The cell a lane shows on row `y`; blank below the end of the buffer.
fn visible_cell(lane: &Lane, y: u16) -> ColorCell {
    lane.cells()
        .get(usize::from(y))
        .copied()
        .unwrap_or(ColorCell::BLANK)
}

/// Lane index as a surface column; indexes past `u16` are out of bounds.
fn column<S: Surface + ?Sized>(index: usize, surface: &S) -> Result<u16, DrawError> {
    u16::try_from(index).map_err(|_| {
        let (width, height) = surface.size();
        DrawError::OutOfBounds {
            x: u16::MAX,
            y: 0,
            text: format!("lane {index}"),
            width,
            height,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Colorizer, Modifier};
    use crate::surface::GridSurface;
    use pretty_assertions::assert_eq;

    fn engine(rows: u16) -> RenderEngine {
        RenderEngine::new(
            RenderConfig {
                rows,
                ..RenderConfig::default()
            },
            Palette::default(),
        )
    }

    fn plain(text: &str) -> Vec<ColorCell> {
        text.chars()
            .map(|c| ColorCell::new(c, ColorTag::PLAIN))
            .collect()
    }

    #[test]
    fn test_repaint_threshold_must_be_a_fraction() {
        assert!(RenderConfig::default().validate().is_ok());
        for bad in [-0.1, 1.5, f64::NAN] {
            let config = RenderConfig {
                full_repaint_threshold: bad,
                ..RenderConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidRepaintThreshold(_))
            ));
        }
    }

    #[test]
    fn test_slide_step_bounds() {
        assert_eq!(slide_step(10, 200), 1);
        assert_eq!(slide_step(199, 200), 1);
        assert_eq!(slide_step(400, 200), 2);
        assert_eq!(slide_step(1024, 200), 5);
        assert_eq!(slide_step(5, 0), 5);
    }

    #[test]
    fn test_slide_is_proportional_to_backlog() {
        for len in [4usize, 10, 199, 200, 401, 1000, 1024] {
            let mut store = LaneStore::new(1, 2048);
            store.append(0, &plain(&"x".repeat(len)));
            let mut surface = GridSurface::new(1, 4);

            engine(4).render(&mut store, &mut surface).unwrap();

            let after = store.lane(0).unwrap().len();
            let removed = len - after;
            assert!(removed >= 1);
            assert!(removed <= (len / 200).max(1), "len {len} removed {removed}");
        }
    }

    #[test]
    fn test_short_lane_is_not_slid() {
        let mut store = LaneStore::new(2, 100);
        store.append(0, &plain("ab"));
        let mut surface = GridSurface::new(2, 4);
        let frame = engine(4).render(&mut store, &mut surface).unwrap();

        assert_eq!(frame.lanes_advanced, 0);
        assert_eq!(store.lane(0).unwrap().len(), 2);
    }

    #[test]
    fn test_first_frame_is_full_and_merges_runs() {
        let mut store = LaneStore::new(4, 100);
        let green = ColorTag::new(Color::Green);
        for lane in 0..3 {
            store.append(lane, &[ColorCell::new('g', green)]);
        }
        store.append(3, &plain("p"));
        let mut surface = GridSurface::new(4, 2);

        let frame = engine(2).render(&mut store, &mut surface).unwrap();

        assert_eq!(frame.strategy, Strategy::Full);
        // Row 0: "ggg" green + "p" plain. Row 1: four blanks.
        assert_eq!(frame.draw_calls, 3);
        assert_eq!(surface.buffer().row_text(0), "gggp");
        let palette = Palette::default();
        assert_eq!(
            surface.buffer().get(2, 0).map(crate::buffer::Cell::style),
            Some(palette.style(green))
        );
        assert_eq!(surface.counters().flushes, vec![Rect::from_size(4, 2)]);
    }

    #[test]
    fn test_incremental_draws_only_advanced_lanes() {
        let mut store = LaneStore::new(10, 100);
        let mut surface = GridSurface::new(10, 3);
        let mut engine = engine(3);
        engine.render(&mut store, &mut surface).unwrap();
        surface.reset_counters();

        store.append(7, &plain("abcd"));
        let frame = engine.render(&mut store, &mut surface).unwrap();

        assert_eq!(frame.strategy, Strategy::Incremental);
        assert_eq!(frame.lanes_advanced, 1);
        assert_eq!(frame.draw_calls, 3);
        assert_eq!(surface.counters().flushes, vec![Rect::column(7, 3)]);
        // After sliding one cell the column shows "bcd".
        let column: String = (0..3)
            .map(|y| surface.buffer().get(7, y).map_or(' ', crate::buffer::Cell::ch))
            .collect();
        assert_eq!(column, "bcd");
    }

    #[test]
    fn test_many_lanes_moving_triggers_full_frame() {
        let mut store = LaneStore::new(4, 100);
        let mut surface = GridSurface::new(4, 2);
        let mut engine = engine(2);
        engine.render(&mut store, &mut surface).unwrap();

        for lane in 0..2 {
            store.append(lane, &plain("xyz"));
        }
        let frame = engine.render(&mut store, &mut surface).unwrap();
        assert_eq!(frame.strategy, Strategy::Full);
        assert_eq!(engine.stats().full_frames, 2);
    }

    #[test]
    fn test_modifier_reaches_surface() {
        let colorizer = Colorizer::from_patterns(["(?P<YELLOWB>hot)"]).unwrap();
        let mut store = LaneStore::new(1, 100);
        store.append(0, &colorizer.colorize("hot"));
        let mut surface = GridSurface::new(1, 3);
        engine(3).render(&mut store, &mut surface).unwrap();

        let expected = Palette::default()
            .style(ColorTag::new(Color::Yellow).with_modifier(Modifier::Blink));
        // Lane slid by one: rows show "ot" then blank.
        assert_eq!(
            surface.buffer().get(0, 0).map(crate::buffer::Cell::style),
            Some(expected)
        );
    }

    #[test]
    fn test_too_many_lanes_is_a_draw_error() {
        let mut store = LaneStore::new(5, 100);
        let mut surface = GridSurface::new(4, 2);
        let mut engine = engine(2);
        let err = engine.render(&mut store, &mut surface).unwrap_err();
        assert!(matches!(err, DrawError::OutOfBounds { y: 0, .. }));

        // The failed frame is retried in full.
        let mut fits = LaneStore::new(4, 100);
        let frame = engine.render(&mut fits, &mut surface).unwrap();
        assert_eq!(frame.strategy, Strategy::Full);
    }

    #[test]
    fn test_too_many_rows_is_a_draw_error() {
        let mut store = LaneStore::new(2, 100);
        let mut surface = GridSurface::new(2, 2);
        assert!(engine(3).render(&mut store, &mut surface).is_err());
    }
}
