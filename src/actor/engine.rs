//! Engine: the main loop that ties reader, pipeline and renderer together.
//!
//! One thread owns the lane store and the surface. Each tick drains control
//! events, takes one batch from the Line Reader (the only place the loop
//! waits), ingests it, and renders a frame.

use super::messages::ControlEvent;
use super::InputActor;
use crate::cluster::{LaneRouter, RouterConfig};
use crate::color::{Colorizer, Palette};
use crate::error::{ConfigError, DrawError, Error};
use crate::ingest::{LineReader, ReaderConfig};
use crate::lane::{LaneStore, DEFAULT_HISTORY_CAPACITY, DEFAULT_OVERFLOW_CAP};
use crate::pipeline::{Pipeline, PipelineStats};
use crate::render::{RenderConfig, RenderEngine, RenderStats};
use crate::surface::{Surface, TerminalSurface};
use crate::terminal::{SessionOptions, TerminalSession};
use crossbeam_channel::{bounded, Receiver};
use std::io::{self, Read};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Lane count; the terminal width when unset.
    pub columns: Option<u16>,
    /// Visible rows; the terminal height when unset.
    pub rows: Option<u16>,
    /// Per-lane cell cap.
    pub overflow_cap: usize,
    /// Token sets remembered per lane.
    pub history_capacity: usize,
    /// Lane routing.
    pub router: RouterConfig,
    /// Frame composition. `rows` is taken from the surface.
    pub render: RenderConfig,
    /// Line intake.
    pub reader: ReaderConfig,
    /// Tag to attribute mapping.
    pub palette: Palette,
    /// Fixed seed for the routing heuristics.
    pub seed: Option<u64>,
    /// Terminal session setup.
    pub session: SessionOptions,
    /// Listen for quit keys and resizes.
    pub keys: bool,
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: None,
            rows: None,
            overflow_cap: DEFAULT_OVERFLOW_CAP,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            router: RouterConfig::default(),
            render: RenderConfig::default(),
            reader: ReaderConfig::default(),
            palette: Palette::default(),
            seed: None,
            session: SessionOptions::default(),
            keys: true,
            input_poll_timeout: Duration::from_millis(50),
        }
    }
}

impl EngineConfig {
    /// Check every setting that does not depend on the surface size.
    ///
    /// # Errors
    ///
    /// Returns the first invalid router, render or reader setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.router.validate()?;
        self.render.validate()?;
        self.reader.validate()
    }

    /// Resolve the lane and row counts against the terminal size.
    ///
    /// # Errors
    ///
    /// Returns an error when either count is zero, when the grid does not
    /// fit the terminal, or when the overflow cap is below the row count.
    pub fn dimensions(&self, terminal: (u16, u16)) -> Result<(u16, u16), ConfigError> {
        let (width, height) = terminal;
        let columns = self.columns.unwrap_or(width);
        let rows = self.rows.unwrap_or(height);
        if columns == 0 {
            return Err(ConfigError::ZeroLanes);
        }
        if rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if columns > width || rows > height {
            return Err(ConfigError::ExceedsTerminal {
                columns,
                rows,
                width,
                height,
            });
        }
        check_cap(self.overflow_cap, rows)?;
        Ok((columns, rows))
    }
}

fn check_cap(cap: usize, rows: u16) -> Result<(), ConfigError> {
    if cap < usize::from(rows) {
        return Err(ConfigError::CapBelowRows { cap, rows });
    }
    Ok(())
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More input may follow.
    Continue,
    /// The input stream closed and the last frame was drawn.
    Finished,
    /// The user asked to stop.
    Quit,
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// How the run ended.
    pub ended: Step,
    /// Batches taken from the Line Reader.
    pub batches: u64,
    /// Routing totals.
    pub pipeline: PipelineStats,
    /// Rendering totals.
    pub render: RenderStats,
}

/// The main lanescope engine.
///
/// Generic over the surface so the loop runs the same against a terminal
/// and an in-memory grid.
pub struct Engine<S: Surface> {
    pipeline: Pipeline,
    renderer: RenderEngine,
    reader: LineReader,
    surface: S,
    controls: Option<Receiver<ControlEvent>>,
    batches: u64,
}

impl<S: Surface> Engine<S> {
    /// Build an engine drawing one lane per surface column and one row per
    /// surface row.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the overflow cap
    /// is below the surface height.
    pub fn new(
        config: &EngineConfig,
        colorizer: Colorizer,
        reader: LineReader,
        surface: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (width, height) = surface.size();
        if width == 0 {
            return Err(ConfigError::ZeroLanes);
        }
        if height == 0 {
            return Err(ConfigError::ZeroRows);
        }
        check_cap(config.overflow_cap, height)?;

        let router = match config.seed {
            Some(seed) => LaneRouter::seeded(config.router.clone(), seed),
            None => LaneRouter::new(config.router.clone()),
        };
        let lanes = LaneStore::prefilled(
            usize::from(width),
            config.overflow_cap,
            usize::from(height),
        )
        .with_history_capacity(config.history_capacity);
        let render = RenderConfig {
            rows: height,
            ..config.render.clone()
        };

        Ok(Self {
            pipeline: Pipeline::new(router, colorizer, lanes),
            renderer: RenderEngine::new(render, config.palette.clone()),
            reader,
            surface,
            controls: None,
            batches: 0,
        })
    }

    /// Listen for control events between batches.
    #[must_use]
    pub fn with_controls(mut self, controls: Receiver<ControlEvent>) -> Self {
        self.controls = Some(controls);
        self
    }

    /// The pipeline.
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The render engine.
    pub const fn renderer(&self) -> &RenderEngine {
        &self.renderer
    }

    /// The surface.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Run one tick: controls, one batch, one frame.
    pub fn step(&mut self) -> Result<Step, DrawError> {
        if let Some(step) = self.handle_controls()? {
            return Ok(step);
        }

        let Some(batch) = self.reader.next_batch() else {
            self.renderer.request_full_redraw();
            self.renderer.render(self.pipeline.lanes_mut(), &mut self.surface)?;
            return Ok(Step::Finished);
        };

        self.batches += 1;
        self.pipeline.ingest_batch(&batch);
        let frame = self
            .renderer
            .render(self.pipeline.lanes_mut(), &mut self.surface)?;
        if !batch.is_empty() {
            debug!(
                lines = batch.len(),
                total = self.pipeline.stats().lines,
                strategy = ?frame.strategy,
                advanced = frame.lanes_advanced,
                "batch rendered"
            );
        }
        Ok(Step::Continue)
    }

    /// Run until the input closes or the user quits.
    ///
    /// # Errors
    ///
    /// Returns the first draw error.
    pub fn run(&mut self) -> Result<RunSummary, DrawError> {
        let (width, height) = self.surface.size();
        info!(lanes = width, rows = height, "engine started");

        let ended = loop {
            match self.step()? {
                Step::Continue => {}
                step => break step,
            }
        };

        let summary = self.summary(ended);
        info!(
            ended = ?summary.ended,
            batches = summary.batches,
            lines = summary.pipeline.lines,
            dropped_lines = summary.pipeline.dropped_lines,
            frames = summary.render.frames,
            full_frames = summary.render.full_frames,
            "engine stopped"
        );
        Ok(summary)
    }

    /// Totals so far.
    pub fn summary(&self, ended: Step) -> RunSummary {
        RunSummary {
            ended,
            batches: self.batches,
            pipeline: *self.pipeline.stats(),
            render: self.renderer.stats().clone(),
        }
    }

    fn handle_controls(&mut self) -> Result<Option<Step>, DrawError> {
        let Some(controls) = &self.controls else {
            return Ok(None);
        };
        let events: Vec<ControlEvent> = controls.try_iter().collect();
        for event in events {
            match event {
                ControlEvent::Quit => return Ok(Some(Step::Quit)),
                ControlEvent::Resize { width, height } => {
                    debug!(width, height, "terminal resized, repainting");
                    self.surface.invalidate()?;
                    self.renderer.request_full_redraw();
                }
            }
        }
        Ok(None)
    }
}

/// Run the display on the real terminal, reading lines from `source`.
///
/// The terminal is restored before this returns, including on error.
///
/// # Errors
///
/// Returns an error for invalid configuration, terminal setup failures and
/// draw failures.
pub fn run_terminal<R: Read + Send + 'static>(
    config: &EngineConfig,
    colorizer: Colorizer,
    source: R,
) -> Result<RunSummary, Error> {
    config.validate()?;
    let (columns, rows) = config.dimensions(TerminalSession::size()?)?;

    let reader = LineReader::spawn(config.reader, source)?;
    let session = TerminalSession::enter(config.session)?;
    let mut surface = TerminalSurface::new(io::stdout(), columns, rows);
    surface.invalidate()?;
    let mut engine = Engine::new(config, colorizer, reader, surface)?;

    let input = if config.keys {
        let (tx, rx) = bounded(16);
        engine = engine.with_controls(rx);
        Some(InputActor::spawn(tx, config.input_poll_timeout)?)
    } else {
        None
    };

    let result = engine.run();

    if let Some(actor) = input {
        actor.join();
    }
    drop(session);
    Ok(result?)
}
