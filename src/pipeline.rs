//! Pipeline: the terminal-free core of the display.
//!
//! One line at a time: tokenize, route, colorize, admit. The render engine
//! reads the resulting lane store; nothing here touches a surface.

use crate::cluster::{tokenize, LaneRouter, Regime, Route};
use crate::color::Colorizer;
use crate::lane::{Admission, LaneStore};
use rand::rngs::StdRng;
use rand::Rng;

/// Per-line outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingested {
    /// Where the line went.
    pub route: Route,
    /// What the lane accepted.
    pub admission: Admission,
}

/// Running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Lines routed.
    pub lines: u64,
    /// Lines routed to a full lane and discarded.
    pub dropped_lines: u64,
    /// Cells discarded, from full lanes or truncated appends.
    pub dropped_cells: u64,
    /// Lines routed by the forced-random regime.
    pub forced_random: u64,
    /// Lines routed by hashing their structured key.
    pub hashed: u64,
    /// Warm-up lines scattered at random.
    pub scattered: u64,
    /// Lines routed by similarity.
    pub similarity: u64,
}

impl PipelineStats {
    fn record(&mut self, ingested: &Ingested) {
        self.lines += 1;
        if ingested.admission.appended == 0 && ingested.admission.dropped > 0 {
            self.dropped_lines += 1;
        }
        self.dropped_cells += ingested.admission.dropped as u64;
        match ingested.route.regime {
            Regime::ForcedRandom => self.forced_random += 1,
            Regime::Hashed => self.hashed += 1,
            Regime::Scattered => self.scattered += 1,
            Regime::Similarity => self.similarity += 1,
        }
    }
}

/// Router, colorizer and lane store driven by a running line count.
#[derive(Debug, Clone)]
pub struct Pipeline<R = StdRng> {
    router: LaneRouter<R>,
    colorizer: Colorizer,
    lanes: LaneStore,
    stats: PipelineStats,
}

impl<R: Rng> Pipeline<R> {
    /// Assemble a pipeline.
    pub const fn new(router: LaneRouter<R>, colorizer: Colorizer, lanes: LaneStore) -> Self {
        Self {
            router,
            colorizer,
            lanes,
            stats: PipelineStats {
                lines: 0,
                dropped_lines: 0,
                dropped_cells: 0,
                forced_random: 0,
                hashed: 0,
                scattered: 0,
                similarity: 0,
            },
        }
    }

    /// Route one line and store it.
    ///
    /// Returns `None` only when there are no lanes. Lines routed to a lane
    /// at its cap are discarded without being colorized.
    pub fn ingest(&mut self, line: &str) -> Option<Ingested> {
        let tokens = tokenize(line);
        let route = self
            .router
            .route(line, &tokens, self.stats.lines, &self.lanes)?;

        let admission = if self.lanes.has_room(route.lane) {
            let cells = self.colorizer.colorize(line);
            self.lanes.admit(route.lane, tokens, &cells)
        } else {
            Admission {
                appended: 0,
                dropped: line.chars().count(),
            }
        };

        let ingested = Ingested { route, admission };
        self.stats.record(&ingested);
        Some(ingested)
    }

    /// Ingest every line of a batch.
    pub fn ingest_batch<S: AsRef<str>>(&mut self, lines: &[S]) {
        for line in lines {
            self.ingest(line.as_ref());
        }
    }

    /// The lane store.
    pub const fn lanes(&self) -> &LaneStore {
        &self.lanes
    }

    /// The lane store, for the render engine to slide.
    pub const fn lanes_mut(&mut self) -> &mut LaneStore {
        &mut self.lanes
    }

    /// The colorizer.
    pub const fn colorizer(&self) -> &Colorizer {
        &self.colorizer
    }

    /// The router.
    pub const fn router(&self) -> &LaneRouter<R> {
        &self.router
    }

    /// Running totals.
    pub const fn stats(&self) -> &PipelineStats {
        &self.stats
    }
}
