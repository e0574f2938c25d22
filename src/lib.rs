//! # Lanescope
//!
//! A live terminal visualizer for high-volume line streams.
//!
//! Lanescope reads lines (strace output, access logs, query logs) from a
//! byte stream and spreads them across one-character-wide vertical lanes,
//! one per terminal column. Related lines land in the same lane, so the
//! screen turns into a set of scrolling columns of similar traffic.
//!
//! ## Core Concepts
//!
//! - **Lane routing**: warm-up hashing of structured events, then Jaccard
//!   similarity against each lane's recent token sets, with random jitter
//!   and periodic forced-random placement to keep every lane alive
//! - **Bounded lanes**: each lane holds at most a fixed number of cells;
//!   overflow is dropped, never blocked on
//! - **Catch-up scrolling**: lanes far behind slide faster than real time
//! - **Two repaint strategies**: full frames merge same-colored runs, quiet
//!   frames redraw only the columns that moved
//!
//! ## Example
//!
//! ```rust,ignore
//! use lanescope::{Colorizer, LaneRouter, LaneStore, Pipeline, RouterConfig};
//!
//! let mut pipeline = Pipeline::new(
//!     LaneRouter::new(RouterConfig::default()),
//!     Colorizer::with_default_rules()?,
//!     LaneStore::new(80, 1024),
//! );
//! pipeline.ingest("open(\"/etc/hosts\", O_RDONLY) = 3");
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod cluster;
pub mod color;
pub mod error;
pub mod ingest;
pub mod lane;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod surface;
pub mod terminal;

// Re-exports for convenience
pub use actor::{run_terminal, Engine, EngineConfig, RunSummary};
pub use buffer::{Buffer, Cell, Modifiers, Rgb, Style};
pub use cluster::{HashKey, LaneRouter, RouterConfig};
pub use color::{Color, ColorCell, ColorTag, Colorizer, Palette, Rule};
pub use error::{ConfigError, DrawError, Error, Result};
pub use ingest::{LineReader, ReaderConfig};
pub use lane::LaneStore;
pub use layout::Rect;
pub use pipeline::Pipeline;
pub use render::{RenderConfig, RenderEngine, Strategy};
pub use surface::{GridSurface, Surface, TerminalSurface};
