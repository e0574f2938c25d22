//! Error types.
//!
//! Configuration problems are fatal and surface before the first frame.
//! Draw failures abort the frame: they mean the lane and row counts have
//! drifted out of sync with the surface dimensions.

use thiserror::Error;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A coloring pattern failed to compile.
    #[error("invalid coloring pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A coloring pattern must capture exactly one group.
    #[error("coloring pattern {pattern:?} captures {found} groups, expected exactly one")]
    GroupCount {
        /// The offending pattern.
        pattern: String,
        /// Number of capture groups found.
        found: usize,
    },

    /// The pattern's group name is not a known color.
    #[error("coloring pattern {pattern:?} names unknown color {name:?}")]
    UnknownColor {
        /// The offending pattern.
        pattern: String,
        /// The group name that failed to parse.
        name: String,
    },

    /// The color was expected from the group name but the group is unnamed.
    #[error("coloring pattern {pattern:?} has an unnamed group, expected (?P<COLOR>...)")]
    UnnamedGroup {
        /// The offending pattern.
        pattern: String,
    },

    /// A `COLOR=PATTERN` rule spec could not be split.
    #[error("invalid rule {spec:?}, expected COLOR=PATTERN")]
    InvalidRuleSpec {
        /// The raw rule text.
        spec: String,
    },

    /// At least one lane is required.
    #[error("lane count must be at least 1")]
    ZeroLanes,

    /// At least one visible row is required.
    #[error("row count must be at least 1")]
    ZeroRows,

    /// The jitter range is inverted.
    #[error("jitter range [{min}, {max}] is empty")]
    InvalidJitter {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },

    /// Lanes capped below the visible height never fill the screen, so they
    /// never slide and never free room.
    #[error("overflow cap {cap} is below the {rows} visible rows")]
    CapBelowRows {
        /// Per-lane cell cap.
        cap: usize,
        /// Visible rows.
        rows: u16,
    },

    /// The requested grid does not fit on the terminal.
    #[error("{columns}x{rows} does not fit the {width}x{height} terminal")]
    ExceedsTerminal {
        /// Requested lane count.
        columns: u16,
        /// Requested row count.
        rows: u16,
        /// Terminal width.
        width: u16,
        /// Terminal height.
        height: u16,
    },

    /// The batch time budget must be positive.
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    /// The full-repaint threshold is a fraction of lanes.
    #[error("full-repaint threshold {0} is not within [0, 1]")]
    InvalidRepaintThreshold(f64),

    /// A log filter directive did not parse.
    #[error("invalid log filter {directive:?}: {source}")]
    InvalidLogFilter {
        /// The raw directive.
        directive: String,
        /// Underlying parse error.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

/// Failures while drawing to a surface.
#[derive(Debug, Error)]
pub enum DrawError {
    /// A draw call landed outside the surface.
    #[error("draw of {text:?} at ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds {
        /// Column of the draw call.
        x: u16,
        /// Row of the draw call.
        y: u16,
        /// Content being drawn.
        text: String,
        /// Surface width.
        width: u16,
        /// Surface height.
        height: u16,
    },

    /// Writing to the terminal failed.
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error for the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A frame could not be drawn.
    #[error(transparent)]
    Draw(#[from] DrawError),

    /// A global log subscriber was already installed.
    #[error("failed to install logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    /// Terminal or input I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
