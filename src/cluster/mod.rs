//! Cluster module: deciding which lane a line belongs to.
//!
//! - [`tokenize`]: alphanumeric word sets
//! - [`jaccard`] / [`jaccard_history`]: set similarity
//! - [`LaneRouter`]: forced-random, warm-up hashing and similarity regimes

mod router;
mod tokenize;

pub use router::{HashKey, LaneRouter, Regime, Route, RouterConfig, StructuredEvent};
pub use tokenize::{jaccard, jaccard_history, tokenize, TokenSet};
