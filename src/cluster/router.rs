//! Lane Router: picks the lane for each incoming line.
//!
//! Three regimes, chosen from the running line count:
//!
//! 1. **Forced random**: every `forced_random_interval`-th line goes to a
//!    uniformly random lane, keeping quiet lanes alive.
//! 2. **Warm-up**: while `count < lanes * warmup_rounds`, lines shaped like
//!    `name(arg, ...) = ret` are hashed to a lane; anything else lands on a
//!    random lane above the reserved low range. This seeds every lane's
//!    history with related content.
//! 3. **Similarity**: the lane whose recent token sets are most similar
//!    (Jaccard) wins, nudged by a small random jitter so one lane cannot
//!    monopolize a busy stream.

use super::tokenize::{jaccard_history, TokenSet};
use crate::error::ConfigError;
use crate::lane::LaneStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::RangeInclusive;

/// Which fields of a structured event feed the warm-up hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashKey {
    /// Name, first numeric argument and return value.
    #[default]
    Full,
    /// Name only.
    Name,
}

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Route every Nth line randomly; 0 disables.
    pub forced_random_interval: u64,
    /// Warm-up lasts `lanes * warmup_rounds` lines; 0 disables.
    pub warmup_rounds: u64,
    /// Low lanes kept for hashed lines during warm-up.
    pub reserved_low_lanes: usize,
    /// Signed offset added to the best lane. `0..=0` disables.
    pub jitter: RangeInclusive<i32>,
    /// Warm-up hash key.
    pub hash_key: HashKey,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            forced_random_interval: 50,
            warmup_rounds: 5,
            reserved_low_lanes: 10,
            jitter: -3..=2,
            hash_key: HashKey::Full,
        }
    }
}

impl RouterConfig {
    /// A configuration with every random element switched off.
    pub fn deterministic() -> Self {
        Self {
            forced_random_interval: 0,
            warmup_rounds: 0,
            jitter: 0..=0,
            ..Self::default()
        }
    }

    /// Check the configuration before the first line is routed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jitter.is_empty() {
            return Err(ConfigError::InvalidJitter {
                min: *self.jitter.start(),
                max: *self.jitter.end(),
            });
        }
        Ok(())
    }
}

/// The regime that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Periodic uniform pick.
    ForcedRandom,
    /// Warm-up, structured line hashed.
    Hashed,
    /// Warm-up, unstructured line scattered randomly.
    Scattered,
    /// Steady-state similarity clustering.
    Similarity,
}

/// A routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Lane index in `[0, lanes)`.
    pub lane: usize,
    /// How it was chosen.
    pub regime: Regime,
}

/// A line shaped like a system-call trace: `name(arg, ...) = ret`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructuredEvent<'a> {
    /// Identifier before the parenthesis.
    pub name: &'a str,
    /// Leading digits of the first argument, possibly empty.
    pub first_arg: &'a str,
    /// Digits after the first `= `, if any.
    pub ret: Option<&'a str>,
}

impl<'a> StructuredEvent<'a> {
    /// Parse the leading `name(` and pull out the numeric first argument and
    /// return value. Returns `None` when the line does not open with an
    /// identifier directly followed by `(`.
    pub fn parse(line: &'a str) -> Option<Self> {
        let name_len = line
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(line.len());
        if name_len == 0 || !line[name_len..].starts_with('(') {
            return None;
        }
        let name = &line[..name_len];
        let args = &line[name_len + 1..];
        let first_arg = leading_digits(args);

        let ret = args[first_arg.len()..]
            .match_indices("= ")
            .map(|(at, sep)| leading_digits(&args[first_arg.len() + at + sep.len()..]))
            .find(|digits| !digits.is_empty());

        Some(Self {
            name,
            first_arg,
            ret,
        })
    }

    fn key_hash(&self, key: HashKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        match key {
            HashKey::Full => self.hash(&mut hasher),
            HashKey::Name => self.name.hash(&mut hasher),
        }
        hasher.finish()
    }
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    &s[..end]
}

/// Lane router. Owns the random source for the anti-starvation heuristics.
#[derive(Debug, Clone)]
pub struct LaneRouter<R = StdRng> {
    config: RouterConfig,
    rng: R,
}

impl LaneRouter<StdRng> {
    /// Create a router seeded from the OS.
    pub fn new(config: RouterConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a router with a fixed seed.
    pub fn seeded(config: RouterConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> LaneRouter<R> {
    /// Create a router with an explicit random source.
    pub const fn with_rng(config: RouterConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// The configuration.
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Choose a lane for `line`.
    ///
    /// `count` is the number of lines routed before this one. Returns
    /// `None` only when the store has no lanes.
    pub fn route(
        &mut self,
        line: &str,
        tokens: &TokenSet,
        count: u64,
        lanes: &LaneStore,
    ) -> Option<Route> {
        let n = lanes.len();
        if n == 0 {
            return None;
        }

        let interval = self.config.forced_random_interval;
        if interval > 0 && count % interval == 0 {
            return Some(Route {
                lane: self.rng.random_range(0..n),
                regime: Regime::ForcedRandom,
            });
        }

        if count < (n as u64).saturating_mul(self.config.warmup_rounds) {
            return Some(self.warm_up(line, n));
        }

        Some(Route {
            lane: self.most_similar(tokens, lanes),
            regime: Regime::Similarity,
        })
    }

    fn warm_up(&mut self, line: &str, n: usize) -> Route {
        if let Some(event) = StructuredEvent::parse(line) {
            let hash = event.key_hash(self.config.hash_key);
            #[allow(clippy::cast_possible_truncation)]
            let lane = (hash % n as u64) as usize;
            return Route {
                lane,
                regime: Regime::Hashed,
            };
        }

        let low = if n > self.config.reserved_low_lanes {
            self.config.reserved_low_lanes
        } else {
            0
        };
        Route {
            lane: self.rng.random_range(low..n),
            regime: Regime::Scattered,
        }
    }

    fn most_similar(&mut self, tokens: &TokenSet, lanes: &LaneStore) -> usize {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (index, lane) in lanes.iter().enumerate() {
            let score = jaccard_history(lane.history(), tokens);
            if score > best_score {
                best = index;
                best_score = score;
            }
        }

        let jitter = if self.config.jitter.start() == self.config.jitter.end() {
            *self.config.jitter.start()
        } else {
            self.rng.random_range(self.config.jitter.clone())
        };
        clamp_offset(best, jitter, lanes.len())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn clamp_offset(index: usize, offset: i32, n: usize) -> usize {
    let max = n.saturating_sub(1) as i64;
    (index as i64 + i64::from(offset)).clamp(0, max) as usize
}
