//! Command-line entry point.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lanescope::cluster::HashKey;
use lanescope::logging::init_logging;
use lanescope::terminal::SessionOptions;
use lanescope::{run_terminal, Colorizer, EngineConfig, ReaderConfig, RenderConfig, RouterConfig, Rule};
use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "lanescope",
    version,
    about = "Cluster a live line stream into colored, scrolling terminal lanes"
)]
struct Cli {
    /// Input file; standard input when omitted or `-`.
    input: Option<PathBuf>,

    /// Lane count (defaults to the terminal width).
    #[arg(long)]
    columns: Option<u16>,

    /// Visible rows (defaults to the terminal height).
    #[arg(long)]
    rows: Option<u16>,

    /// Extra coloring rule, applied after the defaults. Repeatable.
    #[arg(long = "rule", value_name = "COLOR=PATTERN")]
    rules: Vec<String>,

    /// Start from an empty rule set.
    #[arg(long)]
    no_default_rules: bool,

    /// Per-lane cell cap; appends past it are dropped.
    #[arg(long, default_value_t = 1024)]
    overflow_cap: usize,

    /// Route every Nth line to a random lane (0 disables).
    #[arg(long, default_value_t = 50)]
    forced_random_interval: u64,

    /// Warm-up length in lines per lane (0 disables).
    #[arg(long, default_value_t = 5)]
    warmup_rounds: u64,

    /// Smallest jitter added to a similarity pick.
    #[arg(long, default_value_t = -3, allow_hyphen_values = true)]
    jitter_min: i32,

    /// Largest jitter added to a similarity pick.
    #[arg(long, default_value_t = 2, allow_hyphen_values = true)]
    jitter_max: i32,

    /// What a structured event hashes on during warm-up.
    #[arg(long, value_enum, default_value_t = HashKeyArg::Full)]
    hash_key: HashKeyArg,

    /// Batch time budget in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_interval_ms: u64,

    /// Maximum lines per batch.
    #[arg(long, default_value_t = 20)]
    batch_size: usize,

    /// Repaint in full when more than this fraction of lanes moved.
    #[arg(long, default_value_t = 0.3)]
    full_repaint_threshold: f64,

    /// Seed for the routing heuristics.
    #[arg(long)]
    seed: Option<u64>,

    /// Draw on the main screen instead of the alternate screen.
    #[arg(long)]
    no_alt_screen: bool,

    /// Ignore the keyboard; stop only at end of input.
    #[arg(long)]
    no_keys: bool,

    /// Append diagnostics to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter directive (overrides LANESCOPE_LOG and RUST_LOG).
    #[arg(long, requires = "log_file")]
    log_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HashKeyArg {
    /// Name, first numeric argument and return value.
    Full,
    /// Name only.
    Name,
}

impl From<HashKeyArg> for HashKey {
    fn from(arg: HashKeyArg) -> Self {
        match arg {
            HashKeyArg::Full => Self::Full,
            HashKeyArg::Name => Self::Name,
        }
    }
}

impl Cli {
    fn colorizer(&self) -> Result<Colorizer> {
        let mut colorizer = if self.no_default_rules {
            Colorizer::default()
        } else {
            Colorizer::with_default_rules()?
        };
        for spec in &self.rules {
            colorizer.push(Rule::from_spec(spec)?);
        }
        Ok(colorizer)
    }

    fn engine_config(&self) -> EngineConfig {
        let keys = !self.no_keys;
        EngineConfig {
            columns: self.columns,
            rows: self.rows,
            overflow_cap: self.overflow_cap,
            router: RouterConfig {
                forced_random_interval: self.forced_random_interval,
                warmup_rounds: self.warmup_rounds,
                jitter: self.jitter_min..=self.jitter_max,
                hash_key: self.hash_key.into(),
                ..RouterConfig::default()
            },
            render: RenderConfig {
                full_repaint_threshold: self.full_repaint_threshold,
                ..RenderConfig::default()
            },
            reader: ReaderConfig {
                poll_interval: Duration::from_millis(self.poll_interval_ms),
                max_batch: self.batch_size,
                ..ReaderConfig::default()
            },
            seed: self.seed,
            session: SessionOptions {
                alternate_screen: !self.no_alt_screen,
                raw_mode: keys,
            },
            keys,
            ..EngineConfig::default()
        }
    }

    fn source(&self) -> Result<Box<dyn Read + Send>> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Ok(Box::new(file))
            }
            _ => Ok(Box::new(io::stdin())),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = match &cli.log_file {
        Some(path) => Some(
            init_logging(path, cli.log_filter.as_deref())
                .with_context(|| format!("failed to set up logging to {}", path.display()))?,
        ),
        None => None,
    };

    if !io::stdout().is_terminal() {
        anyhow::bail!("stdout is not a terminal");
    }

    let colorizer = cli.colorizer()?;
    let config = cli.engine_config();
    let source = cli.source()?;

    let summary = run_terminal(&config, colorizer, source)?;
    tracing::info!(lines = summary.pipeline.lines, "done");
    Ok(())
}
