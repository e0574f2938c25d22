//! Actor Model: helper threads around a single-threaded main loop.
//!
//! Blocking work lives on dedicated threads that only talk to the main loop
//! over crossbeam channels:
//! - **Reader Actor**: drains the input byte stream
//! - **Input Actor**: polls the terminal for quit keys and resizes
//! - **Engine**: the main loop; owns the lane store and the surface
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ReaderEvent      ┌──────────────┐
//! │Reader Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │    Engine    │ ──▶ Surface
//! ┌──────────────┐    ControlEvent     │  (main loop) │
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     └──────────────┘
//! ```

mod engine;
mod input;
mod messages;
mod reader;

pub use engine::{run_terminal, Engine, EngineConfig, RunSummary, Step};
pub use input::InputActor;
pub use messages::{ControlEvent, ReaderEvent};
pub use reader::ReaderActor;
