//! Render module: lane buffers to surface draw calls.
//!
//! - [`RenderEngine`]: slide policy, strategy choice, frame composition
//! - [`select_strategy`]: full repaint versus per-column updates

mod engine;
mod strategy;

pub use engine::{slide_step, FrameReport, RenderConfig, RenderEngine, RenderStats};
pub use strategy::{select_strategy, Strategy};
