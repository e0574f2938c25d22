//! Terminal module: owning the real terminal.

mod session;

pub use session::{SessionOptions, TerminalSession};
