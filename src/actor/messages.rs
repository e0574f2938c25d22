//! Message types for actor communication.
//!
//! These enums define the protocol between the helper threads and the
//! main loop.

/// Events from the reader thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// Raw bytes, in stream order. Never empty.
    Chunk(Vec<u8>),
    /// A read failed. The thread exits after sending this.
    Error(String),
    /// The stream closed. The thread exits after sending this.
    Eof,
}

/// Events from the terminal input thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// The user asked to stop (`q`, `Esc` or `Ctrl-C`).
    Quit,

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
}

