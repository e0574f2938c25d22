//! Ingest module: non-blocking line intake.
//!
//! Bytes arrive from a [`ReaderActor`](crate::actor::ReaderActor) thread as
//! [`ReaderEvent`](crate::actor::ReaderEvent)s. [`LineReader`] turns them into
//! lines with [`LineAssembler`] and hands them out in bounded, time-boxed
//! batches.

mod assembler;
mod line_reader;

pub use assembler::LineAssembler;
pub use line_reader::{LineReader, ReaderConfig};
