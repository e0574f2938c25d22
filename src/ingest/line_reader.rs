//! Line Reader: time-boxed batches of complete lines.

use super::LineAssembler;
use crate::actor::{ReaderActor, ReaderEvent};
use crate::error::ConfigError;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::collections::VecDeque;
use std::io::{self, Read};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Line Reader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Time budget for one batch.
    pub poll_interval: Duration,
    /// Maximum lines per batch.
    pub max_batch: usize,
    /// Bytes requested per read on the reader thread.
    pub read_chunk: usize,
    /// Chunks buffered between the reader thread and the Line Reader.
    pub channel_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            max_batch: 20,
            read_chunk: 8192,
            channel_capacity: 64,
        }
    }
}

impl ReaderConfig {
    /// Check the batch time budget.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero poll interval, which would turn the idle
    /// loop into a busy wait.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

/// Produces batches of lines without blocking past the poll interval.
///
/// Batches may be empty when no data arrived in time. The sequence ends
/// (`None`) once the stream is closed and every line, including an
/// unterminated tail, has been handed out.
pub struct LineReader {
    config: ReaderConfig,
    events: Receiver<ReaderEvent>,
    assembler: LineAssembler,
    ready: VecDeque<String>,
    closed: bool,
    actor: Option<ReaderActor>,
}

impl LineReader {
    /// Read from an already-connected event channel.
    pub fn new(config: ReaderConfig, events: Receiver<ReaderEvent>) -> Self {
        Self {
            config,
            events,
            assembler: LineAssembler::new(),
            ready: VecDeque::new(),
            closed: false,
            actor: None,
        }
    }

    /// Spawn a reader thread over `source` and read its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn spawn<R: Read + Send + 'static>(config: ReaderConfig, source: R) -> io::Result<Self> {
        let (tx, rx) = bounded(config.channel_capacity.max(1));
        let actor = ReaderActor::spawn(source, tx, config.read_chunk)?;
        let mut reader = Self::new(config, rx);
        reader.actor = Some(actor);
        Ok(reader)
    }

    /// The configuration.
    pub const fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Whether the input stream has closed.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Collect the next batch.
    ///
    /// Waits at most the poll interval. Returns `None` once the stream has
    /// closed and nothing is left to hand out.
    pub fn next_batch(&mut self) -> Option<Vec<String>> {
        let max = self.config.max_batch.max(1);
        let deadline = Instant::now() + self.config.poll_interval;
        let mut batch = Vec::new();

        loop {
            while batch.len() < max {
                match self.ready.pop_front() {
                    Some(line) => batch.push(line),
                    None => break,
                }
            }
            if batch.len() >= max || self.closed {
                break;
            }

            let timeout = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(timeout) {
                Ok(ReaderEvent::Chunk(bytes)) => {
                    self.assembler.push(&bytes, &mut self.ready);
                }
                Ok(ReaderEvent::Error(message)) => {
                    warn!(%message, "input read failed, treating as end of stream");
                    self.close();
                }
                Ok(ReaderEvent::Eof) | Err(RecvTimeoutError::Disconnected) => self.close(),
                Err(RecvTimeoutError::Timeout) => break,
            }
        }

        if self.closed && batch.is_empty() && self.ready.is_empty() {
            return None;
        }
        Some(batch)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(tail) = self.assembler.finish() {
            self.ready.push_back(tail);
        }
        if let Some(actor) = self.actor.take() {
            actor.join();
        }
        debug!(pending = self.ready.len(), "input stream closed");
    }
}

impl Iterator for LineReader {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use pretty_assertions::assert_eq;

    fn config(max_batch: usize) -> ReaderConfig {
        ReaderConfig {
            poll_interval: Duration::from_millis(20),
            max_batch,
            ..ReaderConfig::default()
        }
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        assert!(ReaderConfig::default().validate().is_ok());
        let busy = ReaderConfig {
            poll_interval: Duration::ZERO,
            ..ReaderConfig::default()
        };
        assert!(matches!(busy.validate(), Err(ConfigError::ZeroPollInterval)));
    }

    #[test]
    fn test_batches_are_capped() {
        let (tx, rx) = unbounded();
        let text: String = (0..5).map(|i| format!("line {i}\n")).collect();
        tx.send(ReaderEvent::Chunk(text.into_bytes())).unwrap();

        let mut reader = LineReader::new(config(2), rx);
        assert_eq!(reader.next_batch().unwrap(), vec!["line 0", "line 1"]);
        assert_eq!(reader.next_batch().unwrap(), vec!["line 2", "line 3"]);
        assert_eq!(reader.next_batch().unwrap(), vec!["line 4"]);
        drop(tx);
    }

    #[test]
    fn test_idle_stream_yields_empty_batch() {
        let (tx, rx) = unbounded::<ReaderEvent>();
        let mut reader = LineReader::new(config(20), rx);

        let start = Instant::now();
        assert_eq!(reader.next_batch(), Some(Vec::new()));
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(!reader.is_closed());
        drop(tx);
    }

    #[test]
    fn test_partial_line_waits_for_terminator() {
        let (tx, rx) = unbounded();
        let mut reader = LineReader::new(config(20), rx);

        tx.send(ReaderEvent::Chunk(b"wri".to_vec())).unwrap();
        assert_eq!(reader.next_batch(), Some(Vec::new()));
        tx.send(ReaderEvent::Chunk(b"te(1) = 5\n".to_vec())).unwrap();
        assert_eq!(reader.next_batch().unwrap(), vec!["write(1) = 5"]);
    }

    #[test]
    fn test_eof_flushes_tail_then_ends() {
        let (tx, rx) = unbounded();
        tx.send(ReaderEvent::Chunk(b"a\nb".to_vec())).unwrap();
        tx.send(ReaderEvent::Eof).unwrap();

        let mut reader = LineReader::new(config(20), rx);
        assert_eq!(reader.next_batch().unwrap(), vec!["a", "b"]);
        assert!(reader.is_closed());
        assert_eq!(reader.next_batch(), None);
        assert_eq!(reader.next_batch(), None);
    }

    #[test]
    fn test_error_is_treated_as_closure() {
        let (tx, rx) = unbounded();
        tx.send(ReaderEvent::Chunk(b"x\n".to_vec())).unwrap();
        tx.send(ReaderEvent::Error("broken pipe".into())).unwrap();

        let batches: Vec<Vec<String>> = LineReader::new(config(20), rx).collect();
        assert_eq!(batches, vec![vec!["x".to_string()]]);
    }

    #[test]
    fn test_dropped_sender_is_closure() {
        let (tx, rx) = unbounded();
        tx.send(ReaderEvent::Chunk(b"only\n".to_vec())).unwrap();
        drop(tx);

        let batches: Vec<Vec<String>> = LineReader::new(config(20), rx).collect();
        assert_eq!(batches, vec![vec!["only".to_string()]]);
    }

    #[test]
    fn test_spawn_reads_any_source() {
        let source = io::Cursor::new(b"first\nsecond\r\nthird".to_vec());
        let reader = LineReader::spawn(config(20), source).unwrap();

        let lines: Vec<String> = reader.flatten().collect();
        assert_eq!(lines, vec!["first", "second", "third"]);
    }
}
