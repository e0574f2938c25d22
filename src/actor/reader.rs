//! Reader Actor: dedicated thread for draining a byte stream.
//!
//! A blocking `read` on a pipe cannot be polled portably, so it runs on its
//! own thread and forwards chunks over a bounded channel. The main loop only
//! ever waits on the channel, with a timeout.

use super::messages::ReaderEvent;
use crossbeam_channel::Sender;
use std::io::{self, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::trace;

/// Reader actor handle.
pub struct ReaderActor {
    /// Handle to the reader thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl ReaderActor {
    /// Spawn the reader thread.
    ///
    /// # Arguments
    ///
    /// * `source` - Byte stream to drain.
    /// * `sender` - Channel to forward events to.
    /// * `chunk_size` - Bytes requested per `read`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<R: Read + Send + 'static>(
        source: R,
        sender: Sender<ReaderEvent>,
        chunk_size: usize,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("lanescope-reader".to_string())
            .spawn(move || {
                Self::run_loop(source, &sender, &shutdown_clone, chunk_size.max(1));
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the reader thread to stop after its current read.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the reader thread to finish.
    ///
    /// Blocks until the current `read` returns; only call this once the
    /// thread has reported `Eof` or `Error`, or the source is known to end.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main read loop.
    fn run_loop<R: Read>(
        mut source: R,
        sender: &Sender<ReaderEvent>,
        shutdown: &AtomicBool,
        chunk_size: usize,
    ) {
        let mut buf = vec![0u8; chunk_size];
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let event = match source.read(&mut buf) {
                Ok(0) => ReaderEvent::Eof,
                Ok(n) => ReaderEvent::Chunk(buf[..n].to_vec()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => ReaderEvent::Error(e.to_string()),
            };
            let last = !matches!(event, ReaderEvent::Chunk(_));

            if sender.send(event).is_err() {
                // Receiver dropped, exit
                break;
            }
            if last {
                break;
            }
        }
        trace!("reader thread exiting");
    }
}

impl Drop for ReaderActor {
    fn drop(&mut self) {
        // The thread may be parked in a blocking read; do not join here.
        self.shutdown();
    }
}
