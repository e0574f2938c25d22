//! Input Actor: dedicated thread for polling terminal events.
//!
//! Lines arrive on stdin, so keys are read from the controlling terminal
//! (crossterm falls back to `/dev/tty` when stdin is a pipe). Only the quit
//! keys and resizes matter to the display.

use super::messages::ControlEvent;
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::warn;

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `sender` - Channel to send control events to the main loop.
    /// * `poll_timeout` - How long to wait for events before checking shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(sender: Sender<ControlEvent>, poll_timeout: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("lanescope-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(sender: &Sender<ControlEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        while !shutdown.load(Ordering::Relaxed) {
            let event = match event::poll(poll_timeout) {
                Ok(true) => event::read(),
                Ok(false) => continue,
                Err(e) => Err(e),
            };
            match event {
                Ok(event) => {
                    if let Some(control) = Self::convert_event(&event) {
                        if sender.send(control).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    // No usable terminal: keys are unavailable, the display is not.
                    warn!(error = %e, "terminal input unavailable");
                    break;
                }
            }
        }
    }

    /// Convert a crossterm event to a control event.
    fn convert_event(event: &Event) -> Option<ControlEvent> {
        match *event {
            Event::Key(key) => Self::convert_key(key),
            Event::Resize(width, height) => Some(ControlEvent::Resize { width, height }),
            _ => None,
        }
    }

    fn convert_key(key: KeyEvent) -> Option<ControlEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(ControlEvent::Quit),
            KeyCode::Char('c') if ctrl => Some(ControlEvent::Quit),
            _ => None,
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_quit_keys() {
        for event in [
            key(KeyCode::Char('q'), KeyModifiers::NONE),
            key(KeyCode::Esc, KeyModifiers::NONE),
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(InputActor::convert_event(&event), Some(ControlEvent::Quit));
        }
    }

    #[test]
    fn test_other_keys_are_ignored() {
        assert_eq!(
            InputActor::convert_event(&key(KeyCode::Char('c'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            InputActor::convert_event(&key(KeyCode::Enter, KeyModifiers::NONE)),
            None
        );
        assert_eq!(InputActor::convert_event(&Event::FocusLost), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(InputActor::convert_event(&Event::Key(release)), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            InputActor::convert_event(&Event::Resize(120, 40)),
            Some(ControlEvent::Resize { width: 120, height: 40 })
        );
    }
}
