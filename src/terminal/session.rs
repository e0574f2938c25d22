//! Terminal session: setup on entry, restore on drop.

use crossterm::{
    cursor, execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use tracing::debug;

/// Session options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Draw on the alternate screen buffer.
    pub alternate_screen: bool,
    /// Read keys unbuffered so the quit keys work.
    pub raw_mode: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            raw_mode: true,
        }
    }
}

/// An entered terminal session. Dropping it restores the terminal.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
}

impl TerminalSession {
    /// Enter the session: raw mode, alternate screen, hidden cursor, cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal rejects any step. Steps already
    /// taken are undone.
    pub fn enter(options: SessionOptions) -> io::Result<Self> {
        // Constructed first so a failure below still restores on drop.
        let session = Self { options };
        if options.raw_mode {
            terminal::enable_raw_mode()?;
        }

        let mut stdout = io::stdout();
        if options.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide, Clear(ClearType::All))?;
        stdout.flush()?;
        debug!(?options, "terminal session entered");
        Ok(session)
    }

    /// Current terminal size as `(columns, rows)`.
    ///
    /// # Errors
    ///
    /// Returns an error when stdout is not a terminal.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, crossterm::style::ResetColor, cursor::Show);
        if self.options.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        if self.options.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
    }
}
