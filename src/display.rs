use std::io::{self, Write};

use crossterm::{event::EnableMouseCapture, execute};

/// Platform hook for taking over the display before a run.
///
/// Callers treat failures as non-fatal.
pub trait ExclusiveDisplay {
    fn request(&mut self) -> io::Result<()>;
}

/// Grabs the pointer by enabling terminal mouse capture, so pointer motion,
/// clicks and scrolling reach the event stream.
pub struct TerminalDisplay<W: Write> {
    out: W,
    captured: bool,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            captured: false,
        }
    }
}

impl<W: Write> ExclusiveDisplay for TerminalDisplay<W> {
    fn request(&mut self) -> io::Result<()> {
        if !self.captured {
            execute!(self.out, EnableMouseCapture)?;
            self.captured = true;
        }
        Ok(())
    }
}
