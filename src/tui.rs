//! Terminal management for the playground host
//!
//! Handles terminal setup, teardown, and polling for input between ticks.

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

/// Terminal wrapper driving a fixed-rate tick loop
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Time between host ticks
    pub tick_rate: Duration,
    last_tick: Instant,
}

impl Tui {
    pub fn new(tick_rate: Duration) -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            tick_rate,
            last_tick: Instant::now(),
        })
    }

    /// Enter the alternate screen with raw mode and mouse capture
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Restore the terminal. Also called on Drop.
    pub fn exit(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        )?;
        Ok(())
    }

    /// Wait for input until the next tick is due.
    ///
    /// Returns `Some(Event)` for input and `None` when it is time to tick.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        let timeout = self.tick_rate.saturating_sub(self.last_tick.elapsed());
        if event::poll(timeout)? {
            let event = event::read()?;

            // Key releases (Windows) and mouse motion are noise for the host.
            match &event {
                Event::Key(key) if key.kind != KeyEventKind::Press => return Ok(None),
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => return Ok(None),
                _ => {}
            }
            Ok(Some(event))
        } else {
            Ok(None)
        }
    }

    /// Whether a tick is due; resets the tick timer when it is
    pub fn tick_due(&mut self) -> bool {
        if self.last_tick.elapsed() >= self.tick_rate {
            self.last_tick = Instant::now();
            true
        } else {
            false
        }
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Best effort cleanup on drop
        let _ = self.exit();
    }
}
