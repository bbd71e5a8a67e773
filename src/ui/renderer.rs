//! Console surface renderer using crossterm.
//!
//! Owns the host terminal while the console is visible: raw mode plus the
//! alternate screen on init, everything restored on cleanup. Rendering
//! draws the visible window of wrapped rows with the configured palette
//! and places the caret at the end of the buffer.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};

use crate::config::Palette;
use crate::ui::screen::Screen;

/// Console renderer
pub struct Renderer {
    palette: Palette,
    title: String,
    /// Whether the terminal has been initialized
    initialized: bool,
}

impl Renderer {
    pub fn new(palette: Palette, title: String) -> Self {
        Self {
            palette,
            title,
            initialized: false,
        }
    }

    /// Take over the host terminal: raw mode, alternate screen, bracketed
    /// paste, caret color.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            crossterm::event::EnableBracketedPaste,
            crossterm::event::EnableMouseCapture,
            DisableLineWrap,
            SetTitle(self.title.as_str()),
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;

        // OSC 12: caret color while the console owns the screen
        write!(stdout, "\x1b]12;{}\x07", self.palette.caret.to_hex())?;

        stdout.flush()?;
        self.initialized = true;
        Ok(())
    }

    /// Restore the host terminal. Safe to call more than once.
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();

        // OSC 112: reset the caret color
        let _ = write!(stdout, "\x1b]112\x07");

        let _ = execute!(stdout, ResetColor);
        let _ = execute!(stdout, Show);
        let _ = execute!(stdout, EnableLineWrap);
        let _ = execute!(stdout, crossterm::event::DisableMouseCapture);
        let _ = execute!(stdout, crossterm::event::DisableBracketedPaste);
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();

        // Disable raw mode - this is the most important part
        terminal::disable_raw_mode()?;

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Draw the visible window of the screen buffer.
    pub fn render(&mut self, screen: &Screen) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        let (cols, rows) = terminal::size()?;
        let height = rows.max(1) as usize;

        let wrapped = screen.wrapped_rows(cols);
        let total = wrapped.len();
        let max_offset = total.saturating_sub(height);
        let offset = screen.scroll_offset().min(max_offset);
        let end = total - offset;
        let start = end.saturating_sub(height);
        let window = &wrapped[start..end];

        // Use a buffered writer for better performance
        let stdout = io::stdout();
        let mut stdout = io::BufWriter::with_capacity(65536, stdout.lock());

        // Begin synchronized update (reduces flicker)
        write!(stdout, "\x1b[?2026h")?;
        execute!(stdout, Hide)?;
        execute!(
            stdout,
            SetForegroundColor(self.palette.text.to_crossterm()),
            SetBackgroundColor(self.palette.screen.to_crossterm())
        )?;

        for y in 0..height {
            execute!(stdout, MoveTo(0, y as u16))?;
            write!(stdout, "\x1b[K")?; // Clear to end of line
            if let Some(row) = window.get(y) {
                write!(stdout, "{}", row)?;
            }
        }

        if offset > 0 {
            // Scroll indicator replaces the caret while reviewing history
            execute!(stdout, MoveTo(0, 0))?;
            write!(stdout, "[\u{2191} {} rows]", offset)?;
        } else if let Some(last) = window.last() {
            let x = unicode_width::UnicodeWidthStr::width(last.as_str());
            let y = window.len().saturating_sub(1);
            let x = x.min(cols.saturating_sub(1) as usize);
            execute!(stdout, MoveTo(x as u16, y as u16), Show)?;
        } else {
            execute!(stdout, MoveTo(0, 0), Show)?;
        }

        // End synchronized update
        write!(stdout, "\x1b[?2026l")?;
        stdout.flush()?;

        Ok(())
    }

    /// Get terminal size
    #[allow(dead_code)]
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
