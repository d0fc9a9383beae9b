//! Terminal abstraction using crossterm

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::thread;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor},
    terminal::{self, ClearType},
};

use crate::error::Result;
use crate::highlight::{Color, Style};
use crate::session::Trigger;

/// Queue the crossterm commands for `style`
pub fn queue_style<W: Write>(out: &mut W, style: &Style) -> Result<()> {
    if style.bg != Color::Default {
        queue!(out, SetBackgroundColor(style.bg.to_crossterm()))?;
    }
    Ok(())
}

/// Terminal wrapper for the full-screen watch view
pub struct Terminal {
    /// Terminal width in columns
    cols: u16,
    /// Terminal height in rows
    rows: u16,
}

impl Terminal {
    /// Create a new terminal instance and enter raw mode
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;

        let mut term = Self { cols, rows };
        term.enter_alternate_screen()?;
        term.hide_cursor()?;

        Ok(term)
    }

    /// Enter alternate screen buffer
    fn enter_alternate_screen(&mut self) -> Result<()> {
        execute!(io::stdout(), terminal::EnterAlternateScreen)?;
        Ok(())
    }

    /// Leave alternate screen buffer
    fn leave_alternate_screen(&mut self) -> Result<()> {
        execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
        Ok(())
    }

    /// Hide the cursor
    fn hide_cursor(&mut self) -> Result<()> {
        execute!(io::stdout(), cursor::Hide)?;
        Ok(())
    }

    /// Show the cursor
    fn show_cursor(&mut self) -> Result<()> {
        execute!(io::stdout(), cursor::Show)?;
        Ok(())
    }

    /// Get terminal width
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Get terminal height
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Update terminal size (call after resize event)
    pub fn update_size(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows;
        Ok(())
    }

    /// Clear the entire screen
    pub fn clear_screen(&mut self) -> Result<()> {
        queue!(io::stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    /// Clear from cursor to end of line
    pub fn clear_to_eol(&mut self) -> Result<()> {
        queue!(io::stdout(), terminal::Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    /// Move cursor to position (0-indexed)
    pub fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        queue!(io::stdout(), cursor::MoveTo(col, row))?;
        Ok(())
    }

    /// Write a string at current cursor position
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        queue!(io::stdout(), Print(s))?;
        Ok(())
    }

    /// Write a single character
    pub fn write_char(&mut self, ch: char) -> Result<()> {
        queue!(io::stdout(), Print(ch))?;
        Ok(())
    }

    /// Flush output buffer to terminal
    pub fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    /// Set colours for following writes
    pub fn apply_style(&mut self, style: &Style) -> Result<()> {
        queue_style(&mut io::stdout(), style)
    }

    /// Set reverse video mode
    pub fn set_reverse(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            queue!(io::stdout(), SetAttribute(Attribute::Reverse))?;
        } else {
            queue!(io::stdout(), SetAttribute(Attribute::NoReverse))?;
        }
        Ok(())
    }

    /// Set dim/faint mode (for the end-of-document filler)
    pub fn set_dim(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            queue!(io::stdout(), SetAttribute(Attribute::Dim))?;
        } else {
            queue!(io::stdout(), SetAttribute(Attribute::NormalIntensity))?;
        }
        Ok(())
    }

    /// Reset all attributes
    pub fn reset_attributes(&mut self) -> Result<()> {
        queue!(
            io::stdout(),
            crossterm::style::ResetColor,
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = self.show_cursor();
        let _ = self.leave_alternate_screen();
        let _ = terminal::disable_raw_mode();
    }
}

/// Map a key press to a session trigger
pub fn trigger_for_key(key: KeyEvent) -> Option<Trigger> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Trigger::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Trigger::Quit),
        KeyCode::Char('r') => Some(Trigger::Refresh),
        KeyCode::Up | KeyCode::Char('k') => Some(Trigger::Scroll(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Trigger::Scroll(1)),
        KeyCode::PageUp => Some(Trigger::Page(-1)),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Trigger::Page(1)),
        KeyCode::Home | KeyCode::Char('g') => Some(Trigger::Scroll(isize::MIN)),
        KeyCode::End | KeyCode::Char('G') => Some(Trigger::Scroll(isize::MAX)),
        _ => None,
    }
}

/// Forward key presses and resizes to `tx` from a background thread
///
/// The thread ends once the receiving side hangs up or input fails.
pub fn spawn_input_thread(tx: Sender<Trigger>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let trigger = match event::read() {
            Ok(Event::Key(key)) => trigger_for_key(key),
            Ok(Event::Resize(_, _)) => Some(Trigger::Resize),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Terminal input error: {}", e);
                return;
            }
        };
        if let Some(trigger) = trigger {
            let quit = trigger == Trigger::Quit;
            if tx.send(trigger).is_err() || quit {
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_queue_style_only_paints_background() {
        let mut out = Vec::new();
        queue_style(&mut out, &Style::default()).unwrap();
        assert!(out.is_empty());

        queue_style(&mut out, &Style::overlay(Color::Red)).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.starts_with("\x1b["));
        assert!(!written.contains("\x1b[1m"));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(trigger_for_key(press(KeyCode::Char('q'))), Some(Trigger::Quit));
        assert_eq!(trigger_for_key(press(KeyCode::Esc)), Some(Trigger::Quit));
        assert_eq!(
            trigger_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Trigger::Quit)
        );
        assert_eq!(trigger_for_key(press(KeyCode::Char('r'))), Some(Trigger::Refresh));
        assert_eq!(trigger_for_key(press(KeyCode::Down)), Some(Trigger::Scroll(1)));
        assert_eq!(trigger_for_key(press(KeyCode::PageUp)), Some(Trigger::Page(-1)));
        assert_eq!(trigger_for_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(trigger_for_key(key), None);
    }
}
