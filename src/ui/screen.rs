//! Append-only display buffer.
//!
//! The screen holds the console's full text as logical lines, with the
//! caret always at the end of the buffer. It only ever grows; appends
//! snap the view back to the live tail. Wrapping to the terminal width
//! happens at render time via [`Screen::wrapped_rows`].

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TAB_STOP: usize = 8;

/// Append-only text store mutated only on the UI-owning thread.
pub struct Screen {
    /// Logical lines, split on `\n`.
    lines: Vec<String>,
    /// Total character count of the buffer text; the caret sits here.
    caret: usize,
    /// View offset from the live tail, in wrapped rows. 0 = live.
    scroll_offset: usize,
    /// Set when the display changed since the last render.
    dirty: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            caret: 0,
            scroll_offset: 0,
            dirty: true,
        }
    }

    /// Append decoded text at the caret.
    ///
    /// `\n` starts a new line and `\r\n` is normalized to it; tabs expand
    /// to the next tab stop; other control characters are dropped. Any
    /// scrollback view snaps back to the live tail.
    pub fn append(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' => {
                    self.lines.push(String::new());
                    self.caret += 1;
                }
                // Dropped; a following '\n' breaks the line on its own.
                '\r' => {}
                '\t' => {
                    let line = self.current_line();
                    let col = UnicodeWidthStr::width(line.as_str());
                    let spaces = TAB_STOP - (col % TAB_STOP);
                    for _ in 0..spaces {
                        self.current_line_mut().push(' ');
                    }
                    self.caret += spaces;
                }
                ch if ch.is_control() => {}
                ch => {
                    self.current_line_mut().push(ch);
                    self.caret += 1;
                }
            }
        }
        self.scroll_offset = 0;
        self.dirty = true;
    }

    fn current_line(&self) -> &String {
        // lines is never empty; new() seeds one line and append only pushes.
        &self.lines[self.lines.len() - 1]
    }

    fn current_line_mut(&mut self) -> &mut String {
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    /// Full display text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Caret position: the total character count of [`text`](Self::text).
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Scroll the view toward older rows.
    pub fn scroll_view_up(&mut self, n: usize) {
        // Loose clamp; the renderer clamps exactly against the window.
        let max = self.lines.len().saturating_sub(1).max(1) * 4;
        self.scroll_offset = (self.scroll_offset + n).min(max);
        self.dirty = true;
    }

    /// Scroll the view back toward the live tail.
    pub fn scroll_view_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
        self.dirty = true;
    }

    /// Return to the live view.
    pub fn scroll_to_bottom(&mut self) {
        if self.scroll_offset != 0 {
            self.scroll_offset = 0;
            self.dirty = true;
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scroll_offset > 0
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Take the dirty flag, clearing it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// The buffer wrapped to `width` display columns.
    ///
    /// Every logical line contributes at least one row, so the caret row
    /// is always the last row and empty lines still occupy the screen.
    pub fn wrapped_rows(&self, width: u16) -> Vec<String> {
        let width = width.max(1) as usize;
        let mut rows = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let mut row = String::new();
            let mut row_width = 0usize;
            for ch in line.chars() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(0);
                if row_width + w > width && !row.is_empty() {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(ch);
                row_width += w;
            }
            rows.push(row);
        }
        rows
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_grows_text_and_caret() {
        let mut s = Screen::new();
        s.append("hello");
        assert_eq!(s.text(), "hello");
        assert_eq!(s.caret(), 5);

        s.append(" world");
        assert_eq!(s.text(), "hello world");
        assert_eq!(s.caret(), 11);
    }

    #[test]
    fn caret_always_equals_buffer_length() {
        let mut s = Screen::new();
        s.append("one\ntwo\t");
        s.append("caf\u{e9}\r\nend");
        assert_eq!(s.caret(), s.text().chars().count());
    }

    #[test]
    fn newline_splits_lines() {
        let mut s = Screen::new();
        s.append("a\nb\nc");
        assert_eq!(s.line_count(), 3);
        assert_eq!(s.text(), "a\nb\nc");
    }

    #[test]
    fn crlf_normalizes_to_one_line_break() {
        let mut s = Screen::new();
        s.append("a\r\nb");
        assert_eq!(s.text(), "a\nb");
    }

    #[test]
    fn tab_expands_to_next_stop() {
        let mut s = Screen::new();
        s.append("ab\tc");
        assert_eq!(s.text(), "ab      c");

        let mut s = Screen::new();
        s.append("\tx");
        assert_eq!(s.text(), "        x");
    }

    #[test]
    fn other_control_bytes_are_dropped() {
        let mut s = Screen::new();
        s.append("a\x07b\x1b[31mc");
        // No escape processing; ESC is dropped, the sequence body shows.
        assert_eq!(s.text(), "ab[31mc");
    }

    #[test]
    fn buffer_only_grows() {
        let mut s = Screen::new();
        s.append("long line of text\n");
        let before = s.text().len();
        s.append("\x08\x08\x08");
        assert!(s.text().len() >= before);
    }

    #[test]
    fn append_snaps_view_to_tail() {
        let mut s = Screen::new();
        for i in 0..40 {
            s.append(&format!("line {}\n", i));
        }
        s.scroll_view_up(10);
        assert!(s.is_scrolled());
        s.append("fresh output");
        assert!(!s.is_scrolled());
    }

    #[test]
    fn scroll_down_clamps_at_live_view() {
        let mut s = Screen::new();
        s.scroll_view_down(100);
        assert_eq!(s.scroll_offset(), 0);
    }

    #[test]
    fn wrapping_splits_long_lines() {
        let mut s = Screen::new();
        s.append("abcdefgh");
        let rows = s.wrapped_rows(3);
        assert_eq!(rows, vec!["abc", "def", "gh"]);
    }

    #[test]
    fn wrapping_respects_wide_characters() {
        let mut s = Screen::new();
        // Each ideograph is two columns wide.
        s.append("\u{65e5}\u{672c}\u{8a9e}");
        let rows = s.wrapped_rows(4);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "\u{65e5}\u{672c}");
        assert_eq!(rows[1], "\u{8a9e}");
    }

    #[test]
    fn every_logical_line_contributes_a_row() {
        let mut s = Screen::new();
        s.append("a\n\nb");
        let rows = s.wrapped_rows(80);
        assert_eq!(rows, vec!["a", "", "b"]);
    }

    #[test]
    fn take_dirty_clears_the_flag() {
        let mut s = Screen::new();
        assert!(s.take_dirty());
        assert!(!s.take_dirty());
        s.append("x");
        assert!(s.take_dirty());
    }
}
