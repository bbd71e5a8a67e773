//! Key capture: turns individual key presses into line commits.
//!
//! Owns the pending-line buffer. Ordinary characters accumulate and echo;
//! Enter snapshots and clears the buffer as one committed line. Everything
//! else (releases, repeats, modifier chords, editing keys) is ignored.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the UI loop should do with one captured key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureAction {
    /// Nothing to do for this event.
    None,
    /// Echo the character at the caret; it was added to the pending line.
    Echo(char),
    /// The pending line was finalized; commit it to the input bridge.
    Commit(String),
}

/// Accumulates typed characters until the line-submit key.
#[derive(Debug, Default)]
pub struct LineCapture {
    pending: String,
}

impl LineCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one crossterm key event.
    ///
    /// Only `Press`-kind events carry new input; release and repeat
    /// notifications are dropped so characters are never double-counted.
    pub fn key_press(&mut self, event: &KeyEvent) -> CaptureAction {
        if event.kind != KeyEventKind::Press {
            return CaptureAction::None;
        }
        match event.code {
            KeyCode::Enter => CaptureAction::Commit(self.take_line()),
            KeyCode::Char(ch) => {
                // Shift is part of producing the character; any other
                // modifier makes this a chord, not text.
                let mods = event.modifiers.difference(KeyModifiers::SHIFT);
                if mods.is_empty() {
                    self.push_char(ch);
                    CaptureAction::Echo(ch)
                } else {
                    CaptureAction::None
                }
            }
            _ => CaptureAction::None,
        }
    }

    /// Feed one pasted character through the same accumulate-or-commit
    /// path as typing. Newlines commit exactly like Enter.
    pub fn feed_char(&mut self, ch: char) -> CaptureAction {
        match ch {
            '\n' => CaptureAction::Commit(self.take_line()),
            '\r' => CaptureAction::None,
            ch => {
                self.push_char(ch);
                CaptureAction::Echo(ch)
            }
        }
    }

    pub fn push_char(&mut self, ch: char) {
        self.pending.push(ch);
    }

    /// Snapshot and clear the pending line in one step.
    pub fn take_line(&mut self) -> String {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn characters_accumulate_and_echo() {
        let mut cap = LineCapture::new();
        assert_eq!(
            cap.key_press(&press(KeyCode::Char('h'), KeyModifiers::NONE)),
            CaptureAction::Echo('h')
        );
        assert_eq!(
            cap.key_press(&press(KeyCode::Char('I'), KeyModifiers::SHIFT)),
            CaptureAction::Echo('I')
        );
        assert_eq!(cap.pending(), "hI");
    }

    #[test]
    fn enter_commits_and_clears() {
        let mut cap = LineCapture::new();
        cap.key_press(&press(KeyCode::Char('o'), KeyModifiers::NONE));
        cap.key_press(&press(KeyCode::Char('k'), KeyModifiers::NONE));

        let action = cap.key_press(&press(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(action, CaptureAction::Commit("ok".to_string()));
        assert_eq!(cap.pending(), "");
    }

    #[test]
    fn enter_on_empty_line_commits_empty_string() {
        let mut cap = LineCapture::new();
        assert_eq!(
            cap.key_press(&press(KeyCode::Enter, KeyModifiers::NONE)),
            CaptureAction::Commit(String::new())
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut cap = LineCapture::new();
        let mut event = press(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(cap.key_press(&event), CaptureAction::None);
        assert_eq!(cap.pending(), "");
    }

    #[test]
    fn modifier_chords_carry_no_text() {
        let mut cap = LineCapture::new();
        assert_eq!(
            cap.key_press(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            CaptureAction::None
        );
        assert_eq!(
            cap.key_press(&press(KeyCode::Backspace, KeyModifiers::NONE)),
            CaptureAction::None
        );
        assert_eq!(cap.pending(), "");
    }

    #[test]
    fn pasted_newline_commits_like_enter() {
        let mut cap = LineCapture::new();
        let mut committed = Vec::new();
        for ch in "one\r\ntwo".chars() {
            if let CaptureAction::Commit(line) = cap.feed_char(ch) {
                committed.push(line);
            }
        }
        assert_eq!(committed, vec!["one".to_string()]);
        assert_eq!(cap.pending(), "two");
    }
}
