//! Output sink: raw bytes in from any thread, display appends out.
//!
//! Appends are marshaled onto the UI thread over a channel; the writer
//! never blocks and never observes an error. Writes issued before a
//! display is attached are dropped.

use std::io;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use tracing::trace;

/// Messages consumed by the UI-owning thread.
#[derive(Debug)]
pub enum UiCommand {
    /// Append decoded text to the display buffer.
    Append(String),
    /// Enter the alternate screen and begin polling input.
    Show,
    /// Leave the alternate screen; the display buffer keeps running.
    Hide,
    /// Stop the UI thread and restore the terminal.
    Shutdown,
    /// Reply with the current display state.
    Report(Sender<Snapshot>),
}

/// Point-in-time view of the display, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Full display text, lines joined with `\n`.
    pub text: String,
    /// Caret position, always the total character count of `text`.
    pub caret: usize,
    /// Whether the console currently owns the terminal surface.
    pub visible: bool,
}

/// Non-blocking byte sink feeding the display buffer.
///
/// Cloning shares the attachment state; handles created before the display
/// attaches start working once `attach` is called.
#[derive(Clone)]
pub struct OutputSink {
    tx: Arc<Mutex<Option<Sender<UiCommand>>>>,
}

impl OutputSink {
    /// Create an unattached sink; writes are dropped until `attach`.
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Attach the UI command channel. Subsequent writes are appended.
    pub fn attach(&self, tx: Sender<UiCommand>) {
        *self.tx.lock().unwrap() = Some(tx);
    }

    /// Detach from the display; writes go back to being dropped.
    pub fn detach(&self) {
        *self.tx.lock().unwrap() = None;
    }

    pub fn is_attached(&self) -> bool {
        self.tx.lock().unwrap().is_some()
    }

    /// Decode `bytes` as UTF-8 (lossy) and post the append. Never blocks;
    /// silently drops the write while unattached or after the UI thread
    /// has gone away.
    pub fn write_bytes(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let guard = self.tx.lock().unwrap();
        if let Some(tx) = guard.as_ref() {
            let text = String::from_utf8_lossy(bytes).into_owned();
            trace!("append {} byte(s)", bytes.len());
            let _ = tx.send(UiCommand::Append(text));
        }
    }

    /// One-byte convenience form of [`write_bytes`](Self::write_bytes).
    pub fn write_byte(&self, byte: u8) {
        self.write_bytes(&[byte]);
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Infallible `std::io::Write` view of the sink.
#[derive(Clone)]
pub struct ConsoleOut {
    sink: OutputSink,
}

impl ConsoleOut {
    pub fn new(sink: OutputSink) -> Self {
        Self { sink }
    }
}

impl io::Write for ConsoleOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Every append is posted immediately; there is nothing buffered.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    #[test]
    fn write_before_attach_is_dropped_without_delay() {
        let sink = OutputSink::new();
        let start = Instant::now();
        sink.write_bytes(b"nowhere to go");
        sink.write_byte(b'!');
        assert!(start.elapsed() < Duration::from_millis(50));
        assert!(!sink.is_attached());
    }

    #[test]
    fn attached_write_posts_decoded_append() {
        let sink = OutputSink::new();
        let (tx, rx) = mpsc::channel();
        sink.attach(tx);

        sink.write_bytes("caf\u{e9}".as_bytes());
        match rx.try_recv().unwrap() {
            UiCommand::Append(text) => assert_eq!(text, "caf\u{e9}"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn single_byte_form_matches_range_form() {
        let sink = OutputSink::new();
        let (tx, rx) = mpsc::channel();
        sink.attach(tx);

        sink.write_byte(b'A');
        match rx.try_recv().unwrap() {
            UiCommand::Append(text) => assert_eq!(text, "A"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn invalid_utf8_decodes_lossily() {
        let sink = OutputSink::new();
        let (tx, rx) = mpsc::channel();
        sink.attach(tx);

        sink.write_bytes(&[b'o', b'k', 0xFF]);
        match rx.try_recv().unwrap() {
            UiCommand::Append(text) => assert_eq!(text, "ok\u{fffd}"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn write_after_ui_thread_gone_is_dropped() {
        let sink = OutputSink::new();
        let (tx, rx) = mpsc::channel();
        sink.attach(tx);
        drop(rx);
        // Receiver is gone; the send fails and the write is swallowed.
        sink.write_bytes(b"into the void");
    }

    #[test]
    fn console_out_is_infallible() {
        let sink = OutputSink::new();
        let mut out = ConsoleOut::new(sink.clone());
        assert_eq!(out.write(b"dropped").unwrap(), 7);
        assert!(out.flush().is_ok());

        let (tx, rx) = mpsc::channel();
        sink.attach(tx);
        writeln!(out, "shown").unwrap();
        match rx.try_recv().unwrap() {
            UiCommand::Append(text) => assert_eq!(text, "shown\n"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn detach_restores_drop_behavior() {
        let sink = OutputSink::new();
        let (tx, rx) = mpsc::channel();
        sink.attach(tx);
        sink.detach();
        sink.write_bytes(b"x");
        assert!(rx.try_recv().is_err());
    }
}
