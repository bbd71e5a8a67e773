//! Input bridge: committed lines in, blocking byte reads out.
//!
//! `InputBridge` is the producer-side entry point driven by the UI thread;
//! `ConsoleIn` is the `std::io::Read` handle handed to worker threads.

use std::io;
use std::time::Duration;

use tracing::debug;

use super::queue::{ByteQueue, InputByte, RecvError};
use crate::config::LineEnding;

/// Bridge between the UI thread's line commits and blocking readers.
///
/// Cloning shares the same queue; one bridge (and its clones) exists per
/// console.
#[derive(Clone)]
pub struct InputBridge {
    queue: ByteQueue,
    line_ending: LineEnding,
}

impl InputBridge {
    pub fn new(line_ending: LineEnding) -> Self {
        Self {
            queue: ByteQueue::new(),
            line_ending,
        }
    }

    /// Commit one line of input: UTF-8 bytes, then the configured line
    /// terminator's bytes, then one end marker. Replaces any unread units
    /// from the previous commit and wakes all blocked readers.
    pub fn commit_line(&self, text: &str) {
        let terminator = self.line_ending.bytes();
        let mut units = Vec::with_capacity(text.len() + terminator.len() + 1);
        units.extend(text.bytes().map(InputByte::Byte));
        units.extend(terminator.iter().copied().map(InputByte::Byte));
        units.push(InputByte::EndMark);
        debug!("commit: {} byte(s) + terminator + mark", text.len());
        self.queue.load(units);
    }

    /// Blocking single-unit read. Suspends while the queue is empty;
    /// `Err(Closed)` only after [`close`](Self::close).
    pub fn read(&self) -> Result<InputByte, RecvError> {
        self.queue.recv()
    }

    /// Bounded single-unit read; `Err(Timeout)` if no commit arrives in time.
    pub fn read_timeout(&self, timeout: Duration) -> Result<InputByte, RecvError> {
        self.queue.recv_timeout(timeout)
    }

    /// Non-blocking single-unit read.
    pub fn try_read(&self) -> Option<InputByte> {
        self.queue.try_recv()
    }

    /// Close the bridge, waking every blocked reader with `Closed`.
    pub fn close(&self) {
        debug!("input bridge closed");
        self.queue.close();
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}

/// `std::io::Read` view of the bridge, suitable for `BufReader`/`Scanner`
/// style consumers.
///
/// A fill blocks for its first unit, then drains without blocking until the
/// buffer is full or an end marker (or an empty queue) terminates the unit.
/// A fill that begins at the marker returns `Ok(0)` for that call only; the
/// next fill blocks for the next commit. Once the bridge is closed every
/// fill returns `Ok(0)`.
#[derive(Clone)]
pub struct ConsoleIn {
    bridge: InputBridge,
}

impl ConsoleIn {
    pub fn new(bridge: InputBridge) -> Self {
        Self { bridge }
    }
}

impl io::Read for ConsoleIn {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let first = match self.bridge.read() {
            Ok(unit) => unit,
            Err(RecvError::Closed) => return Ok(0),
            // The fill uses the untimed read; only close can end the wait.
            Err(RecvError::Timeout) => unreachable!("untimed read cannot time out"),
        };
        let mut n = match first {
            InputByte::Byte(b) => {
                buf[0] = b;
                1
            }
            InputByte::EndMark => return Ok(0),
        };

        while n < buf.len() {
            match self.bridge.try_read() {
                Some(InputByte::Byte(b)) => {
                    buf[n] = b;
                    n += 1;
                }
                Some(InputByte::EndMark) | None => break,
            }
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::thread;

    fn bridge() -> InputBridge {
        InputBridge::new(LineEnding::Lf)
    }

    #[test]
    fn commit_round_trips_bytes_terminator_and_mark() {
        let b = bridge();
        b.commit_line("hello");

        let mut units = Vec::new();
        for _ in 0..7 {
            units.push(b.read().unwrap());
        }
        let expected: Vec<InputByte> = b"hello\n"
            .iter()
            .copied()
            .map(InputByte::Byte)
            .chain(std::iter::once(InputByte::EndMark))
            .collect();
        assert_eq!(units, expected);
    }

    #[test]
    fn crlf_terminator_bytes() {
        let b = InputBridge::new(LineEnding::CrLf);
        b.commit_line("x");
        assert_eq!(b.read(), Ok(InputByte::Byte(b'x')));
        assert_eq!(b.read(), Ok(InputByte::Byte(b'\r')));
        assert_eq!(b.read(), Ok(InputByte::Byte(b'\n')));
        assert_eq!(b.read(), Ok(InputByte::EndMark));
    }

    #[test]
    fn later_commit_discards_earlier_unread_line() {
        let b = bridge();
        b.commit_line("abandoned");
        b.commit_line("kept");
        let mut got = Vec::new();
        loop {
            match b.read().unwrap() {
                InputByte::Byte(byte) => got.push(byte),
                InputByte::EndMark => break,
            }
        }
        assert_eq!(got, b"kept\n");
    }

    #[test]
    fn console_in_fills_up_to_the_mark() {
        let b = bridge();
        b.commit_line("hi");
        let mut cin = ConsoleIn::new(b.clone());

        let mut buf = [0u8; 16];
        let n = cin.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hi\n");

        // The fill stopped at the marker; the next fill begins there and
        // reports an empty read for that call only.
        let n = cin.read(&mut buf).unwrap();
        assert_eq!(n, 0);
        assert!(!b.is_closed());
    }

    #[test]
    fn console_in_small_buffer_takes_multiple_fills() {
        let b = bridge();
        b.commit_line("abcd");
        let mut cin = ConsoleIn::new(b);

        let mut buf = [0u8; 2];
        assert_eq!(cin.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"ab");
        assert_eq!(cin.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"cd");
        assert_eq!(cin.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'\n');
    }

    #[test]
    fn console_in_returns_eof_after_close() {
        let b = bridge();
        let mut cin = ConsoleIn::new(b.clone());

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 8];
            cin.read(&mut buf).unwrap()
        });
        thread::sleep(Duration::from_millis(50));
        b.close();
        assert_eq!(handle.join().unwrap(), 0);
    }

    #[test]
    fn blocked_read_returns_first_committed_byte() {
        let b = bridge();
        let reader = b.clone();
        let handle = thread::spawn(move || reader.read());
        thread::sleep(Duration::from_millis(50));
        b.commit_line("go");
        assert_eq!(handle.join().unwrap(), Ok(InputByte::Byte(b'g')));
    }

    #[test]
    fn read_timeout_surfaces_as_timeout() {
        let b = bridge();
        assert_eq!(
            b.read_timeout(Duration::from_millis(20)),
            Err(RecvError::Timeout)
        );
    }

    #[test]
    fn timeout_is_never_conflated_with_eof() {
        // A bounded wait that elapses stays a Timeout at the bridge level;
        // only a closed bridge reads as end-of-stream through ConsoleIn.
        let b = bridge();
        assert_eq!(
            b.read_timeout(Duration::from_millis(10)),
            Err(RecvError::Timeout)
        );
        assert!(!b.is_closed());

        b.close();
        let mut cin = ConsoleIn::new(b.clone());
        let mut buf = [0u8; 4];
        assert_eq!(cin.read(&mut buf).unwrap(), 0);
        assert_eq!(b.read_timeout(Duration::from_millis(10)), Err(RecvError::Closed));
    }
}
