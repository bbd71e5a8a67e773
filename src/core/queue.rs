//! Thread-safe byte queue bridging the UI thread and blocking readers.
//!
//! The queue is the one shared resource in the crate that needs mutual
//! exclusion: the UI thread loads it on every committed line, and any number
//! of worker threads drain it one unit at a time with a blocking receive.
//! Loading *replaces* the queue contents (last-commit-wins); unread units
//! from an earlier commit are discarded.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;

/// One unit on the input stream.
///
/// `EndMark` follows every committed line; it repeats per commit and marks
/// the end of a unit, not the end of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputByte {
    /// An ordinary payload byte.
    Byte(u8),
    /// End of one committed line.
    EndMark,
}

/// Why a receive returned without a unit.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvError {
    /// The queue was closed; no further commits will arrive.
    #[error("input queue closed")]
    Closed,
    /// The bounded wait elapsed before a commit arrived.
    #[error("timed out waiting for input")]
    Timeout,
}

struct QueueState {
    units: VecDeque<InputByte>,
    closed: bool,
}

/// Unbounded FIFO of input units, one loading role, many draining roles.
///
/// Cloning shares the same underlying queue.
#[derive(Clone)]
pub struct ByteQueue {
    inner: Arc<(Mutex<QueueState>, Condvar)>,
}

impl ByteQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((
                Mutex::new(QueueState {
                    units: VecDeque::new(),
                    closed: false,
                }),
                Condvar::new(),
            )),
        }
    }

    /// Replace the queue contents with `units` and wake every blocked reader.
    ///
    /// Units from an earlier load that were never received are discarded.
    /// Loading a closed queue is a no-op.
    pub fn load(&self, units: Vec<InputByte>) {
        let (lock, cvar) = &*self.inner;
        let mut state = lock.lock().unwrap();
        if state.closed {
            return;
        }
        state.units.clear();
        state.units.extend(units);
        cvar.notify_all();
    }

    /// Receive the next unit, blocking while the queue is empty.
    ///
    /// Remaining units are still delivered after close; `Err(Closed)` is
    /// returned once the queue is both closed and empty.
    pub fn recv(&self) -> Result<InputByte, RecvError> {
        let (lock, cvar) = &*self.inner;
        let mut state = lock.lock().unwrap();
        loop {
            if let Some(unit) = state.units.pop_front() {
                return Ok(unit);
            }
            if state.closed {
                return Err(RecvError::Closed);
            }
            state = cvar.wait(state).unwrap();
        }
    }

    /// Receive the next unit, waiting at most `timeout`.
    ///
    /// Loops over the condition variable to absorb spurious wakeups,
    /// recomputing the remaining time on each pass.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<InputByte, RecvError> {
        let (lock, cvar) = &*self.inner;
        let mut state = lock.lock().unwrap();
        let start = Instant::now();
        loop {
            if let Some(unit) = state.units.pop_front() {
                return Ok(unit);
            }
            if state.closed {
                return Err(RecvError::Closed);
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(RecvError::Timeout);
            }
            let (guard, _) = cvar.wait_timeout(state, timeout - elapsed).unwrap();
            state = guard;
        }
    }

    /// Pop the head without blocking.
    pub fn try_recv(&self) -> Option<InputByte> {
        let (lock, _) = &*self.inner;
        lock.lock().unwrap().units.pop_front()
    }

    /// Close the queue and wake every blocked reader.
    pub fn close(&self) {
        let (lock, cvar) = &*self.inner;
        let mut state = lock.lock().unwrap();
        state.closed = true;
        cvar.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        let (lock, _) = &*self.inner;
        lock.lock().unwrap().closed
    }

    /// Number of units currently queued.
    pub fn len(&self) -> usize {
        let (lock, _) = &*self.inner;
        lock.lock().unwrap().units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ByteQueue {
    fn default() -> Self {
        Self::new()
    }
}
