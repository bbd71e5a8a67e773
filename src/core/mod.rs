//! Core console plumbing.
//!
//! This module contains the concurrency-bearing half of the crate:
//!
//! - **queue**: thread-safe byte queue with blocking receive and
//!   replace-on-load semantics
//! - **input**: the input bridge and its `std::io::Read` handle
//! - **capture**: key presses accumulated into committed lines
//! - **output**: the output sink, its `std::io::Write` handle, and the
//!   command channel onto the UI thread
//!
//! # Architecture
//!
//! ```text
//! UI thread ──keys──▶ LineCapture ──commit──▶ InputBridge ──▶ ByteQueue
//!                                                                 │
//! worker threads ◀───────────── blocking read ────────────────────┘
//!
//! worker threads ──write──▶ OutputSink ──UiCommand::Append──▶ UI thread
//! ```

pub mod capture;
pub mod input;
pub mod output;
pub mod queue;

pub use capture::{CaptureAction, LineCapture};
pub use input::{ConsoleIn, InputBridge};
pub use output::{ConsoleOut, OutputSink, Snapshot, UiCommand};
pub use queue::{ByteQueue, InputByte, RecvError};
