//! screenio - a drop-in console substitute on a terminal text surface
//!
//! screenio redirects a program's line-oriented input and output onto an
//! alternate-screen text surface owned by a dedicated UI thread, instead
//! of the hosting terminal's normal stream plumbing. Worker threads keep
//! using classic blocking `std::io::Read`/`std::io::Write` handles; the
//! crate bridges them to the event-driven surface.
//!
//! # Features
//!
//! - **Blocking input bridge**: key presses accumulate on the UI thread;
//!   Enter commits the line and wakes readers blocked in `read`
//! - **Non-blocking output sink**: writes from any thread are decoded and
//!   marshaled onto the display without ever blocking the writer
//! - **Visibility lifecycle**: show and hide the surface at will; the
//!   display buffer keeps running while hidden
//! - **Scrollback viewing**: mouse wheel and PageUp/PageDown review
//!   history; new input or output snaps back to the live tail
//! - **Palettes**: classic green-phosphor default, configurable via
//!   `~/.screenio/config.toml`
//!
//! # Quick Start
//!
//! ```no_run
//! use std::io::{BufRead, BufReader, Write};
//!
//! screenio::console().show();
//!
//! let mut out = screenio::stdout();
//! writeln!(out, "What is your name?").unwrap();
//!
//! let mut line = String::new();
//! BufReader::new(screenio::stdin()).read_line(&mut line).unwrap();
//! writeln!(out, "Hello, {}!", line.trim()).unwrap();
//!
//! screenio::console().shutdown();
//! ```
//!
//! # Semantics worth knowing
//!
//! - Input is UTF-8; each committed line is followed by the configured
//!   line terminator's bytes and one end-of-unit marker. The marker
//!   repeats after every line; it is not end-of-stream.
//! - A commit *replaces* any unread bytes from the previous commit
//!   (last-commit-wins); lines do not queue up behind each other.
//! - Writes issued before the display is attached, or after shutdown,
//!   are silently dropped; neither `read` nor `write` ever surfaces an
//!   error once the console is constructed.
//! - `shutdown` wakes blocked readers with end-of-stream.

pub mod config;
pub mod core;
pub mod ui;

mod console;

pub use config::{Color, ConsoleConfig, LineEnding, Palette};
pub use console::{console, install, stdin, stdout, Console, ConsoleError};
pub use core::{ConsoleIn, ConsoleOut, InputBridge, InputByte, OutputSink, RecvError, Snapshot};
