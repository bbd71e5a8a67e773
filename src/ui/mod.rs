//! Console surface: display buffer, renderer, and the UI thread.
//!
//! This module owns everything that touches the terminal:
//!
//! - **screen**: the append-only display buffer with caret and scrollback
//!   viewing
//! - **renderer**: crossterm surface ownership (raw mode + alternate
//!   screen) and drawing
//! - **event_loop**: the dedicated UI-owning thread's main loop
//!
//! All other threads reach the display only through `UiCommand` messages;
//! nothing here is touched directly from outside the UI thread.

pub mod screen;

pub(crate) mod event_loop;
pub(crate) mod renderer;

pub use screen::Screen;
