//! Console façade and the process-wide handle.
//!
//! `Console::start` wires the input bridge, output sink, and UI thread
//! together; `install`/`console` manage the documented one-per-process
//! instance. Exactly one console exists per process; the free functions
//! `stdin` and `stdout` hand out stream handles on it.

use std::sync::mpsc::{self, Sender};
use std::sync::{Mutex, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::ConsoleConfig;
use crate::core::{ConsoleIn, ConsoleOut, InputBridge, OutputSink, Snapshot, UiCommand};
use crate::ui::event_loop;

const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("console already installed for this process")]
    AlreadyInstalled,

    #[error("failed to spawn the console UI thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("console UI thread did not respond")]
    Unresponsive,
}

/// The console: one blocking input bridge, one output sink, one UI thread.
///
/// Construction starts the UI thread with the console hidden; `show`
/// takes over the terminal. Dropping (or `shutdown`) stops the thread,
/// restores the terminal, and wakes blocked readers.
pub struct Console {
    bridge: InputBridge,
    sink: OutputSink,
    tx: Sender<UiCommand>,
    ui_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Console {
    /// Start a console with the given configuration. The color settings
    /// are consumed here, once; the console starts hidden.
    pub fn start(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let palette = config.resolve_palette();
        info!("starting console (palette: {})", palette.name);

        let bridge = InputBridge::new(config.line_ending);
        let sink = OutputSink::new();
        let (tx, rx) = mpsc::channel::<UiCommand>();
        sink.attach(tx.clone());

        let ui_bridge = bridge.clone();
        let title = config.title.clone();
        let handle = std::thread::Builder::new()
            .name("screenio-ui".to_string())
            .spawn(move || event_loop::run(rx, ui_bridge, palette, title))
            .map_err(ConsoleError::ThreadSpawn)?;

        Ok(Self {
            bridge,
            sink,
            tx,
            ui_thread: Mutex::new(Some(handle)),
        })
    }

    /// A console with no UI thread: reads see end-of-stream, writes are
    /// dropped. Used when the real console cannot be brought up, so the
    /// process keeps running with its I/O failing open.
    fn inert() -> Self {
        let bridge = InputBridge::new(crate::config::LineEnding::Native);
        bridge.close();
        let (tx, _) = mpsc::channel();
        Self {
            bridge,
            sink: OutputSink::new(),
            tx,
            ui_thread: Mutex::new(None),
        }
    }

    /// Blocking input handle over the bridge.
    pub fn stdin(&self) -> ConsoleIn {
        ConsoleIn::new(self.bridge.clone())
    }

    /// Non-blocking output handle over the sink.
    pub fn stdout(&self) -> ConsoleOut {
        ConsoleOut::new(self.sink.clone())
    }

    /// Direct access to the input bridge, for unit-at-a-time reads.
    pub fn input(&self) -> &InputBridge {
        &self.bridge
    }

    /// Take over the terminal surface.
    pub fn show(&self) {
        let _ = self.tx.send(UiCommand::Show);
    }

    /// Give the terminal back; the display buffer keeps accumulating.
    pub fn hide(&self) {
        let _ = self.tx.send(UiCommand::Hide);
    }

    /// Drive the commit path as if the user typed `text` and pressed
    /// Enter: the line is echoed to the display and made readable.
    pub fn inject_line(&self, text: &str) {
        let _ = self.tx.send(UiCommand::Append(format!("{}\n", text)));
        self.bridge.commit_line(text);
    }

    /// Fetch the current display text, caret, and visibility from the UI
    /// thread.
    pub fn snapshot(&self) -> Result<Snapshot, ConsoleError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(UiCommand::Report(reply_tx))
            .map_err(|_| ConsoleError::Unresponsive)?;
        reply_rx
            .recv_timeout(SNAPSHOT_TIMEOUT)
            .map_err(|_| ConsoleError::Unresponsive)
    }

    /// Stop the UI thread, restore the terminal, close the input bridge
    /// (waking every blocked reader), and detach the sink.
    ///
    /// Unblocking readers on shutdown is a deliberate liveness choice:
    /// a reader blocked in `read` sees end-of-stream instead of waiting
    /// for a commit that can no longer arrive.
    pub fn shutdown(&self) {
        info!("console shutting down");
        let _ = self.tx.send(UiCommand::Shutdown);
        self.bridge.close();
        self.sink.detach();

        let handle = self.ui_thread.lock().unwrap().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("console UI thread panicked during shutdown");
            }
        }
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The process-wide console instance.
static CONSOLE: OnceLock<Console> = OnceLock::new();

/// Install the process-wide console with an explicit configuration.
///
/// Must be called before the first use of [`console`], [`stdin`], or
/// [`stdout`]; a second call (or a call after lazy initialization) fails
/// with [`ConsoleError::AlreadyInstalled`].
pub fn install(config: ConsoleConfig) -> Result<&'static Console, ConsoleError> {
    let mut installed = false;
    let console = CONSOLE.get_or_init(|| {
        installed = true;
        start_or_inert(config)
    });
    if installed {
        Ok(console)
    } else {
        Err(ConsoleError::AlreadyInstalled)
    }
}

/// The process-wide console, initialized from `~/.screenio/config.toml`
/// (or defaults) on first touch.
pub fn console() -> &'static Console {
    CONSOLE.get_or_init(|| start_or_inert(ConsoleConfig::load()))
}

/// Blocking input handle on the process-wide console.
pub fn stdin() -> ConsoleIn {
    console().stdin()
}

/// Output handle on the process-wide console.
pub fn stdout() -> ConsoleOut {
    console().stdout()
}

fn start_or_inert(config: ConsoleConfig) -> Console {
    match Console::start(config) {
        Ok(console) => console,
        Err(e) => {
            // Fail open: input at end-of-stream, output dropped.
            error!("console unavailable, running inert: {}", e);
            Console::inert()
        }
    }
}
