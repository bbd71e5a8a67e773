//! The UI-owning thread's main loop.
//!
//! This is the only thread that mutates the screen buffer or touches the
//! terminal. It drains marshaled commands from the rest of the process,
//! and while visible it also polls crossterm for key, paste, mouse, and
//! resize events, feeding keys through the line capture into the input
//! bridge.

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseEventKind};
use tracing::{debug, error, info};

use crate::config::Palette;
use crate::core::{CaptureAction, InputBridge, LineCapture, Snapshot, UiCommand};
use crate::ui::renderer::Renderer;
use crate::ui::screen::Screen;

const POLL_TIMEOUT: Duration = Duration::from_millis(10);
const HIDDEN_PARK: Duration = Duration::from_millis(50);
const SCROLL_STEP: usize = 3;

pub(crate) struct EventLoop {
    rx: Receiver<UiCommand>,
    bridge: InputBridge,
    screen: Screen,
    renderer: Renderer,
    capture: LineCapture,
    running: bool,
}

/// Run the UI loop to completion. Called on the dedicated console thread;
/// returns when `UiCommand::Shutdown` arrives or every sender is gone.
pub(crate) fn run(rx: Receiver<UiCommand>, bridge: InputBridge, palette: Palette, title: String) {
    let mut ui = EventLoop {
        rx,
        bridge,
        screen: Screen::new(),
        renderer: Renderer::new(palette, title),
        capture: LineCapture::new(),
        running: true,
    };
    info!("console UI thread started");
    ui.run();
    info!("console UI thread stopped");
}

impl EventLoop {
    fn run(&mut self) {
        while self.running {
            self.drain_commands();
            if !self.running {
                break;
            }

            if !self.renderer.is_initialized() {
                // Hidden: nothing to poll, park on the command channel.
                match self.rx.recv_timeout(HIDDEN_PARK) {
                    Ok(cmd) => self.handle_command(cmd),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                continue;
            }

            match event::poll(POLL_TIMEOUT) {
                Ok(true) => match event::read() {
                    Ok(evt) => self.handle_event(evt),
                    Err(e) => error!("event read failed: {}", e),
                },
                Ok(false) => {}
                Err(e) => error!("event poll failed: {}", e),
            }

            if self.screen.take_dirty() {
                if let Err(e) = self.renderer.render(&self.screen) {
                    error!("render failed: {}", e);
                }
            }
        }

        if let Err(e) = self.renderer.cleanup() {
            error!("terminal cleanup failed: {}", e);
        }
    }

    fn drain_commands(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(cmd) => self.handle_command(cmd),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.running = false;
                    break;
                }
            }
        }
    }

    fn handle_command(&mut self, cmd: UiCommand) {
        match cmd {
            UiCommand::Append(text) => {
                self.screen.append(&text);
            }
            UiCommand::Show => {
                if !self.renderer.is_initialized() {
                    match self.renderer.init() {
                        Ok(()) => {
                            debug!("console visible");
                            self.screen.mark_dirty();
                        }
                        Err(e) => error!("failed to take over the terminal: {}", e),
                    }
                }
            }
            UiCommand::Hide => {
                if self.renderer.is_initialized() {
                    if let Err(e) = self.renderer.cleanup() {
                        error!("failed to restore the terminal: {}", e);
                    }
                    debug!("console hidden");
                }
            }
            UiCommand::Shutdown => {
                self.running = false;
            }
            UiCommand::Report(reply) => {
                let _ = reply.send(Snapshot {
                    text: self.screen.text(),
                    caret: self.screen.caret(),
                    visible: self.renderer.is_initialized(),
                });
            }
        }
    }

    fn handle_event(&mut self, evt: Event) {
        match evt {
            Event::Key(key_event) => {
                // Only key presses carry input; releases and repeats must
                // not scroll, snap the view, or reach the capture.
                if key_event.kind != KeyEventKind::Press {
                    return;
                }

                // Scrollback review keys
                match key_event.code {
                    KeyCode::PageUp => {
                        self.screen.scroll_view_up(SCROLL_STEP * 3);
                        return;
                    }
                    KeyCode::PageDown => {
                        self.screen.scroll_view_down(SCROLL_STEP * 3);
                        return;
                    }
                    _ => {}
                }

                // Any other key input returns to the live view
                self.screen.scroll_to_bottom();
                let action = self.capture.key_press(&key_event);
                self.apply_capture(action);
            }
            Event::Paste(text) => {
                self.screen.scroll_to_bottom();
                let actions: Vec<CaptureAction> =
                    text.chars().map(|ch| self.capture.feed_char(ch)).collect();
                for action in actions {
                    self.apply_capture(action);
                }
            }
            Event::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::ScrollUp => self.screen.scroll_view_up(SCROLL_STEP),
                MouseEventKind::ScrollDown => self.screen.scroll_view_down(SCROLL_STEP),
                _ => {}
            },
            Event::Resize(_, _) => {
                self.screen.mark_dirty();
            }
            _ => {}
        }
    }

    fn apply_capture(&mut self, action: CaptureAction) {
        match action {
            CaptureAction::None => {}
            CaptureAction::Echo(ch) => {
                let mut buf = [0u8; 4];
                self.screen.append(ch.encode_utf8(&mut buf));
            }
            CaptureAction::Commit(line) => {
                self.screen.append("\n");
                self.bridge.commit_line(&line);
            }
        }
    }
}
