//! TUI event handling
//!
//! Terminal input is read on a blocking thread and forwarded over a tokio
//! channel, so the runner only wakes up when something happened.

use std::io;
use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::warn;

/// Terminal events
#[derive(Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Outcome of one poll of the terminal
#[derive(Debug)]
enum Polled {
    Ready(event::Event),
    Idle,
    Failed(io::Error),
}

/// Event handler for the TUI
pub struct EventHandler {
    /// Event receiver
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler polling the terminal every `poll_interval`
    pub fn new(poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            loop {
                if tx.is_closed() {
                    break;
                }

                let evt = match poll_once(|| event::poll(poll_interval), event::read) {
                    Polled::Ready(evt) => evt,
                    Polled::Idle => continue,
                    Polled::Failed(e) => {
                        // Back off: a failing terminal returns immediately
                        warn!("Failed to read terminal event: {}", e);
                        std::thread::sleep(poll_interval);
                        continue;
                    }
                };

                let Some(event) = translate(evt) else {
                    continue;
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Get the next event (async)
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or_else(|| eyre::eyre!("Event channel closed"))
    }
}

fn poll_once(
    poll: impl FnOnce() -> io::Result<bool>,
    read: impl FnOnce() -> io::Result<event::Event>,
) -> Polled {
    match poll() {
        Ok(true) => match read() {
            Ok(evt) => Polled::Ready(evt),
            Err(e) => Polled::Failed(e),
        },
        Ok(false) => Polled::Idle,
        Err(e) => Polled::Failed(e),
    }
}

/// Keep key presses and resizes, drop everything else
fn translate(evt: event::Event) -> Option<Event> {
    match evt {
        event::Event::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        event::Event::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}
