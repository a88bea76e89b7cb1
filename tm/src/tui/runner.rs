//! TUI Runner - main loop that owns the terminal
//!
//! The TuiRunner is responsible for:
//! - Drawing the current state after every event
//! - Dispatching key events to App for handling
//! - Stopping when the App asks to quit

use std::time::Duration;

use eyre::Result;
use kvstore::KeyValueStore;
use tracing::debug;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner<S: KeyValueStore> {
    /// Application state
    app: App<S>,
    /// Terminal handle
    terminal: Tui,
    /// Event handler
    event_handler: EventHandler,
}

impl<S: KeyValueStore> TuiRunner<S> {
    pub fn new(terminal: Tui, app: App<S>, poll_interval: Duration) -> Self {
        Self {
            app,
            terminal,
            event_handler: EventHandler::new(poll_interval),
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.terminal.draw(|frame| views::render(&self.app, frame))?;

            match self.event_handler.next().await? {
                Event::Key(key_event) => {
                    if self.app.handle_key(key_event) {
                        break;
                    }
                }
                Event::Resize(width, height) => {
                    // Next draw picks up the new size
                    debug!(width, height, "Terminal resized");
                }
            }

            if self.app.state().should_quit {
                break;
            }
        }

        Ok(())
    }
}
