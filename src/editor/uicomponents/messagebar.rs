use std::io::Error;

use crate::prelude::Size;

use super::super::Terminal;
use super::UIComponent;

const PENDING_RELOAD_WARNING: &str = "File changed on disk; finish editing to reload.";

/// The bottom row: one line showing, in order of precedence, the last error,
/// the pending-reload warning, the transient status message, or the key hints
/// for the current mode.
#[derive(Default)]
pub struct MessageBar {
    message: String,
    error: Option<String>,
    pending_reload: bool,
    hints: String,
    needs_redraw: bool,
    size: Size,
}

impl MessageBar {
    pub fn update_message(&mut self, new_message: &str) {
        if new_message != self.message {
            self.message = new_message.to_string();
            self.set_needs_redraw(true);
        }
    }

    pub fn set_error(&mut self, error: Option<String>) {
        if error != self.error {
            self.error = error;
            self.set_needs_redraw(true);
        }
    }

    pub fn set_pending_reload(&mut self, pending: bool) {
        if pending != self.pending_reload {
            self.pending_reload = pending;
            self.set_needs_redraw(true);
        }
    }

    pub fn set_hints(&mut self, hints: &str) {
        if hints != self.hints {
            self.hints = hints.to_string();
            self.set_needs_redraw(true);
        }
    }
}

impl UIComponent for MessageBar {
    fn set_needs_redraw(&mut self, value: bool) {
        self.needs_redraw = value;
    }

    fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn draw(&mut self, origin_row: usize) -> Result<(), Error> {
        let line = if let Some(error) = &self.error {
            format!("Error: {error}")
        } else if self.pending_reload {
            PENDING_RELOAD_WARNING.to_string()
        } else if !self.message.is_empty() {
            self.message.clone()
        } else {
            self.hints.clone()
        };
        Terminal::print_row(origin_row, &line)
    }
}
