use std::io::Error;

use crate::editor::ModeType;
use crate::editor::documentstatus::DocumentStatus;
use crate::prelude::Size;

use super::super::Terminal;
use super::UIComponent;

#[derive(Default)]
pub struct StatusBar {
    current_status: DocumentStatus,
    needs_redraw: bool,
    size: Size,
    mode: ModeType,
}

impl StatusBar {
    pub fn update_status(&mut self, new_status: DocumentStatus, mode: ModeType) {
        if new_status != self.current_status || self.mode != mode {
            self.current_status = new_status;
            self.mode = mode;
            self.set_needs_redraw(true);
        }
    }
}

impl UIComponent for StatusBar {
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
        let counts = self.current_status.counts_to_string();
        let beginning = format!("{} — {counts}", self.current_status.file_name);

        // mode indicator at the back, like a vim statusline
        let mode = format!("{}", self.mode);
        let remainder_len = self.size.width.saturating_sub(beginning.chars().count());
        let status = format!("{beginning}{mode:>remainder_len$}");

        // only print out the status if it fits. Otherwise write out an empty
        // string to ensure the row is cleared.
        let to_print = if status.chars().count() <= self.size.width {
            status
        } else {
            String::new()
        };
        Terminal::print_inverted_row(origin_row, &to_print)?;

        Ok(())
    }
}
