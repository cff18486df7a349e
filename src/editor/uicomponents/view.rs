use std::io::Error;

use crossterm::style::Attribute;

use crate::prelude::{Position, Size};

use super::super::Terminal;
use super::super::line_item::{LineItem, Task};
use super::super::markdown;
use super::super::workspace::{EditIntent, EditSession, EditTarget, Workspace};
use super::InputField;

const EMPTY_STATE: &str = "No tasks found. Press 'o' to create one.";
const CURSOR_MARKER: char = '>';

/// The checklist area. Rows map one-to-one onto line items, with two
/// overlays: a banner row when there are no tasks, and a phantom row for an
/// insert in flight (items at and below the insert index shift down one).
#[derive(Default)]
pub struct View {
    size: Size,
    scroll_offset: usize,
    needs_redraw: bool,
    caret: Option<Position>,
}

impl View {
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.needs_redraw = true;
    }

    pub fn set_needs_redraw(&mut self, value: bool) {
        self.needs_redraw = value;
    }

    /// Draws the visible window of the checklist. Returns the screen position
    /// for the terminal caret while an inline edit is in flight, `None`
    /// otherwise.
    pub fn render(&mut self, workspace: &Workspace, input: &InputField) -> Option<Position> {
        if !self.needs_redraw {
            return self.caret;
        }
        match self.draw(workspace, input) {
            Ok(caret) => {
                self.caret = caret;
                self.needs_redraw = false;
            }
            Err(err) => {
                #[cfg(debug_assertions)]
                {
                    panic!("Could not render view: {err:?}")
                }
                #[cfg(not(debug_assertions))]
                {
                    let _ = err;
                }
            }
        }
        self.caret
    }

    fn draw(&mut self, workspace: &Workspace, input: &InputField) -> Result<Option<Position>, Error> {
        if self.size.height == 0 || self.size.width == 0 {
            return Ok(None);
        }

        let document = workspace.document();
        let session = workspace.session();
        let inserting_at = session
            .filter(|s| s.intent == EditIntent::Insert)
            .map(|s| s.index);
        let inserting_task = session
            .is_some_and(|s| s.intent == EditIntent::Insert && s.target == EditTarget::Task);

        let banner = usize::from(document.task_count() == 0 && !inserting_task);
        let total_rows = banner + document.len() + usize::from(inserting_at.is_some());
        let display_cursor = banner + workspace.cursor();
        self.scroll_into_view(display_cursor, total_rows);

        let mut caret = None;
        for screen_row in 0..self.size.height {
            let display_row = self.scroll_offset + screen_row;
            if display_row >= total_rows {
                Terminal::print_row(screen_row, "")?;
                continue;
            }
            if banner == 1 && display_row == 0 {
                Terminal::print_row(screen_row, EMPTY_STATE)?;
                continue;
            }

            let row = display_row - banner;
            let marker = if display_row == display_cursor {
                CURSOR_MARKER
            } else {
                ' '
            };

            if let (Some(session), true) = (session, Some(row) == inserting_at) {
                caret = Some(self.draw_edit_row(screen_row, marker, session, None, input)?);
                continue;
            }

            let item_index = match inserting_at {
                Some(at) if row > at => row - 1,
                _ => row,
            };
            let Some(item) = document.get(item_index) else {
                Terminal::print_row(screen_row, "")?;
                continue;
            };

            if let Some(session) = session
                && session.intent == EditIntent::Update
                && session.index == item_index
            {
                caret =
                    Some(self.draw_edit_row(screen_row, marker, session, item.as_task(), input)?);
                continue;
            }

            let selected = workspace
                .selection()
                .contains(item_index, workspace.cursor(), document.len());
            self.draw_item_row(screen_row, marker, item, selected)?;
        }
        Ok(caret)
    }

    fn draw_item_row(
        &self,
        screen_row: usize,
        marker: char,
        item: &LineItem,
        selected: bool,
    ) -> Result<(), Error> {
        match item {
            LineItem::Task(task) => {
                let checkbox = if task.completed { "[x]" } else { "[ ]" };
                let prefix = format!("{marker}  {}{checkbox} ", task.display_indent());
                if selected {
                    // no nested styling inside an inverted row
                    Terminal::print_inverted_row(screen_row, &format!("{prefix}{}", task.text))
                } else {
                    Terminal::print_row(
                        screen_row,
                        &format!("{prefix}{}", markdown::style_inline(&task.text)),
                    )
                }
            }
            LineItem::Section { title } => {
                let prefix = format!("{marker}  ");
                if selected {
                    Terminal::print_inverted_row(screen_row, &format!("{prefix}{title}"))
                } else {
                    Terminal::print_row(
                        screen_row,
                        &format!(
                            "{prefix}{}{title}{}",
                            Attribute::Bold,
                            Attribute::NormalIntensity
                        ),
                    )
                }
            }
        }
    }

    /// Draws the row under edit: the task prefix (or a section stub) followed
    /// by the visible window of the input, and returns where the terminal
    /// caret belongs.
    fn draw_edit_row(
        &self,
        screen_row: usize,
        marker: char,
        session: &EditSession,
        existing: Option<&Task>,
        input: &InputField,
    ) -> Result<Position, Error> {
        let prefix = match session.target {
            EditTarget::Task => {
                let task = existing.unwrap_or(&session.template);
                let checkbox = if task.completed { "[x]" } else { "[ ]" };
                format!("{marker}  {}{checkbox} ", task.display_indent())
            }
            EditTarget::Section => format!("{marker}  ## "),
        };
        let available = self.size.width.saturating_sub(prefix.chars().count());
        let (window, caret_offset) = input.visible(available);
        Terminal::print_row(screen_row, &format!("{prefix}{window}"))?;
        Ok(Position {
            row: screen_row,
            col: prefix.chars().count() + caret_offset,
        })
    }

    fn scroll_into_view(&mut self, display_cursor: usize, total_rows: usize) {
        let height = self.size.height;
        if self.scroll_offset + height > total_rows {
            self.scroll_offset = total_rows.saturating_sub(height);
        }
        if display_cursor < self.scroll_offset {
            self.scroll_offset = display_cursor;
        } else if display_cursor >= self.scroll_offset + height {
            self.scroll_offset = display_cursor - height + 1;
        }
    }
}
