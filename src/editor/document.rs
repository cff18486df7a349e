//! The ordered in-memory sequence of line items mirroring the managed file.

use thiserror::Error;

use super::line_item::{LineItem, Task};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("index {index} is out of bounds (len: {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    items: Vec<LineItem>,
}

impl Document {
    /// Builds a document from file text. CRLF is normalized to LF and lines
    /// outside the managed subset are dropped (see the line grammar).
    pub fn from_text(text: &str) -> Self {
        let normalized = text.replace('\r', "");
        Document {
            items: normalized.lines().filter_map(LineItem::parse).collect(),
        }
    }

    /// Serializes the document: items joined by newlines with exactly one
    /// trailing newline, or zero bytes when empty.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for item in &self.items {
            text.push_str(&item.to_string());
            text.push('\n');
        }
        text
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut LineItem> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    pub fn insert_at(&mut self, index: usize, item: LineItem) -> Result<(), DocumentError> {
        if index > self.items.len() {
            return Err(DocumentError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<LineItem, DocumentError> {
        if index >= self.items.len() {
            return Err(DocumentError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn replace_at(&mut self, index: usize, item: LineItem) -> Result<(), DocumentError> {
        if index >= self.items.len() {
            return Err(DocumentError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items[index] = item;
        Ok(())
    }

    pub fn task_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_task()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.items
            .iter()
            .filter_map(LineItem::as_task)
            .filter(|task| task.completed)
            .count()
    }

    /// Clamps a cursor into `[0, len - 1]`, or `0` when empty.
    pub fn clamp_cursor(&self, cursor: usize) -> usize {
        if self.items.is_empty() {
            0
        } else {
            cursor.min(self.items.len() - 1)
        }
    }

    /// Clamps an insertion index into `[0, len]`.
    pub fn clamp_insert(&self, index: usize) -> usize {
        index.min(self.items.len())
    }

    /// Indent/bullet template for a new task: the nearest task at or before
    /// `at`, else the first task in the document, else the default shape.
    pub fn task_template(&self, at: usize) -> Task {
        let at = self.clamp_cursor(at);
        self.items[..(at + 1).min(self.items.len())]
            .iter()
            .rev()
            .chain(self.items.iter())
            .find_map(LineItem::as_task)
            .map(Task::template)
            .unwrap_or_default()
    }
}
