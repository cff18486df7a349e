//! Bounded undo/redo history of whole-document snapshots.
//!
//! Frames capture the document plus the cursor; transient edit-session and
//! selection state is deliberately not snapshotted. Both stacks hold at most
//! [`MAX_DEPTH`] frames and evict the oldest first.

use std::collections::VecDeque;

use super::document::Document;

pub const MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub document: Document,
    pub cursor: usize,
}

#[derive(Debug, Default)]
pub struct History {
    undo: VecDeque<Frame>,
    redo: VecDeque<Frame>,
}

impl History {
    /// Records the state about to be mutated. Any new tracked mutation
    /// invalidates the redo stack.
    pub fn record(&mut self, document: &Document, cursor: usize) {
        push_bounded(
            &mut self.undo,
            Frame {
                document: document.clone(),
                cursor,
            },
        );
        self.redo.clear();
    }

    /// Swaps the current state for the newest undo frame, if any.
    pub fn undo(&mut self, current: &Document, cursor: usize) -> Option<Frame> {
        let frame = self.undo.pop_back()?;
        push_bounded(
            &mut self.redo,
            Frame {
                document: current.clone(),
                cursor,
            },
        );
        Some(frame)
    }

    /// Swaps the current state for the newest redo frame, if any.
    pub fn redo(&mut self, current: &Document, cursor: usize) -> Option<Frame> {
        let frame = self.redo.pop_back()?;
        push_bounded(
            &mut self.undo,
            Frame {
                document: current.clone(),
                cursor,
            },
        );
        Some(frame)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

fn push_bounded(stack: &mut VecDeque<Frame>, frame: Frame) {
    stack.push_back(frame);
    if stack.len() > MAX_DEPTH {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::line_item::LineItem;

    fn doc(text: &str) -> Document {
        Document::from_text(text)
    }

    fn numbered(n: usize) -> Document {
        doc(&format!("- [ ] task {n}\n"))
    }

    #[test]
    fn undo_then_redo_restores_exact_states() {
        let mut history = History::default();
        let before = doc("- [ ] one\n");
        let after = doc("- [ ] one\n- [ ] two\n");

        history.record(&before, 0);
        let frame = history.undo(&after, 1).unwrap();
        assert_eq!(frame.document, before);
        assert_eq!(frame.cursor, 0);

        let frame = history.redo(&frame.document, frame.cursor).unwrap();
        assert_eq!(frame.document, after);
        assert_eq!(frame.cursor, 1);
    }

    #[test]
    fn empty_stacks_are_reported_not_errors() {
        let mut history = History::default();
        assert!(history.undo(&Document::default(), 0).is_none());
        assert!(history.redo(&Document::default(), 0).is_none());
    }

    #[test]
    fn record_clears_redo() {
        let mut history = History::default();
        history.record(&numbered(0), 0);
        history.undo(&numbered(1), 0).unwrap();
        assert_eq!(history.redo_depth(), 1);

        history.record(&numbered(2), 0);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn depth_is_bounded_and_evicts_the_oldest() {
        let mut history = History::default();
        for n in 0..(MAX_DEPTH + 2) {
            history.record(&numbered(n), n);
        }
        assert_eq!(history.undo_depth(), MAX_DEPTH);

        // The newest frame is 11; the survivors bottom out at frame 2.
        let mut oldest = None;
        let current = numbered(99);
        while let Some(frame) = history.undo(&current, 0) {
            oldest = Some(frame);
        }
        let oldest = oldest.unwrap();
        assert_eq!(
            oldest.document.get(0).and_then(LineItem::as_task).unwrap().text,
            "task 2"
        );
    }
}
