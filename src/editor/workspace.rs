//! The editable state owned by the event loop: document, cursor, selection,
//! history, and the modal edit session.
//!
//! Everything here is pure state evolution (no terminal, no file I/O), so
//! the whole edit/undo machine is testable without a TTY. The editor drives
//! it from input events and persists the document after each landed mutation.

use super::document::Document;
use super::history::History;
use super::line_item::{INDENT_LEVELS, LineItem, Task};
use super::selection::Selection;

#[derive(Clone, Copy)]
pub enum Move {
    Up,
    Down,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditIntent {
    Update,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Task,
    Section,
}

/// Transient state of one in-flight line edit. Dropped on commit or cancel;
/// never captured in undo frames.
#[derive(Debug)]
pub struct EditSession {
    pub intent: EditIntent,
    pub target: EditTarget,
    pub index: usize,
    pub template: Task,
    undo_recorded: bool,
}

pub struct ToggleOutcome {
    pub count: usize,
    /// New completion state of the last toggled task, for status reporting.
    pub completed: Option<bool>,
}

pub enum CommitOutcome {
    NotEditing,
    /// Blank draft: nothing landed, the session ended.
    EmptyDraft(EditTarget),
    /// The draft landed (and task edits re-entered insert below).
    Committed {
        target: EditTarget,
        continuing: bool,
    },
}

#[derive(Default)]
pub struct Workspace {
    document: Document,
    cursor: usize,
    selection: Selection,
    history: History,
    session: Option<EditSession>,
}

impl Workspace {
    pub fn new(document: Document) -> Self {
        Workspace {
            document,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    //
    // Cursor and selection
    //

    pub fn move_cursor(&mut self, movement: Move) {
        let len = self.document.len();
        self.cursor = match movement {
            Move::Up => self.cursor.saturating_sub(1),
            Move::Down if len > 0 && self.cursor < len - 1 => self.cursor + 1,
            Move::Down => self.cursor,
            Move::Top => 0,
            Move::Bottom => len.saturating_sub(1),
        };
    }

    pub fn start_selection(&mut self) {
        self.selection.start(self.cursor);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    //
    // Mutations from normal/visual mode
    //

    /// Flips the completion flag of the selected range, or of the task under
    /// the cursor. Each task in a range flips independently; sections are
    /// skipped. Clears the selection.
    pub fn toggle(&mut self) -> ToggleOutcome {
        let indices: Vec<usize> = match self
            .selection
            .effective_range(self.cursor, self.document.len())
        {
            Some((start, end)) => (start..=end)
                .filter(|&i| self.document.get(i).is_some_and(LineItem::is_task))
                .collect(),
            None if self.document.get(self.cursor).is_some_and(LineItem::is_task) => {
                vec![self.cursor]
            }
            None => Vec::new(),
        };
        self.selection.clear();

        if indices.is_empty() {
            return ToggleOutcome {
                count: 0,
                completed: None,
            };
        }

        self.history.record(&self.document, self.cursor);
        let mut completed = false;
        for &index in &indices {
            if let Some(task) = self.document.get_mut(index).and_then(LineItem::as_task_mut) {
                task.completed = !task.completed;
                completed = task.completed;
            }
        }
        ToggleOutcome {
            count: indices.len(),
            completed: Some(completed),
        }
    }

    /// Removes the item under the cursor. Deleting a section moves the cursor
    /// to the previous line; deleting a task leaves it in place (now on the
    /// next item), clamped either way.
    pub fn delete_current(&mut self) -> Option<LineItem> {
        if self.document.is_empty() {
            return None;
        }
        self.history.record(&self.document, self.cursor);
        self.selection.clear();
        let removed = self.document.remove_at(self.cursor).ok()?;
        self.cursor = match removed {
            LineItem::Section { .. } => self.document.clamp_cursor(self.cursor.saturating_sub(1)),
            LineItem::Task(_) => self.document.clamp_cursor(self.cursor),
        };
        Some(removed)
    }

    //
    // Edit session lifecycle
    //

    /// Begins an update edit of the item under the cursor, returning its kind
    /// and the draft seed text.
    pub fn start_edit_current(&mut self) -> Option<(EditTarget, String)> {
        let (target, draft) = match self.document.get(self.cursor)? {
            LineItem::Task(task) => (EditTarget::Task, task.text.clone()),
            LineItem::Section { title } => (EditTarget::Section, title.clone()),
        };
        self.selection.clear();
        self.session = Some(EditSession {
            intent: EditIntent::Update,
            target,
            index: self.cursor,
            template: self.document.task_template(self.cursor),
            undo_recorded: false,
        });
        Some((target, draft))
    }

    /// Begins inserting a new task at `at` (clamped), carrying forward the
    /// nearest task's indent and bullet as the template. The cursor moves to
    /// the insert position so the highlight follows the edit focus.
    pub fn start_insert_task(&mut self, at: usize) {
        self.selection.clear();
        let index = self.document.clamp_insert(at);
        self.session = Some(EditSession {
            intent: EditIntent::Insert,
            target: EditTarget::Task,
            index,
            template: self.document.task_template(self.cursor),
            undo_recorded: false,
        });
        self.cursor = index;
    }

    pub fn start_insert_section(&mut self, at: usize) {
        self.selection.clear();
        let index = self.document.clamp_insert(at);
        self.session = Some(EditSession {
            intent: EditIntent::Insert,
            target: EditTarget::Section,
            index,
            template: self.document.task_template(self.cursor),
            undo_recorded: false,
        });
        self.cursor = index;
    }

    /// Adjusts the indent level of the item under edit (update intent) or of
    /// the insert template. Task targets only; clamps silently at the ends.
    /// Returns whether anything changed.
    pub fn adjust_indent(&mut self, delta: i8) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.target != EditTarget::Task {
            return false;
        }
        match session.intent {
            EditIntent::Insert => {
                let level = session.template.indent_level();
                let new_level = shift_level(level, delta);
                if new_level == level {
                    return false;
                }
                session.template.set_indent_level(new_level);
                true
            }
            EditIntent::Update => {
                let index = session.index;
                let Some(level) = self
                    .document
                    .get(index)
                    .and_then(LineItem::as_task)
                    .map(Task::indent_level)
                else {
                    return false;
                };
                let new_level = shift_level(level, delta);
                if new_level == level {
                    return false;
                }
                // One frame per session, recorded at the first landed change.
                if !session.undo_recorded {
                    session.undo_recorded = true;
                    self.history.record(&self.document, self.cursor);
                }
                if let Some(task) = self.document.get_mut(index).and_then(LineItem::as_task_mut) {
                    task.set_indent_level(new_level);
                }
                true
            }
        }
    }

    /// Commits the draft. Blank drafts land nothing and end the session; task
    /// commits re-enter an insert session one line below for rapid entry.
    pub fn commit_draft(&mut self, raw: &str) -> CommitOutcome {
        let Some(session) = self.session.take() else {
            return CommitOutcome::NotEditing;
        };
        let text = raw.trim();
        if text.is_empty() {
            self.end_session();
            return CommitOutcome::EmptyDraft(session.target);
        }

        match (session.target, session.intent) {
            (EditTarget::Section, EditIntent::Update) => {
                if matches!(
                    self.document.get(session.index),
                    Some(LineItem::Section { .. })
                ) {
                    self.history.record(&self.document, self.cursor);
                    let _ = self.document.replace_at(
                        session.index,
                        LineItem::Section {
                            title: text.to_string(),
                        },
                    );
                }
                CommitOutcome::Committed {
                    target: EditTarget::Section,
                    continuing: false,
                }
            }
            (EditTarget::Section, EditIntent::Insert) => {
                let index = self.document.clamp_insert(session.index);
                self.history.record(&self.document, self.cursor);
                let _ = self.document.insert_at(
                    index,
                    LineItem::Section {
                        title: text.to_string(),
                    },
                );
                self.cursor = index;
                CommitOutcome::Committed {
                    target: EditTarget::Section,
                    continuing: false,
                }
            }
            (EditTarget::Task, EditIntent::Update) => {
                if self
                    .document
                    .get(session.index)
                    .is_some_and(LineItem::is_task)
                {
                    self.history.record(&self.document, self.cursor);
                    if let Some(task) = self
                        .document
                        .get_mut(session.index)
                        .and_then(LineItem::as_task_mut)
                    {
                        task.text = text.to_string();
                    }
                }
                self.continue_inserting(session.index + 1);
                CommitOutcome::Committed {
                    target: EditTarget::Task,
                    continuing: true,
                }
            }
            (EditTarget::Task, EditIntent::Insert) => {
                // The stored index can be stale if the document shrank under
                // us (external reload); re-clamp, never fail.
                let index = self.document.clamp_insert(session.index);
                self.history.record(&self.document, self.cursor);
                let _ = self.document.insert_at(
                    index,
                    LineItem::Task(Task {
                        indent: session.template.indent.clone(),
                        bullet: session.template.bullet,
                        completed: false,
                        text: text.to_string(),
                    }),
                );
                self.cursor = index;
                self.continue_inserting(index + 1);
                CommitOutcome::Committed {
                    target: EditTarget::Task,
                    continuing: true,
                }
            }
        }
    }

    /// Discards the draft: an update leaves the item untouched, an insert
    /// adds nothing. Indent changes that already landed stay (they are in the
    /// history).
    pub fn cancel_edit(&mut self) {
        self.session = None;
        self.end_session();
    }

    fn continue_inserting(&mut self, at: usize) {
        let index = self.document.clamp_insert(at);
        self.session = Some(EditSession {
            intent: EditIntent::Insert,
            target: EditTarget::Task,
            index,
            template: self.document.task_template(index.saturating_sub(1)),
            undo_recorded: false,
        });
        self.cursor = index;
    }

    fn end_session(&mut self) {
        self.cursor = self.document.clamp_cursor(self.cursor);
        self.selection.reclamp(self.document.len());
    }

    //
    // History and reconciliation
    //

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.document, self.cursor) {
            Some(frame) => {
                self.document = frame.document;
                self.cursor = self.document.clamp_cursor(frame.cursor);
                self.selection.reclamp(self.document.len());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.document, self.cursor) {
            Some(frame) => {
                self.document = frame.document;
                self.cursor = self.document.clamp_cursor(frame.cursor);
                self.selection.reclamp(self.document.len());
                true
            }
            None => false,
        }
    }

    /// Swaps in a document reloaded from disk, re-clamping cursor and
    /// selection. Reloads are not undo-tracked: an external change is not a
    /// user edit.
    pub fn apply_reload(&mut self, document: Document) {
        self.document = document;
        self.cursor = self.document.clamp_cursor(self.cursor);
        self.selection.reclamp(self.document.len());
    }

    /// Applies text produced by the external editor to the task under the
    /// cursor.
    pub fn apply_external_edit(&mut self, text: &str) -> bool {
        if !self.document.get(self.cursor).is_some_and(LineItem::is_task) {
            return false;
        }
        self.history.record(&self.document, self.cursor);
        if let Some(task) = self
            .document
            .get_mut(self.cursor)
            .and_then(LineItem::as_task_mut)
        {
            task.text = text.to_string();
        }
        true
    }
}

fn shift_level(level: usize, delta: i8) -> usize {
    level
        .saturating_add_signed(delta as isize)
        .min(INDENT_LEVELS.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace(text: &str) -> Workspace {
        Workspace::new(Document::from_text(text))
    }

    fn task_text(ws: &Workspace, index: usize) -> &str {
        &ws.document().get(index).unwrap().as_task().unwrap().text
    }

    fn is_completed(ws: &Workspace, index: usize) -> bool {
        ws.document().get(index).unwrap().as_task().unwrap().completed
    }

    const SAMPLE: &str = "- [ ] buy milk\n- [x] pay rent\n## Work\n- [ ] write report\n";

    #[test]
    fn cursor_moves_stay_in_bounds() {
        let mut ws = workspace(SAMPLE);
        ws.move_cursor(Move::Up);
        assert_eq!(ws.cursor(), 0);
        ws.move_cursor(Move::Bottom);
        assert_eq!(ws.cursor(), 3);
        ws.move_cursor(Move::Down);
        assert_eq!(ws.cursor(), 3);
        ws.move_cursor(Move::Top);
        assert_eq!(ws.cursor(), 0);

        let mut empty = workspace("");
        empty.move_cursor(Move::Down);
        empty.move_cursor(Move::Bottom);
        assert_eq!(empty.cursor(), 0);
    }

    #[test]
    fn toggle_flips_current_task_and_tracks_undo() {
        let mut ws = workspace(SAMPLE);
        let outcome = ws.toggle();
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.completed, Some(true));
        assert!(is_completed(&ws, 0));

        assert!(ws.undo());
        assert!(!is_completed(&ws, 0));
        assert!(ws.redo());
        assert!(is_completed(&ws, 0));
    }

    #[test]
    fn toggle_on_section_is_a_counted_noop() {
        let mut ws = workspace(SAMPLE);
        ws.move_cursor(Move::Down);
        ws.move_cursor(Move::Down);
        let outcome = ws.toggle();
        assert_eq!(outcome.count, 0);
        assert_eq!(outcome.completed, None);
        assert!(!ws.undo());
    }

    #[test]
    fn toggle_range_flips_independently_and_skips_sections() {
        let mut ws = workspace(SAMPLE);
        ws.start_selection();
        ws.move_cursor(Move::Bottom);
        let outcome = ws.toggle();
        assert_eq!(outcome.count, 3);
        assert!(is_completed(&ws, 0));
        assert!(!is_completed(&ws, 1));
        assert!(is_completed(&ws, 3));
        assert!(!ws.selection().is_active());
    }

    #[test]
    fn delete_task_keeps_cursor_position() {
        let mut ws = workspace(SAMPLE);
        let removed = ws.delete_current().unwrap();
        assert!(removed.is_task());
        assert_eq!(ws.document().len(), 3);
        assert_eq!(ws.cursor(), 0);
        assert_eq!(task_text(&ws, 0), "pay rent");
    }

    #[test]
    fn delete_section_moves_cursor_to_previous_and_undo_restores() {
        let mut ws = workspace(SAMPLE);
        ws.move_cursor(Move::Down);
        ws.move_cursor(Move::Down);
        let removed = ws.delete_current().unwrap();
        assert!(matches!(removed, LineItem::Section { .. }));
        assert_eq!(ws.document().len(), 3);
        assert_eq!(ws.cursor(), 1);

        assert!(ws.undo());
        assert_eq!(ws.document().len(), 4);
        assert!(matches!(
            ws.document().get(2),
            Some(LineItem::Section { title }) if title == "Work"
        ));
        assert_eq!(ws.cursor(), 2);
    }

    #[test]
    fn delete_on_empty_document_reports_nothing() {
        let mut ws = workspace("");
        assert!(ws.delete_current().is_none());
    }

    #[test]
    fn update_commit_replaces_text_in_place() {
        let mut ws = workspace(SAMPLE);
        let (target, draft) = ws.start_edit_current().unwrap();
        assert_eq!(target, EditTarget::Task);
        assert_eq!(draft, "buy milk");

        match ws.commit_draft("buy oat milk") {
            CommitOutcome::Committed { target, continuing } => {
                assert_eq!(target, EditTarget::Task);
                assert!(continuing);
            }
            _ => panic!("expected commit"),
        }
        assert_eq!(task_text(&ws, 0), "buy oat milk");
        // Rapid entry: the session re-entered insert below the edited line.
        assert!(ws.is_editing());
        assert_eq!(ws.session().unwrap().index, 1);
        assert_eq!(ws.cursor(), 1);
    }

    #[test]
    fn section_commit_returns_to_normal() {
        let mut ws = workspace(SAMPLE);
        ws.move_cursor(Move::Down);
        ws.move_cursor(Move::Down);
        let (target, draft) = ws.start_edit_current().unwrap();
        assert_eq!(target, EditTarget::Section);
        assert_eq!(draft, "Work");

        match ws.commit_draft("Deep Work") {
            CommitOutcome::Committed { continuing, .. } => assert!(!continuing),
            _ => panic!("expected commit"),
        }
        assert!(!ws.is_editing());
        assert!(matches!(
            ws.document().get(2),
            Some(LineItem::Section { title }) if title == "Deep Work"
        ));
    }

    #[test]
    fn blank_commit_lands_nothing() {
        let mut ws = workspace(SAMPLE);
        ws.move_cursor(Move::Down);
        ws.start_insert_task(2);
        match ws.commit_draft("   ") {
            CommitOutcome::EmptyDraft(target) => assert_eq!(target, EditTarget::Task),
            _ => panic!("expected empty draft"),
        }
        assert_eq!(ws.document().len(), 4);
        assert!(!ws.is_editing());
        assert!(!ws.undo());
    }

    #[test]
    fn insert_commit_lands_at_index_and_continues_below() {
        let mut ws = workspace(SAMPLE);
        ws.move_cursor(Move::Down);
        ws.start_insert_task(2);
        assert_eq!(ws.cursor(), 2);

        ws.commit_draft("call plumber");
        assert_eq!(ws.document().len(), 5);
        assert_eq!(task_text(&ws, 2), "call plumber");
        assert!(ws.is_editing());
        assert_eq!(ws.session().unwrap().index, 3);
    }

    #[test]
    fn insert_template_carries_nearest_indent_and_bullet() {
        let mut ws = workspace("    * [ ] child\n## Work\n");
        ws.start_insert_task(1);
        let session = ws.session().unwrap();
        assert_eq!(session.template.indent, "    ");
        assert_eq!(session.template.bullet, '*');

        ws.commit_draft("sibling");
        let task = ws.document().get(1).unwrap().as_task().unwrap();
        assert_eq!(task.indent, "    ");
        assert_eq!(task.bullet, '*');
        assert!(!task.completed);
    }

    #[test]
    fn commit_trims_surrounding_whitespace() {
        let mut ws = workspace("");
        ws.start_insert_task(0);
        ws.commit_draft("  trimmed  ");
        assert_eq!(task_text(&ws, 0), "trimmed");
    }

    #[test]
    fn cancel_discards_the_draft() {
        let mut ws = workspace(SAMPLE);
        ws.start_edit_current().unwrap();
        ws.cancel_edit();
        assert_eq!(task_text(&ws, 0), "buy milk");
        assert!(!ws.is_editing());

        ws.move_cursor(Move::Bottom);
        ws.start_insert_task(4);
        assert_eq!(ws.cursor(), 4);
        ws.cancel_edit();
        assert_eq!(ws.document().len(), 4);
        assert_eq!(ws.cursor(), 3);
    }

    #[test]
    fn stale_insert_index_is_reclamped_not_an_error() {
        let mut ws = workspace(SAMPLE);
        ws.move_cursor(Move::Bottom);
        ws.start_insert_task(4);
        // The file shrank underneath the session.
        ws.apply_reload(Document::from_text("- [ ] only one\n"));
        ws.commit_draft("landed anyway");
        assert_eq!(ws.document().len(), 2);
        assert_eq!(task_text(&ws, 1), "landed anyway");
    }

    #[test]
    fn indent_adjust_clamps_and_records_once_per_session() {
        let mut ws = workspace("- [ ] task\n");
        ws.start_edit_current().unwrap();
        for _ in 0..4 {
            ws.adjust_indent(1);
        }
        assert_eq!(
            ws.document().get(0).unwrap().as_task().unwrap().indent_level(),
            3
        );
        // A fifth request is a no-op at the clamp.
        assert!(!ws.adjust_indent(1));

        // The four landed changes cost one undo frame.
        assert!(ws.undo());
        assert_eq!(
            ws.document().get(0).unwrap().as_task().unwrap().indent_level(),
            0
        );
        assert!(!ws.undo());
    }

    #[test]
    fn indent_adjust_on_insert_changes_the_template_only() {
        let mut ws = workspace("- [ ] task\n");
        ws.start_insert_task(1);
        assert!(ws.adjust_indent(1));
        assert!(!ws.adjust_indent(-2));
        assert_eq!(ws.session().unwrap().template.indent_level(), 1);
        assert!(!ws.undo_available_for_test());
    }

    #[test]
    fn undo_sequence_restores_original_document() {
        let mut ws = workspace(SAMPLE);
        ws.toggle();
        ws.delete_current();
        ws.start_insert_task(0);
        ws.commit_draft("new top");
        ws.cancel_edit();

        let mut steps = 0;
        while ws.undo() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(ws.document(), &Document::from_text(SAMPLE));
    }

    #[test]
    fn new_mutation_clears_redo() {
        let mut ws = workspace(SAMPLE);
        ws.toggle();
        assert!(ws.undo());
        ws.move_cursor(Move::Bottom);
        ws.toggle();
        assert!(!ws.redo());
    }

    #[test]
    fn external_edit_applies_to_task_under_cursor() {
        let mut ws = workspace(SAMPLE);
        assert!(ws.apply_external_edit("rewritten"));
        assert_eq!(task_text(&ws, 0), "rewritten");
        assert!(ws.undo());
        assert_eq!(task_text(&ws, 0), "buy milk");

        ws.move_cursor(Move::Down);
        ws.move_cursor(Move::Down);
        assert!(!ws.apply_external_edit("not a task"));
    }

    #[test]
    fn reload_reclamps_cursor_and_selection() {
        let mut ws = workspace(SAMPLE);
        ws.move_cursor(Move::Bottom);
        ws.start_selection();
        ws.apply_reload(Document::from_text("- [ ] single\n"));
        assert_eq!(ws.cursor(), 0);
        assert_eq!(ws.selection().effective_range(0, 1), Some((0, 0)));

        ws.apply_reload(Document::default());
        assert_eq!(ws.cursor(), 0);
        assert!(!ws.selection().is_active());
    }

    impl Workspace {
        fn undo_available_for_test(&self) -> bool {
            self.history.undo_depth() > 0
        }
    }
}
