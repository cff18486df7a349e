use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{DraftEdit, EditorCommand, Mode};

pub struct EditMode;

impl EditMode {
    pub fn new() -> Self {
        Self
    }
}

impl Mode for EditMode {
    fn handle_event(
        &mut self,
        event: KeyEvent,
        _command_buffer: &mut String,
    ) -> Option<EditorCommand> {
        match event {
            KeyEvent {
                code: KeyCode::Esc,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::CancelEdit),
            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::CommitEdit),
            KeyEvent {
                code: KeyCode::Tab,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::AdjustIndent(1)),
            KeyEvent {
                code: KeyCode::BackTab,
                ..
            } => Some(EditorCommand::AdjustIndent(-1)),
            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
                ..
            } => Some(EditorCommand::UpdateDraft(DraftEdit::Insert(c))),
            KeyEvent {
                code: KeyCode::Backspace,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::UpdateDraft(DraftEdit::DeleteBackward)),
            KeyEvent {
                code: KeyCode::Delete,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::UpdateDraft(DraftEdit::Delete)),
            KeyEvent {
                code: KeyCode::Left,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::UpdateDraft(DraftEdit::MoveLeft)),
            KeyEvent {
                code: KeyCode::Right,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::UpdateDraft(DraftEdit::MoveRight)),
            KeyEvent {
                code: KeyCode::Home,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::UpdateDraft(DraftEdit::MoveStart)),
            KeyEvent {
                code: KeyCode::End,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::UpdateDraft(DraftEdit::MoveEnd)),
            _ => None,
        }
    }

    fn enter(&mut self) -> Vec<EditorCommand> {
        vec![EditorCommand::SetNeedsRedraw]
    }

    fn exit(&mut self) -> Vec<EditorCommand> {
        vec![EditorCommand::SetNeedsRedraw]
    }
}
