use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::workspace::Move;
use super::{EditorCommand, Mode};

pub struct VisualMode;

impl VisualMode {
    pub fn new() -> Self {
        Self
    }
}

impl Mode for VisualMode {
    fn handle_event(
        &mut self,
        event: KeyEvent,
        command_buffer: &mut String,
    ) -> Option<EditorCommand> {
        let pending_delete = command_buffer == "d";
        command_buffer.clear();

        match event {
            KeyEvent {
                code: KeyCode::Char('d'),
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                if pending_delete {
                    Some(EditorCommand::DeleteCurrent)
                } else {
                    command_buffer.push('d');
                    Some(EditorCommand::UpdateMessage("d-".to_string()))
                }
            }
            KeyEvent {
                code: KeyCode::Char('j') | KeyCode::Down,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::MoveCursor(Move::Down)),
            KeyEvent {
                code: KeyCode::Char('k') | KeyCode::Up,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::MoveCursor(Move::Up)),
            KeyEvent {
                code: KeyCode::Char('g'),
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::MoveCursor(Move::Top)),
            KeyEvent {
                code: KeyCode::Char('G'),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => Some(EditorCommand::MoveCursor(Move::Bottom)),
            KeyEvent {
                code: KeyCode::Char(' ') | KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::Toggle),
            KeyEvent {
                code: KeyCode::Char('V'),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => Some(EditorCommand::CancelSelection),
            KeyEvent {
                code: KeyCode::Char('i'),
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::StartEditCurrent),
            KeyEvent {
                code: KeyCode::Char('o'),
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::StartInsertBelow),
            KeyEvent {
                code: KeyCode::Char('O'),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => Some(EditorCommand::StartInsertAbove),
            KeyEvent {
                code: KeyCode::Char('S'),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => Some(EditorCommand::StartInsertSection),
            KeyEvent {
                code: KeyCode::Char('e'),
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::ExternalEdit),
            KeyEvent {
                code: KeyCode::Esc,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::CancelSelection),
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(EditorCommand::Quit),
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(EditorCommand::Quit),
            _ => None,
        }
    }

    fn enter(&mut self) -> Vec<EditorCommand> {
        vec![
            EditorCommand::StartSelection,
            EditorCommand::UpdateMessage("Visual line selection".to_string()),
            EditorCommand::SetNeedsRedraw,
        ]
    }

    fn exit(&mut self) -> Vec<EditorCommand> {
        vec![EditorCommand::ClearSelection, EditorCommand::SetNeedsRedraw]
    }
}
