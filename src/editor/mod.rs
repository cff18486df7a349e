use core::fmt;
use std::panic::{set_hook, take_hook};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{Event, KeyEvent, KeyEventKind, poll, read};

use crate::prelude::{NAME, Size};

pub mod document;
mod documentstatus;
mod edit_mode;
mod external;
pub mod history;
pub mod line_item;
mod markdown;
mod normal_mode;
pub mod selection;
pub mod storage;
mod terminal;
mod uicomponents;
mod visual_mode;
pub mod workspace;

use documentstatus::DocumentStatus;
use edit_mode::EditMode;
use line_item::LineItem;
use normal_mode::NormalMode;
use storage::Storage;
use terminal::Terminal;
use uicomponents::{InputField, MessageBar, StatusBar, UIComponent, View};
use visual_mode::VisualMode;
use workspace::{CommitOutcome, EditTarget, Move, Workspace};

const FILE_CHECK_INTERVAL: Duration = Duration::from_secs(1);
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeType {
    Normal,
    Visual,
    Edit,
}

impl fmt::Display for ModeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeType::Normal => write!(f, "NORMAL"),
            ModeType::Visual => write!(f, "VISUAL"),
            ModeType::Edit => write!(f, "EDIT"),
        }
    }
}

impl Default for ModeType {
    fn default() -> Self {
        ModeType::Normal
    }
}

/// Edits applied to the draft input while composing a line.
#[derive(Clone, Copy)]
pub enum DraftEdit {
    Insert(char),
    Delete,
    DeleteBackward,
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
}

enum EditorCommand {
    MoveCursor(Move),
    SwitchMode(ModeType),
    StartSelection,
    ClearSelection,
    CancelSelection,
    Toggle,
    DeleteCurrent,
    StartEditCurrent,
    StartInsertBelow,
    StartInsertAbove,
    StartInsertSection,
    AdjustIndent(i8),
    UpdateDraft(DraftEdit),
    CommitEdit,
    CancelEdit,
    ExternalEdit,
    Undo,
    Redo,
    Reload,
    UpdateMessage(String),
    SetNeedsRedraw,
    HandleResizeCommand(Size),
    Quit,
}

trait Mode {
    fn handle_event(
        &mut self,
        event: KeyEvent,
        command_buffer: &mut String,
    ) -> Option<EditorCommand>;
    fn enter(&mut self) -> Vec<EditorCommand>;
    fn exit(&mut self) -> Vec<EditorCommand>;
}

pub struct Editor {
    should_quit: bool,
    workspace: Workspace,
    storage: Storage,
    view: View,
    status_bar: StatusBar,
    message_bar: MessageBar,
    input: InputField,
    terminal_size: Size,
    current_mode: ModeType,
    current_mode_impl: Box<dyn Mode>,
    command_buffer: String,
    pending_reload: bool,
    last_file_check: Instant,
}

impl Editor {
    //
    // Struct lifecycle
    //

    pub fn new(path: PathBuf) -> anyhow::Result<Self> {
        let current_hook = take_hook();

        set_hook(Box::new(move |panic_info| {
            let _ = Terminal::kill();
            current_hook(panic_info);
        }));

        let mut storage = Storage::new(path);
        let document = storage
            .load()
            .with_context(|| format!("failed to load {}", storage.path().display()))?;
        log::info!("managing {}", storage.path().display());

        Terminal::init()?;
        let _ = Terminal::set_title(&format!("{NAME} — {}", storage.file_name()));

        let mut editor = Self {
            should_quit: false,
            workspace: Workspace::new(document),
            storage,
            view: View::default(),
            status_bar: StatusBar::default(),
            message_bar: MessageBar::default(),
            input: InputField::default(),
            terminal_size: Size::default(),
            current_mode: ModeType::Normal,
            current_mode_impl: Box::new(NormalMode::new()),
            command_buffer: String::new(),
            pending_reload: false,
            last_file_check: Instant::now(),
        };

        let size = Terminal::size().unwrap_or_default();
        editor.handle_resize_command(size);
        editor.refresh_status();
        Ok(editor)
    }

    //
    // Event loop
    //

    pub fn run(&mut self) {
        loop {
            self.refresh_screen();
            if self.should_quit {
                break;
            }
            match poll(POLL_TIMEOUT) {
                Ok(true) => match read() {
                    Ok(Event::Key(key_event)) => {
                        if key_event.kind != KeyEventKind::Release
                            && let Some(command) = self
                                .current_mode_impl
                                .handle_event(key_event, &mut self.command_buffer)
                        {
                            self.execute_command(command);
                        }
                    }
                    Ok(Event::Resize(width_u16, height_u16)) => {
                        self.execute_command(EditorCommand::HandleResizeCommand(Size {
                            height: height_u16 as usize,
                            width: width_u16 as usize,
                        }));
                    }
                    Ok(_) => {}
                    Err(err) => log::error!("could not read event: {err}"),
                },
                Ok(false) => {}
                Err(err) => log::error!("could not poll events: {err}"),
            }
            // The reconciliation tick shares the loop: no background thread
            // ever touches the document.
            if self.last_file_check.elapsed() >= FILE_CHECK_INTERVAL {
                self.last_file_check = Instant::now();
                self.check_for_external_changes();
            }
            self.refresh_status();
        }
    }

    fn execute_command(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::MoveCursor(movement) => {
                self.workspace.move_cursor(movement);
            }
            EditorCommand::SwitchMode(mode) => {
                self.switch_mode(mode);
            }
            EditorCommand::StartSelection => {
                self.workspace.start_selection();
            }
            EditorCommand::ClearSelection => {
                self.workspace.clear_selection();
            }
            EditorCommand::CancelSelection => {
                self.switch_mode(ModeType::Normal);
                self.message_bar.update_message("Selection canceled");
            }
            EditorCommand::Toggle => {
                self.handle_toggle();
            }
            EditorCommand::DeleteCurrent => {
                self.handle_delete();
            }
            EditorCommand::StartEditCurrent => {
                self.handle_start_edit();
            }
            EditorCommand::StartInsertBelow => {
                self.handle_start_insert_task(true);
            }
            EditorCommand::StartInsertAbove => {
                self.handle_start_insert_task(false);
            }
            EditorCommand::StartInsertSection => {
                self.handle_start_insert_section();
            }
            EditorCommand::AdjustIndent(delta) => {
                self.workspace.adjust_indent(delta);
            }
            EditorCommand::UpdateDraft(edit) => {
                self.input.handle(edit);
            }
            EditorCommand::CommitEdit => {
                self.handle_commit();
            }
            EditorCommand::CancelEdit => {
                self.workspace.cancel_edit();
                self.input.reset();
                self.switch_mode(ModeType::Normal);
            }
            EditorCommand::ExternalEdit => {
                self.handle_external_edit();
            }
            EditorCommand::Undo => {
                if self.workspace.undo() {
                    self.save_and_notify("Undo");
                } else {
                    self.message_bar.update_message("Nothing to undo");
                }
            }
            EditorCommand::Redo => {
                if self.workspace.redo() {
                    self.save_and_notify("Redo");
                } else {
                    self.message_bar.update_message("Nothing to redo");
                }
            }
            EditorCommand::Reload => {
                self.handle_reload();
            }
            EditorCommand::UpdateMessage(message) => {
                self.message_bar.update_message(&message);
            }
            EditorCommand::SetNeedsRedraw => {
                self.view.set_needs_redraw(true);
            }
            EditorCommand::HandleResizeCommand(size) => {
                self.handle_resize_command(size);
            }
            EditorCommand::Quit => {
                self.should_quit = true;
            }
        }
        self.view.set_needs_redraw(true);
    }

    fn switch_mode(&mut self, mode: ModeType) {
        if mode == self.current_mode {
            return;
        }
        let commands = self.current_mode_impl.exit();
        for command in commands {
            self.execute_command(command);
        }

        if self.current_mode == ModeType::Edit {
            // The advisory reload flag dies with the edit session; the next
            // save wins (last-writer-wins).
            self.pending_reload = false;
        }

        self.current_mode = mode;
        self.current_mode_impl = match mode {
            ModeType::Normal => Box::new(NormalMode::new()),
            ModeType::Visual => Box::new(VisualMode::new()),
            ModeType::Edit => Box::new(EditMode::new()),
        };
        self.command_buffer.clear();

        let commands = self.current_mode_impl.enter();
        for command in commands {
            self.execute_command(command);
        }
    }

    //
    // Command handlers
    //

    fn handle_toggle(&mut self) {
        let was_visual = self.current_mode == ModeType::Visual;
        let outcome = self.workspace.toggle();
        if was_visual {
            self.switch_mode(ModeType::Normal);
        }
        if outcome.count == 0 {
            return;
        }
        let message = if outcome.count == 1 {
            match outcome.completed {
                Some(true) => "Marked Completed".to_string(),
                _ => "Marked Incomplete".to_string(),
            }
        } else {
            format!("Toggled {} tasks", outcome.count)
        };
        self.save_and_notify(&message);
    }

    fn handle_delete(&mut self) {
        let was_visual = self.current_mode == ModeType::Visual;
        match self.workspace.delete_current() {
            None => self.message_bar.update_message("Nothing to delete"),
            Some(removed) => {
                if was_visual {
                    self.switch_mode(ModeType::Normal);
                }
                let message = if removed.is_task() {
                    "Deleted task"
                } else {
                    "Deleted section"
                };
                self.save_and_notify(message);
            }
        }
    }

    fn handle_start_edit(&mut self) {
        if let Some((target, draft)) = self.workspace.start_edit_current() {
            self.input.set_value(&draft);
            self.switch_mode(ModeType::Edit);
            self.message_bar.update_message(match target {
                EditTarget::Task => "Editing current task",
                EditTarget::Section => "Editing section",
            });
        }
    }

    fn handle_start_insert_task(&mut self, below: bool) {
        let at = if below {
            self.workspace.cursor() + 1
        } else {
            self.workspace.cursor()
        };
        self.workspace.start_insert_task(at);
        self.input.reset();
        self.switch_mode(ModeType::Edit);
        self.message_bar.update_message("New task");
    }

    fn handle_start_insert_section(&mut self) {
        self.workspace.start_insert_section(self.workspace.cursor() + 1);
        self.input.reset();
        self.switch_mode(ModeType::Edit);
        self.message_bar.update_message("New section");
    }

    fn handle_commit(&mut self) {
        let raw = self.input.value().to_string();
        match self.workspace.commit_draft(&raw) {
            CommitOutcome::NotEditing => {}
            CommitOutcome::EmptyDraft(target) => {
                self.input.reset();
                self.switch_mode(ModeType::Normal);
                self.message_bar.update_message(match target {
                    EditTarget::Task => "Cannot save empty task",
                    EditTarget::Section => "Cannot save empty section",
                });
            }
            CommitOutcome::Committed {
                target: EditTarget::Section,
                ..
            } => {
                self.input.reset();
                self.save_and_notify("Saved");
                self.switch_mode(ModeType::Normal);
            }
            CommitOutcome::Committed {
                target: EditTarget::Task,
                ..
            } => {
                // Rapid entry: the workspace already re-entered an insert
                // session one line below, so stay in edit mode.
                self.input.reset();
                self.save_and_notify("");
            }
        }
    }

    fn handle_external_edit(&mut self) {
        let Some(seed) = self
            .workspace
            .document()
            .get(self.workspace.cursor())
            .and_then(LineItem::as_task)
            .map(|task| task.text.clone())
        else {
            return;
        };
        if self.current_mode == ModeType::Visual {
            self.switch_mode(ModeType::Normal);
        }

        if let Err(err) = Terminal::suspend() {
            log::error!("could not suspend terminal: {err}");
        }
        let result = external::edit_text(&seed);
        if let Err(err) = Terminal::resume() {
            log::error!("could not resume terminal: {err}");
        }
        self.full_redraw();

        match result {
            Ok(Some(text)) => {
                if self.workspace.apply_external_edit(&text) {
                    self.save_and_notify("Saved");
                }
            }
            Ok(None) => self.message_bar.update_message("Cannot save empty task"),
            Err(err) => {
                log::error!("external edit failed: {err}");
                self.message_bar.set_error(Some(err.to_string()));
            }
        }
    }

    fn handle_reload(&mut self) {
        match self.storage.load() {
            Ok(document) => {
                self.workspace.apply_reload(document);
                self.pending_reload = false;
                self.message_bar.set_error(None);
                self.message_bar.update_message("Reloaded");
            }
            Err(err) => {
                log::error!("reload failed: {err}");
                self.message_bar.set_error(Some(err.to_string()));
            }
        }
    }

    //
    // Persistence and reconciliation
    //

    fn save_and_notify(&mut self, message: &str) {
        match self.storage.save(self.workspace.document()) {
            Ok(()) => {
                self.message_bar.update_message(message);
                self.message_bar.set_error(None);
            }
            Err(err) => {
                log::error!("save failed: {err}");
                self.message_bar.set_error(Some(err.to_string()));
            }
        }
    }

    fn check_for_external_changes(&mut self) {
        match self.storage.externally_modified() {
            Ok(false) => {}
            Ok(true) if self.workspace.is_editing() => {
                if !self.pending_reload {
                    log::info!("external change detected; reload deferred while editing");
                }
                self.pending_reload = true;
            }
            Ok(true) => match self.storage.load() {
                Ok(document) => {
                    self.workspace.apply_reload(document);
                    self.pending_reload = false;
                    self.view.set_needs_redraw(true);
                    self.message_bar.set_error(None);
                    self.message_bar.update_message("Reloaded from disk");
                }
                Err(err) => {
                    log::error!("reload failed: {err}");
                    self.message_bar.set_error(Some(err.to_string()));
                }
            },
            Err(err) => {
                log::error!("file check failed: {err}");
                self.message_bar.set_error(Some(err.to_string()));
            }
        }
    }

    //
    // Rendering
    //

    fn refresh_screen(&mut self) {
        if self.terminal_size.height == 0 || self.terminal_size.width == 0 {
            return;
        }

        let bottom_bar_row = self.terminal_size.height.saturating_sub(1);
        let _ = Terminal::hide_cursor();

        self.message_bar.render(bottom_bar_row);
        if self.terminal_size.height > 1 {
            self.status_bar
                .render(self.terminal_size.height.saturating_sub(2));
        }

        let caret = if self.terminal_size.height > 2 {
            self.view.render(&self.workspace, &self.input)
        } else {
            None
        };
        if let Some(position) = caret {
            let _ = Terminal::move_cursor_to(position);
            let _ = Terminal::show_cursor();
        }

        let _ = Terminal::execute();
    }

    fn refresh_status(&mut self) {
        let document = self.workspace.document();
        let completed = document.completed_count();
        let status = DocumentStatus {
            file_name: self.storage.file_name(),
            open_tasks: document.task_count().saturating_sub(completed),
            completed_tasks: completed,
        };
        self.status_bar.update_status(status, self.current_mode);
        self.message_bar.set_pending_reload(self.pending_reload);
        self.message_bar.set_hints(self.hints());
    }

    fn hints(&self) -> &'static str {
        match self.current_mode {
            ModeType::Normal => {
                "j/k move · space toggle · dd delete · i edit · o/O new · S section · e editor · u undo · q quit"
            }
            ModeType::Visual => "j/k extend · space toggle · dd delete · Esc cancel",
            ModeType::Edit => match self.workspace.session().map(|session| session.target) {
                Some(EditTarget::Section) => "Enter save · Esc cancel",
                _ => "Tab/S-Tab indent · Enter save+next · Esc cancel",
            },
        }
    }

    fn full_redraw(&mut self) {
        let _ = Terminal::clear_screen();
        self.view.set_needs_redraw(true);
        self.status_bar.set_needs_redraw(true);
        self.message_bar.set_needs_redraw(true);
    }

    fn handle_resize_command(&mut self, size: Size) {
        self.terminal_size = size;
        self.view.resize(Size {
            height: size.height.saturating_sub(2),
            width: size.width,
        });
        let bar_size = Size {
            height: 1,
            width: size.width,
        };
        self.status_bar.resize(bar_size);
        self.message_bar.resize(bar_size);
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        let _ = Terminal::kill();
    }
}
