use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use log::{debug, error};

use crate::service::NoteService;
use crate::storage::note::Note;
use crate::tui::items::{self, ListEntry, MenuAction};
use crate::tui::widgets::{ItemList, TextEditor, TextInput};

pub const MENU_TITLE: &str = "QuickNotes - Terminal Note Taking";
pub const NOTES_TITLE: &str = "Your Notes";
pub const FOLDERS_TITLE: &str = "Folder Management";
pub const TAGS_TITLE: &str = "Tag Management";
pub const TEMPLATES_TITLE: &str = "Note Templates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    MainMenu,
    NoteList,
    NoteEdit,
    Search,
    FolderManage,
    TagManage,
    TemplateList,
    InputDialog,
}

/// What the input dialog is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    NoteTitle,
    FolderName,
    TagName,
}

impl InputMode {
    pub fn heading(self) -> &'static str {
        match self {
            InputMode::NoteTitle => "New Note",
            InputMode::FolderName => "New Folder",
            InputMode::TagName => "New Tag",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            InputMode::NoteTitle => "Enter note title...",
            InputMode::FolderName => "Enter folder name...",
            InputMode::TagName => "Enter tag name...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Neutral,
}

/// Banner shown on the next render only
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

pub struct App {
    pub service: NoteService,
    pub view: View,
    pub previous_view: View,
    pub input_mode: InputMode,
    /// Working copy while in NoteEdit; only written back on save
    pub current_note: Option<Note>,
    pub status: Option<StatusMessage>,
    pub list: ItemList,
    pub input: TextInput,
    pub editor: TextEditor,
    pub width: u16,
    pub height: u16,
    pub should_quit: bool,
}

impl App {
    pub fn new(service: NoteService) -> Self {
        let mut input = TextInput::new("Enter text...");
        input.focus();
        let editor = TextEditor::new(80, 20);

        let mut app = App {
            service,
            view: View::MainMenu,
            previous_view: View::MainMenu,
            input_mode: InputMode::NoteTitle,
            current_note: None,
            status: None,
            list: ItemList::new(MENU_TITLE, Vec::new()),
            input,
            editor,
            width: 80,
            height: 24,
            should_quit: false,
        };
        app.load_main_menu();
        app
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key(key.code, key.modifiers)
            }
            Event::Resize(width, height) => {
                self.resize(width, height);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Lay the widgets out for a new terminal size. Never changes the view.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.list.set_height(height.saturating_sub(4));
        self.editor
            .set_size(width.saturating_sub(4), height.saturating_sub(8));
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        match self.view {
            View::MainMenu => self.handle_main_menu_key(key)?,
            View::NoteList => self.handle_note_list_key(key)?,
            View::NoteEdit => self.handle_note_edit_key(key, modifiers)?,
            View::Search => self.handle_search_key(key, modifiers)?,
            View::FolderManage => self.handle_folder_key(key)?,
            View::TagManage => self.handle_tag_key(key)?,
            View::TemplateList => self.handle_template_key(key)?,
            View::InputDialog => self.handle_input_dialog_key(key, modifiers)?,
        }
        Ok(())
    }

    fn set_status(&mut self, text: impl Into<String>, severity: Severity) {
        self.status = Some(StatusMessage {
            text: text.into(),
            severity,
        });
    }

    /// Success banner, or the write error if the flush failed
    fn report(&mut self, outcome: Result<()>, success: impl Into<String>) {
        match outcome {
            Ok(()) => self.set_status(success, Severity::Success),
            Err(e) => {
                error!("Failed to save data: {:#}", e);
                self.set_status(format!("Failed to save data: {:#}", e), Severity::Error);
            }
        }
    }

    fn show_list(&mut self, view: View, title: impl Into<String>, entries: Vec<ListEntry>) {
        debug!("Showing {:?} with {} rows", view, entries.len());
        self.view = view;
        self.list = ItemList::new(title, entries);
        self.list.set_height(self.height.saturating_sub(4));
    }

    fn load_main_menu(&mut self) {
        self.show_list(View::MainMenu, MENU_TITLE, items::menu_entries());
    }

    fn load_note_list(&mut self) {
        let entries = items::note_entries(self.service.notes());
        self.show_list(View::NoteList, NOTES_TITLE, entries);
    }

    fn load_folder_list(&mut self) {
        let entries = items::folder_entries(&self.service);
        self.show_list(View::FolderManage, FOLDERS_TITLE, entries);
    }

    fn load_tag_list(&mut self) {
        let entries = items::tag_entries(&self.service);
        self.show_list(View::TagManage, TAGS_TITLE, entries);
    }

    fn load_template_list(&mut self) {
        let entries = items::template_entries(self.service.templates());
        self.show_list(View::TemplateList, TEMPLATES_TITLE, entries);
    }

    fn open_input_dialog(&mut self, mode: InputMode, previous: View) {
        self.view = View::InputDialog;
        self.input_mode = mode;
        self.previous_view = previous;
        self.input.set_value("");
        self.input.set_placeholder(mode.placeholder());
        self.input.focus();
    }

    fn open_editor(&mut self, note: Note) {
        self.editor.set_value(&note.content);
        self.current_note = Some(note);
        self.view = View::NoteEdit;
    }

    fn refuse_new_note(&mut self, e: anyhow::Error) {
        error!("Cannot start a note: {:#}", e);
        self.set_status(format!("Cannot create note: {:#}", e), Severity::Error);
    }

    fn is_back_key(key: KeyCode) -> bool {
        matches!(key, KeyCode::Char('q') | KeyCode::Esc)
    }

    fn handle_main_menu_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Enter => {
                let Some(action) = self.list.selected().and_then(items::menu_action) else {
                    return Ok(());
                };
                self.status = None;
                match action {
                    MenuAction::NewNote => {
                        self.open_input_dialog(InputMode::NoteTitle, View::MainMenu)
                    }
                    MenuAction::ViewNotes => self.load_note_list(),
                    MenuAction::SearchNotes => {
                        self.view = View::Search;
                        self.input.set_value("");
                        self.input.set_placeholder("Enter text...");
                        self.input.focus();
                    }
                    MenuAction::ManageFolders => self.load_folder_list(),
                    MenuAction::ManageTags => self.load_tag_list(),
                    MenuAction::Templates => self.load_template_list(),
                    MenuAction::Exit => self.should_quit = true,
                }
            }
            _ => {
                self.list.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_note_list_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            k if Self::is_back_key(k) => {
                self.load_main_menu();
                self.status = None;
            }
            KeyCode::Enter => {
                let note = self
                    .list
                    .selected()
                    .and_then(|entry| items::note_for_entry(&self.service, entry))
                    .cloned();
                if let Some(note) = note {
                    self.open_editor(note);
                }
            }
            KeyCode::Char('d') => {
                let Some(id) = self.list.selected().and_then(|e| u64::try_from(e.id).ok()) else {
                    return Ok(());
                };
                let outcome = self.service.delete_note(id);
                // Search results are replaced by the full list after a delete
                self.list.set_title(NOTES_TITLE);
                self.list
                    .replace_items(items::note_entries(self.service.notes()));
                match outcome {
                    Ok(false) => {}
                    outcome => self.report(outcome.map(|_| ()), "Note deleted successfully!"),
                }
            }
            _ => {
                self.list.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_note_edit_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if self.current_note.is_none() {
            // Nothing to edit; fall back to the list instead of editing a phantom note
            self.load_note_list();
            return Ok(());
        }

        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match key {
            KeyCode::Char('s') if ctrl => {
                if let Some(mut note) = self.current_note.take() {
                    note.content = self.editor.value();
                    note.touch();
                    let outcome = self.service.save_note(note);
                    self.load_note_list();
                    self.report(outcome, "Note saved successfully!");
                }
            }
            KeyCode::Char('f') if ctrl => {
                if let Some(note) = self.current_note.as_mut() {
                    if let Some(next) = self.service.next_folder(&note.folder) {
                        note.folder = next.to_string();
                        let text = format!("Folder: {}", note.folder);
                        self.set_status(text, Severity::Neutral);
                    }
                }
            }
            KeyCode::Esc => {
                self.current_note = None;
                self.load_note_list();
                self.set_status("Changes discarded", Severity::Warning);
            }
            _ => {
                self.editor.handle_key(key, modifiers);
            }
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match key {
            KeyCode::Esc => self.load_main_menu(),
            KeyCode::Enter => {
                let query = self.input.value().to_string();
                let results = self.service.search_notes(&query);
                debug!("Search {:?} matched {} notes", query, results.len());
                let count = results.len();
                self.show_list(
                    View::NoteList,
                    format!("Search Results for: '{}'", query),
                    items::note_entries(&results),
                );
                self.set_status(format!("Found {} note(s)", count), Severity::Neutral);
            }
            _ => {
                self.input.handle_key(key, modifiers);
            }
        }
        Ok(())
    }

    fn handle_folder_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            k if Self::is_back_key(k) => self.load_main_menu(),
            KeyCode::Enter => {
                if self.list.selected().is_some_and(ListEntry::is_new_entry) {
                    self.open_input_dialog(InputMode::FolderName, View::FolderManage);
                }
            }
            KeyCode::Char('d') => {
                let Some(name) = self
                    .list
                    .selected()
                    .and_then(ListEntry::position)
                    .and_then(|i| self.service.folders().get(i))
                    .cloned()
                else {
                    return Ok(());
                };
                if NoteService::is_protected_folder(&name) {
                    self.set_status("Cannot delete default folders!", Severity::Error);
                    return Ok(());
                }
                let outcome = self.service.delete_folder(&name).map(|_| ());
                // Rows are positional; rebuild before anything else reads them
                self.list.replace_items(items::folder_entries(&self.service));
                self.report(outcome, "Folder deleted!");
            }
            _ => {
                self.list.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_tag_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            k if Self::is_back_key(k) => self.load_main_menu(),
            KeyCode::Enter => {
                if self.list.selected().is_some_and(ListEntry::is_new_entry) {
                    self.open_input_dialog(InputMode::TagName, View::TagManage);
                }
            }
            KeyCode::Char('d') => {
                let Some(name) = self
                    .list
                    .selected()
                    .and_then(ListEntry::position)
                    .and_then(|i| self.service.tags().get(i))
                    .cloned()
                else {
                    return Ok(());
                };
                let outcome = self.service.delete_tag(&name);
                self.list.replace_items(items::tag_entries(&self.service));
                self.report(outcome, "Tag deleted!");
            }
            _ => {
                self.list.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_template_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            k if Self::is_back_key(k) => self.load_main_menu(),
            KeyCode::Enter => {
                let Some(index) = self.list.selected().and_then(ListEntry::position) else {
                    return Ok(());
                };
                match self.service.note_from_template(index) {
                    Ok(Some(note)) => {
                        debug!("Starting note {} from template {}", note.id, note.title);
                        self.open_editor(note);
                    }
                    Ok(None) => {}
                    Err(e) => self.refuse_new_note(e),
                }
            }
            _ => {
                self.list.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_input_dialog_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match key {
            KeyCode::Esc => {
                self.input.set_value("");
                match self.previous_view {
                    View::FolderManage => self.load_folder_list(),
                    View::TagManage => self.load_tag_list(),
                    _ => self.load_main_menu(),
                }
            }
            KeyCode::Enter => {
                let value = self.input.value().trim().to_string();
                if value.is_empty() {
                    self.set_status("Name cannot be empty!", Severity::Error);
                    return Ok(());
                }
                match self.input_mode {
                    InputMode::NoteTitle => {
                        match self.service.draft_note(&value) {
                            Ok(note) => self.open_editor(note),
                            Err(e) => self.refuse_new_note(e),
                        }
                    }
                    InputMode::FolderName => {
                        let outcome = self.service.add_folder(&value);
                        self.load_folder_list();
                        self.report(outcome, format!("Folder '{}' created!", value));
                    }
                    InputMode::TagName => {
                        let outcome = self.service.add_tag(&value);
                        self.load_tag_list();
                        self.report(outcome, format!("Tag '{}' created!", value));
                    }
                }
            }
            _ => {
                self.input.handle_key(key, modifiers);
            }
        }
        Ok(())
    }
}
