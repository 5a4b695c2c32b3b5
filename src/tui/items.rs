//! Turns store contents into list rows and list rows back into store entities.
//!
//! Notes are identified by their ID. Folders, tags and templates are
//! identified by their position in the store's list, so any list showing them
//! has to be rebuilt right after one of those lists changes.

use crate::service::NoteService;
use crate::storage::note::{Note, Template};

/// Identifier of the "create new" row at the end of folder and tag lists
pub const NEW_ENTRY_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub title: String,
    pub description: String,
    pub id: i64,
}

impl ListEntry {
    pub fn new(title: impl Into<String>, description: impl Into<String>, id: i64) -> Self {
        ListEntry {
            title: title.into(),
            description: description.into(),
            id,
        }
    }

    pub fn is_new_entry(&self) -> bool {
        self.id == NEW_ENTRY_ID
    }

    /// Index into the store list for folder/tag/template rows
    pub fn position(&self) -> Option<usize> {
        usize::try_from(self.id).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewNote,
    ViewNotes,
    SearchNotes,
    ManageFolders,
    ManageTags,
    Templates,
    Exit,
}

static MENU: [(MenuAction, &str, &str); 7] = [
    (MenuAction::NewNote, "New Note", "Create a new note"),
    (MenuAction::ViewNotes, "View Notes", "Browse and manage your notes"),
    (
        MenuAction::SearchNotes,
        "Search Notes",
        "Search through titles, content, and tags",
    ),
    (
        MenuAction::ManageFolders,
        "Manage Folders",
        "Create and organize folders",
    ),
    (MenuAction::ManageTags, "Manage Tags", "Create and organize tags"),
    (MenuAction::Templates, "Templates", "Use pre-built note templates"),
    (MenuAction::Exit, "Exit", "Quit the application"),
];

pub fn menu_entries() -> Vec<ListEntry> {
    MENU.iter()
        .enumerate()
        .map(|(i, (_, title, desc))| ListEntry::new(*title, *desc, i as i64))
        .collect()
}

pub fn menu_action(entry: &ListEntry) -> Option<MenuAction> {
    entry
        .position()
        .and_then(|i| MENU.get(i))
        .map(|(action, _, _)| *action)
}

pub fn note_entry(note: &Note) -> ListEntry {
    let description = format!(
        "{} | {} | {}",
        note.folder,
        note.tags.join(", "),
        note.created_date()
    );
    ListEntry::new(note.title.clone(), description, note.id as i64)
}

pub fn note_entries(notes: &[Note]) -> Vec<ListEntry> {
    notes.iter().map(note_entry).collect()
}

pub fn folder_entries(service: &NoteService) -> Vec<ListEntry> {
    let mut entries: Vec<ListEntry> = service
        .folders()
        .iter()
        .enumerate()
        .map(|(i, folder)| {
            let count = service.count_in_folder(folder);
            ListEntry::new(folder.clone(), format!("{} notes", count), i as i64)
        })
        .collect();
    entries.push(ListEntry::new(
        "+ Add New Folder",
        "Create a new folder",
        NEW_ENTRY_ID,
    ));
    entries
}

pub fn tag_entries(service: &NoteService) -> Vec<ListEntry> {
    let mut entries: Vec<ListEntry> = service
        .tags()
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let count = service.count_with_tag(tag);
            ListEntry::new(tag.clone(), format!("{} notes", count), i as i64)
        })
        .collect();
    entries.push(ListEntry::new("+ Add New Tag", "Create a new tag", NEW_ENTRY_ID));
    entries
}

pub fn template_entries(templates: &[Template]) -> Vec<ListEntry> {
    templates
        .iter()
        .enumerate()
        .map(|(i, template)| {
            ListEntry::new(
                template.name.clone(),
                format!("Tags: {}", template.tags.join(", ")),
                i as i64,
            )
        })
        .collect()
}

/// The note a row was built from, looked up by ID
pub fn note_for_entry<'a>(service: &'a NoteService, entry: &ListEntry) -> Option<&'a Note> {
    let id = u64::try_from(entry.id).ok()?;
    service.get_note(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;
    use tempfile::TempDir;

    fn service() -> (TempDir, NoteService) {
        let dir = TempDir::new().unwrap();
        let service = NoteService::new(JsonStore::new(dir.path().join("data.json")));
        (dir, service)
    }

    #[test]
    fn note_rows_show_folder_tags_and_date() {
        let mut note = Note::new(12, "Groceries");
        note.tags = vec!["todo".to_string(), "home".to_string()];
        note.folder = "Personal".to_string();

        let entry = note_entry(&note);

        assert_eq!(entry.title, "Groceries");
        assert_eq!(entry.id, 12);
        assert_eq!(
            entry.description,
            format!("Personal | todo, home | {}", note.created_date())
        );
        // YYYY-MM-DD
        let date = note.created_date();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }

    #[test]
    fn folder_rows_count_notes_and_end_with_add_row() {
        let (_dir, mut service) = service();
        let mut note = service.draft_note("a").unwrap();
        note.folder = "Work".to_string();
        service.save_note(note).unwrap();

        let entries = folder_entries(&service);

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].description, "0 notes");
        assert_eq!(entries[1].title, "Work");
        assert_eq!(entries[1].description, "1 notes");
        assert_eq!(entries[1].position(), Some(1));
        assert!(entries[3].is_new_entry());
        assert_eq!(entries[3].position(), None);
    }

    #[test]
    fn tag_rows_count_notes_once_each() {
        let (_dir, mut service) = service();
        let mut note = service.draft_note("a").unwrap();
        note.tags = vec!["todo".to_string(), "todo".to_string()];
        service.save_note(note).unwrap();

        let entries = tag_entries(&service);
        let todo = entries.iter().find(|e| e.title == "todo").unwrap();

        assert_eq!(todo.description, "1 notes");
        assert!(entries.last().unwrap().is_new_entry());
    }

    #[test]
    fn template_rows_list_tags() {
        let (_dir, service) = service();
        let entries = template_entries(service.templates());

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].title, "Meeting Notes");
        assert_eq!(entries[0].description, "Tags: meeting, work");
        assert_eq!(entries[3].position(), Some(3));
    }

    #[test]
    fn rows_map_back_to_their_note() {
        let (_dir, mut service) = service();
        let note = service.draft_note("Find me").unwrap();
        let id = note.id;
        service.save_note(note).unwrap();

        let entries = note_entries(service.notes());
        assert_eq!(note_for_entry(&service, &entries[0]).unwrap().id, id);

        let stale = ListEntry::new("gone", "", 999);
        assert!(note_for_entry(&service, &stale).is_none());
        let sentinel = ListEntry::new("new", "", NEW_ENTRY_ID);
        assert!(note_for_entry(&service, &sentinel).is_none());
    }

    #[test]
    fn menu_rows_map_to_actions() {
        let entries = menu_entries();
        assert_eq!(entries.len(), 7);
        assert_eq!(menu_action(&entries[0]), Some(MenuAction::NewNote));
        assert_eq!(menu_action(&entries[6]), Some(MenuAction::Exit));
    }
}
