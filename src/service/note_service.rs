use anyhow::{Context, Result, bail};
use log::info;

use crate::storage::JsonStore;
use crate::storage::note::{
    DEFAULT_FOLDER, MAX_NOTE_ID, Note, PROTECTED_FOLDERS, Snapshot, Template,
};

/// In-memory document store, flushed to disk after every mutation.
///
/// Mutations are applied in memory before the flush, so an `Err` from any of
/// them means "changed here, not yet on disk".
pub struct NoteService {
    store: JsonStore,
    data: Snapshot,
}

impl NoteService {
    pub fn new(store: JsonStore) -> Self {
        let data = store.load();
        NoteService { store, data }
    }

    pub fn notes(&self) -> &[Note] {
        &self.data.notes
    }

    pub fn folders(&self) -> &[String] {
        &self.data.folders
    }

    pub fn tags(&self) -> &[String] {
        &self.data.tags
    }

    pub fn templates(&self) -> &[Template] {
        &self.data.templates
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    fn flush(&self) -> Result<()> {
        self.store
            .save(&self.data)
            .with_context(|| format!("writing {}", self.store.path().display()))
    }

    /// Hand out the next note ID. IDs are never reused, even after deletes.
    fn allocate_id(&mut self) -> Result<u64> {
        let id = self.data.next_id;
        if id > MAX_NOTE_ID {
            bail!("no note IDs left (next ID would be {})", id);
        }
        self.data.next_id = id + 1;
        Ok(id)
    }

    /// Start a new unsaved note. Only the ID counter changes here.
    pub fn draft_note(&mut self, title: &str) -> Result<Note> {
        let id = self.allocate_id()?;
        Ok(Note::new(id, title))
    }

    /// Start an unsaved note from the template at `index`
    pub fn note_from_template(&mut self, index: usize) -> Result<Option<Note>> {
        let Some(template) = self.data.templates.get(index).cloned() else {
            return Ok(None);
        };
        let mut note = Note::new(self.allocate_id()?, template.name);
        note.content = template.content;
        note.tags = template.tags;
        note.folder = DEFAULT_FOLDER.to_string();
        Ok(Some(note))
    }

    pub fn get_note(&self, id: u64) -> Option<&Note> {
        self.data.notes.iter().find(|note| note.id == id)
    }

    /// Replace the note with the same ID, or append it if there is none
    pub fn save_note(&mut self, note: Note) -> Result<()> {
        info!("Saving note {} ({})", note.id, note.title);
        match self.data.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => {
                // Notes can be built outside the service; keep the counter ahead of them
                self.data.next_id = self.data.next_id.max(note.id.saturating_add(1));
                self.data.notes.push(note);
            }
        }
        self.flush()
    }

    /// Delete a note by ID. Returns whether a note was removed.
    pub fn delete_note(&mut self, id: u64) -> Result<bool> {
        let Some(index) = self.data.notes.iter().position(|n| n.id == id) else {
            return Ok(false);
        };
        let note = self.data.notes.remove(index);
        info!("Deleted note {} ({})", note.id, note.title);
        self.flush()?;
        Ok(true)
    }

    pub fn add_folder(&mut self, name: &str) -> Result<()> {
        info!("Adding folder {}", name);
        self.data.folders.push(name.to_string());
        self.flush()
    }

    pub fn is_protected_folder(name: &str) -> bool {
        PROTECTED_FOLDERS.contains(&name)
    }

    /// Remove every folder entry named `name`. Protected folders are left
    /// alone and nothing is written; `Ok(false)` reports that case.
    pub fn delete_folder(&mut self, name: &str) -> Result<bool> {
        if Self::is_protected_folder(name) {
            return Ok(false);
        }
        info!("Deleting folder {}", name);
        self.data.folders.retain(|folder| folder != name);
        self.flush()?;
        Ok(true)
    }

    pub fn add_tag(&mut self, name: &str) -> Result<()> {
        info!("Adding tag {}", name);
        self.data.tags.push(name.to_string());
        self.flush()
    }

    /// Remove every tag entry named `name`. Notes keep their copies.
    pub fn delete_tag(&mut self, name: &str) -> Result<()> {
        info!("Deleting tag {}", name);
        self.data.tags.retain(|tag| tag != name);
        self.flush()
    }

    pub fn count_in_folder(&self, folder: &str) -> usize {
        self.data.notes.iter().filter(|n| n.folder == folder).count()
    }

    pub fn count_with_tag(&self, tag: &str) -> usize {
        self.data.notes.iter().filter(|n| n.has_tag(tag)).count()
    }

    /// Case-insensitive substring search over title, content and tags.
    /// The query is used as typed (no trimming); results keep store order.
    pub fn search_notes(&self, query: &str) -> Vec<Note> {
        let query = query.to_lowercase();
        self.data
            .notes
            .iter()
            .filter(|note| note.matches(&query))
            .cloned()
            .collect()
    }

    /// Folder that follows `current` in the folder list, wrapping around.
    /// Unknown folders restart from the first entry.
    pub fn next_folder(&self, current: &str) -> Option<&str> {
        let folders = &self.data.folders;
        let next = match folders.iter().position(|f| f == current) {
            Some(i) => (i + 1) % folders.len(),
            None => 0,
        };
        folders.get(next).map(String::as_str)
    }
}
