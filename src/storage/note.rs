use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Folder every new note is filed into.
pub const DEFAULT_FOLDER: &str = "General";

/// Folders that always exist and can never be deleted.
pub const PROTECTED_FOLDERS: [&str; 3] = ["General", "Work", "Personal"];

/// Largest usable note ID. List rows carry IDs as `i64`.
pub const MAX_NOTE_ID: u64 = i64::MAX as u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_folder")]
    pub folder: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create an empty note in the default folder, stamped with the current time
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        let now = Utc::now();

        Note {
            id,
            title: title.into(),
            content: String::new(),
            tags: Vec::new(),
            folder: DEFAULT_FOLDER.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creation date as shown in lists, e.g. `2024-03-09`
    pub fn created_date(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive match on title, content or any tag.
    /// `query` must already be lowercased.
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query)
            || self.content.to_lowercase().contains(query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(query))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Template {
    fn new(name: &str, content: &str, tags: &[&str]) -> Self {
        Template {
            name: name.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Everything that gets written to disk, one field per store collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub notes: Vec<Note>,
    pub folders: Vec<String>,
    pub tags: Vec<String>,
    pub templates: Vec<Template>,
    pub next_id: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            notes: Vec::new(),
            folders: PROTECTED_FOLDERS.iter().map(|f| f.to_string()).collect(),
            tags: ["important", "todo", "idea"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            templates: default_templates(),
            next_id: 1,
        }
    }
}

impl Snapshot {
    /// Move `next_id` past every stored note so fresh IDs never collide.
    ///
    /// Returns `false` when a note ID or the counter is out of range, in
    /// which case the snapshot is left as it was.
    pub fn repair_next_id(&mut self) -> bool {
        let highest = self.notes.iter().map(|n| n.id).max().unwrap_or(0);
        if highest >= MAX_NOTE_ID || self.next_id > MAX_NOTE_ID {
            return false;
        }
        self.next_id = self.next_id.max(highest + 1);
        true
    }
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

fn default_templates() -> Vec<Template> {
    vec![
        Template::new(
            "Meeting Notes",
            "# Meeting Notes\n\nDate:\nAttendees:\n\n## Agenda\n\n## Decisions\n\n## Action Items\n",
            &["meeting", "work"],
        ),
        Template::new(
            "Daily Journal",
            "# Daily Journal\n\n## Today I'm grateful for\n\n## What happened\n\n## Tomorrow\n",
            &["journal", "personal"],
        ),
        Template::new(
            "Project Planning",
            "# Project Plan\n\n## Goal\n\n## Milestones\n\n## Risks\n\n## Next Steps\n",
            &["project", "planning", "work"],
        ),
        Template::new(
            "Quick Idea",
            "# Idea\n\n## What\n\n## Why it matters\n",
            &["idea", "brainstorm"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_seeded() {
        let snapshot = Snapshot::default();
        assert!(snapshot.notes.is_empty());
        assert_eq!(snapshot.folders, vec!["General", "Work", "Personal"]);
        assert_eq!(snapshot.tags, vec!["important", "todo", "idea"]);
        assert_eq!(snapshot.templates.len(), 4);
        assert_eq!(snapshot.next_id, 1);
    }

    #[test]
    fn partial_snapshot_keeps_defaults_for_missing_fields() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"next_id": 7}"#).unwrap();
        assert_eq!(snapshot.next_id, 7);
        assert_eq!(snapshot.folders.len(), 3);
        assert_eq!(snapshot.templates.len(), 4);
    }

    #[test]
    fn next_id_moves_past_stored_notes() {
        let mut snapshot = Snapshot::default();
        snapshot.notes.push(Note::new(1, "a"));
        snapshot.notes.push(Note::new(9, "b"));

        assert!(snapshot.repair_next_id());
        assert_eq!(snapshot.next_id, 10);

        // A counter already ahead is kept
        snapshot.next_id = 40;
        assert!(snapshot.repair_next_id());
        assert_eq!(snapshot.next_id, 40);
    }

    #[test]
    fn zero_counter_is_raised_to_one() {
        let mut snapshot = Snapshot::default();
        snapshot.next_id = 0;
        assert!(snapshot.repair_next_id());
        assert_eq!(snapshot.next_id, 1);
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        let mut snapshot = Snapshot::default();
        snapshot.next_id = u64::MAX;
        assert!(!snapshot.repair_next_id());
        assert_eq!(snapshot.next_id, u64::MAX);

        let mut snapshot = Snapshot::default();
        snapshot.notes.push(Note::new(MAX_NOTE_ID, "last"));
        assert!(!snapshot.repair_next_id());
    }

    #[test]
    fn note_without_folder_or_tags_gets_defaults() {
        let json = r#"{
            "id": 3,
            "title": "t",
            "content": "c",
            "created_at": "2024-01-02T03:04:05Z",
            "updated_at": "2024-01-02T03:04:05Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.folder, "General");
        assert!(note.tags.is_empty());
    }

    #[test]
    fn matches_is_case_insensitive_across_fields() {
        let mut note = Note::new(1, "Quarterly Review");
        note.content = "Budget numbers".to_string();
        note.tags = vec!["Finance".to_string()];

        assert!(note.matches("review"));
        assert!(note.matches("budget"));
        assert!(note.matches("fin"));
        assert!(note.matches(""));
        assert!(!note.matches("holiday"));
    }
}
