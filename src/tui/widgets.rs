use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, ListState};
use tui_textarea::{Input, Key, TextArea};

use crate::tui::items::ListEntry;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `index`-th char, or the end of the string
fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map(|(i, _)| i).unwrap_or(s.len())
}

/// Plain typing: a character without Ctrl/Alt held
fn typed_char(key: KeyCode, modifiers: KeyModifiers) -> Option<char> {
    match key {
        KeyCode::Char(c)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// Scrollable, selectable list of entries
pub struct ItemList {
    title: String,
    items: Vec<ListEntry>,
    state: ListState,
    page_size: usize,
}

impl ItemList {
    pub fn new(title: impl Into<String>, items: Vec<ListEntry>) -> Self {
        let mut list = ItemList {
            title: title.into(),
            items: Vec::new(),
            state: ListState::default(),
            page_size: 10,
        };
        list.replace_items(items);
        list
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn items(&self) -> &[ListEntry] {
        &self.items
    }

    /// Swap in new entries, keeping the selection on the same row where possible
    pub fn replace_items(&mut self, items: Vec<ListEntry>) {
        self.items = items;
        let selected = match (self.state.selected(), self.items.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.state.select(selected);
    }

    pub fn selected(&self) -> Option<&ListEntry> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    /// Each entry takes two rows (title and description)
    pub fn set_height(&mut self, height: u16) {
        self.page_size = usize::from(height / 2).max(1);
    }

    /// Navigation keys. Returns whether the key was used.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let last = self.items.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        let next = match key {
            KeyCode::Up | KeyCode::Char('k') => current.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => (current + 1).min(last),
            KeyCode::Home | KeyCode::Char('g') => 0,
            KeyCode::End | KeyCode::Char('G') => last,
            KeyCode::PageUp => current.saturating_sub(self.page_size),
            KeyCode::PageDown => (current + self.page_size).min(last),
            _ => return false,
        };
        self.state.select(Some(next));
        true
    }
}

/// Single-line text field
pub struct TextInput {
    value: String,
    cursor: usize,
    placeholder: String,
    focused: bool,
}

impl TextInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        TextInput {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            focused: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text and put the cursor at the end
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = char_len(&self.value);
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Cursor position in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if let Some(c) = typed_char(key, modifiers) {
            let at = byte_offset(&self.value, self.cursor);
            self.value.insert(at, c);
            self.cursor += 1;
            return true;
        }
        match key {
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = byte_offset(&self.value, self.cursor);
                self.value.remove(at);
            }
            KeyCode::Delete if self.cursor < char_len(&self.value) => {
                let at = byte_offset(&self.value, self.cursor);
                self.value.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(char_len(&self.value)),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = char_len(&self.value),
            _ => return false,
        }
        true
    }
}

/// Multi-line note body, backed by `tui_textarea` for editing and scrolling
pub struct TextEditor {
    area: TextArea<'static>,
    width: u16,
    height: u16,
}

impl TextEditor {
    pub fn new(width: u16, height: u16) -> Self {
        TextEditor {
            area: Self::text_area(Vec::new()),
            width,
            height,
        }
    }

    fn text_area(lines: Vec<String>) -> TextArea<'static> {
        let mut area = if lines.is_empty() {
            TextArea::default()
        } else {
            TextArea::new(lines)
        };
        area.set_cursor_line_style(Style::default());
        area.set_block(Block::default().borders(Borders::ALL));
        area
    }

    /// Size of the last layout; the text area scrolls itself when drawn.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Replace the whole text; the cursor goes back to the start
    pub fn set_value(&mut self, value: &str) {
        self.area = Self::text_area(value.split('\n').map(str::to_string).collect());
    }

    pub fn value(&self) -> String {
        self.area.lines().join("\n")
    }

    /// (row, col) of the cursor in the text
    pub fn cursor(&self) -> (usize, usize) {
        self.area.cursor()
    }

    pub fn line_count(&self) -> usize {
        self.area.lines().len()
    }

    pub fn set_title(&mut self, title: String) {
        self.area
            .set_block(Block::default().borders(Borders::ALL).title(title));
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.area
    }

    /// Returns whether the text changed
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        let input = Input {
            key: match key {
                KeyCode::Char(c) => Key::Char(c),
                KeyCode::Enter => Key::Enter,
                KeyCode::Backspace => Key::Backspace,
                KeyCode::Delete => Key::Delete,
                KeyCode::Left => Key::Left,
                KeyCode::Right => Key::Right,
                KeyCode::Up => Key::Up,
                KeyCode::Down => Key::Down,
                KeyCode::Tab => Key::Tab,
                KeyCode::Home => Key::Home,
                KeyCode::End => Key::End,
                KeyCode::PageUp => Key::PageUp,
                KeyCode::PageDown => Key::PageDown,
                _ => return false,
            },
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
            alt: modifiers.contains(KeyModifiers::ALT),
            ..Input::default()
        };
        self.area.input(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<ListEntry> {
        (0..n)
            .map(|i| ListEntry::new(format!("item {i}"), "", i as i64))
            .collect()
    }

    fn type_into_editor(editor: &mut TextEditor, text: &str) {
        for c in text.chars() {
            let key = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            editor.handle_key(key, KeyModifiers::NONE);
        }
    }

    #[test]
    fn list_navigation_stays_in_bounds() {
        let mut list = ItemList::new("t", entries(3));
        assert_eq!(list.selected().unwrap().id, 0);

        list.handle_key(KeyCode::Up);
        assert_eq!(list.selected().unwrap().id, 0);
        list.handle_key(KeyCode::Char('j'));
        list.handle_key(KeyCode::Down);
        list.handle_key(KeyCode::Down);
        assert_eq!(list.selected().unwrap().id, 2);
        list.handle_key(KeyCode::Home);
        assert_eq!(list.selected().unwrap().id, 0);
        list.handle_key(KeyCode::End);
        assert_eq!(list.selected().unwrap().id, 2);
        assert!(!list.handle_key(KeyCode::Char('x')));
    }

    #[test]
    fn replacing_items_clamps_the_selection() {
        let mut list = ItemList::new("t", entries(3));
        list.handle_key(KeyCode::End);
        list.replace_items(entries(2));
        assert_eq!(list.selected().unwrap().id, 1);
        list.replace_items(Vec::new());
        assert!(list.selected().is_none());
    }

    #[test]
    fn page_keys_use_the_list_height() {
        let mut list = ItemList::new("t", entries(20));
        list.set_height(10);
        list.handle_key(KeyCode::PageDown);
        assert_eq!(list.selected().unwrap().id, 5);
        list.handle_key(KeyCode::PageUp);
        assert_eq!(list.selected().unwrap().id, 0);
    }

    #[test]
    fn input_edits_at_the_cursor() {
        let mut input = TextInput::new("Enter text...");
        for c in "helo".chars() {
            input.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        input.handle_key(KeyCode::Left, KeyModifiers::NONE);
        input.handle_key(KeyCode::Char('l'), KeyModifiers::SHIFT);
        assert_eq!(input.value(), "hello");

        input.handle_key(KeyCode::Home, KeyModifiers::NONE);
        input.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        input.handle_key(KeyCode::End, KeyModifiers::NONE);
        input.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(input.value(), "ell");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn input_ignores_control_chords() {
        let mut input = TextInput::new("");
        assert!(!input.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn input_handles_multibyte_text() {
        let mut input = TextInput::new("");
        input.set_value("café");
        input.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(input.value(), "caf");
    }

    #[test]
    fn editor_round_trips_multi_line_text() {
        let mut editor = TextEditor::new(80, 20);
        editor.set_value("line one\nline two");
        assert_eq!(editor.value(), "line one\nline two");
        assert_eq!(editor.line_count(), 2);
        assert_eq!(editor.cursor(), (0, 0));
    }

    #[test]
    fn editor_splits_and_joins_lines() {
        let mut editor = TextEditor::new(80, 20);
        type_into_editor(&mut editor, "milk, eggs");
        for _ in 0..6 {
            editor.handle_key(KeyCode::Left, KeyModifiers::NONE);
        }
        editor.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(editor.value(), "milk\n, eggs");

        editor.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(editor.value(), "milk, eggs");

        editor.handle_key(KeyCode::End, KeyModifiers::NONE);
        editor.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        type_into_editor(&mut editor, "bread");
        assert_eq!(editor.cursor(), (1, 5));
        editor.handle_key(KeyCode::Up, KeyModifiers::NONE);
        editor.handle_key(KeyCode::End, KeyModifiers::NONE);
        editor.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(editor.value(), "milk, eggsbread");
    }

    #[test]
    fn editor_handles_multibyte_text() {
        let mut editor = TextEditor::new(80, 20);
        editor.set_value("café");
        editor.handle_key(KeyCode::End, KeyModifiers::NONE);
        assert!(editor.handle_key(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(editor.value(), "caf");
    }

    #[test]
    fn editor_ignores_keys_it_has_no_use_for() {
        let mut editor = TextEditor::new(80, 20);
        editor.set_value("text");
        assert!(!editor.handle_key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!editor.handle_key(KeyCode::F(2), KeyModifiers::NONE));
        assert_eq!(editor.value(), "text");
    }
}
