use ratatui::prelude::*;
use ratatui::layout::Position;
use ratatui::widgets::*;

use crate::tui::app::{App, Severity, StatusMessage, View};

fn help_text(view: View) -> &'static str {
    match view {
        View::MainMenu => "↑/↓: navigate | Enter: select | Ctrl+C: quit",
        View::NoteList => "Enter: edit | d: delete | q: back to menu",
        View::NoteEdit => "Ctrl+S: save | Ctrl+F: change folder | Esc: cancel",
        View::Search => "Enter: search | Esc: back to menu",
        View::FolderManage | View::TagManage => "Enter: select/create | d: delete | q: back to menu",
        View::TemplateList => "Enter: use template | q: back to menu",
        View::InputDialog => "Enter: create | Esc: cancel",
    }
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Success => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Severity::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Severity::Warning => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Severity::Neutral => Style::default().fg(Color::Cyan),
    }
}

impl App {
    /// Draw the current view. The status message is consumed here.
    pub fn render(&mut self, frame: &mut Frame) {
        let status = self.status.take();
        let status_height = if status.is_some() { 3 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(status_height),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        // Title bar
        let title = Paragraph::new("QuickNotes - Terminal Note Taking")
            .block(Block::default().borders(Borders::ALL).title("QuickNotes"))
            .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD));
        frame.render_widget(title, chunks[0]);

        if let Some(status) = status {
            self.render_status(frame, chunks[1], &status);
        }

        match self.view {
            View::MainMenu
            | View::NoteList
            | View::FolderManage
            | View::TagManage
            | View::TemplateList => self.render_list(frame, chunks[2]),
            View::NoteEdit => self.render_edit(frame, chunks[2]),
            View::Search => self.render_input(frame, chunks[2], "Search Notes", "Enter search query:"),
            View::InputDialog => {
                let heading = self.input_mode.heading();
                self.render_input(frame, chunks[2], heading, "")
            }
        }

        let help = Paragraph::new(help_text(self.view))
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, status: &StatusMessage) {
        let paragraph = Paragraph::new(status.text.as_str())
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(severity_style(status.severity));
        frame.render_widget(paragraph, area);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .list
            .items()
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        entry.title.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        entry.description.clone(),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();

        let list_title = self.list.title().to_string();
        let list = if items.is_empty() {
            List::new(vec![ListItem::new("Nothing here yet")])
        } else {
            List::new(items)
        }
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, self.list.state_mut());
    }

    fn render_edit(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let (heading, details) = match self.current_note {
            Some(ref note) => (
                format!("Editing: {}", note.title),
                format!("Folder: {} | Tags: {}", note.folder, note.tags.join(", ")),
            ),
            None => ("Editing Note".to_string(), String::new()),
        };
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                heading,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(details, Style::default().fg(Color::Green))),
        ])
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let title = format!("Content ({} lines)", self.editor.line_count());
        self.editor.set_title(title);
        frame.render_widget(self.editor.textarea(), chunks[1]);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, heading: &str, prompt: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                heading.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(prompt.to_string()),
        ]));
        frame.render_widget(header, chunks[0]);

        let text = if self.input.value().is_empty() {
            Span::styled(self.input.placeholder().to_string(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.input.value().to_string(), Style::default().fg(Color::White))
        };
        let field = Paragraph::new(Line::from(text)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(field, chunks[1]);

        if self.input.is_focused() {
            let inner = chunks[1].inner(Margin::new(1, 1));
            if let Some(position) = cursor_in(inner, 0, self.input.cursor()) {
                frame.set_cursor_position(position);
            }
        }
    }
}

/// Screen position for a text cursor, if it falls inside `area`
fn cursor_in(area: Rect, row: usize, col: usize) -> Option<Position> {
    let row = u16::try_from(row).ok()?;
    let col = u16::try_from(col).ok()?;
    if row >= area.height || col >= area.width {
        return None;
    }
    Some(Position::new(area.x + col, area.y + row))
}
