use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pravaah_core::amenities::{
    AmenityState, NO_AMENITIES_MESSAGE, NO_STATION_HINT, SearchTicket, StatusKind, ToggleRequest,
};
use pravaah_core::dispatch::{EventReceiver, EventSender, event_channel};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

const SEARCH_PANEL_WIDTH: u16 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
}

/// Network work requested by a key press, for the caller to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmenityCommand {
    Search(SearchTicket),
    Toggle(ToggleRequest),
}

/// Amenity management page. Owns its controller state and the channel its
/// background requests report back on; dropping the view orphans them.
pub struct AmenitiesView {
    state: AmenityState,
    focus: Focus,
    cursor_position: usize,
    selected: usize,
    tx: EventSender,
    rx: EventReceiver,
}

impl AmenitiesView {
    pub fn new() -> Self {
        let (tx, rx) = event_channel();
        Self {
            state: AmenityState::new(),
            focus: Focus::Search,
            cursor_position: 0,
            selected: 0,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &AmenityState {
        &self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    /// Apply every completion that has arrived since the last tick.
    pub fn process_messages(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.state.apply(event);
        }
        let count = self.state.amenities().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AmenityCommand> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('e') => self.state.dismiss_error(),
                KeyCode::Char('u') => self.state.dismiss_update_status(),
                _ => {}
            }
            return None;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Results => self.handle_results_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<AmenityCommand> {
        match key.code {
            KeyCode::Char(c) => {
                let idx = byte_index(self.state.search_key(), self.cursor_position);
                self.state.search_key_mut().insert(idx, c);
                self.cursor_position += 1;
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    let idx = byte_index(self.state.search_key(), self.cursor_position - 1);
                    self.state.search_key_mut().remove(idx);
                    self.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < self.state.search_key().chars().count() {
                    let idx = byte_index(self.state.search_key(), self.cursor_position);
                    self.state.search_key_mut().remove(idx);
                }
            }
            KeyCode::Left => self.cursor_position = self.cursor_position.saturating_sub(1),
            KeyCode::Right => {
                let len = self.state.search_key().chars().count();
                self.cursor_position = (self.cursor_position + 1).min(len);
            }
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.state.search_key().chars().count(),
            KeyCode::Enter => {
                return self.state.submit_search().map(AmenityCommand::Search);
            }
            KeyCode::Tab | KeyCode::Down => self.focus = Focus::Results,
            _ => {}
        }
        None
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Option<AmenityCommand> {
        let rows = self.state.amenities();
        match key.code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(rows.len().saturating_sub(1));
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = rows.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let row = rows.get(self.selected)?;
                return self.state.request_toggle(&row.id).map(AmenityCommand::Toggle);
            }
            KeyCode::Tab | KeyCode::Char('/') => self.focus = Focus::Search,
            _ => {}
        }
        None
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(SEARCH_PANEL_WIDTH), // Search (left)
                Constraint::Min(20),                    // Results (right)
            ])
            .split(area);

        self.render_search(f, chunks[0]);
        self.render_results(f, chunks[1]);
    }

    fn render_search(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Search Station ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Input
                Constraint::Length(1), // Button
                Constraint::Length(2), // Loading
                Constraint::Min(0),    // Alerts
            ])
            .split(inner);

        let input_color = if self.state.last_error().is_some() {
            Color::Red
        } else if self.focus == Focus::Search {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(" Station Name ")
            .border_style(Style::default().fg(input_color));
        let input_inner = input_block.inner(parts[0]);

        let input = if self.state.search_key().is_empty() {
            Paragraph::new(Span::styled(
                "Enter station name",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.state.search_key()).style(Style::default().fg(Color::Yellow))
        };
        f.render_widget(input.block(input_block), parts[0]);

        if self.focus == Focus::Search {
            f.set_cursor_position((
                input_inner.x + self.cursor_position as u16,
                input_inner.y,
            ));
        }

        let can_search = !self.state.is_loading() && !self.state.search_key().trim().is_empty();
        let button_style = if can_search {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray).bg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(" ⌕ Search (Enter) ", button_style))),
            parts[1],
        );

        if self.state.is_loading() {
            f.render_widget(
                Paragraph::new(Span::styled("⠋ Searching...", Style::default().fg(Color::Cyan)))
                    .alignment(Alignment::Center),
                parts[2],
            );
        }

        let mut alerts = Vec::new();
        if let Some(error) = self.state.last_error() {
            alerts.push(Line::from(Span::styled(
                format!("✗ {}", error),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            alerts.push(Line::from(Span::styled(
                "  Ctrl+E to dismiss",
                Style::default().fg(Color::DarkGray),
            )));
            alerts.push(Line::from(""));
        }
        if let Some(status) = self.state.last_update_status() {
            let (icon, color) = match status.kind {
                StatusKind::Success => ("✓", Color::Green),
                StatusKind::Error => ("✗", Color::Red),
            };
            alerts.push(Line::from(Span::styled(
                format!("{} {}", icon, status.message),
                Style::default().fg(color),
            )));
            alerts.push(Line::from(Span::styled(
                "  Ctrl+U to dismiss",
                Style::default().fg(Color::DarkGray),
            )));
        }
        f.render_widget(Paragraph::new(alerts).wrap(Wrap { trim: false }), parts[3]);
    }

    fn render_results(&self, f: &mut Frame, area: Rect) {
        let border_color = if self.focus == Focus::Results {
            Color::Yellow
        } else {
            Color::Cyan
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.state.title()))
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.state.result().is_none() {
            let hint = Paragraph::new(NO_STATION_HINT)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            let centered = Rect {
                y: inner.y + inner.height / 2,
                height: inner.height.saturating_sub(inner.height / 2),
                ..inner
            };
            f.render_widget(hint, centered);
            return;
        }

        let rows = self.state.amenities();
        if rows.is_empty() {
            f.render_widget(
                Paragraph::new(NO_AMENITIES_MESSAGE)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        // Two lines per row.
        let visible_rows = (inner.height as usize / 2).max(1);
        let scroll_offset = (self.selected + 1).saturating_sub(visible_rows);

        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible_rows)
            .map(|(idx, row)| {
                let (switch, color) = if row.visible {
                    ("[■ on ]", Color::Green)
                } else {
                    ("[off □]", Color::DarkGray)
                };

                let mut style = Style::default();
                if self.focus == Focus::Results && idx == self.selected {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(switch, Style::default().fg(color)),
                        Span::raw(" "),
                        Span::styled(row.label.clone(), Style::default().fg(Color::White)),
                        Span::raw("  "),
                        Span::styled(row.visibility_label(), Style::default().fg(color)),
                    ]),
                    Line::from(Span::styled(
                        format!("        ID: {}", row.id),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .style(style)
            })
            .collect();

        f.render_widget(List::new(items), inner);
    }
}

impl Default for AmenitiesView {
    fn default() -> Self {
        Self::new()
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}
