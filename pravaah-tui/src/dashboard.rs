use crossterm::event::{KeyCode, KeyEvent};
use pravaah_core::catalog::{DASHBOARD_HEADING, ToolDescriptor};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const COLUMNS: usize = 3;
const CARD_HEIGHT: u16 = 7;

/// Landing page: a grid of tool cards, one of them selected.
pub struct DashboardView {
    tools: Vec<ToolDescriptor>,
    selected: usize,
}

impl DashboardView {
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        Self { tools, selected: 0 }
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn selected(&self) -> Option<&ToolDescriptor> {
        self.tools.get(self.selected)
    }

    /// Returns the tool to activate when the key is Enter.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<&ToolDescriptor> {
        if self.tools.is_empty() {
            return None;
        }
        let last = self.tools.len() - 1;

        match key.code {
            KeyCode::Left => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right | KeyCode::Tab => self.selected = (self.selected + 1).min(last),
            KeyCode::Up => self.selected = self.selected.saturating_sub(COLUMNS),
            KeyCode::Down => self.selected = (self.selected + COLUMNS).min(last),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = last,
            KeyCode::Enter => return self.tools.get(self.selected),
            _ => {}
        }
        None
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Heading
                Constraint::Min(CARD_HEIGHT),
            ])
            .split(area);

        let heading = Paragraph::new(Line::from(Span::styled(
            DASHBOARD_HEADING,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        f.render_widget(heading, chunks[0]);

        let rows = self.tools.len().div_ceil(COLUMNS);
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); rows])
            .split(chunks[1]);

        for (row_idx, row_area) in row_areas.iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
                .split(*row_area);

            for (col_idx, card_area) in columns.iter().enumerate() {
                let idx = row_idx * COLUMNS + col_idx;
                if let Some(tool) = self.tools.get(idx) {
                    self.render_card(f, *card_area, tool, idx == self.selected);
                }
            }
        }
    }

    fn render_card(&self, f: &mut Frame, area: Rect, tool: &ToolDescriptor, selected: bool) {
        let border_color = if selected { Color::Yellow } else { Color::Cyan };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", tool.title))
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(area);
        f.render_widget(block, area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let description = Paragraph::new(tool.description.as_str())
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        f.render_widget(description, parts[0]);

        let marker = if tool.is_external { " ↗" } else { "" };
        let mut button_style = Style::default().fg(Color::Black).bg(Color::Cyan);
        if selected {
            button_style = button_style.bg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        let button = Paragraph::new(Line::from(Span::styled(
            format!(" {}{} ", tool.call_to_action(), marker),
            button_style,
        )));
        f.render_widget(button, parts[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pravaah_core::catalog::default_tools;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_grid_navigation() {
        let mut view = DashboardView::new(default_tools());
        view.handle_key(press(KeyCode::Down));
        assert_eq!(view.selected().unwrap().title, "Database Entry");
        view.handle_key(press(KeyCode::Right));
        view.handle_key(press(KeyCode::Right));
        view.handle_key(press(KeyCode::Right));
        assert_eq!(view.selected().unwrap().title, "Amenities Availability");
        view.handle_key(press(KeyCode::Up));
        assert_eq!(view.selected().unwrap().title, "3D Mapper");
    }

    #[test]
    fn test_enter_returns_selected_tool() {
        let mut view = DashboardView::new(default_tools());
        view.handle_key(press(KeyCode::End));
        let tool = view.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(tool.url, "/amenities");
    }

    #[test]
    fn test_empty_catalog_ignores_keys() {
        let mut view = DashboardView::new(Vec::new());
        assert!(view.handle_key(press(KeyCode::Enter)).is_none());
        assert!(view.selected().is_none());
    }
}
