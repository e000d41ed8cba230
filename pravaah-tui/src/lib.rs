pub mod amenities;
pub mod dashboard;

use amenities::{AmenitiesView, AmenityCommand};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dashboard::DashboardView;
use pravaah_api::StationClient;
use pravaah_core::catalog::{self, Route, ToolAction, ToolDescriptor};
use pravaah_core::dispatch::{spawn_search, spawn_toggle};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::io;
use std::time::Duration;
use tracing::{info, warn};

const APP_TITLE: &str = "SIH Admin Dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusLine {
    Info(String),
    Error(String),
}

/// Top-level TUI state: the active route and one instance of each view.
pub struct App {
    route: Route,
    dashboard: DashboardView,
    amenities: AmenitiesView,
    client: StationClient,
    status: Option<StatusLine>,
    should_quit: bool,
}

impl App {
    pub fn new(client: StationClient, tools: Vec<ToolDescriptor>, start: Route) -> Self {
        Self {
            route: start,
            dashboard: DashboardView::new(tools),
            amenities: AmenitiesView::new(),
            client,
            status: None,
            should_quit: false,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn amenities(&self) -> &AmenitiesView {
        &self.amenities
    }

    /// Switch views. Leaving the amenity page discards its state, and any
    /// request still in flight reports into a closed channel.
    pub fn navigate(&mut self, route: Route) {
        if self.route == Route::Amenities && route != Route::Amenities {
            self.amenities = AmenitiesView::new();
        }
        self.route = route;
        self.status = None;
        info!("Navigated to {}", route.path());
    }

    /// Apply background completions. Called once per frame.
    pub fn tick(&mut self) {
        self.amenities.process_messages();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.route {
            Route::Dashboard => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                _ => {
                    if let Some(tool) = self.dashboard.handle_key(key).cloned() {
                        self.activate(&tool);
                    }
                }
            },
            Route::Amenities => {
                if key.code == KeyCode::Esc {
                    self.navigate(Route::Dashboard);
                } else if let Some(command) = self.amenities.handle_key(key) {
                    self.dispatch(command);
                }
            }
        }
    }

    fn activate(&mut self, tool: &ToolDescriptor) {
        match tool.action() {
            Ok(ToolAction::Navigate(route)) => self.navigate(route),
            Ok(ToolAction::OpenExternal(url)) => match catalog::open_external(&url) {
                Ok(()) => {
                    info!("Opened {} at {}", tool.title, url);
                    self.status = Some(StatusLine::Info(format!(
                        "Opened {} in your browser",
                        tool.title
                    )));
                }
                Err(e) => {
                    warn!("{}", e);
                    self.status = Some(StatusLine::Error(e.to_string()));
                }
            },
            Err(e) => {
                warn!("Tool '{}' has no usable target: {}", tool.title, e);
                self.status = Some(StatusLine::Error(e.to_string()));
            }
        }
    }

    fn dispatch(&mut self, command: AmenityCommand) {
        match command {
            AmenityCommand::Search(ticket) => {
                spawn_search(&self.client, ticket, self.amenities.sender());
            }
            AmenityCommand::Toggle(request) => {
                spawn_toggle(&self.client, request, self.amenities.sender());
            }
        }
    }
}

/// Run the dashboard until the user quits. Must be called from within a
/// tokio runtime; requests are spawned onto it.
pub fn run(client: StationClient, tools: Vec<ToolDescriptor>, start: Route) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, tools, start);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Spacer
            Constraint::Min(10),   // Active view
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Hints
        ])
        .split(f.area());

    let marker = match app.route {
        Route::Dashboard => "≡",
        Route::Amenities => "←",
    };
    let header = Paragraph::new(Line::from(vec![
        Span::raw(format!(" {}  ", marker)),
        Span::styled(APP_TITLE, Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .style(Style::default().fg(Color::White).bg(Color::Blue));
    f.render_widget(header, chunks[0]);

    match app.route {
        Route::Dashboard => app.dashboard.render(f, chunks[2]),
        Route::Amenities => app.amenities.render(f, chunks[2]),
    }

    if let Some(status) = &app.status {
        let (text, color) = match status {
            StatusLine::Info(msg) => (format!("✓ {}", msg), Color::Green),
            StatusLine::Error(msg) => (format!("✗ {}", msg), Color::Red),
        };
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(color)),
            chunks[3],
        );
    }

    f.render_widget(render_hints(app.route), chunks[4]);
}

fn render_hints(route: Route) -> Paragraph<'static> {
    let key_style = Style::default().fg(Color::Black).bg(Color::Gray);
    let hints = match route {
        Route::Dashboard => Line::from(vec![
            Span::styled(" ←↑↓→ ", key_style),
            Span::raw(" Select  "),
            Span::styled(" Enter ", key_style),
            Span::raw(" Open  "),
            Span::styled(" q/ESC ", key_style),
            Span::raw(" Exit"),
        ]),
        Route::Amenities => Line::from(vec![
            Span::styled(" Enter ", key_style),
            Span::raw(" Search/Toggle  "),
            Span::styled(" Tab ", key_style),
            Span::raw(" Switch panel  "),
            Span::styled(" Space ", key_style),
            Span::raw(" Toggle  "),
            Span::styled(" Ctrl+E/U ", key_style),
            Span::raw(" Dismiss  "),
            Span::styled(" ESC ", key_style),
            Span::raw(" Back"),
        ]),
    };

    Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pravaah_core::amenities::EMPTY_SEARCH_MESSAGE;
    use pravaah_core::catalog::default_tools;
    use ratatui::backend::TestBackend;

    fn test_app(start: Route) -> App {
        // Nothing listens here; these tests never reach the network.
        let client = StationClient::with_base_url("http://127.0.0.1:9").unwrap();
        App::new(client, default_tools(), start)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_internal_tool_navigates() {
        let mut app = test_app(Route::Dashboard);
        app.handle_key(press(KeyCode::End));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.route(), Route::Amenities);
    }

    #[test]
    fn test_leaving_amenities_discards_state() {
        let mut app = test_app(Route::Amenities);
        app.handle_key(press(KeyCode::Char(' ')));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.amenities().state().last_error(), Some(EMPTY_SEARCH_MESSAGE));

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.route(), Route::Dashboard);
        assert!(app.amenities().state().last_error().is_none());
        assert!(app.amenities().state().search_key().is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app(Route::Dashboard);
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit());

        let mut app = test_app(Route::Amenities);
        app.handle_key(press(KeyCode::Char('q')));
        assert!(!app.should_quit());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_dashboard_renders_catalog() {
        let app = test_app(Route::Dashboard);
        let text = screen_text(&app);
        assert!(text.contains(APP_TITLE));
        assert!(text.contains("Welcome to SIH Admin Dashboard"));
        assert!(text.contains("SVG Mapper"));
        assert!(text.contains("View Details"));
    }

    #[test]
    fn test_amenities_renders_placeholder() {
        let app = test_app(Route::Amenities);
        let text = screen_text(&app);
        assert!(text.contains("No Station Selected"));
        assert!(text.contains("Search Station"));
    }

    #[tokio::test]
    async fn test_search_failure_reaches_view() {
        let mut app = test_app(Route::Amenities);
        for c in "Central".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.handle_key(press(KeyCode::Enter));
        assert!(app.amenities().state().is_loading());

        for _ in 0..100 {
            app.tick();
            if !app.amenities().state().is_loading() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let state = app.amenities().state();
        assert!(!state.is_loading());
        assert!(state.last_error().unwrap().starts_with("Network error"));
    }
}
