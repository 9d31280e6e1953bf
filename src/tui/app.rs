//! Main application logic for the terminal user interface.
//!
//! `DashboardApp` owns the `Session` and one state struct per screen. It
//! routes key presses, polls the session's delayed work every tick and
//! renders the header, the active screen and the status bar.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::fields::format_role;
use crate::seed::SeedData;
use crate::session::{Notice, Session};
use crate::tui::{
    board_view::BoardView,
    chat_view::ChatView,
    colors::{DARK_GREEN, DARK_RED, STEEL_BLUE},
    enums::{KeyOutcome, Screen},
    form_view::FormView,
    login::LoginForm,
    overview_view::render_overview,
    records_view::RecordsView,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
pub struct DashboardApp {
    pub session: Session,
    login: LoginForm,
    pub screen: Screen,
    board: BoardView,
    records: RecordsView,
    form: FormView,
    chat: ChatView,
    status_message: Option<Notice>,
    show_help: bool,
    should_quit: bool,
}

impl DashboardApp {
    pub fn new(seed: SeedData) -> Self {
        Self::with_session(Session::from_seed(seed))
    }

    pub fn with_session(mut session: Session) -> Self {
        let board = BoardView::new(&session);
        let records = RecordsView::new(&mut session);
        let form = FormView::new(&session);
        DashboardApp {
            session,
            login: LoginForm::new(),
            screen: Screen::Overview,
            board,
            records,
            form,
            chat: ChatView::new(),
            status_message: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// Tabs the logged-in role may open, in order.
    pub fn visible_screens(&self) -> Vec<Screen> {
        Screen::ALL
            .into_iter()
            .filter(|s| s.required_action().map_or(true, |a| self.session.can(a)))
            .collect()
    }

    fn switch_screen(&mut self, forward: bool) {
        let screens = self.visible_screens();
        let pos = screens.iter().position(|&s| s == self.screen).unwrap_or(0);
        let next = if forward {
            (pos + 1) % screens.len()
        } else {
            (pos + screens.len() - 1) % screens.len()
        };
        self.screen = screens[next];
    }

    fn open_screen(&mut self, index: usize) {
        if let Some(&screen) = self.visible_screens().get(index) {
            self.screen = screen;
        }
    }

    fn captures_input(&self) -> bool {
        match self.screen {
            Screen::Overview => false,
            Screen::Records => self.records.captures_input(),
            Screen::SubmitShift => true,
            Screen::Kanban => self.board.captures_input(),
            Screen::Chat => self.chat.captures_input(),
        }
    }

    fn reset_views(&mut self) {
        self.screen = Screen::Overview;
        self.board = BoardView::new(&self.session);
        self.records = RecordsView::new(&mut self.session);
        self.form = FormView::new(&self.session);
        self.chat = ChatView::new();
        self.show_help = false;
    }

    fn logout(&mut self) {
        self.session.logout();
        self.login = LoginForm::new();
        self.reset_views();
        self.status_message = Some(Notice::Success("Logged out".to_string()));
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let capturing = self.captures_input();
        match key.code {
            KeyCode::Left if key.modifiers.contains(KeyModifiers::ALT) => self.switch_screen(false),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::ALT) => self.switch_screen(true),
            KeyCode::F(n @ 1..=5) => self.open_screen(n as usize - 1),
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => self.logout(),
            KeyCode::Char('q') if !capturing => self.should_quit = true,
            KeyCode::Char('?') if !capturing => self.show_help = true,
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    /// Route one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            return true;
        }

        if self.session.user().is_none() {
            self.status_message = None;
            self.login.handle_key(key, &mut self.session, now);
            return false;
        }

        if self.show_help {
            self.show_help = false;
            return false;
        }

        self.status_message = None;
        if self.handle_global_key(key) == KeyOutcome::Handled {
            return self.should_quit;
        }

        let notice = match self.screen {
            Screen::Overview => None,
            Screen::Records => self.records.handle_key(key, &mut self.session),
            Screen::SubmitShift => self.form.handle_key(key, &mut self.session, now),
            Screen::Kanban => self.board.handle_key(key, &mut self.session),
            Screen::Chat => self.chat.handle_key(key, &mut self.session, now),
        };
        if notice.is_some() {
            self.status_message = notice;
        }
        false
    }

    /// Resolve delayed work that has come due.
    pub fn tick(&mut self, now: Instant) {
        let was_logged_in = self.session.user().is_some();
        let notices = self.session.poll(now);
        if !was_logged_in && self.session.user().is_some() {
            debug!("session started");
            self.reset_views();
        }
        if let Some(last) = notices.into_iter().last() {
            self.status_message = Some(last);
        }
    }

    fn hint(&self) -> String {
        match self.screen {
            Screen::Overview => "Alt+←→/F1-F5: Switch tab | ?: Help | Ctrl+L: Log out | q: Quit".to_string(),
            Screen::Records => self.records.hint(&self.session),
            Screen::SubmitShift => self.form.hint(&self.session),
            Screen::Kanban => self.board.hint(),
            Screen::Chat => self.chat.hint(&self.session),
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let screens = self.visible_screens();
        let titles: Vec<Line> = screens
            .iter()
            .enumerate()
            .map(|(i, s)| Line::from(format!("F{} {}", i + 1, s.title())))
            .collect();
        let selected = screens.iter().position(|&s| s == self.screen).unwrap_or(0);
        let user = self
            .session
            .user()
            .map(|u| format!("{} ({})", u.name, format_role(u.role)))
            .unwrap_or_default();
        let tabs = Tabs::new(titles)
            .select(selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled("DECAPAGEM", Style::default().add_modifier(Modifier::BOLD)))
                    .title_bottom(Line::from(user).alignment(Alignment::Right)),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let (text, bg) = match &self.status_message {
            Some(notice @ Notice::Success(_)) => (notice.text().to_string(), DARK_GREEN),
            Some(notice @ Notice::Error(_)) => (notice.text().to_string(), DARK_RED),
            None if self.session.user().is_none() => (String::new(), STEEL_BLUE),
            None => (self.hint(), STEEL_BLUE),
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(bg).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Global:", bold)),
            Line::from("  Alt+←/→      Previous / next tab"),
            Line::from("  F1-F5        Open tab by number"),
            Line::from("  Ctrl+L       Log out"),
            Line::from("  q/Ctrl+C     Quit"),
            Line::from(""),
            Line::from(Span::styled("Registros:", bold)),
            Line::from("  ↑/↓ j/k      Select record"),
            Line::from("  /            Search operator, steel type or date"),
            Line::from("  c            Comment on the selected record"),
            Line::from("  a / r / p    Approve / needs review / pending (engineer, manager)"),
            Line::from(""),
            Line::from(Span::styled("Novo Registro:", bold)),
            Line::from("  ↑/↓ Tab      Move between fields"),
            Line::from("  ←/→          Change shift and brush selectors"),
            Line::from("  Ctrl+S       Submit"),
            Line::from(""),
            Line::from(Span::styled("Kanban:", bold)),
            Line::from("  ←/→ ↑/↓      Select column and card"),
            Line::from("  Ctrl+←/→     Move card to the neighbouring column"),
            Line::from("  n / e / d    New / edit / delete card"),
            Line::from("  Enter        Card details"),
            Line::from(""),
            Line::from(Span::styled("Chat:", bold)),
            Line::from("  Enter        Open conversation, send message"),
            Line::from("  /            Search contacts"),
        ];
        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help - Press any key to return"))
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(Color::Black));
        f.render_widget(paragraph, area);
    }

    /// Main render function that dispatches to the active screen.
    pub fn render(&mut self, f: &mut Frame) {
        if self.session.user().is_none() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(f.area());
            self.login.render(f, chunks[0], self.session.login_pending());
            self.render_status_bar(f, chunks[1]);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());
        self.render_header(f, chunks[0]);
        match self.screen {
            Screen::Overview => render_overview(f, chunks[1], &self.session),
            Screen::Records => self.records.render(f, chunks[1], &self.session),
            Screen::SubmitShift => self.form.render(f, chunks[1], &self.session),
            Screen::Kanban => self.board.render(f, chunks[1], &self.session),
            Screen::Chat => self.chat.render(f, chunks[1], &self.session),
        }
        if self.show_help {
            self.render_help(f, chunks[1]);
        }
        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Input is polled every 50 ms; delayed session work is resolved on the
    /// same tick.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key, Instant::now()) {
                        break;
                    }
                }
            }
            self.tick(Instant::now());
            if self.should_quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    use crate::fields::Role;
    use crate::session::User;
    use crate::timer::LOGIN_DELAY;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_as(role: Role) -> DashboardApp {
        let user = User { name: "Teste".into(), email: String::new(), role };
        DashboardApp::with_session(Session::with_user(SeedData::builtin().unwrap(), user))
    }

    fn screen_text(app: &mut DashboardApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_login_then_dashboard() {
        let mut app = DashboardApp::new(SeedData::builtin().unwrap());
        assert!(screen_text(&mut app).contains("Senha"));

        let now = Instant::now();
        for c in "Abner".chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
        for _ in 0..3 {
            app.handle_key(key(KeyCode::Tab), now);
        }
        for c in "123456".chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
        app.handle_key(key(KeyCode::Enter), now);
        app.tick(now);
        assert!(app.session.user().is_none());

        app.tick(now + LOGIN_DELAY);
        assert_eq!(app.session.role(), Some(Role::Operator));
        let text = screen_text(&mut app);
        assert!(text.contains("Welcome, Abner"));
        assert!(text.contains("Abner (Operador)"));
    }

    #[test]
    fn test_wrong_password_stays_on_login() {
        let mut app = DashboardApp::new(SeedData::builtin().unwrap());
        let now = Instant::now();
        app.handle_key(key(KeyCode::Enter), now);
        app.tick(now + LOGIN_DELAY);
        assert!(app.session.user().is_none());
        assert!(screen_text(&mut app).contains("Invalid credentials. Try again."));
    }

    #[test]
    fn test_tabs_follow_role() {
        let operator = app_as(Role::Operator);
        assert!(operator.visible_screens().contains(&Screen::SubmitShift));
        let engineer = app_as(Role::Engineer);
        assert!(!engineer.visible_screens().contains(&Screen::SubmitShift));
        assert_eq!(engineer.visible_screens().len(), 4);
    }

    #[test]
    fn test_switch_tabs_and_quit() {
        let mut app = app_as(Role::Manager);
        let now = Instant::now();
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::ALT), now);
        assert_eq!(app.screen, Screen::Records);
        app.handle_key(key(KeyCode::F(3)), now);
        assert_eq!(app.screen, Screen::Kanban);
        app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT), now);
        app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT), now);
        assert_eq!(app.screen, Screen::Overview);
        assert!(app.handle_key(key(KeyCode::Char('q')), now));
    }

    #[test]
    fn test_q_types_into_search_instead_of_quitting() {
        let mut app = app_as(Role::Engineer);
        let now = Instant::now();
        app.handle_key(key(KeyCode::F(2)), now);
        app.handle_key(key(KeyCode::Char('/')), now);
        assert!(!app.handle_key(key(KeyCode::Char('q')), now));
        assert!(screen_text(&mut app).contains("Registros (1/3)"));
    }

    #[test]
    fn test_logout_returns_to_login() {
        let mut app = app_as(Role::Engineer);
        let now = Instant::now();
        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL), now);
        assert!(app.session.user().is_none());
        assert!(screen_text(&mut app).contains("Senha"));
    }
}
