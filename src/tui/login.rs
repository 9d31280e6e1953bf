//! Login screen.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::fields::{format_role, Role};
use crate::session::{Credentials, Session};
use crate::tui::{
    colors::{GOLD, STEEL_BLUE},
    input::InputField,
    task_form::cycle,
    utils::centered_rect,
};

pub const NAME_GLOBAL_ORDER: usize = 0;
pub const EMAIL_GLOBAL_ORDER: usize = 1;
pub const ROLE_GLOBAL_ORDER: usize = 2;
pub const PASSWORD_GLOBAL_ORDER: usize = 3;

pub struct LoginForm {
    pub name: InputField,
    pub email: InputField,
    pub role: usize,
    pub password: InputField,
    pub current_field: usize,
}

impl LoginForm {
    pub fn new() -> Self {
        LoginForm {
            name: InputField::new(),
            email: InputField::new(),
            role: 0,
            password: InputField::new(),
            current_field: NAME_GLOBAL_ORDER,
        }
    }

    pub fn role(&self) -> Role {
        Role::ALL[self.role % Role::ALL.len()]
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            NAME_GLOBAL_ORDER => Some(&mut self.name),
            EMAIL_GLOBAL_ORDER => Some(&mut self.email),
            PASSWORD_GLOBAL_ORDER => Some(&mut self.password),
            _ => None,
        }
    }

    /// Credentials as typed. The password is cleared for the next attempt.
    pub fn take_credentials(&mut self) -> Credentials {
        Credentials {
            name: self.name.value.trim().to_string(),
            email: self.email.value.trim().to_string(),
            role: self.role(),
            password: self.password.take(),
        }
    }

    /// Handle a key on the login screen. Enter starts the delayed login.
    pub fn handle_key(&mut self, key: KeyEvent, session: &mut Session, now: Instant) {
        if session.login_pending() {
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.current_field = (self.current_field + 1) % 4,
            KeyCode::BackTab | KeyCode::Up => self.current_field = cycle(self.current_field, 4, false),
            KeyCode::Enter => session.begin_login(self.take_credentials(), now),
            KeyCode::Left | KeyCode::Right if self.current_field == ROLE_GLOBAL_ORDER => {
                self.role = cycle(self.role, Role::ALL.len(), key.code == KeyCode::Right);
            }
            KeyCode::Left => {
                if let Some(f) = self.active_input() {
                    f.move_cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(f) = self.active_input() {
                    f.move_cursor_right();
                }
            }
            KeyCode::Backspace => {
                if let Some(f) = self.active_input() {
                    f.handle_backspace();
                }
            }
            KeyCode::Char(c) => {
                if let Some(f) = self.active_input() {
                    f.handle_char(c);
                }
            }
            _ => {}
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, pending: bool) {
        let area = centered_rect(50, 70, area);
        f.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Decapagem - Controle de Turno")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(STEEL_BLUE).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        let style_for = |field: usize| {
            if self.current_field == field {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };
        let masked = "*".repeat(self.password.value.chars().count());
        let boxes = [
            (NAME_GLOBAL_ORDER, "Nome", self.name.value.clone()),
            (EMAIL_GLOBAL_ORDER, "Email", self.email.value.clone()),
            (ROLE_GLOBAL_ORDER, "Função (←→)", format!("< {} >", format_role(self.role()))),
            (PASSWORD_GLOBAL_ORDER, "Senha", masked),
        ];
        for (field, title, text) in boxes {
            let widget = Paragraph::new(text).block(
                Block::default().borders(Borders::ALL).title(title).border_style(style_for(field)),
            );
            f.render_widget(widget, chunks[field]);
        }

        let footer = if pending {
            Line::from(Span::styled("Entrando...", Style::default().fg(Color::Cyan)))
        } else {
            Line::from("Tab: Next field  Enter: Log in  Ctrl+C: Quit  (password 123456)")
        };
        f.render_widget(Paragraph::new(footer).alignment(Alignment::Center), chunks[4]);

        let cursor = match self.current_field {
            NAME_GLOBAL_ORDER => Some((chunks[0], self.name.cursor)),
            EMAIL_GLOBAL_ORDER => Some((chunks[1], self.email.cursor)),
            PASSWORD_GLOBAL_ORDER => Some((chunks[3], self.password.cursor)),
            _ => None,
        };
        if let (Some((chunk, pos)), false) = (cursor, pending) {
            f.set_cursor_position((chunk.x + pos as u16 + 1, chunk.y + 1));
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}
