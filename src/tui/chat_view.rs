//! Team chat view.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::chat::initials;
use crate::fields::*;
use crate::session::{Notice, Session};
use crate::tui::{
    colors::{presence_color, GOLD, STEEL_BLUE},
    input::InputField,
};

#[derive(Default)]
pub struct ChatView {
    pub filter: InputField,
    pub message: InputField,
    list_state: ListState,
}

impl ChatView {
    pub fn new() -> Self {
        let mut view = ChatView::default();
        view.list_state.select(Some(0));
        view
    }

    pub fn captures_input(&self) -> bool {
        self.filter.active || self.message.active
    }

    fn visible_ids(&self, session: &Session) -> Vec<u64> {
        session.chat.filter_contacts(&self.filter.value).iter().map(|c| c.id).collect()
    }

    fn clamp(&mut self, len: usize) {
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, session: &mut Session, now: Instant) -> Option<Notice> {
        if self.filter.active {
            match key.code {
                KeyCode::Esc => {
                    self.filter.clear();
                    self.filter.active = false;
                }
                KeyCode::Enter => self.filter.active = false,
                KeyCode::Backspace => self.filter.handle_backspace(),
                KeyCode::Char(c) => self.filter.handle_char(c),
                _ => {}
            }
            let len = self.visible_ids(session).len();
            self.clamp(len);
            return None;
        }

        if self.message.active {
            match key.code {
                KeyCode::Esc => self.message.active = false,
                KeyCode::Enter => {
                    let text = self.message.value.clone();
                    return match session.send_chat(&text, now) {
                        Ok(Some(_)) => {
                            self.message.clear();
                            None
                        }
                        Ok(None) => None,
                        Err(e) => Some(Notice::Error(e.to_string())),
                    };
                }
                KeyCode::Backspace => self.message.handle_backspace(),
                KeyCode::Left => self.message.move_cursor_left(),
                KeyCode::Right => self.message.move_cursor_right(),
                KeyCode::Char(c) => self.message.handle_char(c),
                _ => {}
            }
            return None;
        }

        let ids = self.visible_ids(session);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(i.saturating_sub(1)));
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(i + 1));
                self.clamp(ids.len());
                None
            }
            KeyCode::Char('/') => {
                self.filter.active = true;
                None
            }
            KeyCode::Enter => {
                let id = *ids.get(self.list_state.selected()?)?;
                match session.select_contact(id) {
                    Ok(_) => {
                        self.message.clear();
                        self.message.active = true;
                        None
                    }
                    Err(e) => Some(Notice::Error(e.to_string())),
                }
            }
            KeyCode::Char('i') if session.chat.selected_contact().is_some() => {
                self.message.active = true;
                None
            }
            _ => None,
        }
    }

    pub fn hint(&self, session: &Session) -> String {
        if self.filter.active {
            format!("Buscar contato: {} | Enter to apply, Esc to clear", self.filter.value)
        } else if self.message.active {
            "Enter: Send  Esc: Leave message box".to_string()
        } else if session.chat.has_pending_reply() {
            "Digitando...".to_string()
        } else {
            "↑↓: Contacts  Enter: Open conversation  i: Write  /: Search contacts".to_string()
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, session: &Session) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);
        self.render_contacts(f, chunks[0], session);
        self.render_conversation(f, chunks[1], session);
    }

    fn render_contacts(&mut self, f: &mut Frame, area: Rect, session: &Session) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let filter_style = if self.filter.active { Style::default().fg(GOLD) } else { Style::default() };
        let filter = Paragraph::new(self.filter.value.as_str())
            .block(Block::default().borders(Borders::ALL).title("Buscar (/)").border_style(filter_style));
        f.render_widget(filter, chunks[0]);

        let open = session.chat.selected_contact().map(|c| c.id);
        let contacts = session.chat.filter_contacts(&self.filter.value);
        self.clamp(contacts.len());
        let items: Vec<ListItem> = contacts
            .iter()
            .map(|c| {
                let mut status = format_presence(c.presence).to_string();
                if let Some(seen) = &c.last_seen {
                    status = format!("{status} · {seen}");
                }
                let name_style = if open == Some(c.id) {
                    Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled("● ", Style::default().fg(presence_color(c.presence))),
                        Span::styled(format!("[{}] {}", initials(&c.name), c.name), name_style),
                    ]),
                    Line::from(Span::styled(
                        format!("  {} · {}", format_role(c.role), status),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Contatos"))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black));
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    fn render_conversation(&self, f: &mut Frame, area: Rect, session: &Session) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let Some(contact) = session.chat.selected_contact() else {
            let empty = Paragraph::new("Selecione um contato para conversar")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Conversa"));
            f.render_widget(empty, area);
            return;
        };

        let mut lines = Vec::new();
        for m in &session.chat.messages {
            let (align, color) = if m.is_current_user {
                (Alignment::Right, STEEL_BLUE)
            } else {
                (Alignment::Left, Color::DarkGray)
            };
            lines.push(
                Line::from(Span::styled(
                    format!("{} · {}", m.sender.name, m.timestamp),
                    Style::default().fg(Color::Gray),
                ))
                .alignment(align),
            );
            lines.push(Line::from(Span::styled(format!(" {} ", m.text), Style::default().bg(color))).alignment(align));
            lines.push(Line::from(""));
        }
        if session.chat.has_pending_reply() {
            lines.push(Line::from(Span::styled(
                format!("{} está digitando...", contact.name),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        // Keep the latest messages in view
        let inner_height = chunks[0].height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(inner_height) as u16;
        let title = format!("{} - {}", contact.name, format_presence(contact.presence));
        let conversation = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        f.render_widget(conversation, chunks[0]);

        let input_style = if self.message.active { Style::default().fg(GOLD) } else { Style::default() };
        let input = Paragraph::new(self.message.value.as_str()).block(
            Block::default().borders(Borders::ALL).title("Mensagem").border_style(input_style),
        );
        f.render_widget(input, chunks[1]);
        if self.message.active {
            f.set_cursor_position((chunks[1].x + self.message.cursor as u16 + 1, chunks[1].y + 1));
        }
    }
}
