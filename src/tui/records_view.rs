//! Shift record review view: searchable record table, the open record's
//! comment thread, and status keys for reviewers.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::fields::*;
use crate::policy::Action;
use crate::session::{Notice, Session};
use crate::tui::{
    colors::{record_status_color, GOLD, STEEL_BLUE},
    input::InputField,
};

#[derive(Default)]
pub struct RecordsView {
    pub search: InputField,
    pub comment: InputField,
    table_state: TableState,
    /// Ids matching the search, in collection order.
    visible: Vec<u64>,
}

impl RecordsView {
    pub fn new(session: &mut Session) -> Self {
        let mut view = RecordsView::default();
        view.refresh(session);
        view
    }

    pub fn captures_input(&self) -> bool {
        self.search.active || self.comment.active
    }

    pub fn visible(&self) -> &[u64] {
        &self.visible
    }

    /// Re-run the search and keep the selection on a visible record.
    pub fn refresh(&mut self, session: &mut Session) {
        self.visible = session.review.search(&self.search.value).iter().map(|r| r.id).collect();
        let current = session.review.selected_id().and_then(|id| self.visible.iter().position(|&v| v == id));
        match (current, self.visible.first()) {
            (Some(pos), _) => self.table_state.select(Some(pos)),
            (None, Some(&first)) => {
                session.review.select_record(first);
                self.table_state.select(Some(0));
            }
            (None, None) => {
                session.review.clear_selection();
                self.table_state.select(None);
            }
        }
    }

    fn select_row(&mut self, session: &mut Session, row: usize) {
        if let Some(&id) = self.visible.get(row) {
            session.review.select_record(id);
            self.table_state.select(Some(row));
        }
    }

    fn set_status(&mut self, session: &mut Session, status: RecordStatus) -> Option<Notice> {
        match session.update_record_status(status) {
            Ok(true) => Some(Notice::Success(format!("Record marked {}", format_record_status(status)))),
            Ok(false) => None,
            Err(e) => Some(Notice::Error(e.to_string())),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, session: &mut Session) -> Option<Notice> {
        if self.search.active {
            match key.code {
                KeyCode::Esc => {
                    self.search.clear();
                    self.search.active = false;
                }
                KeyCode::Enter => self.search.active = false,
                KeyCode::Backspace => self.search.handle_backspace(),
                KeyCode::Left => self.search.move_cursor_left(),
                KeyCode::Right => self.search.move_cursor_right(),
                KeyCode::Char(c) => self.search.handle_char(c),
                _ => return None,
            }
            self.refresh(session);
            return None;
        }

        if self.comment.active {
            match key.code {
                KeyCode::Esc => {
                    self.comment.clear();
                    self.comment.active = false;
                }
                KeyCode::Enter => {
                    let text = self.comment.value.clone();
                    return match session.add_comment(&text) {
                        Ok(Some(_)) => {
                            self.comment.clear();
                            self.comment.active = false;
                            Some(Notice::Success("Comment added".to_string()))
                        }
                        Ok(None) => None,
                        Err(e) => Some(Notice::Error(e.to_string())),
                    };
                }
                KeyCode::Backspace => self.comment.handle_backspace(),
                KeyCode::Left => self.comment.move_cursor_left(),
                KeyCode::Right => self.comment.move_cursor_right(),
                KeyCode::Char(c) => self.comment.handle_char(c),
                _ => {}
            }
            return None;
        }

        let row = self.table_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_row(session, row.saturating_sub(1));
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_row(session, row + 1);
                None
            }
            KeyCode::Char('/') => {
                self.search.active = true;
                None
            }
            KeyCode::Char('c') if session.review.selected_id().is_some() => {
                self.comment.active = true;
                None
            }
            KeyCode::Char('a') => self.set_status(session, RecordStatus::Approved),
            KeyCode::Char('r') => self.set_status(session, RecordStatus::NeedsReview),
            KeyCode::Char('p') => self.set_status(session, RecordStatus::Pending),
            _ => None,
        }
    }

    pub fn hint(&self, session: &Session) -> String {
        if self.search.active {
            format!("Search: {} | Enter to apply, Esc to clear", self.search.value)
        } else if self.comment.active {
            "Enter: Post comment  Esc: Cancel".to_string()
        } else if session.can(Action::ChangeRecordStatus) {
            format!(
                "Records: {} | /: Search | c: Comment | a: Approve | r: Needs review | p: Pending",
                self.visible.len()
            )
        } else {
            format!("Records: {} | /: Search | c: Comment", self.visible.len())
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, session: &Session) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(chunks[0]);

        let search_style = if self.search.active { Style::default().fg(GOLD) } else { Style::default() };
        let search = Paragraph::new(self.search.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Buscar operador, aço ou data (/)")
                .border_style(search_style),
        );
        f.render_widget(search, left[0]);
        if self.search.active {
            f.set_cursor_position((left[0].x + self.search.cursor as u16 + 1, left[0].y + 1));
        }

        let header = Row::new(["Data", "Turno", "Operador", "Aço", "Status"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(STEEL_BLUE).fg(Color::White));
        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|&id| session.review.get(id))
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.date.clone()),
                    Cell::from(format_shift(r.shift)),
                    Cell::from(r.operator.clone()),
                    Cell::from(r.steel_type.clone()),
                    Cell::from(format_record_status(r.status))
                        .style(Style::default().fg(record_status_color(r.status))),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(15),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Registros ({}/{})",
                self.visible.len(),
                session.review.records.len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, left[1], &mut self.table_state);

        self.render_detail(f, chunks[1], session);
    }

    fn render_detail(&self, f: &mut Frame, area: Rect, session: &Session) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let Some(record) = session.review.selected() else {
            let empty = Paragraph::new("Nenhum registro encontrado")
                .block(Block::default().borders(Borders::ALL).title("Detalhes"));
            f.render_widget(empty, area);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} - {} ({})", record.operator, record.date, format_shift(record.shift)),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Aço: {}", record.steel_type)),
            Line::from(vec![
                Span::raw("Status: "),
                Span::styled(
                    format_record_status(record.status),
                    Style::default().fg(record_status_color(record.status)),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled("Comentários", Style::default().add_modifier(Modifier::BOLD))),
        ];
        if record.comments.is_empty() {
            lines.push(Line::from(Span::styled("Nenhum comentário", Style::default().fg(Color::DarkGray))));
        }
        for c in &record.comments {
            lines.push(Line::from(vec![
                Span::styled(c.author.clone(), Style::default().fg(Color::Cyan)),
                Span::raw(format!(" ({}) {}", format_role(c.role), c.timestamp)),
            ]));
            lines.push(Line::from(format!("  {}", c.text)));
        }
        let detail = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(format!("Registro #{}", record.id)))
            .wrap(Wrap { trim: false });
        f.render_widget(detail, chunks[0]);

        let comment_style = if self.comment.active { Style::default().fg(GOLD) } else { Style::default() };
        let comment = Paragraph::new(self.comment.value.as_str()).block(
            Block::default().borders(Borders::ALL).title("Novo comentário (c)").border_style(comment_style),
        );
        f.render_widget(comment, chunks[1]);
        if self.comment.active {
            f.set_cursor_position((chunks[1].x + self.comment.cursor as u16 + 1, chunks[1].y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    use crate::seed::SeedData;
    use crate::session::User;

    fn session(role: Role) -> Session {
        let user = User { name: "Teste".into(), email: String::new(), role };
        Session::with_user(SeedData::builtin().unwrap(), user)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(view: &mut RecordsView, s: &mut Session, text: &str) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)), s);
        }
    }

    #[test]
    fn test_opening_view_selects_first_record() {
        let mut s = session(Role::Operator);
        let view = RecordsView::new(&mut s);
        assert_eq!(view.visible(), &[1, 2, 3]);
        assert_eq!(s.review.selected_id(), Some(1));
    }

    #[test]
    fn test_search_moves_selection_to_match() {
        let mut s = session(Role::Engineer);
        let mut view = RecordsView::new(&mut s);
        view.handle_key(key(KeyCode::Char('/')), &mut s);
        type_text(&mut view, &mut s, "316l");
        view.handle_key(key(KeyCode::Enter), &mut s);
        assert_eq!(view.visible(), &[2]);
        assert_eq!(s.review.selected_id(), Some(2));

        view.handle_key(key(KeyCode::Char('a')), &mut s);
        assert_eq!(s.review.get(2).map(|r| r.status), Some(RecordStatus::Approved));
        assert_eq!(s.review.get(3).map(|r| r.status), Some(RecordStatus::Pending));
    }

    #[test]
    fn test_supervisor_cannot_change_status() {
        let mut s = session(Role::Supervisor);
        let mut view = RecordsView::new(&mut s);
        let notice = view.handle_key(key(KeyCode::Char('r')), &mut s);
        assert!(matches!(notice, Some(Notice::Error(_))));
        assert_eq!(s.review.get(1).map(|r| r.status), Some(RecordStatus::Approved));
    }

    #[test]
    fn test_comment_on_selected_record() {
        let mut s = session(Role::Operator);
        let mut view = RecordsView::new(&mut s);
        view.handle_key(key(KeyCode::Down), &mut s);
        view.handle_key(key(KeyCode::Down), &mut s);
        assert_eq!(s.review.selected_id(), Some(3));

        view.handle_key(key(KeyCode::Char('c')), &mut s);
        assert!(view.captures_input());
        // Blank comment keeps the input open
        view.handle_key(key(KeyCode::Char(' ')), &mut s);
        assert!(view.handle_key(key(KeyCode::Enter), &mut s).is_none());
        assert!(view.comment.active);

        type_text(&mut view, &mut s, "Verificado");
        let notice = view.handle_key(key(KeyCode::Enter), &mut s);
        assert_eq!(notice, Some(Notice::Success("Comment added".into())));
        let record = s.review.get(3).unwrap();
        assert_eq!(record.comments.len(), 1);
        assert_eq!(record.comments[0].author, "Roberto Santos");
        assert_eq!(record.comments[0].text, " Verificado");
        assert!(!view.comment.active);
    }
}
