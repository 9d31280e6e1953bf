//! Kanban board view.
//!
//! Four columns, one per task status. Cards are carried between columns with
//! Ctrl+Left/Right, which is the keyboard stand-in for dragging a card.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::fields::*;
use crate::policy::Action;
use crate::session::{Notice, Session};
use crate::task::Task;
use crate::tui::{
    colors::{column_color, priority_color, DARK_RED, GOLD, STEEL_BLUE},
    task_form::{
        TaskForm, ASSIGNEE_GLOBAL_ORDER, DESCRIPTION_GLOBAL_ORDER, PRIORITY_GLOBAL_ORDER,
        STATUS_GLOBAL_ORDER, TITLE_GLOBAL_ORDER,
    },
    utils::{centered_rect, wrap_words},
};

const CARD_HEIGHT: usize = 5;

/// Kanban view state. Card ids per column are rebuilt from the session
/// after every change.
#[derive(Default)]
pub struct BoardView {
    columns: [Vec<u64>; 4],
    pub selected_column: usize,
    pub selected_card: usize,
    column_scroll_offsets: [usize; 4],
    show_task_detail: bool,
    filter_active: bool,
    filter_text: String,
    pub form: Option<TaskForm>,
    pub confirm_delete: Option<u64>,
}

impl BoardView {
    pub fn new(session: &Session) -> Self {
        let mut view = BoardView::default();
        view.update_columns(session);
        view
    }

    /// Whether keys should go to a text field or dialog instead of global bindings.
    pub fn captures_input(&self) -> bool {
        self.form.is_some() || self.confirm_delete.is_some() || self.filter_active
    }

    /// Rebuild the columns from the board, applying the text filter.
    pub fn update_columns(&mut self, session: &Session) {
        let needle = self.filter_text.to_lowercase();
        for (i, status) in TaskStatus::ALL.iter().enumerate() {
            self.columns[i] = session
                .board
                .tasks_by_status(*status)
                .into_iter()
                .filter(|t| needle.is_empty() || matches_filter(t, &needle))
                .map(|t| t.id)
                .collect();
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.selected_column >= self.columns.len() {
            self.selected_column = 0;
        }
        let len = self.columns[self.selected_column].len();
        if len == 0 {
            self.selected_card = 0;
            self.column_scroll_offsets[self.selected_column] = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
    }

    pub fn column(&self, status: TaskStatus) -> &[u64] {
        &self.columns[status.column()]
    }

    pub fn selected_task_id(&self) -> Option<u64> {
        self.columns[self.selected_column].get(self.selected_card).copied()
    }

    /// Carry the selected card one column left or right.
    fn carry_card(&mut self, session: &mut Session, right: bool) -> Option<Notice> {
        let id = self.selected_task_id()?;
        let target = if right {
            (self.selected_column + 1).min(TaskStatus::ALL.len() - 1)
        } else {
            self.selected_column.checked_sub(1)?
        };
        if target == self.selected_column {
            return None;
        }
        let status = TaskStatus::ALL[target];
        match session.move_task(id, status) {
            Ok(_) => {
                self.update_columns(session);
                self.selected_column = target;
                match self.columns[target].iter().position(|&t| t == id) {
                    Some(pos) => self.selected_card = pos,
                    None => self.clamp_selection(),
                }
                Some(Notice::Success(format!("Moved task to {}", format_task_status(status))))
            }
            Err(e) => Some(Notice::Error(e.to_string())),
        }
    }

    fn save_form(&mut self, session: &mut Session) -> Option<Notice> {
        let form = self.form.as_ref()?;
        let result = match form.editing {
            Some(id) => session.update_task(id, form.to_patch()).map(|_| id),
            None => session.create_task(form.to_input()),
        };
        let editing = form.editing.is_some();
        match result {
            Ok(id) => {
                self.form = None;
                self.update_columns(session);
                if let Some(col) = self.columns.iter().position(|c| c.contains(&id)) {
                    self.selected_column = col;
                    self.selected_card = self.columns[col].iter().position(|&t| t == id).unwrap_or(0);
                }
                let msg = if editing { format!("Task #{id} updated") } else { format!("Task #{id} created") };
                Some(Notice::Success(msg))
            }
            Err(e) => Some(Notice::Error(e.to_string())),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, session: &mut Session) -> Option<Notice> {
        let form = self.form.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                None
            }
            KeyCode::Enter => self.save_form(session),
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.prev_field();
                None
            }
            KeyCode::Left => {
                form.handle_left_right(false);
                None
            }
            KeyCode::Right => {
                form.handle_left_right(true);
                None
            }
            KeyCode::Backspace => {
                form.handle_backspace();
                None
            }
            KeyCode::Char(c) => {
                form.handle_char(c);
                None
            }
            _ => None,
        }
    }

    /// Handle a key press; returns a notice for the status bar, if any.
    pub fn handle_key(&mut self, key: KeyEvent, session: &mut Session) -> Option<Notice> {
        if self.form.is_some() {
            return self.handle_form_key(key, session);
        }

        if let Some(id) = self.confirm_delete {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_delete = None;
                    match session.delete_task(id) {
                        Ok(_) => {
                            self.update_columns(session);
                            Some(Notice::Success(format!("Task #{id} deleted")))
                        }
                        Err(e) => Some(Notice::Error(e.to_string())),
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_delete = None;
                    None
                }
                _ => None,
            };
        }

        if self.filter_active {
            match key.code {
                KeyCode::Esc => {
                    self.filter_active = false;
                    self.filter_text.clear();
                    self.update_columns(session);
                }
                KeyCode::Enter => self.filter_active = false,
                KeyCode::Backspace => {
                    self.filter_text.pop();
                    self.update_columns(session);
                }
                KeyCode::Char(c) => {
                    self.filter_text.push(c);
                    self.update_columns(session);
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => self.carry_card(session, false),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => self.carry_card(session, true),
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_selection();
                }
                None
            }
            KeyCode::Right => {
                if self.selected_column < self.columns.len() - 1 {
                    self.selected_column += 1;
                    self.clamp_selection();
                }
                None
            }
            KeyCode::Up => {
                self.selected_card = self.selected_card.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                let len = self.columns[self.selected_column].len();
                if len > 0 && self.selected_card < len - 1 {
                    self.selected_card += 1;
                }
                None
            }
            KeyCode::Enter => {
                self.show_task_detail = !self.show_task_detail && self.selected_task_id().is_some();
                None
            }
            KeyCode::Char('n') => {
                if session.can(Action::CreateTask) {
                    self.form = Some(TaskForm::new(TaskStatus::ALL[self.selected_column]));
                    None
                } else {
                    Some(Notice::Error("Your role may not create tasks".to_string()))
                }
            }
            KeyCode::Char('e') => {
                let task = self.selected_task_id().and_then(|id| session.board.get(id))?;
                self.form = Some(TaskForm::from_task(task));
                None
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.confirm_delete = self.selected_task_id();
                None
            }
            KeyCode::Char('/') => {
                self.filter_active = true;
                None
            }
            KeyCode::Esc if self.show_task_detail => {
                self.show_task_detail = false;
                None
            }
            _ => None,
        }
    }

    pub fn hint(&self) -> String {
        if self.filter_active {
            format!("Filter: {} | Enter to apply, Esc to clear", self.filter_text)
        } else if self.form.is_some() {
            "Tab: Next field  ←→: Change selectors  Enter: Save  Esc: Cancel".to_string()
        } else {
            let total: usize = self.columns.iter().map(Vec::len).sum();
            let filter = if self.filter_text.is_empty() {
                String::new()
            } else {
                format!(" [Filter: {}]", self.filter_text)
            };
            format!("Tasks: {total}{filter} | Ctrl+←→: Move | n: New | e: Edit | d: Delete | /: Filter | Enter: Details")
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, session: &Session) {
        let constraints = [Constraint::Percentage(25); 4];
        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i, session);
        }

        if self.show_task_detail {
            if let Some(task) = self.selected_task_id().and_then(|id| session.board.get(id)) {
                render_task_detail_popup(f, task);
            }
        }
        if let Some(form) = &self.form {
            render_task_form(f, area, form);
        }
        if let Some(id) = self.confirm_delete {
            render_confirm(f, area, id, session);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize, session: &Session) {
        let status = TaskStatus::ALL[column_index];
        let is_selected = column_index == self.selected_column;
        let border_style = if is_selected {
            Style::default().fg(column_color(status)).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let title = format!("{} ({})", format_task_status(status), self.columns[column_index].len());
        let block = Block::default().borders(Borders::ALL).title(title).border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let cards = &self.columns[column_index];
        if cards.is_empty() {
            return;
        }

        let available_height = inner.height as usize;
        let visible_cards = (available_height / CARD_HEIGHT).max(1);
        let scroll_offset = if is_selected {
            let start = self.column_scroll_offsets[column_index];
            let offset = if self.selected_card < start {
                self.selected_card
            } else if self.selected_card >= start + visible_cards {
                self.selected_card + 1 - visible_cards
            } else {
                start
            };
            self.column_scroll_offsets[column_index] = offset;
            offset
        } else {
            self.column_scroll_offsets[column_index]
        };

        let mut current_y = 0;
        let mut rendered = 0;
        for (card_index, &task_id) in cards.iter().enumerate().skip(scroll_offset) {
            if current_y + CARD_HEIGHT > available_height {
                break;
            }
            let Some(task) = session.board.get(task_id) else {
                continue;
            };
            let card_area = Rect {
                x: inner.x,
                y: inner.y + current_y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            render_card(f, card_area, task, is_selected && card_index == self.selected_card);
            current_y += CARD_HEIGHT;
            rendered += 1;
        }

        let remaining = cards.len().saturating_sub(scroll_offset + rendered);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{remaining} below")).style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect { x: inner.x, y: inner.y + inner.height - 1, width: inner.width, height: 1 },
            );
        }
    }
}

fn matches_filter(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task.assignee.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
}

fn render_card(f: &mut Frame, area: Rect, task: &Task, is_selected: bool) {
    let style = if is_selected {
        Style::default().bg(STEEL_BLUE).fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let mut card_text = vec![Line::from(vec![
        Span::raw(format!("#{} ", task.id)),
        Span::styled(format_priority(task.priority), Style::default().fg(priority_color(task.priority))),
    ])];
    let width = area.width.saturating_sub(2) as usize;
    for line in wrap_words(&task.title, width, 2) {
        card_text.push(Line::from(line));
    }
    card_text.push(Line::from(task.assignee.clone()));

    let card = Paragraph::new(card_text)
        .block(Block::default().borders(Borders::ALL))
        .style(style)
        .wrap(Wrap { trim: true });
    f.render_widget(card, area);
}

fn render_task_detail_popup(f: &mut Frame, task: &Task) {
    let popup_area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            format!("Task #{}: {}", task.id, task.title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Status:      {}", format_task_status(task.status))),
        Line::from(format!("Priority:    {}", format_priority(task.priority))),
        Line::from(format!("Assignee:    {}", task.assignee)),
        Line::from(format!("Created by:  {}", task.created_by)),
        Line::from(""),
        Line::from("Description:"),
        Line::from(task.description.clone()),
    ];
    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Task Details (Press Enter to close)")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(column_color(task.status)).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));
    f.render_widget(popup, popup_area);
}

fn render_task_form(f: &mut Frame, area: Rect, form: &TaskForm) {
    let area = centered_rect(60, 80, area);
    f.render_widget(Clear, area);
    let title = match form.editing {
        Some(id) => format!("Edit Task #{id}"),
        None => "New Task".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title).style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let style_for = |field: usize| {
        if form.current_field == field {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        }
    };
    let text_boxes = [
        (TITLE_GLOBAL_ORDER, "Título", &form.title),
        (DESCRIPTION_GLOBAL_ORDER, "Descrição", &form.description),
        (ASSIGNEE_GLOBAL_ORDER, "Responsável", &form.assignee),
    ];
    for (field, label, input) in text_boxes {
        let widget = Paragraph::new(input.value.as_str())
            .block(Block::default().borders(Borders::ALL).title(label).border_style(style_for(field)))
            .wrap(Wrap { trim: false });
        f.render_widget(widget, chunks[field]);
    }
    let selectors = [
        (PRIORITY_GLOBAL_ORDER, "Prioridade (←→)", format_priority(form.priority())),
        (STATUS_GLOBAL_ORDER, "Status (←→)", format_task_status(form.status())),
    ];
    for (field, label, value) in selectors {
        let widget = Paragraph::new(format!("< {value} >"))
            .block(Block::default().borders(Borders::ALL).title(label).border_style(style_for(field)))
            .alignment(Alignment::Center);
        f.render_widget(widget, chunks[field]);
    }

    let cursor = match form.current_field {
        TITLE_GLOBAL_ORDER => Some((chunks[0], &form.title)),
        ASSIGNEE_GLOBAL_ORDER => Some((chunks[2], &form.assignee)),
        DESCRIPTION_GLOBAL_ORDER if form.description.cursor + 2 < chunks[1].width as usize => {
            Some((chunks[1], &form.description))
        }
        _ => None,
    };
    if let Some((chunk, field)) = cursor {
        f.set_cursor_position((chunk.x + field.cursor as u16 + 1, chunk.y + 1));
    }
}

fn render_confirm(f: &mut Frame, area: Rect, id: u64, session: &Session) {
    let area = centered_rect(50, 30, area);
    f.render_widget(Clear, area);
    let title = session.board.get(id).map(|t| t.title.clone()).unwrap_or_default();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Are you sure you want to delete:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(format!("#{id} {title}")),
        Line::from(""),
        Line::from("Press 'y' to confirm, 'n' to cancel"),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().title("Confirm Action").borders(Borders::ALL).style(Style::default().bg(DARK_RED)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::seed::SeedData;
    use crate::session::User;

    fn session(role: Role) -> Session {
        let user = User { name: "Teste".into(), email: String::new(), role };
        Session::with_user(SeedData::builtin().unwrap(), user)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn test_carry_card_to_next_column() {
        let mut s = session(Role::Operator);
        let mut view = BoardView::new(&s);
        view.handle_key(key(KeyCode::Right), &mut s);
        assert_eq!(view.selected_task_id(), Some(2));

        view.handle_key(ctrl(KeyCode::Right), &mut s);
        view.handle_key(ctrl(KeyCode::Right), &mut s);
        assert_eq!(s.board.get(2).map(|t| t.status), Some(TaskStatus::Done));
        assert_eq!(view.column(TaskStatus::Done), &[4, 2]);
        assert_eq!(view.selected_column, 3);
        assert_eq!(view.selected_task_id(), Some(2));

        // Already in the last column
        assert!(view.handle_key(ctrl(KeyCode::Right), &mut s).is_none());
    }

    #[test]
    fn test_operator_cannot_open_new_task_form() {
        let mut s = session(Role::Operator);
        let mut view = BoardView::new(&s);
        let notice = view.handle_key(key(KeyCode::Char('n')), &mut s);
        assert!(matches!(notice, Some(Notice::Error(_))));
        assert!(view.form.is_none());
    }

    #[test]
    fn test_create_task_through_form() {
        let mut s = session(Role::Supervisor);
        let mut view = BoardView::new(&s);
        view.handle_key(key(KeyCode::Char('n')), &mut s);
        assert!(view.captures_input());

        // Empty form is rejected and stays open
        let notice = view.handle_key(key(KeyCode::Enter), &mut s);
        assert!(matches!(notice, Some(Notice::Error(_))));
        assert!(view.form.is_some());

        for (text, last) in [("Trocar escova 3", false), ("Escova gasta", false), ("Carlos Silva", true)] {
            for c in text.chars() {
                view.handle_key(key(KeyCode::Char(c)), &mut s);
            }
            if !last {
                view.handle_key(key(KeyCode::Tab), &mut s);
            }
        }
        let notice = view.handle_key(key(KeyCode::Enter), &mut s);
        assert_eq!(notice, Some(Notice::Success("Task #5 created".into())));
        let task = s.board.get(5).unwrap();
        assert_eq!(task.created_by, "Pedro Costa");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(view.selected_task_id(), Some(5));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut s = session(Role::Engineer);
        let mut view = BoardView::new(&s);
        view.handle_key(key(KeyCode::Char('d')), &mut s);
        assert_eq!(view.confirm_delete, Some(1));
        view.handle_key(key(KeyCode::Char('n')), &mut s);
        assert!(s.board.get(1).is_some());

        view.handle_key(key(KeyCode::Char('d')), &mut s);
        view.handle_key(key(KeyCode::Char('y')), &mut s);
        assert!(s.board.get(1).is_none());
        assert!(view.column(TaskStatus::Todo).is_empty());
    }

    #[test]
    fn test_filter_narrows_columns() {
        let mut s = session(Role::Engineer);
        let mut view = BoardView::new(&s);
        view.handle_key(key(KeyCode::Char('/')), &mut s);
        for c in "escova".chars() {
            view.handle_key(key(KeyCode::Char(c)), &mut s);
        }
        view.handle_key(key(KeyCode::Enter), &mut s);
        let total: usize = TaskStatus::ALL.iter().map(|st| view.column(*st).len()).sum();
        assert_eq!(total, 1);
        assert_eq!(view.column(TaskStatus::InProgress), &[2]);
    }

    #[test]
    fn test_render_shows_column_titles() {
        let s = session(Role::Engineer);
        let mut view = BoardView::new(&s);
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                view.render(f, area, &s);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("A Fazer (1)"));
        assert!(text.contains("Concluído (1)"));
        assert!(text.contains("#4"));
    }
}
