//! Shift submission screen for operators.
//!
//! Every input of the form is one row; the selected row is edited in the
//! box below the table. Selectors (shift and the four brushes) cycle with
//! Left/Right.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::fields::*;
use crate::session::{Notice, Session};
use crate::shift_form::{FormField, ShiftForm};
use crate::tui::{colors::GOLD, input::InputField, task_form::cycle};

/// One row of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormItem {
    Text(FormField),
    Shift,
    Brush(usize),
}

pub const ITEMS: [FormItem; 26] = [
    FormItem::Text(FormField::Date),
    FormItem::Shift,
    FormItem::Text(FormField::SteelType),
    FormItem::Text(FormField::HfConcentration),
    FormItem::Text(FormField::Hno3Concentration),
    FormItem::Text(FormField::Tm1Consumption),
    FormItem::Text(FormField::Tm2Consumption),
    FormItem::Text(FormField::Tm1Volume),
    FormItem::Text(FormField::Tm2Volume),
    FormItem::Brush(0),
    FormItem::Brush(1),
    FormItem::Brush(2),
    FormItem::Brush(3),
    FormItem::Text(FormField::HfAddition),
    FormItem::Text(FormField::Hno3Addition),
    FormItem::Text(FormField::ChemSampleHno3),
    FormItem::Text(FormField::ChemSampleHf),
    FormItem::Text(FormField::ChemSampleIron),
    FormItem::Text(FormField::ChemObservations),
    FormItem::Text(FormField::ElectrolyteAddition),
    FormItem::Text(FormField::CarbonateAddition),
    FormItem::Text(FormField::SulfuricAcidAddition),
    FormItem::Text(FormField::ElectroSampleConductivity),
    FormItem::Text(FormField::ElectroSamplePh),
    FormItem::Text(FormField::ElectroSampleIron),
    FormItem::Text(FormField::ElectroObservations),
];

impl FormItem {
    fn label(self) -> String {
        match self {
            FormItem::Text(field) if field.is_required() => format!("{} *", field.label()),
            FormItem::Text(field) => field.label().to_string(),
            FormItem::Shift => "Turno *".to_string(),
            FormItem::Brush(i) => format!("Escova {}", i + 1),
        }
    }

    fn value(self, form: &ShiftForm) -> String {
        match self {
            FormItem::Text(field) => form.text(field).to_string(),
            FormItem::Shift => format!("< {} >", format_shift(form.shift)),
            FormItem::Brush(i) => format!("< {} >", format_brush(form.brushes[i])),
        }
    }
}

pub struct FormView {
    pub current: usize,
    editor: InputField,
    table_state: TableState,
}

impl FormView {
    pub fn new(session: &Session) -> Self {
        let mut view = FormView { current: 0, editor: InputField::new(), table_state: TableState::default() };
        view.table_state.select(Some(0));
        view.load_editor(&session.shift_form);
        view
    }

    pub fn item(&self) -> FormItem {
        ITEMS[self.current]
    }

    fn load_editor(&mut self, form: &ShiftForm) {
        self.editor = match self.item() {
            FormItem::Text(field) => InputField::with_value(form.text(field)),
            _ => InputField::new(),
        };
    }

    /// Pick up changes made behind the editor's back, e.g. the reset after
    /// a submission.
    fn sync_editor(&mut self, form: &ShiftForm) {
        if let FormItem::Text(field) = self.item() {
            if self.editor.value != form.text(field) {
                self.load_editor(form);
            }
        }
    }

    fn focus(&mut self, index: usize, form: &ShiftForm) {
        self.current = index;
        self.table_state.select(Some(index));
        self.load_editor(form);
    }

    fn edit_text(&mut self, form: &mut ShiftForm, edit: impl FnOnce(&mut InputField)) {
        if let FormItem::Text(field) = self.item() {
            edit(&mut self.editor);
            *form.text_mut(field) = self.editor.value.clone();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, session: &mut Session, now: Instant) -> Option<Notice> {
        self.sync_editor(&session.shift_form);

        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return match session.submit_shift(now) {
                Ok(()) => None,
                Err(e) => Some(Notice::Error(e.to_string())),
            };
        }
        if session.shift_form.submitting {
            return None;
        }

        let form = &mut session.shift_form;
        match key.code {
            KeyCode::Down | KeyCode::Tab | KeyCode::Enter => self.focus((self.current + 1) % ITEMS.len(), form),
            KeyCode::Up | KeyCode::BackTab => self.focus(cycle(self.current, ITEMS.len(), false), form),
            KeyCode::Left | KeyCode::Right => {
                let right = key.code == KeyCode::Right;
                match self.item() {
                    FormItem::Shift => {
                        let i = Shift::ALL.iter().position(|&s| s == form.shift).unwrap_or(0);
                        form.shift = Shift::ALL[cycle(i, Shift::ALL.len(), right)];
                    }
                    FormItem::Brush(b) => {
                        let i = BrushCondition::ALL.iter().position(|&c| c == form.brushes[b]).unwrap_or(0);
                        form.brushes[b] = BrushCondition::ALL[cycle(i, BrushCondition::ALL.len(), right)];
                    }
                    FormItem::Text(_) => {
                        if right {
                            self.editor.move_cursor_right();
                        } else {
                            self.editor.move_cursor_left();
                        }
                    }
                }
            }
            KeyCode::Backspace => self.edit_text(form, |e| e.handle_backspace()),
            KeyCode::Delete => self.edit_text(form, |e| e.handle_delete()),
            KeyCode::Home => self.editor.home(),
            KeyCode::End => self.editor.end(),
            KeyCode::Char(c) => self.edit_text(form, |e| e.handle_char(c)),
            _ => {}
        }
        None
    }

    pub fn hint(&self, session: &Session) -> String {
        if session.shift_form.submitting {
            "Enviando registro...".to_string()
        } else {
            "↑↓/Tab: Field  ←→: Change selectors  Ctrl+S: Submit  (* required)".to_string()
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, session: &Session) {
        let form = &session.shift_form;
        self.sync_editor(form);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let rows: Vec<Row> = ITEMS
            .iter()
            .map(|item| {
                let section = match item {
                    FormItem::Text(FormField::Date | FormField::SteelType) | FormItem::Shift => "Turno",
                    FormItem::Text(
                        FormField::ElectrolyteAddition
                        | FormField::CarbonateAddition
                        | FormField::SulfuricAcidAddition
                        | FormField::ElectroSampleConductivity
                        | FormField::ElectroSamplePh
                        | FormField::ElectroSampleIron
                        | FormField::ElectroObservations,
                    ) => "Eletrolítica",
                    _ => "Química",
                };
                Row::new(vec![
                    Cell::from(section).style(Style::default().fg(Color::DarkGray)),
                    Cell::from(item.label()),
                    Cell::from(item.value(form)),
                ])
            })
            .collect();
        let widths = [Constraint::Length(13), Constraint::Length(34), Constraint::Min(10)];
        let table = Table::new(rows, widths)
            .block(Block::default().borders(Borders::ALL).title("Novo Registro de Turno"))
            .row_highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        f.render_stateful_widget(table, chunks[0], &mut self.table_state);

        let (title, text) = match self.item() {
            FormItem::Text(field) => (field.label().to_string(), self.editor.value.clone()),
            other => (other.label(), other.value(form)),
        };
        let editor = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title).border_style(Style::default().fg(GOLD)));
        f.render_widget(editor, chunks[1]);
        if matches!(self.item(), FormItem::Text(_)) && !form.submitting {
            f.set_cursor_position((chunks[1].x + self.editor.cursor as u16 + 1, chunks[1].y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;
    use crate::session::User;
    use crate::timer::SUBMIT_DELAY;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn operator() -> Session {
        let user = User { name: "Abner".into(), email: "abner@example.com".into(), role: Role::Operator };
        Session::with_user(SeedData::builtin().unwrap(), user)
    }

    fn type_into(view: &mut FormView, s: &mut Session, now: Instant, text: &str) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)), s, now);
        }
    }

    #[test]
    fn test_items_cover_every_text_field() {
        for field in FormField::ALL {
            assert!(ITEMS.contains(&FormItem::Text(field)), "{field:?} has no row");
        }
    }

    #[test]
    fn test_fill_and_submit() {
        let mut s = operator();
        let mut view = FormView::new(&s);
        let now = Instant::now();

        view.handle_key(key(KeyCode::Down), &mut s, now);
        view.handle_key(key(KeyCode::Right), &mut s, now);
        assert_eq!(s.shift_form.shift, Shift::Afternoon);

        let readings = ["304", "4,1", "12", "100", "90", "3000", "2800"];
        for value in readings {
            view.handle_key(key(KeyCode::Down), &mut s, now);
            type_into(&mut view, &mut s, now, value);
        }
        assert_eq!(s.shift_form.hf_concentration, "4,1");

        view.handle_key(key(KeyCode::Down), &mut s, now);
        view.handle_key(key(KeyCode::Left), &mut s, now);
        assert_eq!(s.shift_form.brushes[0], BrushCondition::Bad);

        let submit = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(view.handle_key(submit, &mut s, now).is_none());
        assert!(s.shift_form.submitting);

        // Edits are locked while the submission is in flight
        view.handle_key(key(KeyCode::Up), &mut s, now);
        assert_eq!(view.current, 9);

        s.poll(now + SUBMIT_DELAY);
        assert_eq!(s.submitted.len(), 1);
        assert_eq!(s.submitted[0].steel_type, "304");
        assert!(s.shift_form.steel_type.is_empty());
        assert_eq!(s.shift_form.shift, Shift::Afternoon);
    }

    #[test]
    fn test_submit_with_missing_fields_reports_error() {
        let mut s = operator();
        let mut view = FormView::new(&s);
        let submit = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        let notice = view.handle_key(submit, &mut s, Instant::now());
        assert!(matches!(notice, Some(Notice::Error(msg)) if msg.starts_with("Fill in all required fields")));
        assert!(!s.shift_form.submitting);
    }

    #[test]
    fn test_editor_follows_reset() {
        let mut s = operator();
        let mut view = FormView::new(&s);
        let now = Instant::now();
        view.handle_key(key(KeyCode::Down), &mut s, now);
        view.handle_key(key(KeyCode::Down), &mut s, now);
        type_into(&mut view, &mut s, now, "430");
        s.shift_form.reset_after_submit();
        type_into(&mut view, &mut s, now, "9");
        assert_eq!(s.shift_form.steel_type, "9");
    }
}
