//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used by the kanban view for
//! creating and editing cards, including field ordering and selector cycling.

use crate::{
    fields::{Priority, TaskStatus},
    task::{Task, TaskInput, TaskPatch},
    tui::input::InputField,
};

/// Global order constants for task form fields.
pub const TITLE_GLOBAL_ORDER: usize = 0;
pub const DESCRIPTION_GLOBAL_ORDER: usize = 1;
pub const ASSIGNEE_GLOBAL_ORDER: usize = 2;
pub const PRIORITY_GLOBAL_ORDER: usize = 3;
pub const STATUS_GLOBAL_ORDER: usize = 4;

/// Task form for creating or editing a card.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub assignee: InputField,
    pub priority: usize,
    pub status: usize,
    pub current_field: usize,
    /// Card being edited; `None` for a new card.
    pub editing: Option<u64>,
}

impl TaskForm {
    /// Empty form for a new card in `column`.
    pub fn new(column: TaskStatus) -> Self {
        let mut form = Self {
            title: InputField::new(),
            description: InputField::new(),
            assignee: InputField::new(),
            priority: Priority::ALL.iter().position(|&p| p == Priority::Medium).unwrap_or(0),
            status: column.column(),
            current_field: TITLE_GLOBAL_ORDER,
            editing: None,
        };
        form.update_active_field();
        form
    }

    /// Create a task form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new(task.status);
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.assignee = InputField::with_value(&task.assignee);
        form.priority = Priority::ALL.iter().position(|&p| p == task.priority).unwrap_or(0);
        form.editing = Some(task.id);
        form.update_active_field();
        form
    }

    pub fn priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::ALL[self.status % TaskStatus::ALL.len()]
    }

    pub fn to_input(&self) -> TaskInput {
        TaskInput {
            title: self.title.value.trim().to_string(),
            description: self.description.value.trim().to_string(),
            assignee: self.assignee.value.trim().to_string(),
            priority: self.priority(),
            status: self.status(),
        }
    }

    /// Every field of the form, as an edit.
    pub fn to_patch(&self) -> TaskPatch {
        let input = self.to_input();
        TaskPatch {
            title: Some(input.title),
            description: Some(input.description),
            assignee: Some(input.assignee),
            priority: Some(input.priority),
            status: Some(input.status),
        }
    }

    /// Get the total number of fields (input fields + selectors).
    pub fn field_count(&self) -> usize {
        5
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.field_count();
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            self.field_count() - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_GLOBAL_ORDER;
        self.description.active = self.current_field == DESCRIPTION_GLOBAL_ORDER;
        self.assignee.active = self.current_field == ASSIGNEE_GLOBAL_ORDER;
    }

    /// The text field under the cursor, if the current field is one.
    pub fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_GLOBAL_ORDER => Some(&mut self.title),
            DESCRIPTION_GLOBAL_ORDER => Some(&mut self.description),
            ASSIGNEE_GLOBAL_ORDER => Some(&mut self.assignee),
            _ => None,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            PRIORITY_GLOBAL_ORDER => self.priority = cycle(self.priority, Priority::ALL.len(), right),
            STATUS_GLOBAL_ORDER => self.status = cycle(self.status, TaskStatus::ALL.len(), right),
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }
}

/// Step a selector index forward or back, wrapping around.
pub fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        (index + 1) % len
    } else if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_form_defaults() {
        let form = TaskForm::new(TaskStatus::Review);
        assert_eq!(form.priority(), Priority::Medium);
        assert_eq!(form.status(), TaskStatus::Review);
        assert!(form.title.active);
        assert!(form.editing.is_none());
    }

    #[test]
    fn test_typing_and_selectors() {
        let mut form = TaskForm::new(TaskStatus::Todo);
        for c in "Trocar escova".chars() {
            form.handle_char(c);
        }
        form.prev_field();
        assert_eq!(form.current_field, STATUS_GLOBAL_ORDER);
        form.handle_left_right(false);
        assert_eq!(form.status(), TaskStatus::Done);
        form.prev_field();
        form.handle_left_right(true);
        assert_eq!(form.priority(), Priority::High);
        form.handle_char('x');
        let input = form.to_input();
        assert_eq!(input.title, "Trocar escova");
        assert_eq!(input.status, TaskStatus::Done);
    }

    #[test]
    fn test_from_task_round_trips_into_patch() {
        let task = Task {
            id: 7,
            title: "Verificar HF".into(),
            description: "Consumo mensal".into(),
            assignee: "João Mendes".into(),
            priority: Priority::Low,
            status: TaskStatus::InProgress,
            created_by: "Ana Márcia".into(),
        };
        let form = TaskForm::from_task(&task);
        assert_eq!(form.editing, Some(7));
        let patch = form.to_patch();
        assert_eq!(patch.assignee.as_deref(), Some("João Mendes"));
        assert_eq!(patch.priority, Some(Priority::Low));
        assert_eq!(patch.status, Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle(0, 3, false), 2);
        assert_eq!(cycle(2, 3, true), 0);
    }
}
