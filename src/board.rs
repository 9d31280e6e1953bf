//! Kanban board state.
//!
//! The board owns the task collection. Columns are not stored separately:
//! a task's column is its status, so moving a card is a status change on a
//! single list.

use tracing::{debug, info};

use crate::error::TaskError;
use crate::fields::*;
use crate::policy::role_signature;
use crate::task::{Task, TaskInput, TaskPatch};

/// In-memory task board.
#[derive(Debug, Default, Clone)]
pub struct TaskBoard {
    pub tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskBoard { tasks }
    }

    /// Generate the next available task ID.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Validate the form input and append a new task signed for `role`.
    /// Returns the new task's id.
    pub fn create_task(&mut self, input: TaskInput, role: Role) -> Result<u64, TaskError> {
        input.validate()?;
        let id = self.next_id();
        let task = Task {
            id,
            title: input.title,
            description: input.description,
            assignee: input.assignee,
            priority: input.priority,
            status: input.status,
            created_by: role_signature(role).to_string(),
        };
        info!(id, title = %task.title, status = ?task.status, "task created");
        self.tasks.push(task);
        Ok(id)
    }

    /// Merge `patch` into task `id`. `Ok(false)` when no such task exists.
    ///
    /// A status change goes through `move_task`, so the card lands at the
    /// bottom of its new column.
    pub fn update_task(&mut self, id: u64, mut patch: TaskPatch) -> Result<bool, TaskError> {
        patch.validate()?;
        let status = patch.status.take();
        match self.get_mut(id) {
            Some(task) => {
                patch.apply(task);
                debug!(id, "task updated");
            }
            None => return Ok(false),
        }
        if let Some(status) = status {
            self.move_task(id, status);
        }
        Ok(true)
    }

    /// Remove task `id`. Returns whether anything was removed.
    pub fn delete_task(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            info!(id, "task deleted");
        }
        removed
    }

    /// Set the status of task `id`, from any status to any status.
    ///
    /// A task whose status changes goes to the end of the collection so it
    /// lands at the bottom of its new column. Returns whether `id` exists.
    pub fn move_task(&mut self, id: u64, status: TaskStatus) -> bool {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        if self.tasks[idx].status != status {
            let mut task = self.tasks.remove(idx);
            debug!(id, from = ?task.status, to = ?status, "task moved");
            task.status = status;
            self.tasks.push(task);
        }
        true
    }

    /// Tasks in one column, in collection order.
    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Ids of every column, in board order.
    pub fn columns(&self) -> [Vec<u64>; 4] {
        TaskStatus::ALL.map(|s| self.tasks_by_status(s).iter().map(|t| t.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: "desc".into(),
            assignee: "Carlos Silva".into(),
            priority: Priority::Medium,
            status,
            created_by: "Ana Márcia".into(),
        }
    }

    fn seeded() -> TaskBoard {
        TaskBoard::new(vec![
            task(1, TaskStatus::Todo),
            task(2, TaskStatus::InProgress),
            task(3, TaskStatus::Review),
            task(4, TaskStatus::Done),
        ])
    }

    fn valid_input() -> TaskInput {
        TaskInput {
            title: "Trocar escova 3".into(),
            description: "Escova 3 com desgaste".into(),
            assignee: "João Mendes".into(),
            ..Default::default()
        }
    }

    fn ids(tasks: Vec<&Task>) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_first_id_on_empty_board_is_one() {
        let mut board = TaskBoard::default();
        assert_eq!(board.create_task(valid_input(), Role::Engineer), Ok(1));
    }

    #[test]
    fn test_id_follows_max_not_len() {
        let mut board = TaskBoard::new(vec![task(3, TaskStatus::Todo), task(9, TaskStatus::Done)]);
        assert_eq!(board.create_task(valid_input(), Role::Manager), Ok(10));
    }

    #[test]
    fn test_create_rejects_missing_fields_and_leaves_board_alone() {
        let mut board = seeded();
        let input = TaskInput { assignee: String::new(), ..valid_input() };
        assert!(board.create_task(input, Role::Engineer).is_err());
        assert_eq!(board.tasks.len(), 4);
    }

    #[test]
    fn test_created_by_comes_from_role() {
        let mut board = TaskBoard::default();
        let id = board.create_task(valid_input(), Role::Supervisor).unwrap();
        assert_eq!(board.get(id).unwrap().created_by, "Pedro Costa");
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut board = seeded();
        let before = board.tasks.clone();
        assert!(!board.delete_task(42));
        assert_eq!(board.tasks, before);
    }

    #[test]
    fn test_move_accepts_any_transition() {
        let mut board = seeded();
        for status in [TaskStatus::Todo, TaskStatus::Done, TaskStatus::Review, TaskStatus::Todo] {
            assert!(board.move_task(4, status));
            assert_eq!(board.get(4).unwrap().status, status);
        }
        assert!(!board.move_task(99, TaskStatus::Done));
    }

    #[test]
    fn test_moved_card_lands_at_bottom_of_column() {
        let mut board = seeded();
        assert!(board.move_task(2, TaskStatus::Done));
        assert_eq!(ids(board.tasks_by_status(TaskStatus::Done)), vec![4, 2]);
        assert!(board.tasks_by_status(TaskStatus::InProgress).is_empty());
    }

    #[test]
    fn test_move_to_same_status_keeps_position() {
        let mut board = seeded();
        board.move_task(1, TaskStatus::Done);
        board.move_task(4, TaskStatus::Done);
        assert_eq!(ids(board.tasks_by_status(TaskStatus::Done)), vec![4, 1]);
    }

    #[test]
    fn test_board_scenario() {
        let mut board = seeded();
        assert_eq!(board.create_task(valid_input(), Role::Engineer), Ok(5));
        board.move_task(2, TaskStatus::Done);
        assert_eq!(ids(board.tasks_by_status(TaskStatus::Done)), vec![4, 2]);
        assert!(board.delete_task(1));
        assert_eq!(ids(board.tasks_by_status(TaskStatus::Todo)), vec![5]);
    }

    #[test]
    fn test_update_missing_id_reports_false() {
        let mut board = seeded();
        let patch = TaskPatch { title: Some("x".into()), ..Default::default() };
        assert_eq!(board.update_task(77, patch), Ok(false));
    }

    #[test]
    fn test_update_merges_patch() {
        let mut board = seeded();
        let patch = TaskPatch { assignee: Some("Felipe".into()), ..Default::default() };
        assert_eq!(board.update_task(3, patch), Ok(true));
        let t = board.get(3).unwrap();
        assert_eq!(t.assignee, "Felipe");
        assert_eq!(t.title, "Task 3");
    }

    #[test]
    fn test_status_change_through_update_lands_at_bottom() {
        let mut board = seeded();
        let patch = TaskPatch { title: Some("Trocar escova".into()), status: Some(TaskStatus::Done), ..Default::default() };
        assert_eq!(board.update_task(2, patch), Ok(true));
        assert_eq!(ids(board.tasks_by_status(TaskStatus::Done)), vec![4, 2]);
        assert_eq!(board.get(2).unwrap().title, "Trocar escova");

        let same = TaskPatch { status: Some(TaskStatus::Done), ..Default::default() };
        assert_eq!(board.update_task(4, same), Ok(true));
        assert_eq!(ids(board.tasks_by_status(TaskStatus::Done)), vec![4, 2]);
    }

    #[test]
    fn test_columns_partition_every_task_once() {
        let board = seeded();
        let columns = board.columns();
        let total: usize = columns.iter().map(Vec::len).sum();
        assert_eq!(total, board.tasks.len());
        assert_eq!(columns[1], vec![2]);
    }
}
