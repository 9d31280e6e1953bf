//! Role capabilities.
//!
//! `can_perform` is the only place that decides what a role may do. Views use
//! it to hide controls and the session uses it before mutating state.

use std::fmt;

use crate::fields::Role;

/// Something a user can attempt from one of the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateTask,
    EditTask,
    DeleteTask,
    MoveTask,
    CommentOnRecord,
    ChangeRecordStatus,
    SubmitShiftRecord,
    UseChat,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::CreateTask,
        Action::EditTask,
        Action::DeleteTask,
        Action::MoveTask,
        Action::CommentOnRecord,
        Action::ChangeRecordStatus,
        Action::SubmitShiftRecord,
        Action::UseChat,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::CreateTask => "create tasks",
            Action::EditTask => "edit tasks",
            Action::DeleteTask => "delete tasks",
            Action::MoveTask => "move tasks",
            Action::CommentOnRecord => "comment on records",
            Action::ChangeRecordStatus => "change record status",
            Action::SubmitShiftRecord => "submit shift records",
            Action::UseChat => "use the team chat",
        };
        f.write_str(s)
    }
}

/// Whether `role` may perform `action`.
pub fn can_perform(role: Role, action: Action) -> bool {
    match action {
        Action::CreateTask => matches!(role, Role::Engineer | Role::Supervisor | Role::Manager),
        Action::ChangeRecordStatus => matches!(role, Role::Engineer | Role::Manager),
        Action::SubmitShiftRecord => role == Role::Operator,
        Action::EditTask
        | Action::DeleteTask
        | Action::MoveTask
        | Action::CommentOnRecord
        | Action::UseChat => true,
    }
}

/// Person who signs tasks and comments made under `role`.
pub fn role_signature(role: Role) -> &'static str {
    match role {
        Role::Engineer => "Ana Márcia",
        Role::Supervisor => "Pedro Costa",
        Role::Operator | Role::Manager => "Roberto Santos",
    }
}
