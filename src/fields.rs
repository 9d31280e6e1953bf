//! Enumerations and field types for the shift desk.
//!
//! This module defines the structured values shared by the board, the shift
//! records and the chat: roles, task priorities and statuses, record
//! statuses, shifts, brush conditions and contact presence, together with
//! their display names as shown on the line.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Role of the person using the desk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Operator,
    Engineer,
    Supervisor,
    Manager,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Operator, Role::Engineer, Role::Supervisor, Role::Manager];
}

/// Task priority on the kanban board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}

/// Kanban column a task sits in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Columns in board order, left to right.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Position of this status among the board columns.
    pub fn column(self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Review => 2,
            TaskStatus::Done => 3,
        }
    }
}

/// Review state of a submitted shift record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    Pending,
    Approved,
    NeedsReview,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 3] = [
        RecordStatus::Pending,
        RecordStatus::NeedsReview,
        RecordStatus::Approved,
    ];
}

/// Work shift.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Shift {
    #[default]
    Morning,
    Afternoon,
    Night,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Night];
}

/// Wear condition of a pickling brush.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BrushCondition {
    #[default]
    Good,
    Regular,
    Bad,
}

impl BrushCondition {
    pub const ALL: [BrushCondition; 3] =
        [BrushCondition::Good, BrushCondition::Regular, BrushCondition::Bad];
}

/// Chat presence of a contact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Presence {
    Online,
    Offline,
    Away,
}

/// Display name of a role.
pub fn format_role(r: Role) -> &'static str {
    match r {
        Role::Operator => "Operador",
        Role::Engineer => "Engenheiro",
        Role::Supervisor => "Supervisor",
        Role::Manager => "Gerente",
    }
}

/// Display name of a task priority.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Baixa",
        Priority::Medium => "Média",
        Priority::High => "Alta",
    }
}

/// Column title of a task status.
pub fn format_task_status(s: TaskStatus) -> &'static str {
    match s {
        TaskStatus::Todo => "A Fazer",
        TaskStatus::InProgress => "Em Progresso",
        TaskStatus::Review => "Em Revisão",
        TaskStatus::Done => "Concluído",
    }
}

/// Display name of a record status.
pub fn format_record_status(s: RecordStatus) -> &'static str {
    match s {
        RecordStatus::Pending => "Pendente",
        RecordStatus::Approved => "Aprovado",
        RecordStatus::NeedsReview => "Requer Revisão",
    }
}

/// Display name of a shift.
pub fn format_shift(s: Shift) -> &'static str {
    match s {
        Shift::Morning => "Manhã",
        Shift::Afternoon => "Tarde",
        Shift::Night => "Noite",
    }
}

/// Display name of a brush condition.
pub fn format_brush(b: BrushCondition) -> &'static str {
    match b {
        BrushCondition::Good => "Bom",
        BrushCondition::Regular => "Regular",
        BrushCondition::Bad => "Ruim",
    }
}

/// Display name of a contact presence.
pub fn format_presence(p: Presence) -> &'static str {
    match p {
        Presence::Online => "Online",
        Presence::Offline => "Offline",
        Presence::Away => "Ausente",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"in-progress\"");
        assert_eq!(serde_json::to_string(&RecordStatus::NeedsReview).unwrap(), "\"needs-review\"");
        let s: TaskStatus = serde_json::from_str("\"todo\"").unwrap();
        assert_eq!(s, TaskStatus::Todo);
    }

    #[test]
    fn test_columns_follow_board_order() {
        for (i, s) in TaskStatus::ALL.iter().enumerate() {
            assert_eq!(s.column(), i);
        }
    }

    #[test]
    fn test_role_display_names() {
        assert_eq!(format_role(Role::Operator), "Operador");
        assert_eq!(format_role(Role::Engineer), "Engenheiro");
        assert_eq!(format_role(Role::Supervisor), "Supervisor");
        assert_eq!(format_role(Role::Manager), "Gerente");
    }
}
