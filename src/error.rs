//! Typed errors for the shift desk.
//!
//! Every failure a user can trigger is non-fatal: the `Display` text is what
//! ends up in the status bar or on stderr.

use std::path::PathBuf;

use thiserror::Error;

use crate::fields::{format_role, Role};
use crate::policy::Action;

/// Task form validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Login failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials. Try again.")]
    InvalidCredentials,
}

/// Shift submission form failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShiftFormError {
    #[error("Fill in all required fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{field} must be a number (got '{value}')")]
    NotANumber { field: &'static str, value: String },
    #[error("Invalid date '{0}', use YYYY-MM-DD")]
    InvalidDate(String),
    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

/// Capability and session-state failures raised by the root session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Log in first")]
    NotAuthenticated,
    #[error("{} may not {action}", format_role(*.role))]
    Forbidden { role: Role, action: Action },
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    ShiftForm(#[from] ShiftFormError),
}

/// Failures while loading or writing seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse seed data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to write seed file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Duplicate {kind} id {id} in seed data")]
    DuplicateId { kind: &'static str, id: u64 },
}

/// Failures while setting up logging.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("Failed to open log file {path}: {reason}")]
    File { path: PathBuf, reason: String },
    #[error("Failed to install logger: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_names_role_for_display() {
        let err = SessionError::Forbidden { role: Role::Supervisor, action: Action::ChangeRecordStatus };
        assert_eq!(err.to_string(), "Supervisor may not change record status");
        let err = SessionError::Forbidden { role: Role::Operator, action: Action::CreateTask };
        assert_eq!(err.to_string(), "Operador may not create tasks");
    }
}
