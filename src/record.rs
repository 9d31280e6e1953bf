//! Shift record data structures.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// One operator's report for a shift, under review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShiftRecord {
    pub id: u64,
    /// ISO date as submitted, matched literally by search.
    pub date: String,
    pub operator: String,
    pub shift: Shift,
    pub steel_type: String,
    pub status: RecordStatus,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A review comment. Ids count from 1 within their record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub role: Role,
    pub text: String,
    pub timestamp: String,
}

/// Display timestamp for a new comment, e.g. `12/05/2025, 09:30:00`.
pub fn format_comment_timestamp(at: DateTime<Local>) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}
