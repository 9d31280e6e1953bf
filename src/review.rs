//! Shift record review state.
//!
//! Holds the submitted records and the one currently open for review.
//! Status changes here are not role-checked; the session applies the policy
//! before calling in.

use chrono::Local;
use tracing::{debug, info};

use crate::fields::*;
use crate::policy::role_signature;
use crate::record::{format_comment_timestamp, Comment, ShiftRecord};

/// Records under review plus the current selection.
#[derive(Debug, Default, Clone)]
pub struct RecordReview {
    pub records: Vec<ShiftRecord>,
    selected: Option<u64>,
}

impl RecordReview {
    pub fn new(records: Vec<ShiftRecord>) -> Self {
        RecordReview { records, selected: None }
    }

    /// Get a record by ID.
    pub fn get(&self, id: u64) -> Option<&ShiftRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut ShiftRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Records whose operator or steel type contains `term` ignoring case,
    /// or whose date contains it literally. The collection is untouched.
    pub fn search(&self, term: &str) -> Vec<&ShiftRecord> {
        let lower = term.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.operator.to_lowercase().contains(&lower)
                    || r.steel_type.to_lowercase().contains(&lower)
                    || r.date.contains(term)
            })
            .collect()
    }

    /// Open record `id` for review. Unknown ids keep the current selection.
    pub fn select_record(&mut self, id: u64) -> bool {
        if self.get(id).is_some() {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    pub fn selected(&self) -> Option<&ShiftRecord> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Append a comment signed for `role` to the selected record.
    ///
    /// Blank text or no selection leaves everything unchanged and returns
    /// `None`; otherwise returns the new comment's id.
    pub fn add_comment(&mut self, role: Role, text: &str) -> Option<u64> {
        if text.trim().is_empty() {
            return None;
        }
        let id = self.selected?;
        let record = self.get_mut(id)?;
        let comment_id = record.comments.len() as u64 + 1;
        record.comments.push(Comment {
            id: comment_id,
            author: role_signature(role).to_string(),
            role,
            text: text.to_string(),
            timestamp: format_comment_timestamp(Local::now()),
        });
        info!(record = id, comment = comment_id, ?role, "comment added");
        Some(comment_id)
    }

    /// Set the status of the selected record. Any status may follow any
    /// other. Returns `false` when nothing is selected.
    pub fn update_status(&mut self, status: RecordStatus) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        match self.get_mut(id) {
            Some(record) => {
                debug!(record = id, from = ?record.status, to = ?status, "record status changed");
                record.status = status;
                true
            }
            None => false,
        }
    }

    /// Number of records in each status.
    pub fn count_by_status(&self, status: RecordStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, date: &str, operator: &str, shift: Shift, steel: &str, status: RecordStatus) -> ShiftRecord {
        ShiftRecord {
            id,
            date: date.into(),
            operator: operator.into(),
            shift,
            steel_type: steel.into(),
            status,
            comments: Vec::new(),
        }
    }

    fn seeded() -> RecordReview {
        RecordReview::new(vec![
            record(1, "2025-05-12", "Abner", Shift::Morning, "304", RecordStatus::Approved),
            record(2, "2025-05-12", "Felipe", Shift::Afternoon, "316L", RecordStatus::NeedsReview),
            record(3, "2025-05-11", "Joaquim", Shift::Night, "430", RecordStatus::Pending),
        ])
    }

    fn ids(records: Vec<&ShiftRecord>) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_search_returns_everything_in_order() {
        let review = seeded();
        assert_eq!(ids(review.search("")), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_by_steel_type() {
        let review = seeded();
        assert_eq!(ids(review.search("316L")), vec![2]);
        assert_eq!(ids(review.search("316l")), vec![2]);
    }

    #[test]
    fn test_search_by_operator_ignores_case() {
        let review = seeded();
        assert_eq!(ids(review.search("JOAQ")), vec![3]);
    }

    #[test]
    fn test_search_by_date_literal() {
        let review = seeded();
        assert_eq!(ids(review.search("2025-05-12")), vec![1, 2]);
        assert!(review.search("12/05").is_empty());
    }

    #[test]
    fn test_search_does_not_modify_collection() {
        let review = seeded();
        let before = review.records.clone();
        let _ = review.search("abner");
        assert_eq!(review.records, before);
    }

    #[test]
    fn test_select_unknown_keeps_selection() {
        let mut review = seeded();
        assert!(review.select_record(2));
        assert!(!review.select_record(40));
        assert_eq!(review.selected_id(), Some(2));
    }

    #[test]
    fn test_blank_comments_are_ignored() {
        let mut review = seeded();
        review.select_record(3);
        assert_eq!(review.add_comment(Role::Engineer, ""), None);
        assert_eq!(review.add_comment(Role::Engineer, "   "), None);
        assert!(review.get(3).unwrap().comments.is_empty());
    }

    #[test]
    fn test_comment_without_selection_is_noop() {
        let mut review = seeded();
        assert_eq!(review.add_comment(Role::Engineer, "Bom trabalho"), None);
        assert!(review.records.iter().all(|r| r.comments.is_empty()));
    }

    #[test]
    fn test_comment_ids_count_within_record() {
        let mut review = seeded();
        review.select_record(1);
        assert_eq!(review.add_comment(Role::Engineer, "Primeiro"), Some(1));
        assert_eq!(review.add_comment(Role::Supervisor, "Segundo"), Some(2));
        review.select_record(2);
        assert_eq!(review.add_comment(Role::Manager, "Outro registro"), Some(1));

        let comments = &review.get(1).unwrap().comments;
        assert_eq!(comments[0].author, "Ana Márcia");
        assert_eq!(comments[1].author, "Pedro Costa");
        assert_eq!(comments[1].role, Role::Supervisor);
        assert_eq!(comments[1].text, "Segundo");
    }

    #[test]
    fn test_update_status_touches_only_selected_record() {
        let mut review = seeded();
        review.select_record(2);
        assert!(review.update_status(RecordStatus::Approved));
        assert_eq!(review.get(2).unwrap().status, RecordStatus::Approved);
        assert_eq!(review.get(1).unwrap().status, RecordStatus::Approved);
        assert_eq!(review.get(3).unwrap().status, RecordStatus::Pending);
    }

    #[test]
    fn test_update_status_without_selection() {
        let mut review = seeded();
        assert!(!review.update_status(RecordStatus::Approved));
        assert_eq!(review.count_by_status(RecordStatus::Approved), 1);
    }
}
