//! Dashboard figures computed from the live session.

use std::collections::BTreeMap;

use crate::fields::*;
use crate::session::Session;

/// Snapshot of the headline numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub records_total: usize,
    pub records_by_status: [(RecordStatus, usize); 3],
    /// Share of records approved, 0–100. `None` with no records.
    pub approval_rate: Option<f64>,
    pub tasks_by_column: [(TaskStatus, usize); 4],
    /// Record count per steel type, most frequent first.
    pub steel_types: Vec<(String, usize)>,
    /// Tasks not yet done, per assignee.
    pub open_tasks_by_assignee: BTreeMap<String, usize>,
    pub submissions: usize,
}

impl Overview {
    pub fn compute(session: &Session) -> Self {
        let review = &session.review;
        let board = &session.board;

        let records_total = review.records.len();
        let records_by_status = RecordStatus::ALL.map(|s| (s, review.count_by_status(s)));
        let approved = review.count_by_status(RecordStatus::Approved);
        let approval_rate = (records_total > 0).then(|| approved as f64 * 100.0 / records_total as f64);

        let tasks_by_column = TaskStatus::ALL.map(|s| (s, board.tasks_by_status(s).len()));

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for r in &review.records {
            *counts.entry(r.steel_type.as_str()).or_default() += 1;
        }
        let mut steel_types: Vec<(String, usize)> =
            counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        steel_types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut open_tasks_by_assignee = BTreeMap::new();
        for t in board.tasks.iter().filter(|t| t.status != TaskStatus::Done) {
            *open_tasks_by_assignee.entry(t.assignee.clone()).or_default() += 1;
        }

        Overview {
            records_total,
            records_by_status,
            approval_rate,
            tasks_by_column,
            steel_types,
            open_tasks_by_assignee,
            submissions: session.submitted.len(),
        }
    }

    /// Records still waiting on a reviewer (pending or flagged).
    pub fn awaiting_review(&self) -> usize {
        self.records_by_status
            .iter()
            .filter(|(s, _)| *s != RecordStatus::Approved)
            .map(|(_, n)| n)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;

    #[test]
    fn test_overview_of_builtin_seed() {
        let session = Session::from_seed(SeedData::builtin().unwrap());
        let o = Overview::compute(&session);
        assert_eq!(o.records_total, 3);
        assert_eq!(o.awaiting_review(), 2);
        let rate = o.approval_rate.unwrap();
        assert!((rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(o.tasks_by_column.map(|(_, n)| n), [1, 1, 1, 1]);
        assert_eq!(o.steel_types.len(), 3);
        assert_eq!(o.open_tasks_by_assignee.get("Carlos Silva"), Some(&1));
        assert!(!o.open_tasks_by_assignee.contains_key("Roberto Almeida"));
    }

    #[test]
    fn test_empty_session_has_no_rate() {
        let session = Session::from_seed(SeedData::default());
        let o = Overview::compute(&session);
        assert_eq!(o.approval_rate, None);
        assert!(o.steel_types.is_empty());
    }
}
