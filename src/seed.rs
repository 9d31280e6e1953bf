//! Seed data for a session.
//!
//! Every session starts from a fixed data set: the built-in one compiled into
//! the binary, or a JSON file with the same shape passed via `--seed`.
//! Nothing is ever written back; `write` only exports a seed for editing.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::{Contact, SampleMessage};
use crate::error::SeedError;
use crate::record::ShiftRecord;
use crate::task::Task;

const BUILTIN_SEED: &str = include_str!("../data/seed.json");

/// Initial contents of every view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub records: Vec<ShiftRecord>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub conversation: Vec<SampleMessage>,
}

impl SeedData {
    /// The data set shipped with the binary.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::parse(BUILTIN_SEED)
    }

    /// Parse and check a seed document.
    pub fn parse(json: &str) -> Result<Self, SeedError> {
        let seed: SeedData = serde_json::from_str(json)?;
        seed.check_ids()?;
        Ok(seed)
    }

    /// Read a seed file.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let mut buf = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .map_err(|source| SeedError::Read { path: path.to_path_buf(), source })?;
        let seed = Self::parse(&buf)?;
        debug!(path = %path.display(), tasks = seed.tasks.len(), records = seed.records.len(), "seed loaded");
        Ok(seed)
    }

    /// `path` when given, the built-in seed otherwise.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, SeedError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// Write as pretty JSON using a temp file + rename.
    pub fn write(&self, path: &Path) -> Result<(), SeedError> {
        let write_err = |source| SeedError::Write { path: path.to_path_buf(), source };
        let data = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(write_err)?;
        f.write_all(data.as_bytes()).map_err(write_err)?;
        f.flush().map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;
        Ok(())
    }

    fn check_ids(&self) -> Result<(), SeedError> {
        unique("task", self.tasks.iter().map(|t| t.id))?;
        unique("record", self.records.iter().map(|r| r.id))?;
        unique("contact", self.contacts.iter().map(|c| c.id))?;
        Ok(())
    }
}

fn unique(kind: &'static str, ids: impl Iterator<Item = u64>) -> Result<(), SeedError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId { kind, id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{RecordStatus, TaskStatus};

    #[test]
    fn test_builtin_seed_parses() {
        let seed = SeedData::builtin().unwrap();
        assert_eq!(seed.tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(seed.tasks[1].status, TaskStatus::InProgress);
        assert_eq!(seed.records.len(), 3);
        assert_eq!(seed.records[1].steel_type, "316L");
        assert_eq!(seed.records[1].status, RecordStatus::NeedsReview);
        assert_eq!(seed.contacts.len(), 6);
        assert!(seed.conversation[1].sender.is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"tasks": [
            {"id": 1, "title": "a", "description": "b", "assignee": "c", "created_by": "d"},
            {"id": 1, "title": "a", "description": "b", "assignee": "c", "created_by": "d"}
        ]}"#;
        match SeedData::parse(json) {
            Err(SeedError::DuplicateId { kind, id }) => {
                assert_eq!(kind, "task");
                assert_eq!(id, 1);
            }
            other => panic!("expected duplicate id, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let seed = SeedData::parse("{}").unwrap();
        assert!(seed.tasks.is_empty());
        assert!(seed.contacts.is_empty());
    }

    #[test]
    fn test_write_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        let seed = SeedData::builtin().unwrap();
        seed.write(&path).unwrap();
        let loaded = SeedData::load(&path).unwrap();
        assert_eq!(loaded.tasks, seed.tasks);
        assert_eq!(loaded.records, seed.records);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = SeedData::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
