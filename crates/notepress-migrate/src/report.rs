//! Batch report: one record per note, plus counts.

use notepress_core::{Error, ErrorKind, MigrationOutcome, Result, to_json_string};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of migrating one file of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Note that was processed
    pub path: PathBuf,
    pub success: bool,
    /// Failure classification if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Produced post if succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MigrationOutcome>,
}

impl FileRecord {
    pub fn succeeded(outcome: MigrationOutcome) -> Self {
        Self {
            path: outcome.source.clone(),
            success: true,
            error_kind: None,
            error: None,
            outcome: Some(outcome),
        }
    }

    pub fn failed(path: impl Into<PathBuf>, error: &Error) -> Self {
        Self {
            path: path.into(),
            success: false,
            error_kind: Some(error.kind()),
            error: Some(error.to_string()),
            outcome: None,
        }
    }
}

/// Result of a whole run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Whether every file succeeded
    pub success: bool,
    /// Files processed
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Nothing was written
    pub dry_run: bool,
    /// Per-file records, in processing order
    pub records: Vec<FileRecord>,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
}

impl BatchReport {
    pub fn new(records: Vec<FileRecord>, dry_run: bool, duration_ms: u64) -> Self {
        let succeeded = records.iter().filter(|r| r.success).count();
        Self {
            success: succeeded == records.len(),
            total: records.len(),
            succeeded,
            failed: records.len() - succeeded,
            dry_run,
            records,
            duration_ms,
        }
    }

    /// Outcomes of the files that succeeded
    pub fn outcomes(&self) -> impl Iterator<Item = &MigrationOutcome> {
        self.records.iter().filter_map(|r| r.outcome.as_ref())
    }

    /// Records of the files that failed
    pub fn failures(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| !r.success)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        to_json_string(self, "batch report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn outcome(source: &str) -> MigrationOutcome {
        MigrationOutcome {
            source: PathBuf::from(source),
            post_path: PathBuf::from("_posts/2025-08-03-a.md"),
            title: "A".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
            permalink: "/posts/2025/08/a/".to_string(),
            tags: vec!["a".to_string()],
            images_copied: 0,
            images_reused: 0,
            warnings: vec![],
            dry_run: false,
        }
    }

    #[test]
    fn test_counts() {
        let report = BatchReport::new(
            vec![
                FileRecord::succeeded(outcome("notes/a.md")),
                FileRecord::failed(
                    "notes/b.md",
                    &Error::read_error("notes/b.md", "not valid UTF-8"),
                ),
            ],
            false,
            3,
        );

        assert!(!report.success);
        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.outcomes().count(), 1);
        assert_eq!(report.failures().next().unwrap().error_kind, Some(ErrorKind::Read));
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = BatchReport::new(vec![], false, 0);
        assert!(report.success);
        assert_eq!(report.total, 0);
    }

    #[test]
    fn test_json_shape() {
        let report = BatchReport::new(
            vec![
                FileRecord::succeeded(outcome("notes/a.md")),
                FileRecord::failed("notes/b.md", &Error::not_found("notes/b.md")),
            ],
            true,
            0,
        );
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["records"][0]["outcome"]["permalink"], "/posts/2025/08/a/");
        assert_eq!(json["records"][0]["outcome"]["date"], "2025-08-03");
        assert!(json["records"][0].get("error").is_none());
        assert_eq!(json["records"][1]["error_kind"], "not_found");
        assert!(json["records"][1].get("outcome").is_none());
    }
}
