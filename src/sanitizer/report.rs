use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Cleaned content passed validation and replaced the original
    Cleaned,
    /// Cleaned content passed validation; dry run left the original alone
    Verified,
    /// Cleaned content was still rejected; original left alone
    StillInvalid,
    /// Something went wrong before a verdict could be acted on
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    pub chars_before: Option<usize>,
    pub chars_after: Option<usize>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, FileStatus::Cleaned | FileStatus::Verified)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub attempted: usize,
    pub succeeded: usize,
    pub dry_run: bool,
    pub outcomes: Vec<FileOutcome>,
    #[serde(skip)]
    start_time: Instant,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::ZERO,
            attempted: 0,
            succeeded: 0,
            dry_run,
            outcomes: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        self.attempted += 1;
        if outcome.succeeded() {
            self.succeeded += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.duration = self.start_time.elapsed();
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, status: FileStatus) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from(name),
            status,
            chars_before: Some(10),
            chars_after: Some(9),
        }
    }

    #[test]
    fn test_counts() {
        let mut report = RunReport::new(false);
        report.record(outcome("a.xml", FileStatus::Cleaned));
        report.record(outcome("b.xml", FileStatus::StillInvalid));
        report.record(outcome(
            "c.xml",
            FileStatus::Failed {
                reason: "denied".to_string(),
            },
        ));
        report.finish();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn test_verified_counts_as_success() {
        let mut report = RunReport::new(true);
        report.record(outcome("a.xml", FileStatus::Verified));
        assert_eq!(report.succeeded, 1);
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport::new(false);
        assert_eq!(report.attempted, 0);
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_json_shape() {
        let mut report = RunReport::new(false);
        report.record(outcome(
            "a.xml",
            FileStatus::Failed {
                reason: "disk full".to_string(),
            },
        ));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["attempted"], 1);
        assert_eq!(json["outcomes"][0]["status"], "failed");
        assert_eq!(json["outcomes"][0]["reason"], "disk full");
        assert_eq!(json["outcomes"][0]["chars_before"], 10);
        assert!(json.get("start_time").is_none());
    }
}
