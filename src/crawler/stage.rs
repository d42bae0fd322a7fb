//! Stage bookkeeping for the crawl cascade
//!
//! Every stage launches its tasks together and waits for all of them to
//! settle. Outcomes are recorded per task instead of short-circuiting on the
//! first failure, so the caller knows exactly how many siblings persisted.

use crate::CrawlError;
use std::fmt;

/// One of the three sequential crawl phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Brand,
    Model,
    Price,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Brand => "brand",
            Stage::Model => "model",
            Stage::Price => "price",
        };
        f.write_str(name)
    }
}

/// A task that did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Page URL or artifact key identifying the task
    pub target: String,
    pub error: String,
}

/// Per-task outcome counts for one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<TaskFailure>,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every attempted task succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, target: String, error: &CrawlError) {
        tracing::error!(stage = %self.stage, target = %target, "Task failed: {}", error);
        self.failures.push(TaskFailure {
            target,
            error: error.to_string(),
        });
    }
}

/// Splits settled task outcomes into successful values and a stage report
///
/// Each outcome is paired with the target that identifies its task. Failed
/// tasks are logged once here.
pub fn settle<T>(
    stage: Stage,
    outcomes: impl IntoIterator<Item = (String, Result<T, CrawlError>)>,
) -> (Vec<T>, StageReport) {
    let mut report = StageReport::new(stage);
    let mut values = Vec::new();

    for (target, outcome) in outcomes {
        report.attempted += 1;
        match outcome {
            Ok(value) => {
                report.succeeded += 1;
                values.push(value);
            }
            Err(e) => report.record_failure(target, &e),
        }
    }

    (values, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    fn storage_failure(key: &str) -> CrawlError {
        CrawlError::Storage {
            key: key.to_string(),
            source: StorageError::InvalidKey(key.to_string()),
        }
    }

    #[test]
    fn test_settle_all_succeed() {
        let outcomes = vec![("a".to_string(), Ok(1)), ("b".to_string(), Ok(2))];
        let (values, report) = settle(Stage::Model, outcomes);

        assert_eq!(values, vec![1, 2]);
        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 2);
        assert!(report.is_success());
    }

    #[test]
    fn test_settle_keeps_siblings_of_failure() {
        let outcomes = vec![
            ("kia".to_string(), Ok("k")),
            ("lada".to_string(), Err(storage_failure("models/lada.json"))),
            ("bmw".to_string(), Ok("b")),
        ];
        let (values, report) = settle(Stage::Model, outcomes);

        assert_eq!(values, vec!["k", "b"]);
        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].target, "lada");
        assert!(!report.is_success());
    }

    #[test]
    fn test_settle_empty_stage() {
        let (values, report) = settle::<()>(Stage::Price, Vec::new());
        assert!(values.is_empty());
        assert_eq!(report, StageReport::new(Stage::Price));
        assert!(report.is_success());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Brand.to_string(), "brand");
        assert_eq!(Stage::Price.to_string(), "price");
    }
}
