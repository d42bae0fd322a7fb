//! Output module for crawl reporting
//!
//! This module handles:
//! - Aggregating per-stage outcomes into a [`CrawlReport`]
//! - Rendering the report for the console

use crate::crawler::{Stage, StageReport};
use crate::CrawlError;
use std::time::Duration;

/// Outcome of a whole crawl, one entry per stage that ran
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub stages: Vec<StageReport>,
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Report for `stage`, if that stage ran
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    pub fn attempted(&self) -> usize {
        self.stages.iter().map(|report| report.attempted).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.stages.iter().map(|report| report.succeeded).sum()
    }

    pub fn failed(&self) -> usize {
        self.stages.iter().map(|report| report.failed()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.stages.iter().all(|report| report.is_success())
    }

    /// Converts a report with failed tasks into [`CrawlError::Incomplete`]
    pub fn into_result(self) -> Result<Self, CrawlError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CrawlError::Incomplete {
                failed: self.failed(),
                attempted: self.attempted(),
            })
        }
    }
}

/// Prints the report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Stages:");
    for stage in &report.stages {
        println!(
            "  {}: {} attempted, {} persisted, {} failed",
            stage.stage,
            stage.attempted,
            stage.succeeded,
            stage.failed()
        );
    }
    println!();

    let failures: Vec<_> = report
        .stages
        .iter()
        .flat_map(|stage| stage.failures.iter().map(move |f| (stage.stage, f)))
        .collect();
    if !failures.is_empty() {
        println!("Failures ({}):", failures.len());
        for (stage, failure) in failures {
            println!("  - [{}] {}: {}", stage, failure.target, failure.error);
        }
        println!();
    }

    println!(
        "Total: {} / {} tasks persisted in {:.1}s",
        report.succeeded(),
        report.attempted(),
        report.elapsed.as_secs_f64()
    );
}
