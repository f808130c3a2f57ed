//! Per-file analysis and aggregation of the combined report

use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::llm::CompletionBackend;
use crate::source::{Location, SourceAcquirer};

pub mod recover;
pub mod report;
pub mod requester;

pub use report::{AggregateReport, AnalysisReport, FileError, Finding, ReportEntry};
pub use requester::{FileOutcome, ReportRequester};

/// Drives acquisition, per-file requests and aggregation for one run
pub struct Auditor {
    acquirer: SourceAcquirer,
    requester: ReportRequester,
}

impl Auditor {
    /// Builds an auditor around an explicitly supplied model backend
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            acquirer: SourceAcquirer::new(&config.acquisition)?,
            requester: ReportRequester::new(backend, config),
        })
    }

    /// Analyses every eligible file of `location`, one at a time
    ///
    /// Only acquisition fails the run; per-file failures become error entries.
    pub async fn run(&self, location: &Location, single_path: Option<&Path>) -> Result<AggregateReport> {
        let acquisition = self.acquirer.acquire(location, single_path).await?;
        let mut report = AggregateReport::default();
        let mut failed = 0usize;

        for file in &acquisition.files {
            let display_path = acquisition.display_path(file);
            info!("Analyzing {}...", display_path);

            match self.requester.request(&file.content, &display_path).await {
                Ok(analysis) => {
                    report.push_findings(analysis.vulnerabilities.into_iter().map(|mut finding| {
                        if finding.file.is_empty() {
                            finding.file = display_path.clone();
                        }
                        finding
                    }));
                }
                Err(e) => {
                    failed += 1;
                    report.push_error(display_path.as_str(), e.to_string());
                }
            }
        }

        info!(
            "Analyzed {} file(s) from {}: {} finding(s), {} error(s)",
            acquisition.files.len(),
            location,
            report.findings().count(),
            failed
        );
        Ok(report)
    }
}
