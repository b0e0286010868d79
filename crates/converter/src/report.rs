//! Per-job outcomes and batch reports.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tgsrender_common::error::TgsError;
use tgsrender_container::AnimationInfo;

/// Pipeline stage a job failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertStage {
    Decompress,
    Probe,
    Prepare,
    Render,
}

impl fmt::Display for ConvertStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Decompress => "decompress",
            Self::Probe => "probe",
            Self::Prepare => "prepare output",
            Self::Render => "render",
        };
        f.write_str(name)
    }
}

/// Why one job failed.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct ConvertError {
    pub stage: ConvertStage,
    #[source]
    pub source: TgsError,
}

impl ConvertError {
    pub fn new(stage: ConvertStage, source: TgsError) -> Self {
        Self { stage, source }
    }
}

/// Result of one conversion job.
#[derive(Debug)]
pub struct JobOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Animation header, when the document got far enough to be probed.
    pub animation: Option<AnimationInfo>,
    pub result: Result<(), ConvertError>,
    pub elapsed: Duration,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&ConvertError> {
        self.result.as_ref().err()
    }
}

/// Outcomes of a whole batch, in input order.
#[derive(Debug)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            outcomes: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} failed, {} total in {:.1}s",
            self.succeeded(),
            self.failed(),
            self.attempted(),
            self.duration().as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, result: Result<(), ConvertError>) -> JobOutcome {
        JobOutcome {
            input: PathBuf::from(format!("{name}.tgs")),
            output: PathBuf::from(format!("{name}.gif")),
            animation: None,
            result,
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_counts() {
        let mut report = BatchReport::new(Utc::now());
        report.outcomes.push(outcome("a", Ok(())));
        report.outcomes.push(outcome(
            "b",
            Err(ConvertError::new(
                ConvertStage::Decompress,
                TgsError::decompress("invalid gzip header"),
            )),
        ));
        report.outcomes.push(outcome("c", Ok(())));

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(
            report.failures().map(|o| o.input.clone()).collect::<Vec<_>>(),
            vec![PathBuf::from("b.tgs")]
        );
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = BatchReport::new(Utc::now());
        assert_eq!(report.attempted(), 0);
        assert!(report.is_success());
        assert!(report.to_string().starts_with("0 converted, 0 failed, 0 total"));
    }

    #[test]
    fn test_convert_error_names_stage() {
        let err = ConvertError::new(ConvertStage::Render, TgsError::render("exit 3"));
        assert_eq!(err.to_string(), "render failed: Render error: exit 3");
    }
}
