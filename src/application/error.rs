use thiserror::Error;

use crate::domain::{EntryId, LifecycleError, SubmissionIssue};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Journal entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("Journal entry rejected: {}", format_issues(.0))]
    Rejected(Vec<SubmissionIssue>),

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

fn format_issues(issues: &[SubmissionIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
