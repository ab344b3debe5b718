use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    Amount, BalanceResult, EntryLine, RawLine, SideError, check_side_count, count_sides,
    parse_amount, validate,
};

pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A journal entry as submitted from the entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub entry_date: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

impl EntryForm {
    pub fn entry_lines(&self) -> Vec<EntryLine> {
        self.lines.iter().map(RawLine::to_entry_line).collect()
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.entry_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), ENTRY_DATE_FORMAT).ok())
    }
}

/// Reasons a form is held back. Line numbers are 1-based positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum SubmissionIssue {
    MissingDate,
    InvalidDate { value: String },
    MissingAccount { line: usize },
    NonPositiveAmount { line: usize },
    MissingSide { line: usize },
    MissingLines { missing: MissingSide },
    Unbalanced { difference: Amount },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSide {
    Debit,
    Credit,
    Both,
}

impl From<SideError> for MissingSide {
    fn from(err: SideError) -> Self {
        match err {
            SideError::MissingDebit => MissingSide::Debit,
            SideError::MissingCredit => MissingSide::Credit,
            SideError::MissingBoth => MissingSide::Both,
        }
    }
}

impl std::fmt::Display for SubmissionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionIssue::MissingDate => write!(f, "Please enter a date for the journal entry"),
            SubmissionIssue::InvalidDate { value } => {
                write!(f, "Entry date '{}' is not in YYYY-MM-DD format", value)
            }
            SubmissionIssue::MissingAccount { line } => {
                write!(f, "Line {}: please select an account", line)
            }
            SubmissionIssue::NonPositiveAmount { line } => {
                write!(f, "Line {}: amount must be greater than zero", line)
            }
            SubmissionIssue::MissingSide { line } => {
                write!(f, "Line {}: choose debit or credit", line)
            }
            SubmissionIssue::MissingLines { missing } => match missing {
                MissingSide::Debit => write!(f, "At least one debit line is required"),
                MissingSide::Credit => write!(f, "At least one credit line is required"),
                MissingSide::Both => {
                    write!(f, "At least one debit and one credit line are required")
                }
            },
            SubmissionIssue::Unbalanced { difference } => write!(
                f,
                "Journal entry must be balanced (debits must equal credits), off by {}",
                super::format_amount(*difference)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub balance: BalanceResult,
    pub issues: Vec<SubmissionIssue>,
}

impl SubmissionReport {
    pub fn is_accepted(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Run every pre-submission check and collect all problems at once.
///
/// Totals keep the permissive zero fallback, but an amount that is blank,
/// unparsable or not above zero is reported against its line, so a form
/// with garbage in an amount field can never be accepted.
pub fn check_submission(form: &EntryForm, tolerance: Amount) -> SubmissionReport {
    let mut issues = Vec::new();

    match form.entry_date.as_deref().map(str::trim) {
        None | Some("") => issues.push(SubmissionIssue::MissingDate),
        Some(value) if form.parsed_date().is_none() => {
            issues.push(SubmissionIssue::InvalidDate {
                value: value.to_string(),
            })
        }
        Some(_) => {}
    }

    for (index, line) in form.lines.iter().enumerate() {
        let number = index + 1;
        if !line.has_account() {
            issues.push(SubmissionIssue::MissingAccount { line: number });
        }
        let amount = line.amount.as_deref().and_then(|a| parse_amount(a).ok());
        if amount.is_none_or(|a| a <= Decimal::ZERO) {
            issues.push(SubmissionIssue::NonPositiveAmount { line: number });
        }
        if line.side.is_none() {
            issues.push(SubmissionIssue::MissingSide { line: number });
        }
    }

    let sides = count_sides(form.lines.iter().filter_map(|l| l.side.as_ref()));
    if let Err(err) = check_side_count(sides) {
        issues.push(SubmissionIssue::MissingLines {
            missing: err.into(),
        });
    }

    let balance = validate(&form.entry_lines(), tolerance);
    if !balance.is_balanced {
        issues.push(SubmissionIssue::Unbalanced {
            difference: balance.difference(),
        });
    }

    SubmissionReport { balance, issues }
}
