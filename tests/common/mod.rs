// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use journal_balance::application::{JournalService, ValidatorConfig};
use journal_balance::domain::{EntryForm, EntryLine, RawLine, Side};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::TempDir;

/// Parse a decimal literal used in a test
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn debit(amount: &str) -> EntryLine {
    EntryLine::debit(dec(amount))
}

pub fn credit(amount: &str) -> EntryLine {
    EntryLine::credit(dec(amount))
}

/// A fully filled-in form line
pub fn form_line(account: &str, side: Side, amount: &str) -> RawLine {
    RawLine::with_side(side)
        .with_account(account)
        .with_amount(amount)
}

/// A form that passes every submission check
pub fn balanced_form(date: &str, amount: &str) -> EntryForm {
    EntryForm {
        entry_date: Some(date.into()),
        reference: Some(format!("JE-{}", date)),
        description: Some("Office supplies".into()),
        lines: vec![
            form_line("6100", Side::Debit, amount),
            form_line("1000", Side::Credit, amount),
        ],
    }
}

pub fn test_service() -> JournalService {
    JournalService::new(ValidatorConfig::default())
}

/// Helper to write a file into a fresh temporary directory
pub fn write_temp(name: &str, contents: &str) -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents)?;
    Ok((path, temp_dir))
}
