use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Amount, EntryLine, Side};

/// Largest debit/credit discrepancy still treated as rounding noise (0.01).
pub const DEFAULT_TOLERANCE: Amount = Decimal::from_parts(1, 0, 0, false, 2);

/// Debit and credit totals of one journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub total_debit: Amount,
    pub total_credit: Amount,
    pub is_balanced: bool,
}

impl BalanceResult {
    /// Absolute gap between the two sides.
    pub fn difference(&self) -> Amount {
        gap(self.total_debit, self.total_credit)
    }
}

/// Sum both sides and compare them.
/// Balanced iff |debits - credits| < tolerance, so an empty list is balanced.
/// A side whose sum leaves the `Decimal` range is pinned at the limit and the
/// entry is reported unbalanced.
pub fn validate(lines: &[EntryLine], tolerance: Amount) -> BalanceResult {
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    let mut overflowed = false;

    for line in lines {
        let total = match line.side {
            Side::Debit => &mut total_debit,
            Side::Credit => &mut total_credit,
        };
        *total = match total.checked_add(line.amount) {
            Some(sum) => sum,
            None => {
                overflowed = true;
                total.saturating_add(line.amount)
            }
        };
    }

    BalanceResult {
        total_debit,
        total_credit,
        is_balanced: !overflowed && gap(total_debit, total_credit) < tolerance,
    }
}

fn gap(debit: Amount, credit: Amount) -> Amount {
    debit.saturating_sub(credit).abs()
}

/// [`validate`] with [`DEFAULT_TOLERANCE`].
pub fn validate_default(lines: &[EntryLine]) -> BalanceResult {
    validate(lines, DEFAULT_TOLERANCE)
}

/// How many lines sit on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideCount {
    pub debit_lines: usize,
    pub credit_lines: usize,
}

pub fn count_sides<'a>(sides: impl IntoIterator<Item = &'a Side>) -> SideCount {
    sides
        .into_iter()
        .fold(SideCount::default(), |mut count, side| {
            match side {
                Side::Debit => count.debit_lines += 1,
                Side::Credit => count.credit_lines += 1,
            }
            count
        })
}

/// Require at least one debit and one credit line, independent of the sums.
pub fn check_sides(lines: &[EntryLine]) -> Result<(), SideError> {
    check_side_count(count_sides(lines.iter().map(|l| &l.side)))
}

pub fn check_side_count(count: SideCount) -> Result<(), SideError> {
    match (count.debit_lines, count.credit_lines) {
        (0, 0) => Err(SideError::MissingBoth),
        (0, _) => Err(SideError::MissingDebit),
        (_, 0) => Err(SideError::MissingCredit),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideError {
    MissingDebit,
    MissingCredit,
    MissingBoth,
}

impl std::fmt::Display for SideError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SideError::MissingDebit => write!(f, "journal entry needs at least one debit line"),
            SideError::MissingCredit => write!(f, "journal entry needs at least one credit line"),
            SideError::MissingBoth => {
                write!(f, "journal entry needs at least one debit and one credit line")
            }
        }
    }
}

impl std::error::Error for SideError {}
