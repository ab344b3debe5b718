use serde::{Deserialize, Serialize};

use super::{Amount, BalanceResult, EntryLine, RawLine, Side, validate};

pub type LineNumber = u32;

/// A raw line together with its sheet-assigned number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLine {
    pub number: LineNumber,
    #[serde(flatten)]
    pub line: RawLine,
}

/// The lines of a journal entry while it is being edited.
///
/// Owned by the caller and passed around explicitly; every edit is followed
/// by recomputing totals over the current snapshot. Line numbers grow
/// monotonically and are never handed out twice, so a removed row can't be
/// confused with a newer one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSheet {
    lines: Vec<SheetLine>,
    next_number: LineNumber,
}

impl Default for LineSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSheet {
    /// A fresh sheet with one debit line and one credit line.
    pub fn new() -> Self {
        let mut sheet = Self::empty();
        sheet.add_line(Some(Side::Debit));
        sheet.add_line(Some(Side::Credit));
        sheet
    }

    /// A sheet with no lines at all, for loading existing rows.
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            next_number: 1,
        }
    }

    /// Load existing rows, numbering them in order. Does not re-seed.
    pub fn from_lines(lines: impl IntoIterator<Item = RawLine>) -> Self {
        let mut sheet = Self::empty();
        for line in lines {
            sheet.push(line);
        }
        sheet
    }

    pub fn lines(&self) -> &[SheetLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, number: LineNumber) -> Option<&RawLine> {
        self.lines
            .iter()
            .find(|l| l.number == number)
            .map(|l| &l.line)
    }

    pub fn add_line(&mut self, side: Option<Side>) -> LineNumber {
        self.push(RawLine {
            side,
            ..RawLine::default()
        })
    }

    fn push(&mut self, line: RawLine) -> LineNumber {
        let number = self.next_number;
        self.next_number += 1;
        self.lines.push(SheetLine { number, line });
        number
    }

    /// Remove a line, then make sure a debit and a credit line remain.
    /// Returns the numbers of any lines added back.
    pub fn remove_line(&mut self, number: LineNumber) -> Result<Vec<LineNumber>, SheetError> {
        let index = self.index_of(number)?;
        self.lines.remove(index);
        Ok(self.ensure_both_sides())
    }

    fn ensure_both_sides(&mut self) -> Vec<LineNumber> {
        if self.lines.is_empty() {
            return vec![
                self.add_line(Some(Side::Debit)),
                self.add_line(Some(Side::Credit)),
            ];
        }

        let has_debit = self.lines.iter().any(|l| l.line.side == Some(Side::Debit));
        let has_credit = self.lines.iter().any(|l| l.line.side == Some(Side::Credit));

        let mut added = Vec::new();
        if !has_debit {
            added.push(self.add_line(Some(Side::Debit)));
        }
        if !has_credit {
            added.push(self.add_line(Some(Side::Credit)));
        }
        added
    }

    pub fn set_amount(
        &mut self,
        number: LineNumber,
        amount: impl Into<String>,
    ) -> Result<(), SheetError> {
        self.line_mut(number)?.amount = Some(amount.into());
        Ok(())
    }

    pub fn set_side(&mut self, number: LineNumber, side: Side) -> Result<(), SheetError> {
        self.line_mut(number)?.side = Some(side);
        Ok(())
    }

    pub fn set_account(
        &mut self,
        number: LineNumber,
        account: impl Into<String>,
    ) -> Result<(), SheetError> {
        self.line_mut(number)?.account = Some(account.into());
        Ok(())
    }

    pub fn set_description(
        &mut self,
        number: LineNumber,
        description: impl Into<String>,
    ) -> Result<(), SheetError> {
        self.line_mut(number)?.description = Some(description.into());
        Ok(())
    }

    pub fn entry_lines(&self) -> Vec<EntryLine> {
        self.lines.iter().map(|l| l.line.to_entry_line()).collect()
    }

    /// Live totals over the current lines.
    pub fn totals(&self, tolerance: Amount) -> BalanceResult {
        validate(&self.entry_lines(), tolerance)
    }

    pub fn into_raw_lines(self) -> Vec<RawLine> {
        self.lines.into_iter().map(|l| l.line).collect()
    }

    fn index_of(&self, number: LineNumber) -> Result<usize, SheetError> {
        self.lines
            .iter()
            .position(|l| l.number == number)
            .ok_or(SheetError::UnknownLine(number))
    }

    fn line_mut(&mut self, number: LineNumber) -> Result<&mut RawLine, SheetError> {
        let index = self.index_of(number)?;
        Ok(&mut self.lines[index].line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    UnknownLine(LineNumber),
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetError::UnknownLine(number) => write!(f, "no line numbered {}", number),
        }
    }
}

impl std::error::Error for SheetError {}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::DEFAULT_TOLERANCE;

    #[test]
    fn test_new_sheet_has_debit_and_credit() {
        let sheet = LineSheet::new();
        let sides: Vec<_> = sheet.lines().iter().map(|l| (l.number, l.line.side)).collect();
        assert_eq!(sides, vec![(1, Some(Side::Debit)), (2, Some(Side::Credit))]);
    }

    #[test]
    fn test_line_numbers_are_not_reused() {
        let mut sheet = LineSheet::new();
        let third = sheet.add_line(Some(Side::Debit));
        sheet.remove_line(third).unwrap();
        let fourth = sheet.add_line(None);
        assert_eq!(third, 3);
        assert_eq!(fourth, 4);
    }

    #[test]
    fn test_removing_only_credit_line_adds_a_new_one() {
        let mut sheet = LineSheet::new();
        let added = sheet.remove_line(2).unwrap();

        assert_eq!(added, vec![3]);
        assert_eq!(sheet.get(3).and_then(|l| l.side), Some(Side::Credit));
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_removing_last_lines_reseeds_both_sides() {
        let mut sheet = LineSheet::from_lines([RawLine::with_side(Side::Debit)]);
        let added = sheet.remove_line(1).unwrap();

        assert_eq!(added, vec![2, 3]);
        assert_eq!(sheet.get(2).and_then(|l| l.side), Some(Side::Debit));
        assert_eq!(sheet.get(3).and_then(|l| l.side), Some(Side::Credit));
    }

    #[test]
    fn test_line_without_side_does_not_count_as_credit_for_reseeding() {
        let mut sheet = LineSheet::from_lines([
            RawLine::with_side(Side::Debit),
            RawLine::default(),
            RawLine::with_side(Side::Debit),
        ]);
        let added = sheet.remove_line(3).unwrap();
        assert_eq!(added, vec![4]);
        assert_eq!(sheet.get(4).and_then(|l| l.side), Some(Side::Credit));
    }

    #[test]
    fn test_remove_unknown_line() {
        let mut sheet = LineSheet::new();
        assert_eq!(sheet.remove_line(9), Err(SheetError::UnknownLine(9)));
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_totals_follow_edits() -> Result<(), SheetError> {
        let mut sheet = LineSheet::new();
        sheet.set_amount(1, "100")?;
        assert!(!sheet.totals(DEFAULT_TOLERANCE).is_balanced);

        sheet.set_amount(2, "100.00")?;
        let totals = sheet.totals(DEFAULT_TOLERANCE);
        assert!(totals.is_balanced);
        assert_eq!(totals.total_debit, Decimal::new(100, 0));

        sheet.set_side(2, Side::Debit)?;
        let totals = sheet.totals(DEFAULT_TOLERANCE);
        assert_eq!(totals.total_debit, Decimal::new(200, 0));
        assert_eq!(totals.total_credit, Decimal::ZERO);
        Ok(())
    }

    #[test]
    fn test_set_account_and_description() -> Result<(), SheetError> {
        let mut sheet = LineSheet::new();
        sheet.set_account(1, "1000")?;
        sheet.set_description(1, "Cash")?;

        let line = sheet.get(1).unwrap();
        assert_eq!(line.account.as_deref(), Some("1000"));
        assert_eq!(line.description.as_deref(), Some("Cash"));
        assert_eq!(sheet.set_account(7, "x"), Err(SheetError::UnknownLine(7)));
        Ok(())
    }
}
