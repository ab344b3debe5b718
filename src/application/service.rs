use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{
    BalanceResult, EntryForm, EntryId, EntryStatus, JournalEntry, JournalItem, LineSheet,
    RawLine, SubmissionReport, check_submission, parse_amount, validate,
};

use super::{AppError, ValidatorConfig};

/// Application service over an in-memory journal book.
/// This is the primary interface for any client (CLI, tests, embedding UI).
pub struct JournalService {
    config: ValidatorConfig,
    entries: Vec<JournalEntry>,
}

/// Filter for listing journal entries. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<EntryStatus>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        self.from_date.is_none_or(|from| entry.entry_date >= from)
            && self.to_date.is_none_or(|to| entry.entry_date <= to)
            && self.status.is_none_or(|status| entry.status == status)
    }
}

impl JournalService {
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_entries(config, Vec::new())
    }

    /// Start from entries loaded elsewhere (e.g. a journal file).
    pub fn with_entries(config: ValidatorConfig, entries: Vec<JournalEntry>) -> Self {
        Self { config, entries }
    }

    pub fn config(&self) -> ValidatorConfig {
        self.config
    }

    // ========================
    // Validation
    // ========================

    /// Live totals for a set of raw lines.
    pub fn totals(&self, lines: &[RawLine]) -> BalanceResult {
        let entry_lines: Vec<_> = lines.iter().map(RawLine::to_entry_line).collect();
        let result = validate(&entry_lines, self.config.tolerance);
        debug!(
            lines = lines.len(),
            total_debit = %result.total_debit,
            total_credit = %result.total_credit,
            balanced = result.is_balanced,
            "computed journal totals"
        );
        result
    }

    /// Totals for a line sheet being edited.
    pub fn sheet_totals(&self, sheet: &LineSheet) -> BalanceResult {
        sheet.totals(self.config.tolerance)
    }

    /// Run the pre-submission checks on a form.
    pub fn check(&self, form: &EntryForm) -> SubmissionReport {
        let report = check_submission(form, self.config.tolerance);
        if report.is_accepted() {
            debug!("journal entry form accepted");
        } else {
            warn!(issues = report.issues.len(), "journal entry form rejected");
        }
        report
    }

    // ========================
    // Journal entry operations
    // ========================

    /// Create a draft entry from an accepted form.
    pub fn create_entry(&mut self, form: &EntryForm) -> Result<&JournalEntry, AppError> {
        let (entry_date, items) = self.accept(form)?;

        let mut entry = JournalEntry::new(entry_date, items);
        entry.reference = non_blank(form.reference.as_deref());
        entry.description = non_blank(form.description.as_deref());

        info!(id = %entry.id, items = entry.items.len(), "created journal entry");
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Replace a draft's header and lines with the contents of a form.
    pub fn update_entry(&mut self, id: EntryId, form: &EntryForm) -> Result<&JournalEntry, AppError> {
        let index = self.index_of(id)?;
        self.entries[index].ensure_editable()?;

        let (entry_date, items) = self.accept(form)?;
        let entry = &mut self.entries[index];
        entry.revise(
            entry_date,
            non_blank(form.reference.as_deref()),
            non_blank(form.description.as_deref()),
            items,
        )?;

        info!(id = %id, "updated journal entry");
        Ok(entry)
    }

    /// Post a draft. Rejected when the entry is unbalanced or already posted.
    pub fn post_entry(&mut self, id: EntryId) -> Result<&JournalEntry, AppError> {
        let index = self.index_of(id)?;
        let tolerance = self.config.tolerance;
        let entry = &mut self.entries[index];

        if let Err(err) = entry.post(tolerance) {
            warn!(id = %id, error = %err, "refused to post journal entry");
            return Err(err.into());
        }

        info!(id = %id, "posted journal entry");
        Ok(entry)
    }

    /// Delete a draft.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<JournalEntry, AppError> {
        let index = self.index_of(id)?;
        self.entries[index].ensure_editable()?;

        info!(id = %id, "deleted journal entry");
        Ok(self.entries.remove(index))
    }

    pub fn get_entry(&self, id: EntryId) -> Result<&JournalEntry, AppError> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or(AppError::EntryNotFound(id))
    }

    /// Entries matching the filter, newest entry date first.
    pub fn list_entries(&self, filter: &EntryFilter) -> Vec<&JournalEntry> {
        let mut entries: Vec<&JournalEntry> =
            self.entries.iter().filter(|e| filter.matches(e)).collect();
        entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        entries
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<JournalEntry> {
        self.entries
    }

    fn index_of(&self, id: EntryId) -> Result<usize, AppError> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(AppError::EntryNotFound(id))
    }

    /// Gate a form and turn its lines into journal items.
    fn accept(&self, form: &EntryForm) -> Result<(NaiveDate, Vec<JournalItem>), AppError> {
        let report = self.check(form);
        if !report.is_accepted() {
            return Err(AppError::Rejected(report.issues));
        }

        let entry_date = form.parsed_date();
        let items: Option<Vec<JournalItem>> = form.lines.iter().map(item_from_line).collect();

        match (entry_date, items) {
            (Some(date), Some(items)) => Ok((date, items)),
            _ => Err(AppError::Rejected(report.issues)),
        }
    }
}

fn item_from_line(line: &RawLine) -> Option<JournalItem> {
    let account = non_blank(line.account.as_deref())?;
    let amount = parse_amount(line.amount.as_deref()?).ok()?;
    let side = line.side?;

    let mut item = JournalItem::new(account, side, amount);
    item.description = non_blank(line.description.as_deref());
    Some(item)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
