use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, BalanceResult, EntryLine, Side, validate};

pub type EntryId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Draft,
    Posted,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Posted => "posted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(EntryStatus::Draft),
            "posted" => Some(EntryStatus::Posted),
            _ => None,
        }
    }

    /// Display label used in listings and exports.
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "Draft",
            EntryStatus::Posted => "Posted",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validated line of a stored journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalItem {
    pub account: String,
    pub description: Option<String>,
    pub side: Side,
    pub amount: Amount,
}

impl JournalItem {
    pub fn new(account: impl Into<String>, side: Side, amount: Amount) -> Self {
        Self {
            account: account.into(),
            description: None,
            side,
            amount,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn debit_amount(&self) -> Amount {
        match self.side {
            Side::Debit => self.amount,
            Side::Credit => Decimal::ZERO,
        }
    }

    pub fn credit_amount(&self) -> Amount {
        match self.side {
            Side::Debit => Decimal::ZERO,
            Side::Credit => self.amount,
        }
    }

    pub fn entry_line(&self) -> EntryLine {
        EntryLine::new(self.amount, self.side)
    }
}

/// A journal entry. Drafts can be edited, deleted and posted; a posted
/// entry is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub entry_date: NaiveDate,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<JournalItem>,
}

impl JournalEntry {
    pub fn new(entry_date: NaiveDate, items: Vec<JournalItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry_date,
            reference: None,
            description: None,
            status: EntryStatus::Draft,
            created_at: Utc::now(),
            items,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_posted(&self) -> bool {
        self.status == EntryStatus::Posted
    }

    pub fn balance(&self, tolerance: Amount) -> BalanceResult {
        let lines: Vec<EntryLine> = self.items.iter().map(JournalItem::entry_line).collect();
        validate(&lines, tolerance)
    }

    /// Fails if the entry is posted.
    pub fn ensure_editable(&self) -> Result<(), LifecycleError> {
        if self.is_posted() {
            return Err(LifecycleError::AlreadyPosted(self.id));
        }
        Ok(())
    }

    /// Replace header and items of a draft.
    pub fn revise(
        &mut self,
        entry_date: NaiveDate,
        reference: Option<String>,
        description: Option<String>,
        items: Vec<JournalItem>,
    ) -> Result<(), LifecycleError> {
        self.ensure_editable()?;
        self.entry_date = entry_date;
        self.reference = reference;
        self.description = description;
        self.items = items;
        Ok(())
    }

    /// Mark a balanced draft as posted.
    pub fn post(&mut self, tolerance: Amount) -> Result<(), LifecycleError> {
        self.ensure_editable()?;
        let balance = self.balance(tolerance);
        if !balance.is_balanced {
            return Err(LifecycleError::Unbalanced {
                id: self.id,
                difference: balance.difference(),
            });
        }
        self.status = EntryStatus::Posted;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    AlreadyPosted(EntryId),
    Unbalanced { id: EntryId, difference: Amount },
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleError::AlreadyPosted(id) => {
                write!(f, "Journal entry {} is already posted", id)
            }
            LifecycleError::Unbalanced { id, difference } => write!(
                f,
                "Cannot post unbalanced journal entry {} (off by {})",
                id,
                super::format_amount(*difference)
            ),
        }
    }
}

impl std::error::Error for LifecycleError {}
