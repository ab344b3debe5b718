use serde::{Deserialize, Serialize};

use super::{Amount, coerce_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Debit => "debit",
            Side::Credit => "credit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" | "dr" => Some(Side::Debit),
            "credit" | "cr" => Some(Side::Credit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One debit or credit row of a journal entry, reduced to what the balance
/// check needs. Amounts are expected to be non-negative; lines built from
/// form text get that from [`coerce_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLine {
    pub amount: Amount,
    pub side: Side,
}

impl EntryLine {
    pub fn new(amount: Amount, side: Side) -> Self {
        Self { amount, side }
    }

    pub fn debit(amount: Amount) -> Self {
        Self::new(amount, Side::Debit)
    }

    pub fn credit(amount: Amount) -> Self {
        Self::new(amount, Side::Credit)
    }
}

/// A line as captured from form fields. Every field may still be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub side: Option<Side>,
}

impl RawLine {
    pub fn with_side(side: Side) -> Self {
        Self {
            side: Some(side),
            ..Self::default()
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Amount with the permissive zero fallback.
    pub fn coerced_amount(&self) -> Amount {
        coerce_amount(self.amount.as_deref())
    }

    /// A row without a chosen side is counted on the credit side, the same
    /// way the form tallies a row whose debit option is not checked.
    pub fn to_entry_line(&self) -> EntryLine {
        EntryLine::new(self.coerced_amount(), self.side.unwrap_or(Side::Credit))
    }

    pub fn has_account(&self) -> bool {
        self.account.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}
