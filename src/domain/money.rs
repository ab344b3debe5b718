use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Amounts are exact decimals. Binary floats would make `10 - 9.991` drift
/// away from `0.009` and flip results that sit near the tolerance.
pub type Amount = Decimal;

/// Format an amount with two decimal places.
/// Example: 50 -> "50.00", 9.995 -> "10.00", -12.3 -> "-12.30"
pub fn format_amount(amount: Amount) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Parse a decimal string into an amount.
/// Accepts "50", "50.00", ".5", "-3.25" and scientific forms such as "1e2".
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    if let Ok(amount) = Decimal::from_str(input) {
        return Ok(amount);
    }

    if input.contains(['e', 'E']) {
        return Decimal::from_scientific(input).map_err(|_| ParseAmountError::InvalidFormat);
    }

    Err(ParseAmountError::InvalidFormat)
}

/// Permissive counterpart of [`parse_amount`]: anything that does not parse,
/// or parses to a negative value, counts as zero. This is what live totals
/// use while a line is being typed.
pub fn coerce_amount(input: Option<&str>) -> Amount {
    input
        .and_then(|s| parse_amount(s).ok())
        .filter(|amount| amount.is_sign_positive())
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
