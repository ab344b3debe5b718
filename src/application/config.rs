use rust_decimal::Decimal;

use crate::domain::{Amount, DEFAULT_TOLERANCE, parse_amount};

use super::AppError;

/// Settings shared by every validation the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub tolerance: Amount,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ValidatorConfig {
    pub fn with_tolerance(tolerance: Amount) -> Result<Self, AppError> {
        if tolerance <= Decimal::ZERO {
            return Err(AppError::InvalidTolerance(format!(
                "{} (must be greater than zero)",
                tolerance
            )));
        }
        Ok(Self { tolerance })
    }

    /// Build from a command-line value such as "0.01".
    pub fn parse_tolerance(input: &str) -> Result<Self, AppError> {
        let tolerance =
            parse_amount(input).map_err(|e| AppError::InvalidTolerance(format!("{input}: {e}")))?;
        Self::with_tolerance(tolerance)
    }
}
