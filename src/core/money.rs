use rust_decimal::Decimal;

use crate::core::{AppError, Result};

/// Decimal places stored for every money column
pub const MONEY_SCALE: u32 = 2;

/// Largest value a DECIMAL(12,2) column holds: 9,999,999,999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, MONEY_SCALE);

/// Check a positive money amount and bring it to cents.
///
/// Trailing zeros do not count against the scale, so `1000.000` is accepted
/// and returned as `1000.00`. `label` names the field in error messages.
pub fn validate_amount(label: &str, amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} must be greater than zero",
            label
        )));
    }

    if amount > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{} cannot exceed {}",
            label, MAX_AMOUNT
        )));
    }

    let mut cents = amount.normalize();
    if cents.scale() > MONEY_SCALE {
        return Err(AppError::validation(format!(
            "{} cannot have more than {} decimal places",
            label, MONEY_SCALE
        )));
    }

    cents.rescale(MONEY_SCALE);
    Ok(cents)
}
