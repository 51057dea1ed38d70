use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::billing::days_between;

/// Days after the due date during which no fee accrues
pub const GRACE_PERIOD_DAYS: i64 = 5;

/// Fee charged per day late once the grace period has passed
pub const DAILY_LATE_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Ceiling on the late fee for a single payment
pub const MAX_LATE_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Late fee owed for a payment made on `payment_date` against rent due on
/// `due_date`.
///
/// `rent_amount` does not influence the fee; it is accepted so a
/// percentage-based policy can be dropped in without changing callers.
pub fn late_fee(due_date: NaiveDate, payment_date: NaiveDate, _rent_amount: Decimal) -> Decimal {
    let days_late = days_between(due_date, payment_date);
    if days_late <= GRACE_PERIOD_DAYS {
        return Decimal::ZERO;
    }

    let fee = Decimal::from(days_late - GRACE_PERIOD_DAYS) * DAILY_LATE_FEE;
    fee.min(MAX_LATE_FEE)
}

/// Whole days the payment falls after the due date, zero when on time
pub fn days_late(due_date: NaiveDate, payment_date: NaiveDate) -> i64 {
    days_between(due_date, payment_date).max(0)
}
