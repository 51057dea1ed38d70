// Late-fee policy: 5-day grace, then $5 per day capped at $50

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rentroll::transactions::services::late_fee;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

#[test]
fn test_no_fee_when_paid_before_due_date() {
    assert_eq!(late_fee(jan(10), jan(5), dec!(1000)), Decimal::ZERO);
}

#[test]
fn test_no_fee_on_due_date() {
    assert_eq!(late_fee(jan(10), jan(10), dec!(1000)), Decimal::ZERO);
}

#[test]
fn test_no_fee_on_last_grace_day() {
    assert_eq!(late_fee(jan(10), jan(15), dec!(1000)), Decimal::ZERO);
}

#[test]
fn test_fee_starts_after_grace() {
    assert_eq!(late_fee(jan(10), jan(16), dec!(1000)), dec!(5));
    assert_eq!(late_fee(jan(10), jan(17), dec!(1000)), dec!(10));
}

#[test]
fn test_fee_reaches_cap() {
    // 15 days late: 10 chargeable days hit the cap exactly
    assert_eq!(late_fee(jan(10), jan(25), dec!(1000)), dec!(50));
    assert_eq!(late_fee(jan(10), jan(30), dec!(1000)), dec!(50));
}

#[test]
fn test_fee_spans_month_boundary() {
    let due = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let paid = NaiveDate::from_ymd_opt(2024, 2, 7).unwrap();
    assert_eq!(late_fee(due, paid, dec!(800)), dec!(10));
}

#[test]
fn test_rent_amount_does_not_change_fee() {
    assert_eq!(
        late_fee(jan(10), jan(18), dec!(500)),
        late_fee(jan(10), jan(18), dec!(5000))
    );
}

proptest! {
    /// Property: fee is always between 0 and the cap
    #[test]
    fn prop_fee_is_bounded(days in -60i64..400i64) {
        let due = jan(10);
        let paid = if days >= 0 {
            due.checked_add_days(Days::new(days as u64)).unwrap()
        } else {
            due.checked_sub_days(Days::new(days.unsigned_abs())).unwrap()
        };

        let fee = late_fee(due, paid, dec!(1000));
        prop_assert!(fee >= Decimal::ZERO);
        prop_assert!(fee <= dec!(50));
    }

    /// Property: paying later never costs less
    #[test]
    fn prop_fee_is_monotonic(days in 0u64..100u64) {
        let due = jan(10);
        let earlier = due.checked_add_days(Days::new(days)).unwrap();
        let later = due.checked_add_days(Days::new(days + 1)).unwrap();

        prop_assert!(late_fee(due, later, dec!(1000)) >= late_fee(due, earlier, dec!(1000)));
    }
}
