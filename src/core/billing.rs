use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;

use crate::core::{AppError, Result};

/// Highest day-of-month a unit may be configured to fall due on
pub const MAX_DUE_DAY: u32 = 31;

/// A calendar month for which at most one rent invoice exists per unit
///
/// Only built through `new`, `containing` and `next`, so `month` is always 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    /// Build a period, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation(format!(
                "Billing month must be between 1 and 12, got {}",
                month
            )));
        }

        // Reject years chrono cannot represent
        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::validation(format!("Billing year {} is out of range", year)))?;

        Ok(Self { year, month })
    }

    /// The period containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month; December rolls into January
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .unwrap_or(first)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::containing(date) == *self
    }

    /// Due date for a unit billed on `due_day` in this period.
    ///
    /// Days that do not exist in the month (31 in April, 30 in February)
    /// clamp to the month's last day.
    pub fn due_date(&self, due_day: u32) -> Result<NaiveDate> {
        validate_due_day(due_day)?;

        let last_day = self.last_day();
        if due_day >= last_day.day() {
            return Ok(last_day);
        }

        NaiveDate::from_ymd_opt(self.year, self.month, due_day).ok_or_else(|| {
            AppError::internal(format!(
                "Could not construct due date {}-{}-{}",
                self.year, self.month, due_day
            ))
        })
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Check that a configured due day is a plausible day of month
pub fn validate_due_day(due_day: u32) -> Result<()> {
    if !(1..=MAX_DUE_DAY).contains(&due_day) {
        return Err(AppError::validation(format!(
            "Rent due day must be between 1 and {}, got {}",
            MAX_DUE_DAY, due_day
        )));
    }
    Ok(())
}

/// Whole days from `earlier` to `later` (negative when `later` comes first)
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
