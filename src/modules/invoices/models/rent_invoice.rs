// Rent invoice model
//
// A rent invoice is one billing period's rent obligation for a unit.
// At most one invoice exists per (unit, calendar month); the store
// enforces this with a unique key on the billing period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{validate_amount, BillingPeriod, Result};

/// Payment status of a rent invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Issued, nothing received yet
    Unpaid,

    /// Some money received, balance outstanding
    Partial,

    /// Received in full, on time
    Paid,

    /// A payment was recorded after the due date (overrides Paid and Partial)
    Late,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Unpaid
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Unpaid => write!(f, "Unpaid"),
            InvoiceStatus::Partial => write!(f, "Partial"),
            InvoiceStatus::Paid => write!(f, "Paid"),
            InvoiceStatus::Late => write!(f, "Late"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(InvoiceStatus::Unpaid),
            "Partial" => Ok(InvoiceStatus::Partial),
            "Paid" => Ok(InvoiceStatus::Paid),
            "Late" => Ok(InvoiceStatus::Late),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// A persisted rent invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentInvoice {
    pub id: i64,
    pub unit_id: i64,
    pub due_date: NaiveDate,
    /// Rent owed for the period, copied from the unit when issued
    pub amount: Decimal,
    pub status: InvoiceStatus,
}

impl RentInvoice {
    /// Billing period the invoice covers
    pub fn period(&self) -> BillingPeriod {
        BillingPeriod::containing(self.due_date)
    }
}

/// An invoice waiting to be inserted; always starts out Unpaid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRentInvoice {
    pub unit_id: i64,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

impl NewRentInvoice {
    pub fn new(unit_id: i64, due_date: NaiveDate, amount: Decimal) -> Result<Self> {
        let amount = validate_amount(&format!("Invoice amount for unit {}", unit_id), amount)?;

        Ok(Self {
            unit_id,
            due_date,
            amount,
        })
    }

    pub fn period(&self) -> BillingPeriod {
        BillingPeriod::containing(self.due_date)
    }

    pub(crate) fn into_invoice(self, id: i64) -> RentInvoice {
        RentInvoice {
            id,
            unit_id: self.unit_id,
            due_date: self.due_date,
            amount: self.amount,
            status: InvoiceStatus::Unpaid,
        }
    }
}
