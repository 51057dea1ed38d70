use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{validate_amount, AppError, Result};

/// Method label carried by late-fee transactions
pub const LATE_FEE_METHOD: &str = "Late Fee";

const MAX_METHOD_LEN: usize = 50;

/// One payment event applied to a rent invoice.
///
/// Transactions are append-only: once written they are never edited, and
/// they disappear only when their invoice is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PaymentTransaction {
    pub id: i64,
    pub rent_invoice_id: i64,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    /// Free-form label such as "Cash", "Check" or "Late Fee"
    pub payment_method: String,
    pub notes: Option<String>,
}

impl PaymentTransaction {
    pub fn is_late_fee(&self) -> bool {
        self.payment_method == LATE_FEE_METHOD
    }
}

/// A transaction waiting to be appended to an invoice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentTransaction {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub notes: Option<String>,
}

impl NewPaymentTransaction {
    pub(crate) fn into_transaction(self, id: i64, rent_invoice_id: i64) -> PaymentTransaction {
        PaymentTransaction {
            id,
            rent_invoice_id,
            amount: self.amount,
            payment_date: self.payment_date,
            payment_method: self.payment_method,
            notes: self.notes,
        }
    }
}

/// A tenant payment to record against an invoice
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordPayment {
    pub rent_invoice_id: i64,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecordPayment {
    /// Check the payment and normalise blank notes away
    pub fn validated(mut self) -> Result<Self> {
        self.amount = validate_amount("Payment amount", self.amount)?;

        let method = self.payment_method.trim();
        if method.is_empty() {
            return Err(AppError::validation("Payment method cannot be empty"));
        }
        if method.len() > MAX_METHOD_LEN {
            return Err(AppError::validation(format!(
                "Payment method cannot exceed {} characters",
                MAX_METHOD_LEN
            )));
        }
        self.payment_method = method.to_string();

        self.notes = self
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());

        Ok(self)
    }

    /// The tenant's own transaction, before any late fee
    pub fn to_transaction(&self) -> NewPaymentTransaction {
        NewPaymentTransaction {
            amount: self.amount,
            payment_date: self.payment_date,
            payment_method: self.payment_method.clone(),
            notes: self.notes.clone(),
        }
    }
}
