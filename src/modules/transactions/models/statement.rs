use rust_decimal::Decimal;
use serde::Serialize;

use super::payment_transaction::{NewPaymentTransaction, PaymentTransaction};
use crate::modules::invoices::models::{InvoiceStatus, RentInvoice};

/// What a recorded payment does to an invoice: the transactions to append
/// and the status the invoice ends up in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub entries: Vec<NewPaymentTransaction>,
    pub status: InvoiceStatus,
    pub late_fee: Decimal,
}

/// An invoice together with its full transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceStatement {
    pub invoice: RentInvoice,
    pub transactions: Vec<PaymentTransaction>,
}

impl InvoiceStatement {
    /// Sum of every transaction, late fees included
    pub fn total_paid(&self) -> Decimal {
        total_paid(&self.transactions)
    }

    pub fn balance_due(&self) -> Decimal {
        self.invoice.amount - self.total_paid()
    }

    pub fn is_fully_paid(&self) -> bool {
        self.total_paid() >= self.invoice.amount
    }
}

pub fn total_paid(transactions: &[PaymentTransaction]) -> Decimal {
    transactions.iter().map(|t| t.amount).sum()
}

/// JSON view of a statement with the derived totals filled in
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceStatementResponse {
    pub id: i64,
    pub unit_id: i64,
    pub due_date: String,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub total_paid: Decimal,
    pub balance_due: Decimal,
    pub is_fully_paid: bool,
    pub transactions: Vec<PaymentTransaction>,
}

impl From<InvoiceStatement> for InvoiceStatementResponse {
    fn from(statement: InvoiceStatement) -> Self {
        let total_paid = statement.total_paid();
        let balance_due = statement.balance_due();
        let is_fully_paid = statement.is_fully_paid();

        Self {
            id: statement.invoice.id,
            unit_id: statement.invoice.unit_id,
            due_date: statement.invoice.due_date.format("%Y-%m-%d").to_string(),
            amount: statement.invoice.amount,
            status: statement.invoice.status,
            total_paid,
            balance_due,
            is_fully_paid,
            transactions: statement.transactions,
        }
    }
}
