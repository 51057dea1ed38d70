use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::late_fee::{days_late, late_fee};
use crate::core::{AppError, Result};
use crate::modules::invoices::models::{InvoiceStatus, RentInvoice};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::properties::repositories::PropertyRepository;
use crate::modules::transactions::models::{
    total_paid, InvoiceStatement, NewPaymentTransaction, PaymentTransaction, RecordPayment,
    Settlement, LATE_FEE_METHOD,
};
use crate::modules::transactions::repositories::TransactionRepository;

/// Status of an invoice after a payment dated `payment_date`.
///
/// Fully paid gives Paid, anything received gives Partial. A payment made
/// after the due date marks the invoice Late regardless, even when it
/// settles the balance.
pub fn derive_status(
    invoice: &RentInvoice,
    total_paid: Decimal,
    payment_date: NaiveDate,
) -> InvoiceStatus {
    let mut status = if total_paid >= invoice.amount {
        InvoiceStatus::Paid
    } else if total_paid > Decimal::ZERO {
        InvoiceStatus::Partial
    } else {
        invoice.status
    };

    if payment_date > invoice.due_date {
        status = InvoiceStatus::Late;
    }

    status
}

/// Work out the transactions a payment appends and the resulting status
pub fn settle(
    invoice: &RentInvoice,
    existing: &[PaymentTransaction],
    payment: &RecordPayment,
) -> Settlement {
    let fee = late_fee(invoice.due_date, payment.payment_date, invoice.amount);

    let mut entries = vec![payment.to_transaction()];
    if fee > Decimal::ZERO {
        entries.push(NewPaymentTransaction {
            amount: fee,
            payment_date: payment.payment_date,
            payment_method: LATE_FEE_METHOD.to_string(),
            notes: Some(format!(
                "Late fee for {} days late",
                days_late(invoice.due_date, payment.payment_date)
            )),
        });
    }

    let paid = total_paid(existing) + entries.iter().map(|e| e.amount).sum::<Decimal>();
    let status = derive_status(invoice, paid, payment.payment_date);

    Settlement {
        entries,
        status,
        late_fee: fee,
    }
}

/// Records tenant payments against rent invoices and reports balances
pub struct PaymentLedger {
    properties: Arc<dyn PropertyRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl PaymentLedger {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            properties,
            invoices,
            transactions,
        }
    }

    /// Record a payment against an invoice, adding a late fee when the
    /// payment falls outside the grace period.
    ///
    /// Validation happens before anything is written. The payment, any fee
    /// and the status change commit together.
    pub async fn record_payment(&self, payment: RecordPayment) -> Result<InvoiceStatement> {
        let payment = payment.validated()?;
        let invoice_id = payment.rent_invoice_id;

        let plan = |invoice: &RentInvoice, existing: &[PaymentTransaction]| -> Result<Settlement> {
            Ok(settle(invoice, existing, &payment))
        };
        let statement = self.transactions.post_payment(invoice_id, &plan).await?;

        let fee = late_fee(
            statement.invoice.due_date,
            payment.payment_date,
            statement.invoice.amount,
        );

        info!(
            invoice_id,
            amount = %payment.amount,
            late_fee = %fee,
            status = %statement.invoice.status,
            balance_due = %statement.balance_due(),
            "Recorded rent payment"
        );

        Ok(statement)
    }

    /// Record a payment made by a specific unit's tenant. The invoice must
    /// belong to that unit.
    pub async fn record_unit_payment(
        &self,
        unit_id: i64,
        payment: RecordPayment,
    ) -> Result<InvoiceStatement> {
        let payment = payment.validated()?;

        match self.invoices.find_by_id(payment.rent_invoice_id).await? {
            Some(invoice) if invoice.unit_id == unit_id => {}
            _ => {
                return Err(AppError::not_found(format!(
                    "Rent invoice {} for unit {}",
                    payment.rent_invoice_id, unit_id
                )))
            }
        }

        self.record_payment(payment).await
    }

    /// Invoice with its transactions and derived totals
    pub async fn statement(&self, invoice_id: i64) -> Result<InvoiceStatement> {
        let invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Rent invoice {}", invoice_id)))?;

        let transactions = self.transactions.list_for_invoice(invoice_id).await?;

        Ok(InvoiceStatement {
            invoice,
            transactions,
        })
    }

    /// Every invoice for a unit, newest first, each with its transactions
    pub async fn unit_statements(&self, unit_id: i64) -> Result<Vec<InvoiceStatement>> {
        if self.properties.find_unit(unit_id).await?.is_none() {
            return Err(AppError::not_found(format!("Unit {}", unit_id)));
        }

        let invoices = self.invoices.list_for_unit(unit_id).await?;
        debug!(unit_id, invoice_count = invoices.len(), "Loading unit statements");

        let mut statements = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            let transactions = self.transactions.list_for_invoice(invoice.id).await?;
            statements.push(InvoiceStatement {
                invoice,
                transactions,
            });
        }

        Ok(statements)
    }
}
