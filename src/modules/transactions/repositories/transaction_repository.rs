use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::invoices::models::RentInvoice;
use crate::modules::invoices::repositories::{RentInvoiceRow, INVOICE_COLUMNS};
use crate::modules::transactions::models::{InvoiceStatement, PaymentTransaction, Settlement};

/// Decides what a payment does to a locked invoice, given the invoice and
/// the transactions already posted against it
pub type Settle<'a> = dyn Fn(&RentInvoice, &[PaymentTransaction]) -> Result<Settlement> + Send + Sync + 'a;

/// Append-only storage for payment transactions
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Transactions for an invoice, oldest first
    async fn list_for_invoice(&self, invoice_id: i64) -> Result<Vec<PaymentTransaction>>;

    /// Post a payment atomically.
    ///
    /// The invoice is locked, its transaction history read and handed to
    /// `settle`; the resulting entries are appended and the invoice status
    /// updated before the lock is released. If `settle` fails nothing is
    /// written.
    async fn post_payment(&self, invoice_id: i64, settle: &Settle<'_>) -> Result<InvoiceStatement>;
}

const TRANSACTION_COLUMNS: &str =
    "id, rent_invoice_id, amount, payment_date, payment_method, notes";

pub struct MySqlTransactionRepository {
    pool: MySqlPool,
}

impl MySqlTransactionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for MySqlTransactionRepository {
    async fn list_for_invoice(&self, invoice_id: i64) -> Result<Vec<PaymentTransaction>> {
        let transactions = sqlx::query_as::<_, PaymentTransaction>(&format!(
            "SELECT {} FROM payment_transactions WHERE rent_invoice_id = ? ORDER BY id",
            TRANSACTION_COLUMNS
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn post_payment(&self, invoice_id: i64, settle: &Settle<'_>) -> Result<InvoiceStatement> {
        let mut tx = self.pool.begin().await?;

        // Serialises concurrent payments against the same invoice
        let row = sqlx::query_as::<_, RentInvoiceRow>(&format!(
            "SELECT {} FROM rent_invoices WHERE id = ? FOR UPDATE",
            INVOICE_COLUMNS
        ))
        .bind(invoice_id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut invoice = match row {
            Some(row) => RentInvoice::try_from(row)?,
            None => return Err(AppError::not_found(format!("Rent invoice {}", invoice_id))),
        };

        let mut transactions = sqlx::query_as::<_, PaymentTransaction>(&format!(
            "SELECT {} FROM payment_transactions WHERE rent_invoice_id = ? ORDER BY id",
            TRANSACTION_COLUMNS
        ))
        .bind(invoice_id)
        .fetch_all(&mut *tx)
        .await?;

        let settlement = settle(&invoice, &transactions)?;

        for entry in settlement.entries {
            let result = sqlx::query(
                r#"
                INSERT INTO payment_transactions (
                    rent_invoice_id, amount, payment_date, payment_method, notes
                ) VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(invoice_id)
            .bind(entry.amount)
            .bind(entry.payment_date)
            .bind(&entry.payment_method)
            .bind(&entry.notes)
            .execute(&mut *tx)
            .await?;

            transactions.push(entry.into_transaction(result.last_insert_id() as i64, invoice_id));
        }

        sqlx::query("UPDATE rent_invoices SET status = ? WHERE id = ?")
            .bind(settlement.status.to_string())
            .bind(invoice_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        invoice.status = settlement.status;
        Ok(InvoiceStatement {
            invoice,
            transactions,
        })
    }
}
