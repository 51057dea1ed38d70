// Rent invoice persistence
//
// The (unit_id, billing_year, billing_month) unique key is the only guard
// against duplicate invoices. Batch inserts rely on it instead of checking
// for an existing row first, so concurrent generators cannot race each
// other into issuing two invoices for one period.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, BillingPeriod, Result};
use crate::modules::invoices::models::{InvoiceStatus, NewRentInvoice, RentInvoice};

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<RentInvoice>>;

    async fn find_for_period(
        &self,
        unit_id: i64,
        period: BillingPeriod,
    ) -> Result<Option<RentInvoice>>;

    /// Invoices for a unit, newest due date first
    async fn list_for_unit(&self, unit_id: i64) -> Result<Vec<RentInvoice>>;

    /// Insert a batch in one transaction, skipping any (unit, period) that
    /// is already invoiced. Returns only the invoices actually created.
    ///
    /// A batch naming a missing unit fails with NotFound and inserts nothing.
    async fn insert_missing(&self, invoices: &[NewRentInvoice]) -> Result<Vec<RentInvoice>>;
}

pub(crate) const INVOICE_COLUMNS: &str = "id, unit_id, due_date, amount, status";

/// Row shape of `rent_invoices`; status is stored as its display text
#[derive(Debug, FromRow)]
pub(crate) struct RentInvoiceRow {
    pub id: i64,
    pub unit_id: i64,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub status: String,
}

impl TryFrom<RentInvoiceRow> for RentInvoice {
    type Error = AppError;

    fn try_from(row: RentInvoiceRow) -> Result<Self> {
        let status = row
            .status
            .parse::<InvoiceStatus>()
            .map_err(|e| AppError::internal(format!("Rent invoice {}: {}", row.id, e)))?;

        Ok(RentInvoice {
            id: row.id,
            unit_id: row.unit_id,
            due_date: row.due_date,
            amount: row.amount,
            status,
        })
    }
}

pub struct MySqlInvoiceRepository {
    pool: MySqlPool,
}

impl MySqlInvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for MySqlInvoiceRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<RentInvoice>> {
        let row = sqlx::query_as::<_, RentInvoiceRow>(&format!(
            "SELECT {} FROM rent_invoices WHERE id = ?",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RentInvoice::try_from).transpose()
    }

    async fn find_for_period(
        &self,
        unit_id: i64,
        period: BillingPeriod,
    ) -> Result<Option<RentInvoice>> {
        let row = sqlx::query_as::<_, RentInvoiceRow>(&format!(
            "SELECT {} FROM rent_invoices \
             WHERE unit_id = ? AND billing_year = ? AND billing_month = ?",
            INVOICE_COLUMNS
        ))
        .bind(unit_id)
        .bind(period.year())
        .bind(period.month())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RentInvoice::try_from).transpose()
    }

    async fn list_for_unit(&self, unit_id: i64) -> Result<Vec<RentInvoice>> {
        let rows = sqlx::query_as::<_, RentInvoiceRow>(&format!(
            "SELECT {} FROM rent_invoices WHERE unit_id = ? ORDER BY due_date DESC, id DESC",
            INVOICE_COLUMNS
        ))
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RentInvoice::try_from).collect()
    }

    async fn insert_missing(&self, invoices: &[NewRentInvoice]) -> Result<Vec<RentInvoice>> {
        if invoices.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(invoices.len());

        for invoice in invoices {
            let period = invoice.period();

            // A failed statement does not abort an InnoDB transaction, so a
            // duplicate can be skipped and the batch carries on
            let result = sqlx::query(
                r#"
                INSERT INTO rent_invoices (
                    unit_id, due_date, amount, status, billing_year, billing_month
                ) VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(invoice.unit_id)
            .bind(invoice.due_date)
            .bind(invoice.amount)
            .bind(InvoiceStatus::Unpaid.to_string())
            .bind(period.year())
            .bind(period.month())
            .execute(&mut *tx)
            .await;

            match result {
                Ok(done) => {
                    created.push(invoice.clone().into_invoice(done.last_insert_id() as i64));
                }
                Err(e) => {
                    if let Some(db_err) = e.as_database_error() {
                        if db_err.is_unique_violation() {
                            tracing::debug!(
                                unit_id = invoice.unit_id,
                                period = %period,
                                "Rent invoice already exists, skipping"
                            );
                            continue;
                        }
                        if db_err.is_foreign_key_violation() {
                            return Err(AppError::not_found(format!("Unit {}", invoice.unit_id)));
                        }
                    }
                    return Err(e.into());
                }
            }
        }

        tx.commit().await?;

        Ok(created)
    }
}
