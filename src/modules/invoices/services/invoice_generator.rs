use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::{AppError, BillingPeriod, Result};
use crate::modules::invoices::models::{NewRentInvoice, RentInvoice};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::properties::models::Unit;
use crate::modules::properties::repositories::PropertyRepository;

/// Default number of days before a due date that its invoice may be issued
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 5;

/// Outcome of one generation run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Billing period targeted by the run
    pub period: String,
    pub units_considered: usize,
    /// Units whose next due date is still outside the look-ahead window
    pub not_yet_due: usize,
    /// Units that already had an invoice for the period
    pub already_invoiced: usize,
    pub created: Vec<RentInvoice>,
}

impl GenerationReport {
    fn new(period: BillingPeriod) -> Self {
        Self {
            period: period.to_string(),
            units_considered: 0,
            not_yet_due: 0,
            already_invoiced: 0,
            created: Vec::new(),
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

/// Invoice a unit would receive for `period`: due on its configured day
/// (clamped to the month's end) for its current rent
pub fn invoice_for(unit: &Unit, period: BillingPeriod) -> Result<NewRentInvoice> {
    let due_date = period.due_date(unit.rent_due_day)?;
    NewRentInvoice::new(unit.id, due_date, unit.rent_amount)
}

/// Whether `due_date` is close enough to `today` to invoice
pub fn is_within_lookahead(today: NaiveDate, due_date: NaiveDate, lookahead_days: u32) -> bool {
    match today.checked_add_days(Days::new(u64::from(lookahead_days))) {
        Some(horizon) => due_date <= horizon,
        None => true,
    }
}

/// Issues monthly rent invoices, at most one per unit and period
pub struct InvoiceGenerator {
    properties: Arc<dyn PropertyRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    lookahead_days: u32,
}

impl InvoiceGenerator {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        lookahead_days: u32,
    ) -> Self {
        Self {
            properties,
            invoices,
            lookahead_days,
        }
    }

    pub fn lookahead_days(&self) -> u32 {
        self.lookahead_days
    }

    /// Invoice `unit` for `period` unless it already has one. Returns the
    /// new invoice, or None when the period was already invoiced.
    pub async fn generate(&self, unit: &Unit, period: BillingPeriod) -> Result<Option<RentInvoice>> {
        let invoice = invoice_for(unit, period)?;
        let mut created = self.invoices.insert_missing(&[invoice]).await?;
        Ok(created.pop())
    }

    /// Invoice every unit of a property for the month containing `today`
    pub async fn generate_current_period(
        &self,
        property_id: i64,
        today: NaiveDate,
    ) -> Result<GenerationReport> {
        if self.properties.find_property(property_id).await?.is_none() {
            return Err(AppError::not_found(format!("Property {}", property_id)));
        }

        let period = BillingPeriod::containing(today);
        let units = self.properties.list_units_for_property(property_id).await?;

        let mut report = GenerationReport::new(period);
        report.units_considered = units.len();

        let batch = units
            .iter()
            .map(|unit| invoice_for(unit, period))
            .collect::<Result<Vec<_>>>()?;

        report.created = self.invoices.insert_missing(&batch).await?;
        report.already_invoiced = batch.len() - report.created.len();

        info!(
            property_id,
            period = %period,
            units = report.units_considered,
            created = report.created_count(),
            already_invoiced = report.already_invoiced,
            "Generated current-period rent invoices"
        );

        Ok(report)
    }

    /// Invoice next month's rent for every unit whose next due date falls
    /// within the look-ahead window of `today`. Safe to run repeatedly.
    pub async fn generate_upcoming(&self, today: NaiveDate) -> Result<GenerationReport> {
        let period = BillingPeriod::containing(today).next();
        let units = self.properties.list_units().await?;

        let mut report = GenerationReport::new(period);
        report.units_considered = units.len();

        let mut batch = Vec::new();
        for unit in &units {
            let invoice = invoice_for(unit, period)?;
            if is_within_lookahead(today, invoice.due_date, self.lookahead_days) {
                batch.push(invoice);
            } else {
                debug!(
                    unit_id = unit.id,
                    due_date = %invoice.due_date,
                    "Next invoice not yet due for generation"
                );
                report.not_yet_due += 1;
            }
        }

        report.created = self.invoices.insert_missing(&batch).await?;
        report.already_invoiced = batch.len() - report.created.len();

        info!(
            period = %period,
            units = report.units_considered,
            created = report.created_count(),
            already_invoiced = report.already_invoiced,
            not_yet_due = report.not_yet_due,
            "Generated upcoming rent invoices"
        );

        Ok(report)
    }
}
