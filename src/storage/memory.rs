// In-process store implementing every repository trait.
//
// All tables live behind one async mutex, so each trait call is atomic in
// the same way a MySQL transaction is: a failing call leaves nothing
// behind. Used for local runs (`STORAGE_BACKEND=memory`) and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::{AppError, BillingPeriod, Result};
use crate::modules::invoices::models::{NewRentInvoice, RentInvoice};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::properties::models::{
    validate_llc_name, Llc, NewProperty, Property, Unit, UnitFields,
};
use crate::modules::properties::repositories::PropertyRepository;
use crate::modules::transactions::models::{InvoiceStatement, PaymentTransaction};
use crate::modules::transactions::repositories::{Settle, TransactionRepository};

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    llcs: BTreeMap<i64, Llc>,
    properties: BTreeMap<i64, Property>,
    units: BTreeMap<i64, Unit>,
    invoices: BTreeMap<i64, RentInvoice>,
    transactions: BTreeMap<i64, PaymentTransaction>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn has_invoice_for(&self, unit_id: i64, period: BillingPeriod) -> bool {
        self.invoices
            .values()
            .any(|invoice| invoice.unit_id == unit_id && invoice.period() == period)
    }

    fn transactions_for(&self, invoice_id: i64) -> Vec<PaymentTransaction> {
        self.transactions
            .values()
            .filter(|t| t.rent_invoice_id == invoice_id)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts as (units, invoices, transactions)
    pub async fn counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.lock().await;
        (
            tables.units.len(),
            tables.invoices.len(),
            tables.transactions.len(),
        )
    }
}

#[async_trait]
impl PropertyRepository for MemoryStore {
    async fn create_llc(&self, name: &str) -> Result<Llc> {
        validate_llc_name(name)?;

        let mut tables = self.tables.lock().await;
        let llc = Llc {
            id: tables.next_id(),
            name: name.trim().to_string(),
        };
        tables.llcs.insert(llc.id, llc.clone());
        Ok(llc)
    }

    async fn create_property(&self, property: &NewProperty) -> Result<Property> {
        property.validate()?;

        let mut tables = self.tables.lock().await;
        if !tables.llcs.contains_key(&property.llc_id) {
            return Err(AppError::not_found(format!("LLC {}", property.llc_id)));
        }

        let created = Property {
            id: tables.next_id(),
            llc_id: property.llc_id,
            name: property.name.clone(),
            address: property.address.clone(),
        };
        tables.properties.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_property(&self, id: i64) -> Result<Option<Property>> {
        Ok(self.tables.lock().await.properties.get(&id).cloned())
    }

    async fn create_unit(&self, property_id: i64, fields: &UnitFields) -> Result<Unit> {
        fields.validate()?;

        let mut tables = self.tables.lock().await;
        if !tables.properties.contains_key(&property_id) {
            return Err(AppError::not_found(format!("Property {}", property_id)));
        }

        let id = tables.next_id();
        let unit = fields.clone().into_unit(id, property_id);
        tables.units.insert(id, unit.clone());
        Ok(unit)
    }

    async fn find_unit(&self, id: i64) -> Result<Option<Unit>> {
        Ok(self.tables.lock().await.units.get(&id).cloned())
    }

    async fn update_unit(&self, id: i64, fields: &UnitFields) -> Result<Unit> {
        fields.validate()?;

        let mut tables = self.tables.lock().await;
        let unit = tables
            .units
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Unit {}", id)))?;

        *unit = fields.clone().into_unit(id, unit.property_id);
        Ok(unit.clone())
    }

    async fn delete_unit(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.lock().await;
        if tables.units.remove(&id).is_none() {
            return Err(AppError::not_found(format!("Unit {}", id)));
        }

        let invoice_ids: Vec<i64> = tables
            .invoices
            .values()
            .filter(|invoice| invoice.unit_id == id)
            .map(|invoice| invoice.id)
            .collect();

        tables
            .transactions
            .retain(|_, t| !invoice_ids.contains(&t.rent_invoice_id));
        tables.invoices.retain(|_, invoice| invoice.unit_id != id);

        tracing::info!(unit_id = id, invoices = invoice_ids.len(), "Deleted unit");
        Ok(())
    }

    async fn list_units_for_property(&self, property_id: i64) -> Result<Vec<Unit>> {
        Ok(self
            .tables
            .lock()
            .await
            .units
            .values()
            .filter(|unit| unit.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn list_units(&self) -> Result<Vec<Unit>> {
        let tables = self.tables.lock().await;
        let mut units: Vec<Unit> = tables.units.values().cloned().collect();
        units.sort_by_key(|unit| (unit.property_id, unit.id));
        Ok(units)
    }
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<RentInvoice>> {
        Ok(self.tables.lock().await.invoices.get(&id).cloned())
    }

    async fn find_for_period(
        &self,
        unit_id: i64,
        period: BillingPeriod,
    ) -> Result<Option<RentInvoice>> {
        Ok(self
            .tables
            .lock()
            .await
            .invoices
            .values()
            .find(|invoice| invoice.unit_id == unit_id && invoice.period() == period)
            .cloned())
    }

    async fn list_for_unit(&self, unit_id: i64) -> Result<Vec<RentInvoice>> {
        let tables = self.tables.lock().await;
        let mut invoices: Vec<RentInvoice> = tables
            .invoices
            .values()
            .filter(|invoice| invoice.unit_id == unit_id)
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.due_date.cmp(&a.due_date).then(b.id.cmp(&a.id)));
        Ok(invoices)
    }

    async fn insert_missing(&self, invoices: &[NewRentInvoice]) -> Result<Vec<RentInvoice>> {
        let mut tables = self.tables.lock().await;

        // Check every parent before writing so a bad batch inserts nothing
        if let Some(orphan) = invoices
            .iter()
            .find(|invoice| !tables.units.contains_key(&invoice.unit_id))
        {
            return Err(AppError::not_found(format!("Unit {}", orphan.unit_id)));
        }

        let mut created = Vec::new();
        for invoice in invoices {
            if tables.has_invoice_for(invoice.unit_id, invoice.period()) {
                continue;
            }

            let id = tables.next_id();
            let stored = invoice.clone().into_invoice(id);
            tables.invoices.insert(id, stored.clone());
            created.push(stored);
        }

        Ok(created)
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn list_for_invoice(&self, invoice_id: i64) -> Result<Vec<PaymentTransaction>> {
        Ok(self.tables.lock().await.transactions_for(invoice_id))
    }

    async fn post_payment(&self, invoice_id: i64, settle: &Settle<'_>) -> Result<InvoiceStatement> {
        let mut tables = self.tables.lock().await;

        let mut invoice = tables
            .invoices
            .get(&invoice_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Rent invoice {}", invoice_id)))?;
        let mut transactions = tables.transactions_for(invoice_id);

        let settlement = settle(&invoice, &transactions)?;

        for entry in settlement.entries {
            let id = tables.next_id();
            let transaction = entry.into_transaction(id, invoice_id);
            tables.transactions.insert(id, transaction.clone());
            transactions.push(transaction);
        }

        invoice.status = settlement.status;
        tables.invoices.insert(invoice_id, invoice.clone());

        Ok(InvoiceStatement {
            invoice,
            transactions,
        })
    }
}
