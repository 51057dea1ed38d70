//! Service graph shared by every HTTP worker

use std::sync::Arc;

use actix_web::web;

use crate::middleware::{json_error_handler, path_error_handler, query_error_handler};
use crate::modules::invoices::services::InvoiceGenerator;
use crate::modules::transactions::services::PaymentLedger;
use crate::modules::{health, invoices, properties, transactions};
use crate::storage::Storage;

/// Repositories plus the services built on them
#[derive(Clone)]
pub struct AppServices {
    pub storage: Storage,
    pub generator: Arc<InvoiceGenerator>,
    pub ledger: Arc<PaymentLedger>,
}

impl AppServices {
    pub fn new(storage: Storage, lookahead_days: u32) -> Self {
        let generator = Arc::new(InvoiceGenerator::new(
            storage.properties.clone(),
            storage.invoices.clone(),
            lookahead_days,
        ));
        let ledger = Arc::new(PaymentLedger::new(
            storage.properties.clone(),
            storage.invoices.clone(),
            storage.transactions.clone(),
        ));

        Self {
            storage,
            generator,
            ledger,
        }
    }

    /// Register app data, extractor error handlers and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.storage.properties.clone()))
            .app_data(web::Data::new(self.generator.clone()))
            .app_data(web::Data::new(self.ledger.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .configure(health::controllers::configure)
            .configure(invoices::controllers::configure)
            .configure(transactions::controllers::configure)
            .configure(properties::controllers::configure);
    }
}
