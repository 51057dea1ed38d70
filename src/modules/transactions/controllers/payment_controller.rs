use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::transactions::models::{InvoiceStatementResponse, RecordPayment};
use crate::modules::transactions::services::PaymentLedger;

/// Record a tenant payment against one of the unit's invoices
/// POST /units/{id}/payments
///
/// Responds 201 with the invoice's updated statement. Not idempotent:
/// posting the same body twice records two payments.
pub async fn record_payment(
    ledger: web::Data<Arc<PaymentLedger>>,
    path: web::Path<i64>,
    request: web::Json<RecordPayment>,
) -> Result<HttpResponse, AppError> {
    let unit_id = path.into_inner();
    let statement = ledger
        .record_unit_payment(unit_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(InvoiceStatementResponse::from(statement)))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/units/{id}/payments").route(web::post().to(record_payment)));
}
