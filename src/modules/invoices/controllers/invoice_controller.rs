use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::invoices::services::InvoiceGenerator;
use crate::modules::transactions::models::InvoiceStatementResponse;
use crate::modules::transactions::services::PaymentLedger;

/// Query parameters for current-period generation
#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    /// Date whose month is invoiced; defaults to today (UTC)
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Issue this month's invoices for every unit of a property
/// POST /properties/{id}/rent-invoices/generate
pub async fn generate_for_property(
    generator: web::Data<Arc<InvoiceGenerator>>,
    path: web::Path<i64>,
    query: web::Query<GenerateQuery>,
) -> Result<HttpResponse, AppError> {
    let property_id = path.into_inner();
    let today = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let report = generator.generate_current_period(property_id, today).await?;

    Ok(HttpResponse::Ok().json(report))
}

/// A unit's invoices, newest first, with payments and balances
/// GET /units/{id}/rent-invoices
pub async fn list_unit_invoices(
    ledger: web::Data<Arc<PaymentLedger>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let statements = ledger.unit_statements(path.into_inner()).await?;

    let body: Vec<InvoiceStatementResponse> = statements
        .into_iter()
        .map(InvoiceStatementResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Configure rent invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/properties/{id}/rent-invoices/generate")
            .route(web::post().to(generate_for_property)),
    )
    .service(
        web::resource("/units/{id}/rent-invoices").route(web::get().to(list_unit_invoices)),
    );
}
