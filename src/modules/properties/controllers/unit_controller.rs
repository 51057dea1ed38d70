use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::properties::repositories::PropertyRepository;

/// Remove a unit along with its invoices and their payments
/// DELETE /units/{id}
pub async fn delete_unit(
    properties: web::Data<Arc<dyn PropertyRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    properties.delete_unit(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure unit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/units/{id}").route(web::delete().to(delete_unit)));
}
