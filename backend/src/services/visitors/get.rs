use actix_web::{web, Responder};

use crate::config::AppConfig;
use crate::db;

/// Actix web handler for `GET /api/visitors/{visitor_id}`.
///
/// # Returns
/// - `200 OK` with the `Visitor` object as a JSON payload on success.
/// - `404 Not Found` if no visitor has this id.
/// - `503 Service Unavailable` on a database error.
pub async fn process(
    visitor_id: web::Path<i64>,
    cfg: web::Data<AppConfig>,
) -> impl Responder {
    match db::get_visitor(&cfg.db_path, visitor_id.into_inner()) {
        Ok(Some(visitor)) => actix_web::HttpResponse::Ok().json(visitor),
        Ok(None) => actix_web::HttpResponse::NotFound().body("Visitor not found"),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error retrieving visitor: {}", e)),
    }
}
