use actix_web::{web, Responder};
use common::requests::UpdateVisitorRequest;

use crate::config::AppConfig;
use crate::db;
use crate::services::visitors::register::validate_contact;

/// Actix web handler for `PUT /api/visitors/{visitor_id}`.
///
/// Only the contact fields change; the visitor code was minted once at
/// registration and never moves, so the barcode artifact stays valid.
pub async fn process(
    visitor_id: web::Path<i64>,
    cfg: web::Data<AppConfig>,
    payload: web::Json<UpdateVisitorRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    if let Err(reason) = validate_contact(&req.name, &req.mobile) {
        return actix_web::HttpResponse::BadRequest().body(reason);
    }

    match db::update_contact(
        &cfg.db_path,
        visitor_id.into_inner(),
        req.name.trim(),
        req.mobile.trim(),
    ) {
        Ok(Some(visitor)) => actix_web::HttpResponse::Ok().json(visitor),
        Ok(None) => actix_web::HttpResponse::NotFound().body("Visitor not found"),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error updating visitor: {}", e)),
    }
}
