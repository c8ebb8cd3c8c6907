//! # Barcode Retrieval Service
//!
//! Backend logic for `GET /api/visitors/barcode/{visitor_id}`.
//!
//! The stored artifact is served when present; a missing file is not an
//! error but a cache miss, healed by re-deriving the image from the
//! visitor's code before serving. Only when the store cannot produce bytes
//! at all does the client see a failure, as a 404 with the reason.

use actix_web::{web, Responder};

use crate::barcode::store::BarcodeStore;
use crate::config::AppConfig;
use crate::db;

pub async fn process(
    visitor_id: web::Path<i64>,
    cfg: web::Data<AppConfig>,
    store: web::Data<BarcodeStore>,
) -> impl Responder {
    let visitor = match db::get_visitor(&cfg.db_path, visitor_id.into_inner()) {
        Ok(Some(visitor)) => visitor,
        Ok(None) => return actix_web::HttpResponse::NotFound().body("Visitor not found"),
        Err(e) => {
            return actix_web::HttpResponse::ServiceUnavailable()
                .body(format!("Error retrieving visitor: {}", e))
        }
    };

    match store.read(&visitor.code) {
        Ok(bytes) => actix_web::HttpResponse::Ok()
            .content_type("image/jpeg")
            .insert_header((
                "Content-Disposition",
                format!("inline; filename=\"{}.jpg\"", visitor.code),
            ))
            .body(bytes),
        Err(e) => {
            actix_web::HttpResponse::NotFound().body(format!("Barcode unavailable: {}", e))
        }
    }
}
