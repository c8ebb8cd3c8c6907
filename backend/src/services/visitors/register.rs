//! # Visitor Registration Service
//!
//! Backend logic for `POST /api/visitors/register`.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives the registration payload and
//!     validates the contact fields.
//!
//! 2.  **Identification**: a unique visitor code is minted, probing the
//!     database for collisions. Failure here is fatal: no visitor record is
//!     ever created without a code.
//!
//! 3.  **Barcode**: the code is expanded into its pattern grid, rasterized,
//!     and the JPEG is written to the artifact store. A failure in this step
//!     degrades the registration instead of aborting it — the record is
//!     persisted without an artifact path, and the store regenerates the
//!     image on first retrieval.
//!
//! 4.  **Persistence**: the visitor row is inserted. A duplicate-code
//!     failure from the UNIQUE constraint (two registrations racing the same
//!     candidate) re-enters code generation under the same bounded retry
//!     budget rather than surfacing a duplicate-key error.
//!
//! 5.  **Notification**: delivery of the code and barcode link is handed to
//!     the configured notifier on a spawned task. Any failure there is
//!     logged and absorbed; the visitor is already durably registered and
//!     the HTTP response never depends on delivery.

use actix_web::{web, HttpResponse, Responder};
use common::model::visitor::Visitor;
use common::requests::RegisterVisitorRequest;
use log::{error, info, warn};
use regex::Regex;

use crate::barcode::store::BarcodeStore;
use crate::barcode::{code, pattern, render, BarcodeError};
use crate::config::AppConfig;
use crate::db;
use crate::notify::Notifier;

pub async fn process(
    cfg: web::Data<AppConfig>,
    store: web::Data<BarcodeStore>,
    notifier: web::Data<Notifier>,
    payload: web::Json<RegisterVisitorRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    if let Err(reason) = validate_contact(&req.name, &req.mobile) {
        return HttpResponse::BadRequest().body(reason);
    }

    match register_visitor(&cfg, &store, &req) {
        Ok(visitor) => {
            notify_registered(cfg, notifier, &visitor);
            HttpResponse::Created().json(visitor)
        }
        Err(e) => HttpResponse::ServiceUnavailable()
            .body(format!("Error registering visitor: {}", e)),
    }
}

/// Shared contact-field validation, also used by the update route.
pub(crate) fn validate_contact(name: &str, mobile: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Visitor name must not be empty".to_string());
    }
    let mobile_re = Regex::new(r"^[0-9]{10}$").map_err(|e| format!("Regex error: {}", e))?;
    if !mobile_re.is_match(mobile.trim()) {
        return Err("Mobile must be a 10-digit number".to_string());
    }
    Ok(())
}

fn register_visitor(
    cfg: &AppConfig,
    store: &BarcodeStore,
    req: &RegisterVisitorRequest,
) -> Result<Visitor, BarcodeError> {
    let name = req.name.trim();
    let mobile = req.mobile.trim();

    for attempt in 1..=code::MAX_ATTEMPTS {
        let code = code::generate(|candidate| {
            db::code_exists(&cfg.db_path, candidate)
                .map_err(|e| BarcodeError::Storage(e.to_string()))
        })?;

        let barcode_path = match build_artifact(store, &code) {
            Ok(path) => Some(path),
            Err(e) => {
                error!(
                    "barcode rendering for {} failed, registering without artifact: {}",
                    code, e
                );
                None
            }
        };

        match db::insert_visitor(&cfg.db_path, name, mobile, &code, barcode_path.as_deref()) {
            Ok(visitor) => {
                info!("registered visitor {} with code {}", visitor.id, visitor.code);
                return Ok(visitor);
            }
            Err(e) if db::is_unique_violation(&e) => {
                // Lost the generate/check/insert race; mint a fresh code.
                warn!(
                    "code {} collided at insert (attempt {}), retrying",
                    code, attempt
                );
            }
            Err(e) => return Err(BarcodeError::Storage(e.to_string())),
        }
    }

    Err(BarcodeError::GenerationExhausted {
        attempts: code::MAX_ATTEMPTS,
    })
}

fn build_artifact(store: &BarcodeStore, code: &str) -> Result<String, BarcodeError> {
    let grid = pattern::synthesize(code);
    let bytes = render::rasterize(&grid, code)?;
    let path = store.save(code, &bytes)?;
    Ok(path.to_string_lossy().into_owned())
}

/// Hands the fresh registration to the notification channel. Best-effort by
/// contract: failures are logged here and never reach the caller.
fn notify_registered(
    cfg: web::Data<AppConfig>,
    notifier: web::Data<Notifier>,
    visitor: &Visitor,
) {
    let destination = visitor.mobile.clone();
    let label = visitor.code.clone();
    let artifact_url = format!(
        "{}/api/visitors/barcode/{}",
        cfg.public_base_url.trim_end_matches('/'),
        visitor.id
    );
    tokio::spawn(async move {
        match notifier.send(&destination, &label, &artifact_url).await {
            Ok(()) => info!("notification sent for code {}", label),
            Err(e) => warn!("notification for code {} failed: {}", label, e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            db_path: dir
                .path()
                .join("visitors.sqlite")
                .to_string_lossy()
                .into_owned(),
            barcode_dir: dir.path().join("barcodes").to_string_lossy().into_owned(),
            ..AppConfig::default()
        }
    }

    macro_rules! test_app {
        ($cfg:expr) => {{
            db::init(&$cfg.db_path).unwrap();
            let store = BarcodeStore::new($cfg.barcode_dir.clone(), $cfg.db_path.clone());
            test::init_service(
                App::new()
                    .app_data(web::Data::new($cfg.clone()))
                    .app_data(web::Data::new(store))
                    .app_data(web::Data::new(Notifier::NoopLogger))
                    .service(crate::services::visitors::configure_routes()),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn register_creates_coded_visitor_with_artifact() {
        let dir = TempDir::new().unwrap();
        let cfg = test_config(&dir);
        let app = test_app!(cfg);

        let req = test::TestRequest::post()
            .uri("/api/visitors/register")
            .set_json(serde_json::json!({ "name": "Asha", "mobile": "9000000000" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let visitor: Visitor = test::read_body_json(resp).await;
        let re = Regex::new(r"^VIS\d{8}[A-Z0-9]{8}$").unwrap();
        assert!(re.is_match(&visitor.code), "bad code: {}", visitor.code);
        assert_eq!(visitor.name, "Asha");

        let artifact = visitor.barcode_path.expect("artifact path missing");
        assert!(std::path::Path::new(&artifact).exists());

        // the artifact is retrievable through the barcode endpoint
        let req = test::TestRequest::get()
            .uri(&format!("/api/visitors/barcode/{}", visitor.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "image/jpeg"
        );
        let body = test::read_body(resp).await;
        assert_eq!(&body[..2], &[0xFF, 0xD8]);
    }

    #[actix_web::test]
    async fn register_rejects_invalid_mobile() {
        let dir = TempDir::new().unwrap();
        let cfg = test_config(&dir);
        let app = test_app!(cfg);

        let req = test::TestRequest::post()
            .uri("/api/visitors/register")
            .set_json(serde_json::json!({ "name": "Asha", "mobile": "12345" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn register_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let cfg = test_config(&dir);
        let app = test_app!(cfg);

        let req = test::TestRequest::post()
            .uri("/api/visitors/register")
            .set_json(serde_json::json!({ "name": "  ", "mobile": "9000000000" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn repeated_registrations_get_distinct_codes() {
        let dir = TempDir::new().unwrap();
        let cfg = test_config(&dir);
        let app = test_app!(cfg);

        let mut codes = Vec::new();
        for i in 0..3 {
            let req = test::TestRequest::post()
                .uri("/api/visitors/register")
                .set_json(serde_json::json!({
                    "name": format!("Visitor {}", i),
                    "mobile": "9000000000",
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let visitor: Visitor = test::read_body_json(resp).await;
            codes.push(visitor.code);
        }
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 3, "codes collided: {:?}", codes);
    }

    #[::core::prelude::v1::test]
    fn contact_validation() {
        assert!(validate_contact("Asha", "9000000000").is_ok());
        assert!(validate_contact("", "9000000000").is_err());
        assert!(validate_contact("Asha", "900000000").is_err());
        assert!(validate_contact("Asha", "90000000000").is_err());
        assert!(validate_contact("Asha", "9oooooooo0").is_err());
    }
}
