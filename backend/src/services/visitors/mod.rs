//! # Visitor Service Module
//!
//! This module aggregates all API endpoints related to visitor registration
//! and barcode retrieval. It acts as a router, directing incoming HTTP
//! requests under the `/api/visitors` path to the handler logic defined in
//! its sub-modules.
//!
//! ## Sub-modules:
//! - `register`: Creates a visitor record with a freshly minted unique code
//!   and its rendered barcode, then hands the result to the notification
//!   channel.
//! - `get`: Retrieves a single visitor record.
//! - `update`: Edits a visitor's contact fields (never the code).
//! - `barcode`: Serves the rendered barcode image, regenerating it first if
//!   the stored artifact has gone missing.

mod barcode;
mod get;
mod register;
mod update;

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

/// The base path for all visitor-related API endpoints.
const API_PATH: &str = "/api/visitors";

/// Configures and returns the Actix `Scope` for all visitor-related routes.
///
/// # Registered Routes:
///
/// *   **`POST /register`**:
///     - **Handler**: `register::process`
///     - **Description**: Registers a new visitor. Expects a JSON payload
///       with the visitor's name and 10-digit mobile number. Mints a unique
///       code, renders and stores the barcode image, persists the record,
///       and returns it with `201 Created`. Notification delivery is
///       attempted in the background and never affects the response.
///
/// *   **`GET /barcode/{visitor_id}`**:
///     - **Handler**: `barcode::process`
///     - **Description**: Serves the visitor's barcode as `image/jpeg` for
///       inline display. A missing artifact is regenerated from the stored
///       code before serving.
///
/// *   **`GET /{visitor_id}`**:
///     - **Handler**: `get::process`
///     - **Description**: Returns the visitor record as JSON.
///
/// *   **`PUT /{visitor_id}`**:
///     - **Handler**: `update::process`
///     - **Description**: Updates name and mobile only; the code and the
///       barcode artifact are immutable through this route.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/register", post().to(register::process))
        .route("/barcode/{visitor_id}", get().to(barcode::process))
        .route("/{visitor_id}", get().to(get::process))
        .route("/{visitor_id}", put().to(update::process))
}
