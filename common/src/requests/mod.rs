use serde::Deserialize;

/// Request payload for the visitor registration endpoint.
#[derive(Deserialize)]
pub struct RegisterVisitorRequest {
    pub name: String,
    pub mobile: String,
}

/// Request payload for updating a visitor's contact fields.
/// The visitor code is immutable and cannot be changed through this request.
#[derive(Deserialize)]
pub struct UpdateVisitorRequest {
    pub name: String,
    pub mobile: String,
}
