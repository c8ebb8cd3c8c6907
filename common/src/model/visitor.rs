use serde::{Deserialize, Serialize};

/// A registered visitor together with the identity assigned at registration time.
///
/// The `code` is minted exactly once, when the record is created, and is never
/// changed afterwards; contact fields may be edited later. `barcode_path` points
/// at the rendered barcode image and stays `None` until rasterization has
/// succeeded at least once — the image is regenerated from `code` on demand, so
/// a missing path never means the barcode is lost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visitor {
    /// Database row id.
    pub id: i64,
    pub name: String,
    pub mobile: String,
    /// Unique visitor code, e.g. `VIS20250814K7KQ2M9A`.
    pub code: String,
    /// Relative path of the rendered barcode image, if one has been written.
    pub barcode_path: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last contact-field update.
    pub updated_at: String,
}
