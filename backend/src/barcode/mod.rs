//! Deterministic visual code subsystem.
//!
//! A visitor's code is minted once (`code`), expanded into a fixed boolean
//! grid (`pattern`), rendered to a JPEG (`render`) and kept on disk keyed by
//! the code itself (`store`). Everything downstream of the code is a pure
//! derivation, so artifacts can always be rebuilt from the record alone.

pub mod code;
pub mod pattern;
pub mod render;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BarcodeError {
    /// Identifier generation kept colliding past the retry budget.
    #[error("identifier generation exhausted after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    /// Drawing or encoding the barcode image failed.
    #[error("rasterization failed: {0}")]
    RasterizationFailed(String),

    /// The backing store could not serve the artifact even after a
    /// regeneration attempt.
    #[error("barcode artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    /// Identifier store or artifact store access failed.
    #[error("storage error: {0}")]
    Storage(String),
}
