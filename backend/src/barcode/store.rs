//! Filesystem store for rendered barcode artifacts, keyed by visitor code.
//!
//! The artifact at `{dir}/{code}.jpg` is a pure derivation of `code`, so a
//! missing file is regenerated rather than treated as data loss, and two
//! callers racing on the same miss write identical bytes (last writer wins).

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use super::{pattern, render, BarcodeError};
use crate::db;

#[derive(Debug, Clone)]
pub struct BarcodeStore {
    dir: PathBuf,
    db_path: String,
}

impl BarcodeStore {
    pub fn new(dir: impl Into<PathBuf>, db_path: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            db_path: db_path.into(),
        }
    }

    /// Deterministic storage key for a code.
    pub fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.jpg", code))
    }

    /// Writes artifact bytes, creating the store directory lazily.
    pub fn save(&self, code: &str, bytes: &[u8]) -> Result<PathBuf, BarcodeError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            BarcodeError::Storage(format!(
                "failed to create {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        let path = self.path_for(code);
        fs::write(&path, bytes)
            .map_err(|e| BarcodeError::Storage(format!("failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }

    /// Existence probe; `None` is a plain miss, not an error.
    pub fn load(&self, code: &str) -> Option<PathBuf> {
        let path = self.path_for(code);
        path.exists().then_some(path)
    }

    /// Load-or-regenerate. Idempotent: an existing artifact is returned
    /// untouched; a missing one is rebuilt from `code` and the visitor
    /// record's `barcode_path` is backfilled so later lookups short-circuit.
    pub fn ensure(&self, code: &str) -> Result<PathBuf, BarcodeError> {
        if let Some(path) = self.load(code) {
            return Ok(path);
        }

        info!("barcode artifact for {} missing, regenerating", code);
        let grid = pattern::synthesize(code);
        let bytes = render::rasterize(&grid, code)?;
        let path = self.save(code, &bytes)?;

        // The artifact is already on disk; a failed backfill only costs
        // another existence probe on the next lookup.
        if let Err(e) = db::update_barcode_path(&self.db_path, code, &path.to_string_lossy()) {
            warn!("could not backfill barcode path for {}: {}", code, e);
        }

        Ok(path)
    }

    /// Serves the artifact bytes, regenerating first if needed. A read
    /// failure after a successful regeneration is `ArtifactUnavailable`,
    /// distinct from a plain miss.
    pub fn read(&self, code: &str) -> Result<Vec<u8>, BarcodeError> {
        let path = self.ensure(code)?;
        fs::read(&path).map_err(|e| {
            BarcodeError::ArtifactUnavailable(format!("{}: {}", path.display(), e))
        })
    }
}
