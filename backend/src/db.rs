//! SQLite access for visitor records.
//!
//! Connections are opened per call against the configured database file.
//! The `UNIQUE` constraint on `code` is the storage-layer backstop for
//! identifier uniqueness: two registrations racing onto the same candidate
//! code fail the second insert instead of silently duplicating, and the
//! registration flow re-enters code generation on that failure.

use chrono::Utc;
use common::model::visitor::Visitor;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

/// Creates the visitors table if it does not exist yet.
pub fn init(db_path: &str) -> Result<(), rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS visitors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            mobile TEXT NOT NULL,
            code TEXT NOT NULL UNIQUE,
            barcode_path TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Uniqueness probe used while minting candidate codes.
pub fn code_exists(db_path: &str, code: &str) -> Result<bool, rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM visitors WHERE code = ?1",
        params![code],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Inserts a new visitor row. A duplicate `code` surfaces as a constraint
/// violation; callers distinguish it with `is_unique_violation`.
pub fn insert_visitor(
    db_path: &str,
    name: &str,
    mobile: &str,
    code: &str,
    barcode_path: Option<&str>,
) -> Result<Visitor, rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO visitors (name, mobile, code, barcode_path, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![name, mobile, code, barcode_path, now, now],
    )?;
    Ok(Visitor {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        mobile: mobile.to_string(),
        code: code.to_string(),
        barcode_path: barcode_path.map(|p| p.to_string()),
        created_at: now.clone(),
        updated_at: now,
    })
}

pub fn get_visitor(db_path: &str, id: i64) -> Result<Option<Visitor>, rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    conn.query_row(
        "SELECT id, name, mobile, code, barcode_path, created_at, updated_at
         FROM visitors WHERE id = ?1",
        params![id],
        row_to_visitor,
    )
    .optional()
}

/// Updates contact fields only. The code is immutable once assigned and is
/// deliberately not touched here. Returns the refreshed row, or `None` if
/// no visitor has this id.
pub fn update_contact(
    db_path: &str,
    id: i64,
    name: &str,
    mobile: &str,
) -> Result<Option<Visitor>, rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    let now = Utc::now().to_rfc3339();
    let changed = conn.execute(
        "UPDATE visitors SET name = ?1, mobile = ?2, updated_at = ?3 WHERE id = ?4",
        params![name, mobile, now, id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get_visitor(db_path, id)
}

/// Records where the rendered artifact for `code` lives, so later lookups
/// short-circuit to the store instead of regenerating.
pub fn update_barcode_path(
    db_path: &str,
    code: &str,
    barcode_path: &str,
) -> Result<(), rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    conn.execute(
        "UPDATE visitors SET barcode_path = ?1 WHERE code = ?2",
        params![barcode_path, code],
    )?;
    Ok(())
}

/// True when `err` is the duplicate-key failure raised by the UNIQUE
/// constraint on `code`.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn row_to_visitor(row: &rusqlite::Row) -> Result<Visitor, rusqlite::Error> {
    Ok(Visitor {
        id: row.get(0)?,
        name: row.get(1)?,
        mobile: row.get(2)?,
        code: row.get(3)?,
        barcode_path: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
