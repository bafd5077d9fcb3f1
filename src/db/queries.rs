use rusqlite::params;

use super::{Database, DbError};

// ---------------------------------------------------------------------------
// Settings queries
// ---------------------------------------------------------------------------

pub fn upsert_setting(
    db: &Database,
    key: &str,
    value_json: &str,
    updated_at: &str,
) -> Result<(), DbError> {
    let conn = db.conn()?;
    conn.execute(
        "INSERT INTO settings (key, value_json, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key)
         DO UPDATE SET value_json = excluded.value_json, updated_at = excluded.updated_at",
        params![key, value_json, updated_at],
    )?;
    Ok(())
}

pub fn get_setting(db: &Database, key: &str) -> Result<Option<String>, DbError> {
    let conn = db.conn()?;
    let mut stmt = conn.prepare("SELECT value_json FROM settings WHERE key = ?1")?;
    let mut rows = stmt.query_map(params![key], |row| row.get(0))?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// All settings whose key starts with `prefix`, ordered by key.
pub fn list_settings_with_prefix(
    db: &Database,
    prefix: &str,
) -> Result<Vec<(String, String)>, DbError> {
    let conn = db.conn()?;
    let mut stmt = conn.prepare(
        "SELECT key, value_json FROM settings WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
    )?;
    let rows = stmt
        .query_map(params![prefix], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_setting(db: &Database, key: &str) -> Result<bool, DbError> {
    let conn = db.conn()?;
    let affected = conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
    Ok(affected > 0)
}

pub fn delete_settings_with_prefix(db: &Database, prefix: &str) -> Result<usize, DbError> {
    let conn = db.conn()?;
    let affected = conn.execute(
        "DELETE FROM settings WHERE substr(key, 1, length(?1)) = ?1",
        params![prefix],
    )?;
    Ok(affected)
}
