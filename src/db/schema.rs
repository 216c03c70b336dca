//! SQL DDL for the `rows` and `schema_meta` tables.
//!
//! Every kind of thing is stored in the single `rows` table; `tags` and
//! `fields` hold JSON text. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS rows (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    namespace TEXT NOT NULL,
    kind TEXT NOT NULL,
    summary TEXT NOT NULL,
    content TEXT,
    number INTEGER,
    float REAL,
    bool INTEGER CHECK(bool IS NULL OR bool IN (0, 1)),
    time TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    fields TEXT NOT NULL DEFAULT '{}',
    date_created TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_rows_namespace_kind ON rows(namespace, kind);
CREATE INDEX IF NOT EXISTS idx_rows_namespace_created ON rows(namespace, date_created);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
