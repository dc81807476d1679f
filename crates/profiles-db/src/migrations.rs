use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (accounts, feed entries)");
        conn.execute_batch(
            "
            CREATE TABLE accounts (
                id              TEXT PRIMARY KEY,
                email           TEXT NOT NULL UNIQUE
                                CHECK (length(email) BETWEEN 1 AND 255),
                name            TEXT NOT NULL
                                CHECK (length(name) BETWEEN 1 AND 255),
                credential      TEXT,
                is_active       INTEGER NOT NULL DEFAULT 1,
                is_staff        INTEGER NOT NULL DEFAULT 0,
                is_superuser    INTEGER NOT NULL DEFAULT 0,
                last_login      TEXT
            );

            CREATE TABLE feed_entries (
                id              TEXT PRIMARY KEY,
                owner_id        TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
                status_text     TEXT NOT NULL
                                CHECK (length(status_text) BETWEEN 1 AND 255),
                created_on      TEXT NOT NULL
            );

            CREATE INDEX idx_feed_entries_owner
                ON feed_entries(owner_id, created_on);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
