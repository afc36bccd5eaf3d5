use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS profiles (
            id              TEXT PRIMARY KEY,
            display_name    TEXT NOT NULL,
            age             INTEGER NOT NULL,
            bio             TEXT NOT NULL,
            interests       TEXT NOT NULL DEFAULT '[]',
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS match_decisions (
            viewer_id   TEXT NOT NULL,
            target_id   TEXT NOT NULL,
            decision    TEXT NOT NULL CHECK (decision IN ('like', 'pass')),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (viewer_id, target_id)
        );

        CREATE TABLE IF NOT EXISTS messages (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            sender_id       TEXT NOT NULL,
            recipient_id    TEXT NOT NULL,
            content         TEXT NOT NULL,
            image           TEXT,
            timestamp       INTEGER NOT NULL,
            read            INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_messages_pair
            ON messages(sender_id, recipient_id);

        CREATE TABLE IF NOT EXISTS photo_posts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id    TEXT NOT NULL,
            caption     TEXT NOT NULL,
            photo       TEXT NOT NULL,
            timestamp   INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_photo_posts_owner
            ON photo_posts(owner_id, timestamp);

        CREATE TABLE IF NOT EXISTS preferences (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
