//! SQL schema for the Stride SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Raw journal entries. Never updated or deleted by the compiler.
CREATE TABLE IF NOT EXISTS entries (
    entry_id    TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL    -- RFC 3339 UTC, fixed width
);

-- One row per user per week, overwritten on recompilation.
CREATE TABLE IF NOT EXISTS compiled_logs (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    week_start    TEXT NOT NULL, -- YYYY-MM-DD, always a Monday
    markdown_blob TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    UNIQUE (user_id, week_start)
);

CREATE INDEX IF NOT EXISTS entries_user_created_idx ON entries(user_id, created_at);

PRAGMA user_version = 1;
";
