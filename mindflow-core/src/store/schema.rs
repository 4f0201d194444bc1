/// Current schema version.
pub const SCHEMA_VERSION: &str = "1";

/// Full SQL schema for MindFlow's `SQLite` database.
pub const SCHEMA_SQL: &str = r"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS mindflow_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Persisted store state, one row per storage key
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";
