//! SQL schema for the Tenure SQLite store.
//!
//! Executed once at connection startup. The blob itself carries its own
//! format version; `user_version` only tracks this table layout.

/// Key under which the contract collection is stored.
pub const CONTRACTS_KEY: &str = "contracts_data";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS blobs (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,   -- versioned JSON document
    updated_at  TEXT NOT NULL    -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";
