//! SQL schema for the Muster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT keeps ids from being reused after a delete.
CREATE TABLE IF NOT EXISTS employees (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_code  TEXT NOT NULL UNIQUE,
    full_name      TEXT NOT NULL,
    email          TEXT NOT NULL UNIQUE,
    department     TEXT NOT NULL,
    created_at     TEXT NOT NULL        -- RFC 3339 UTC; server-assigned
);

-- Rows are removed explicitly before their employee; there is no
-- ON DELETE CASCADE.
CREATE TABLE IF NOT EXISTS attendance (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_code  TEXT NOT NULL REFERENCES employees(employee_code),
    date           TEXT NOT NULL,       -- YYYY-MM-DD
    status         TEXT NOT NULL CHECK (status IN ('Present', 'Absent')),
    created_at     TEXT NOT NULL
);

-- Backstop for two marks racing past the duplicate check.
CREATE UNIQUE INDEX IF NOT EXISTS attendance_employee_date_idx
    ON attendance(employee_code, date);
CREATE INDEX IF NOT EXISTS attendance_date_idx ON attendance(date);

PRAGMA user_version = 1;
";
