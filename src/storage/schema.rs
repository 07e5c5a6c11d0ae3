//! Database schema
//!
//! Creates every table on first open; safe to run against an existing file.

use rusqlite::Connection;

use crate::error::{DbContext, SchoolResult};

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 1;

// Both charge tables keep `0 <= paid <= amount` at the store level as well
// as in the allocator.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS class (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL UNIQUE,
    admission_fee INTEGER NOT NULL DEFAULT 0 CHECK (admission_fee >= 0),
    monthly_fee   INTEGER NOT NULL DEFAULT 0 CHECK (monthly_fee >= 0),
    remark        TEXT
);

CREATE TABLE IF NOT EXISTS student (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    student_name  TEXT    NOT NULL,
    guardian_name TEXT    NOT NULL DEFAULT '',
    phone         TEXT    NOT NULL DEFAULT '',
    address       TEXT    NOT NULL DEFAULT '',
    active        INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS monthly_fee (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES student(id) ON DELETE CASCADE,
    class_id   INTEGER NOT NULL REFERENCES class(id) ON DELETE RESTRICT,
    date       TEXT    NOT NULL,
    amount     INTEGER NOT NULL CHECK (amount >= 0),
    paid       INTEGER NOT NULL DEFAULT 0,
    CHECK (paid >= 0 AND paid <= amount)
);

CREATE TABLE IF NOT EXISTS admission (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES student(id) ON DELETE CASCADE,
    class_id   INTEGER NOT NULL REFERENCES class(id) ON DELETE RESTRICT,
    amount     INTEGER NOT NULL CHECK (amount >= 0),
    paid       INTEGER NOT NULL DEFAULT 0,
    date       TEXT    NOT NULL,
    remark     TEXT,
    CHECK (paid >= 0 AND paid <= amount)
);

CREATE TABLE IF NOT EXISTS payment (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES student(id) ON DELETE CASCADE,
    amount     INTEGER NOT NULL CHECK (amount > 0),
    date       TEXT    NOT NULL,
    remark     TEXT
);

CREATE TABLE IF NOT EXISTS student_balance (
    student_id     INTEGER PRIMARY KEY REFERENCES student(id) ON DELETE CASCADE,
    total_paid     INTEGER NOT NULL DEFAULT 0,
    admission_used INTEGER NOT NULL DEFAULT 0,
    monthly_used   INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_monthly_fee_student ON monthly_fee(student_id, date);
CREATE INDEX IF NOT EXISTS idx_admission_student ON admission(student_id, date);
CREATE INDEX IF NOT EXISTS idx_payment_student ON payment(student_id, date);
";

/// Apply connection pragmas and create missing tables
pub fn initialize_schema(conn: &Connection) -> SchoolResult<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .db_context("enabling foreign keys")?;

    conn.execute_batch(SCHEMA).db_context("creating schema")?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .db_context("recording schema version")?;

    Ok(())
}

/// Read the schema version recorded in the database
pub fn schema_version(conn: &Connection) -> SchoolResult<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .db_context("reading schema version")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('class', 'student', 'monthly_fee', 'admission', 'payment', 'student_balance')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }

    #[test]
    fn test_paid_bounds_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO class (name) VALUES ('Grade 1');
             INSERT INTO student (student_name) VALUES ('Amina');",
        )
        .unwrap();

        let overpaid = conn.execute(
            "INSERT INTO monthly_fee (student_id, class_id, date, amount, paid)
             VALUES (1, 1, '2025-01-01', 100, 150)",
            [],
        );
        assert!(overpaid.is_err());

        let negative = conn.execute(
            "INSERT INTO admission (student_id, class_id, amount, paid, date)
             VALUES (1, 1, 100, -1, '2025-01-01')",
            [],
        );
        assert!(negative.is_err());
    }
}
