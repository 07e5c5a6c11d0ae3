//! Common interface over the charge tables
//!
//! Monthly fees and admissions both carry `amount` and `paid` columns and
//! are allocated against the same way. The allocator only talks to this
//! trait, so it is written once for both.

use std::fmt;

use rusqlite::types::FromSql;
use rusqlite::{params, Connection, ToSql};
use serde::Serialize;

use crate::error::{DbContext, SchoolResult};
use crate::models::{ChargeSnapshot, Money, StudentId, UsageKind};

/// A table of charges that payments can be allocated against
pub trait ChargeLedger {
    type Id: Copy + Eq + fmt::Display + ToSql + Serialize;

    /// Which balance bucket this ledger's usage is recorded under
    const KIND: UsageKind;

    /// Charges with `paid < amount`: highest paid first, then oldest
    fn unpaid_list(&self, student_id: StudentId) -> SchoolResult<Vec<ChargeSnapshot<Self::Id>>>;

    /// Charges with `paid > 0`: lowest paid first, then newest
    fn paid_list(&self, student_id: StudentId) -> SchoolResult<Vec<ChargeSnapshot<Self::Id>>>;

    /// Add `delta` to one charge's `paid`; false when the row is missing
    fn apply_delta(&self, id: Self::Id, delta: Money) -> SchoolResult<bool>;
}

pub(crate) fn unpaid_snapshots<I: FromSql>(
    conn: &Connection,
    table: &'static str,
    student_id: StudentId,
) -> SchoolResult<Vec<ChargeSnapshot<I>>> {
    snapshots(
        conn,
        &format!(
            "SELECT id, date, amount, paid FROM {} WHERE student_id = ?1 AND paid < amount
             ORDER BY paid DESC, date ASC, id ASC",
            table
        ),
        student_id,
        "listing unpaid charges",
    )
}

pub(crate) fn paid_snapshots<I: FromSql>(
    conn: &Connection,
    table: &'static str,
    student_id: StudentId,
) -> SchoolResult<Vec<ChargeSnapshot<I>>> {
    snapshots(
        conn,
        &format!(
            "SELECT id, date, amount, paid FROM {} WHERE student_id = ?1 AND paid > 0
             ORDER BY paid ASC, date DESC, id DESC",
            table
        ),
        student_id,
        "listing paid charges",
    )
}

pub(crate) fn add_to_paid<I: ToSql>(
    conn: &Connection,
    table: &'static str,
    id: I,
    delta: Money,
) -> SchoolResult<bool> {
    let changed = conn
        .execute(
            &format!("UPDATE {} SET paid = paid + ?1 WHERE id = ?2", table),
            params![delta, id],
        )
        .db_context("applying payment to charge")?;
    Ok(changed > 0)
}

fn snapshots<I: FromSql>(
    conn: &Connection,
    sql: &str,
    student_id: StudentId,
    operation: &'static str,
) -> SchoolResult<Vec<ChargeSnapshot<I>>> {
    let mut stmt = conn.prepare(sql).db_context(operation)?;
    let rows = stmt
        .query_map([student_id], |row| {
            Ok(ChargeSnapshot {
                id: row.get(0)?,
                date: row.get(1)?,
                amount: row.get(2)?,
                paid: row.get(3)?,
            })
        })
        .db_context(operation)?;
    rows.collect::<Result<Vec<_>, _>>().db_context(operation)
}
