//! Admission repository

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::ledger::{add_to_paid, paid_snapshots, unpaid_snapshots, ChargeLedger};
use super::placeholders;
use crate::error::{DbContext, SchoolResult};
use crate::models::{
    Admission, AdmissionId, AdmissionRecord, AdmissionUpdate, ChargeSnapshot, ClassId, Money,
    StudentId, UsageKind,
};

const TABLE: &str = "admission";

const SELECT_ADMISSION: &str =
    "SELECT id, student_id, class_id, amount, paid, date, remark FROM admission";

fn row_to_admission(row: &Row<'_>) -> rusqlite::Result<Admission> {
    Ok(Admission {
        id: row.get(0)?,
        student_id: row.get(1)?,
        class_id: row.get(2)?,
        amount: row.get(3)?,
        paid: row.get(4)?,
        date: row.get(5)?,
        remark: row.get(6)?,
    })
}

/// Row values for a new admission charge
#[derive(Debug, Clone)]
pub struct NewAdmission {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub amount: Money,
    pub paid: Money,
    pub date: NaiveDate,
    pub remark: Option<String>,
}

/// Repository for the `admission` table
pub struct AdmissionRepository<'c> {
    conn: &'c Connection,
}

impl<'c> AdmissionRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, admission: &NewAdmission) -> SchoolResult<AdmissionId> {
        self.conn
            .execute(
                "INSERT INTO admission (student_id, class_id, amount, paid, date, remark)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    admission.student_id,
                    admission.class_id,
                    admission.amount,
                    admission.paid,
                    admission.date,
                    admission.remark
                ],
            )
            .db_context("creating admission")?;
        Ok(AdmissionId::new(self.conn.last_insert_rowid()))
    }

    /// Update the editable fields, clamping `paid` to the new amount
    pub fn update(&self, id: AdmissionId, update: &AdmissionUpdate) -> SchoolResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE admission
                 SET class_id = ?1, amount = ?2, paid = MIN(paid, ?2), date = ?3, remark = ?4
                 WHERE id = ?5",
                params![update.class_id, update.amount, update.date, update.remark, id],
            )
            .db_context("updating admission")?;
        Ok(changed > 0)
    }

    pub fn delete(&self, ids: &[AdmissionId]) -> SchoolResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM admission WHERE id IN ({})", placeholders(ids.len()));
        self.conn
            .execute(&sql, params_from_iter(ids))
            .db_context("deleting admissions")
    }

    pub fn get(&self, id: AdmissionId) -> SchoolResult<Option<Admission>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_ADMISSION), [id], row_to_admission)
            .optional()
            .db_context("fetching admission")
    }

    pub fn get_many(&self, ids: &[AdmissionId]) -> SchoolResult<Vec<Admission>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{} WHERE id IN ({}) ORDER BY id",
                SELECT_ADMISSION,
                placeholders(ids.len())
            ))
            .db_context("fetching admissions")?;
        let rows = stmt
            .query_map(params_from_iter(ids), row_to_admission)
            .db_context("fetching admissions")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("fetching admissions")
    }

    /// Admissions with their class name, newest first
    pub fn list(&self, student_id: Option<StudentId>) -> SchoolResult<Vec<AdmissionRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT a.id, c.name, a.amount, a.paid, a.date, a.remark
                 FROM admission a
                 INNER JOIN class c ON c.id = a.class_id
                 WHERE (?1 IS NULL OR a.student_id = ?1)
                 ORDER BY a.date DESC, a.id DESC",
            )
            .db_context("listing admissions")?;
        let rows = stmt
            .query_map([student_id], |row| {
                Ok(AdmissionRecord {
                    id: row.get(0)?,
                    class: row.get(1)?,
                    amount: row.get(2)?,
                    paid: row.get(3)?,
                    date: row.get(4)?,
                    remark: row.get(5)?,
                })
            })
            .db_context("listing admissions")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("listing admissions")
    }
}

impl ChargeLedger for AdmissionRepository<'_> {
    type Id = AdmissionId;

    const KIND: UsageKind = UsageKind::Admission;

    fn unpaid_list(&self, student_id: StudentId) -> SchoolResult<Vec<ChargeSnapshot<AdmissionId>>> {
        unpaid_snapshots(self.conn, TABLE, student_id)
    }

    fn paid_list(&self, student_id: StudentId) -> SchoolResult<Vec<ChargeSnapshot<AdmissionId>>> {
        paid_snapshots(self.conn, TABLE, student_id)
    }

    fn apply_delta(&self, id: AdmissionId, delta: Money) -> SchoolResult<bool> {
        add_to_paid(self.conn, TABLE, id, delta)
    }
}
