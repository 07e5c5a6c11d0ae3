//! Per-student payment bookkeeping

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{DbContext, SchoolResult};
use crate::models::{Money, StudentBalance, StudentId, UsageKind};

/// Repository for the `student_balance` table
///
/// Rows are created lazily; a student without a row has a zero balance.
pub struct BalanceRepository<'c> {
    conn: &'c Connection,
}

impl<'c> BalanceRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, student_id: StudentId) -> SchoolResult<StudentBalance> {
        let balance = self
            .conn
            .query_row(
                "SELECT total_paid, admission_used, monthly_used
                 FROM student_balance WHERE student_id = ?1",
                [student_id],
                |row| {
                    Ok(StudentBalance {
                        student_id: Some(student_id),
                        total_paid: row.get(0)?,
                        admission_used: row.get(1)?,
                        monthly_used: row.get(2)?,
                    })
                },
            )
            .optional()
            .db_context("fetching student balance")?;

        Ok(balance.unwrap_or(StudentBalance {
            student_id: Some(student_id),
            ..StudentBalance::default()
        }))
    }

    /// Add a signed amount to the student's received total
    pub fn add_paid(&self, student_id: StudentId, delta: Money) -> SchoolResult<()> {
        self.conn
            .execute(
                "INSERT INTO student_balance (student_id, total_paid) VALUES (?1, ?2)
                 ON CONFLICT(student_id) DO UPDATE SET total_paid = total_paid + excluded.total_paid",
                params![student_id, delta],
            )
            .db_context("updating student balance")?;
        Ok(())
    }

    /// Add a signed amount to one usage bucket
    pub fn adjust_used(
        &self,
        student_id: StudentId,
        delta: Money,
        kind: UsageKind,
    ) -> SchoolResult<()> {
        let sql = match kind {
            UsageKind::Admission => {
                "INSERT INTO student_balance (student_id, admission_used) VALUES (?1, ?2)
                 ON CONFLICT(student_id) DO UPDATE
                 SET admission_used = admission_used + excluded.admission_used"
            }
            UsageKind::Monthly => {
                "INSERT INTO student_balance (student_id, monthly_used) VALUES (?1, ?2)
                 ON CONFLICT(student_id) DO UPDATE
                 SET monthly_used = monthly_used + excluded.monthly_used"
            }
        };
        self.conn
            .execute(sql, params![student_id, delta])
            .db_context("updating student balance")?;
        Ok(())
    }
}
