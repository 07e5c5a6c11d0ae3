//! Payment repository

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::placeholders;
use crate::error::{DbContext, SchoolResult};
use crate::models::{Payment, PaymentId, PaymentInput, PaymentRecord, StudentId};

const SELECT_PAYMENT: &str = "SELECT id, student_id, amount, date, remark FROM payment";

fn row_to_payment(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        student_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        remark: row.get(4)?,
    })
}

/// Repository for the `payment` table
pub struct PaymentRepository<'c> {
    conn: &'c Connection,
}

impl<'c> PaymentRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, input: &PaymentInput) -> SchoolResult<PaymentId> {
        self.conn
            .execute(
                "INSERT INTO payment (student_id, amount, date, remark) VALUES (?1, ?2, ?3, ?4)",
                params![input.student_id, input.amount, input.date, input.remark],
            )
            .db_context("creating payment")?;
        Ok(PaymentId::new(self.conn.last_insert_rowid()))
    }

    pub fn update(&self, id: PaymentId, input: &PaymentInput) -> SchoolResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE payment SET student_id = ?1, amount = ?2, date = ?3, remark = ?4
                 WHERE id = ?5",
                params![input.student_id, input.amount, input.date, input.remark, id],
            )
            .db_context("updating payment")?;
        Ok(changed > 0)
    }

    pub fn delete(&self, ids: &[PaymentId]) -> SchoolResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM payment WHERE id IN ({})", placeholders(ids.len()));
        self.conn
            .execute(&sql, params_from_iter(ids))
            .db_context("deleting payments")
    }

    pub fn get(&self, id: PaymentId) -> SchoolResult<Option<Payment>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_PAYMENT), [id], row_to_payment)
            .optional()
            .db_context("fetching payment")
    }

    pub fn get_many(&self, ids: &[PaymentId]) -> SchoolResult<Vec<Payment>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{} WHERE id IN ({}) ORDER BY id",
                SELECT_PAYMENT,
                placeholders(ids.len())
            ))
            .db_context("fetching payments")?;
        let rows = stmt
            .query_map(params_from_iter(ids), row_to_payment)
            .db_context("fetching payments")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("fetching payments")
    }

    /// Payments with the student's name, newest first
    pub fn list(&self, student_id: Option<StudentId>) -> SchoolResult<Vec<PaymentRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT p.id, p.student_id, s.student_name, p.amount, p.date, p.remark
                 FROM payment p
                 INNER JOIN student s ON s.id = p.student_id
                 WHERE (?1 IS NULL OR p.student_id = ?1)
                 ORDER BY p.date DESC, p.id DESC",
            )
            .db_context("listing payments")?;
        let rows = stmt
            .query_map([student_id], |row| {
                Ok(PaymentRecord {
                    id: row.get(0)?,
                    student_id: row.get(1)?,
                    student_name: row.get(2)?,
                    amount: row.get(3)?,
                    date: row.get(4)?,
                    remark: row.get(5)?,
                })
            })
            .db_context("listing payments")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("listing payments")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, StudentInput};
    use crate::storage::{initialize_schema, StudentRepository};
    use chrono::NaiveDate;

    fn setup() -> (Connection, StudentId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        let student_id = StudentRepository::new(&conn)
            .insert(&StudentInput::new("Chidi"))
            .unwrap();
        (conn, student_id)
    }

    fn payment(student_id: StudentId, day: u32, units: i64) -> PaymentInput {
        PaymentInput {
            student_id,
            amount: Money::from_units(units),
            date: NaiveDate::from_ymd_opt(2025, 2, day).unwrap(),
            remark: None,
        }
    }

    #[test]
    fn test_list_newest_first_with_name() {
        let (conn, student) = setup();
        let repo = PaymentRepository::new(&conn);
        repo.insert(&payment(student, 1, 100)).unwrap();
        let later = repo.insert(&payment(student, 20, 50)).unwrap();

        let records = repo.list(None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, later);
        assert_eq!(records[0].student_name, "Chidi");
    }

    #[test]
    fn test_non_positive_amount_rejected_by_store() {
        let (conn, student) = setup();
        let repo = PaymentRepository::new(&conn);
        assert!(repo.insert(&payment(student, 1, 0)).is_err());
    }

    #[test]
    fn test_update_missing_returns_false() {
        let (conn, student) = setup();
        let repo = PaymentRepository::new(&conn);
        assert!(!repo.update(PaymentId::new(5), &payment(student, 1, 10)).unwrap());
    }
}
