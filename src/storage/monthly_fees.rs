//! Monthly fee repository

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::ledger::{add_to_paid, paid_snapshots, unpaid_snapshots, ChargeLedger};
use super::placeholders;
use crate::error::{DbContext, SchoolResult};
use crate::models::{
    ChargeSnapshot, Money, MonthlyFee, MonthlyFeeId, MonthlyFeeInput, MonthlyFeeRecord,
    MonthlyFeeUpdate, StudentId, UsageKind,
};

const TABLE: &str = "monthly_fee";

const SELECT_FEE: &str =
    "SELECT id, student_id, class_id, date, amount, paid FROM monthly_fee";

const SELECT_RECORD: &str = "SELECT m.id, m.date, m.amount, m.paid, c.name, s.student_name
     FROM monthly_fee m
     INNER JOIN class c ON c.id = m.class_id
     INNER JOIN student s ON s.id = m.student_id";

fn row_to_fee(row: &Row<'_>) -> rusqlite::Result<MonthlyFee> {
    Ok(MonthlyFee {
        id: row.get(0)?,
        student_id: row.get(1)?,
        class_id: row.get(2)?,
        date: row.get(3)?,
        amount: row.get(4)?,
        paid: row.get(5)?,
    })
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<MonthlyFeeRecord> {
    Ok(MonthlyFeeRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        paid: row.get(3)?,
        class_name: row.get(4)?,
        student_name: row.get(5)?,
    })
}

/// Repository for the `monthly_fee` table
pub struct MonthlyFeeRepository<'c> {
    conn: &'c Connection,
}

impl<'c> MonthlyFeeRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, input: &MonthlyFeeInput) -> SchoolResult<MonthlyFeeId> {
        self.conn
            .execute(
                "INSERT INTO monthly_fee (student_id, class_id, date, amount, paid)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![input.student_id, input.class_id, input.date, input.amount, input.paid],
            )
            .db_context("creating monthly fee")?;
        Ok(MonthlyFeeId::new(self.conn.last_insert_rowid()))
    }

    /// Update the editable fields
    ///
    /// `paid` is clamped to the new amount so the row stays valid; callers
    /// release the difference back to the student's credit.
    pub fn update(&self, id: MonthlyFeeId, update: &MonthlyFeeUpdate) -> SchoolResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE monthly_fee
                 SET class_id = ?1, date = ?2, amount = ?3, paid = MIN(paid, ?3)
                 WHERE id = ?4",
                params![update.class_id, update.date, update.amount, id],
            )
            .db_context("updating monthly fee")?;
        Ok(changed > 0)
    }

    pub fn delete(&self, ids: &[MonthlyFeeId]) -> SchoolResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM monthly_fee WHERE id IN ({})", placeholders(ids.len()));
        self.conn
            .execute(&sql, params_from_iter(ids))
            .db_context("deleting monthly fees")
    }

    pub fn get(&self, id: MonthlyFeeId) -> SchoolResult<Option<MonthlyFee>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_FEE), [id], row_to_fee)
            .optional()
            .db_context("fetching monthly fee")
    }

    /// The rows among `ids` that exist
    pub fn get_many(&self, ids: &[MonthlyFeeId]) -> SchoolResult<Vec<MonthlyFee>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{} WHERE id IN ({}) ORDER BY id",
                SELECT_FEE,
                placeholders(ids.len())
            ))
            .db_context("fetching monthly fees")?;
        let rows = stmt
            .query_map(params_from_iter(ids), row_to_fee)
            .db_context("fetching monthly fees")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("fetching monthly fees")
    }

    /// Charges with class and student names, newest first
    ///
    /// `None` lists every student's charges.
    pub fn list(&self, student_id: Option<StudentId>) -> SchoolResult<Vec<MonthlyFeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{} WHERE (?1 IS NULL OR m.student_id = ?1) ORDER BY m.date DESC, m.id DESC",
                SELECT_RECORD
            ))
            .db_context("listing monthly fees")?;
        let rows = stmt
            .query_map([student_id], row_to_record)
            .db_context("listing monthly fees")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("listing monthly fees")
    }

    /// One student's charges dated within `from..=to`, oldest first
    pub fn list_by_date_range(
        &self,
        student_id: StudentId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> SchoolResult<Vec<MonthlyFeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{} WHERE m.student_id = ?1 AND m.date >= ?2 AND m.date <= ?3
                 ORDER BY m.date, m.id",
                SELECT_RECORD
            ))
            .db_context("listing monthly fees")?;
        let rows = stmt
            .query_map(params![student_id, from, to], row_to_record)
            .db_context("listing monthly fees")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("listing monthly fees")
    }
}

impl ChargeLedger for MonthlyFeeRepository<'_> {
    type Id = MonthlyFeeId;

    const KIND: UsageKind = UsageKind::Monthly;

    fn unpaid_list(&self, student_id: StudentId) -> SchoolResult<Vec<ChargeSnapshot<MonthlyFeeId>>> {
        unpaid_snapshots(self.conn, TABLE, student_id)
    }

    fn paid_list(&self, student_id: StudentId) -> SchoolResult<Vec<ChargeSnapshot<MonthlyFeeId>>> {
        paid_snapshots(self.conn, TABLE, student_id)
    }

    fn apply_delta(&self, id: MonthlyFeeId, delta: Money) -> SchoolResult<bool> {
        add_to_paid(self.conn, TABLE, id, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassId, ClassInput, StudentInput};
    use crate::storage::{initialize_schema, ClassRepository, StudentRepository};

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn setup() -> (Connection, StudentId, ClassId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        let class_id = ClassRepository::new(&conn)
            .insert(&ClassInput::new("Grade 1", Money::zero(), Money::from_units(100)))
            .unwrap();
        let student_id = StudentRepository::new(&conn)
            .insert(&StudentInput::new("Amina"))
            .unwrap();
        (conn, student_id, class_id)
    }

    fn fee(student_id: StudentId, class_id: ClassId, month: u32, paid: i64) -> MonthlyFeeInput {
        MonthlyFeeInput {
            student_id,
            class_id,
            date: date(2025, month),
            amount: Money::from_units(100),
            paid: Money::from_units(paid),
        }
    }

    #[test]
    fn test_list_joins_names_newest_first() {
        let (conn, student, class) = setup();
        let repo = MonthlyFeeRepository::new(&conn);
        repo.insert(&fee(student, class, 1, 0)).unwrap();
        repo.insert(&fee(student, class, 2, 0)).unwrap();

        let records = repo.list(Some(student)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date(2025, 2));
        assert_eq!(records[0].class_name, "Grade 1");
        assert_eq!(records[0].student_name, "Amina");
    }

    #[test]
    fn test_list_by_date_range_is_inclusive() {
        let (conn, student, class) = setup();
        let repo = MonthlyFeeRepository::new(&conn);
        for month in 1..=5 {
            repo.insert(&fee(student, class, month, 0)).unwrap();
        }

        let records = repo
            .list_by_date_range(student, date(2025, 2), date(2025, 4))
            .unwrap();
        let months: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(months, vec![date(2025, 2), date(2025, 3), date(2025, 4)]);
    }

    #[test]
    fn test_unpaid_list_order() {
        let (conn, student, class) = setup();
        let repo = MonthlyFeeRepository::new(&conn);
        let jan = repo.insert(&fee(student, class, 1, 0)).unwrap();
        let feb = repo.insert(&fee(student, class, 2, 30)).unwrap();
        let mar = repo.insert(&fee(student, class, 3, 0)).unwrap();
        repo.insert(&fee(student, class, 4, 100)).unwrap();

        let ids: Vec<_> = repo.unpaid_list(student).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![feb, jan, mar]);
    }

    #[test]
    fn test_paid_list_order() {
        let (conn, student, class) = setup();
        let repo = MonthlyFeeRepository::new(&conn);
        let jan = repo.insert(&fee(student, class, 1, 100)).unwrap();
        let feb = repo.insert(&fee(student, class, 2, 50)).unwrap();
        let mar = repo.insert(&fee(student, class, 3, 100)).unwrap();
        repo.insert(&fee(student, class, 4, 0)).unwrap();

        let ids: Vec<_> = repo.paid_list(student).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![feb, mar, jan]);
    }

    #[test]
    fn test_apply_delta_and_bounds() {
        let (conn, student, class) = setup();
        let repo = MonthlyFeeRepository::new(&conn);
        let id = repo.insert(&fee(student, class, 1, 0)).unwrap();

        assert!(repo.apply_delta(id, Money::from_units(60)).unwrap());
        assert_eq!(repo.get(id).unwrap().unwrap().paid, Money::from_units(60));

        assert!(repo.apply_delta(id, Money::from_units(50)).is_err());
        assert!(!repo.apply_delta(MonthlyFeeId::new(999), Money::from_units(1)).unwrap());
    }

    #[test]
    fn test_update_clamps_paid() {
        let (conn, student, class) = setup();
        let repo = MonthlyFeeRepository::new(&conn);
        let id = repo.insert(&fee(student, class, 1, 80)).unwrap();

        let update = MonthlyFeeUpdate {
            class_id: class,
            date: date(2025, 1),
            amount: Money::from_units(50),
        };
        assert!(repo.update(id, &update).unwrap());

        let row = repo.get(id).unwrap().unwrap();
        assert_eq!(row.amount, Money::from_units(50));
        assert_eq!(row.paid, Money::from_units(50));
    }

    #[test]
    fn test_get_many_skips_missing() {
        let (conn, student, class) = setup();
        let repo = MonthlyFeeRepository::new(&conn);
        let id = repo.insert(&fee(student, class, 1, 0)).unwrap();

        let rows = repo.get_many(&[id, MonthlyFeeId::new(42)]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
    }
}
