//! Student repository

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::placeholders;
use crate::error::{DbContext, SchoolResult};
use crate::models::{Money, Student, StudentId, StudentInput};

const SELECT_STUDENT: &str =
    "SELECT id, student_name, guardian_name, phone, address, active FROM student";

fn row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        student_name: row.get(1)?,
        guardian_name: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        active: row.get(5)?,
    })
}

/// Repository for the `student` table
pub struct StudentRepository<'c> {
    conn: &'c Connection,
}

impl<'c> StudentRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, input: &StudentInput) -> SchoolResult<StudentId> {
        self.conn
            .execute(
                "INSERT INTO student (student_name, guardian_name, phone, address, active)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    input.student_name,
                    input.guardian_name,
                    input.phone,
                    input.address,
                    input.active
                ],
            )
            .db_context("creating student")?;
        Ok(StudentId::new(self.conn.last_insert_rowid()))
    }

    pub fn update(&self, id: StudentId, input: &StudentInput) -> SchoolResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE student
                 SET student_name = ?1, guardian_name = ?2, phone = ?3, address = ?4, active = ?5
                 WHERE id = ?6",
                params![
                    input.student_name,
                    input.guardian_name,
                    input.phone,
                    input.address,
                    input.active,
                    id
                ],
            )
            .db_context("updating student")?;
        Ok(changed > 0)
    }

    /// Delete students; their charges, payments and balance cascade
    pub fn delete(&self, ids: &[StudentId]) -> SchoolResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM student WHERE id IN ({})", placeholders(ids.len()));
        self.conn
            .execute(&sql, params_from_iter(ids))
            .db_context("deleting students")
    }

    pub fn get(&self, id: StudentId) -> SchoolResult<Option<Student>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_STUDENT), [id], row_to_student)
            .optional()
            .db_context("fetching student")
    }

    pub fn exists(&self, id: StudentId) -> SchoolResult<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM student WHERE id = ?1)",
                [id],
                |row| row.get(0),
            )
            .db_context("fetching student")
    }

    /// All students ordered by name, or just the one with `id`
    pub fn list(&self, id: Option<StudentId>) -> SchoolResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{} WHERE (?1 IS NULL OR id = ?1) ORDER BY student_name COLLATE NOCASE, id",
                SELECT_STUDENT
            ))
            .db_context("listing students")?;

        let rows = stmt
            .query_map([id], row_to_student)
            .db_context("listing students")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("listing students")
    }

    /// Outstanding `amount - paid` over both charge tables
    pub fn total_due(&self, id: StudentId) -> SchoolResult<Money> {
        self.conn
            .query_row(
                "SELECT
                    (SELECT COALESCE(SUM(amount - paid), 0) FROM monthly_fee WHERE student_id = ?1)
                  + (SELECT COALESCE(SUM(amount - paid), 0) FROM admission WHERE student_id = ?1)",
                [id],
                |row| row.get(0),
            )
            .db_context("computing amount due")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::initialize_schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_update_get() {
        let conn = conn();
        let repo = StudentRepository::new(&conn);

        let id = repo.insert(&StudentInput::new("Amina")).unwrap();
        let mut input = StudentInput::new("Amina Yusuf");
        input.phone = "555-0101".into();
        input.active = false;

        assert!(repo.update(id, &input).unwrap());
        let student = repo.get(id).unwrap().unwrap();
        assert_eq!(student.student_name, "Amina Yusuf");
        assert_eq!(student.phone, "555-0101");
        assert!(!student.active);
    }

    #[test]
    fn test_delete_reports_rows() {
        let conn = conn();
        let repo = StudentRepository::new(&conn);
        let a = repo.insert(&StudentInput::new("A")).unwrap();
        let b = repo.insert(&StudentInput::new("B")).unwrap();

        assert_eq!(repo.delete(&[a, b, StudentId::new(77)]).unwrap(), 2);
        assert!(!repo.exists(a).unwrap());
        assert!(repo.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_total_due_without_charges() {
        let conn = conn();
        let repo = StudentRepository::new(&conn);
        let id = repo.insert(&StudentInput::new("A")).unwrap();
        assert_eq!(repo.total_due(id).unwrap(), Money::zero());
    }
}
