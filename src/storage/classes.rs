//! Class repository

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::placeholders;
use crate::error::{DbContext, SchoolResult};
use crate::models::{Class, ClassId, ClassInput};

const SELECT_CLASS: &str =
    "SELECT id, name, admission_fee, monthly_fee, remark FROM class";

fn row_to_class(row: &Row<'_>) -> rusqlite::Result<Class> {
    Ok(Class {
        id: row.get(0)?,
        name: row.get(1)?,
        admission_fee: row.get(2)?,
        monthly_fee: row.get(3)?,
        remark: row.get(4)?,
    })
}

/// Repository for the `class` table
pub struct ClassRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ClassRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, input: &ClassInput) -> SchoolResult<ClassId> {
        self.conn
            .execute(
                "INSERT INTO class (name, admission_fee, monthly_fee, remark)
                 VALUES (?1, ?2, ?3, ?4)",
                params![input.name, input.admission_fee, input.monthly_fee, input.remark],
            )
            .db_context("creating class")?;
        Ok(ClassId::new(self.conn.last_insert_rowid()))
    }

    /// Returns false when no row has this ID
    pub fn update(&self, id: ClassId, input: &ClassInput) -> SchoolResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE class SET name = ?1, admission_fee = ?2, monthly_fee = ?3, remark = ?4
                 WHERE id = ?5",
                params![input.name, input.admission_fee, input.monthly_fee, input.remark, id],
            )
            .db_context("updating class")?;
        Ok(changed > 0)
    }

    /// Delete the given classes, returning how many rows went away
    pub fn delete(&self, ids: &[ClassId]) -> SchoolResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM class WHERE id IN ({})", placeholders(ids.len()));
        self.conn
            .execute(&sql, params_from_iter(ids))
            .db_context("deleting classes")
    }

    pub fn get(&self, id: ClassId) -> SchoolResult<Option<Class>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_CLASS), [id], row_to_class)
            .optional()
            .db_context("fetching class")
    }

    /// All classes ordered by name, or just the one with `id`
    pub fn list(&self, id: Option<ClassId>) -> SchoolResult<Vec<Class>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{} WHERE (?1 IS NULL OR id = ?1) ORDER BY name COLLATE NOCASE",
                SELECT_CLASS
            ))
            .db_context("listing classes")?;

        let rows = stmt
            .query_map([id], row_to_class)
            .db_context("listing classes")?;
        rows.collect::<Result<Vec<_>, _>>()
            .db_context("listing classes")
    }

    pub fn name_exists(&self, name: &str, exclude: Option<ClassId>) -> SchoolResult<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM class
                 WHERE name = ?1 COLLATE NOCASE AND (?2 IS NULL OR id != ?2))",
                params![name, exclude],
                |row| row.get(0),
            )
            .db_context("checking class name")
    }
}
