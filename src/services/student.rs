//! Student service

use crate::audit::{generate_diff, EntityType};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{BalanceReport, Student, StudentId, StudentInput};
use crate::storage::Storage;

/// Service for student management
pub struct StudentService<'a> {
    storage: &'a Storage,
}

impl<'a> StudentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: StudentInput) -> SchoolResult<StudentId> {
        let input = input.validate().map_err(SchoolError::Validation)?;

        let students = self.storage.students();
        let id = students.insert(&input)?;
        if let Some(student) = students.get(id)? {
            self.storage.log_create(
                EntityType::Student,
                id.to_string(),
                Some(student.student_name.clone()),
                &student,
            )?;
        }

        Ok(id)
    }

    pub fn update(&self, id: StudentId, input: StudentInput) -> SchoolResult<bool> {
        let input = input.validate().map_err(SchoolError::Validation)?;

        let students = self.storage.students();
        let Some(before) = students.get(id)? else {
            return Ok(false);
        };
        if !students.update(id, &input)? {
            return Ok(false);
        }

        if let Some(after) = students.get(id)? {
            self.storage.log_update(
                EntityType::Student,
                id.to_string(),
                Some(after.student_name.clone()),
                &before,
                &after,
                generate_diff(&before, &after),
            )?;
        }

        Ok(true)
    }

    /// Delete students together with their charges, payments and balance
    pub fn delete(&self, ids: &[StudentId]) -> SchoolResult<bool> {
        let students = self.storage.students();

        let mut existing = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(student) = students.get(*id)? {
                existing.push(student);
            }
        }

        let deleted = students.delete(ids)?;

        for student in &existing {
            self.storage.log_delete(
                EntityType::Student,
                student.id.to_string(),
                Some(student.student_name.clone()),
                student,
            )?;
        }

        Ok(deleted > 0)
    }

    pub fn list(&self, id: Option<StudentId>) -> SchoolResult<Vec<Student>> {
        self.storage.students().list(id)
    }

    pub fn get(&self, id: StudentId) -> SchoolResult<Option<Student>> {
        self.storage.students().get(id)
    }

    /// Look a student up by ID, or by name when exactly one student has it
    pub fn find(&self, identifier: &str) -> SchoolResult<Option<Student>> {
        if let Ok(id) = identifier.parse::<StudentId>() {
            if let Some(student) = self.get(id)? {
                return Ok(Some(student));
            }
        }

        let mut matches: Vec<_> = self
            .list(None)?
            .into_iter()
            .filter(|s| s.student_name.eq_ignore_ascii_case(identifier.trim()))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(SchoolError::Validation(format!(
                "{} students are named '{}'; use the student ID instead",
                n, identifier
            ))),
        }
    }

    /// Payment totals, credit and outstanding dues for one student
    pub fn balance(&self, id: StudentId) -> SchoolResult<BalanceReport> {
        if !self.storage.students().exists(id)? {
            return Err(SchoolError::student_not_found(id.to_string()));
        }

        let balance = self.storage.balances().get(id)?;
        let due = self.storage.students().total_due(id)?;

        Ok(BalanceReport {
            student_id: id,
            total_paid: balance.total_paid,
            admission_used: balance.admission_used,
            monthly_used: balance.monthly_used,
            available: balance.available(),
            due,
        })
    }
}
