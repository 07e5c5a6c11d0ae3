//! Student controller

use super::response::{confirm, found, respond, ApiResponse, OneOrMany};
use crate::models::{BalanceReport, Student, StudentId, StudentInput};
use crate::services::StudentService;
use crate::storage::Storage;

pub struct StudentController<'a> {
    service: StudentService<'a>,
}

impl<'a> StudentController<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            service: StudentService::new(storage),
        }
    }

    pub fn create(&self, data: StudentInput) -> ApiResponse<StudentId> {
        respond(
            self.service.create(data),
            "Student created successfully",
            "Error while creating student",
        )
    }

    pub fn update(&self, id: StudentId, data: StudentInput) -> ApiResponse<bool> {
        confirm(
            self.service.update(id, data),
            "Student updated successfully",
            "Student not found or no changes made",
            "Error while updating student",
        )
    }

    pub fn delete(&self, ids: OneOrMany<StudentId>) -> ApiResponse<bool> {
        confirm(
            self.service.delete(&ids.into_vec()),
            "Student deleted successfully",
            "Student not found or no changes made",
            "Error while deleting student",
        )
    }

    pub fn list(&self, id: Option<StudentId>) -> ApiResponse<Vec<Student>> {
        respond(
            self.service.list(id),
            "Student fetched successfully",
            "Error while fetching student",
        )
    }

    pub fn fetch(&self, id: StudentId) -> ApiResponse<Student> {
        found(
            self.service.get(id),
            "Student fetched successfully",
            "Student not found",
            "Error while fetching student",
        )
    }

    pub fn balance(&self, id: StudentId) -> ApiResponse<BalanceReport> {
        respond(
            self.service.balance(id),
            "Balance fetched successfully",
            "Error while fetching balance",
        )
    }
}
