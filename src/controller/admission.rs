//! Admission controller

use super::response::{confirm, found, respond, ApiResponse, OneOrMany};
use crate::models::{
    Admission, AdmissionId, AdmissionInput, AdmissionRecord, AdmissionUpdate, StudentId,
};
use crate::services::AdmissionService;
use crate::storage::Storage;

pub struct AdmissionController<'a> {
    service: AdmissionService<'a>,
}

impl<'a> AdmissionController<'a> {
    pub fn new(storage: &'a Storage, default_months: u32) -> Self {
        Self {
            service: AdmissionService::new(storage).with_default_months(default_months),
        }
    }

    pub fn create(&self, data: AdmissionInput) -> ApiResponse<AdmissionId> {
        respond(
            self.service.create(data),
            "Admission created successfully",
            "Error while creating admission",
        )
    }

    pub fn update(&self, id: AdmissionId, data: AdmissionUpdate) -> ApiResponse<bool> {
        confirm(
            self.service.update(id, data),
            "Admission updated successfully",
            "Admission not found or no changes made",
            "Error while updating admission",
        )
    }

    pub fn delete(&self, ids: OneOrMany<AdmissionId>) -> ApiResponse<bool> {
        confirm(
            self.service.delete(&ids.into_vec()),
            "Admission deleted successfully",
            "Admission not found or no changes made",
            "Error while deleting admission",
        )
    }

    pub fn list(&self, student_id: Option<StudentId>) -> ApiResponse<Vec<AdmissionRecord>> {
        respond(
            self.service.list(student_id),
            "Admissions fetched successfully",
            "Error while fetching admissions",
        )
    }

    pub fn fetch(&self, id: AdmissionId) -> ApiResponse<Admission> {
        found(
            self.service.get(id),
            "Admission fetched successfully",
            "Admission not found",
            "Error while fetching admission",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassInput, Money, StudentInput};
    use chrono::NaiveDate;

    #[test]
    fn test_create_uses_default_months() {
        let storage = Storage::open_in_memory().unwrap();
        let class_id = storage
            .classes()
            .insert(&ClassInput::new("Grade 5", Money::from_units(400), Money::from_units(120)))
            .unwrap();
        let student_id = storage.students().insert(&StudentInput::new("Lea")).unwrap();
        let controller = AdmissionController::new(&storage, 4);

        let response = controller.create(AdmissionInput {
            student_id,
            class_id,
            amount: Money::from_units(400),
            monthly: Money::from_units(120),
            months: None,
            date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            remark: None,
        });
        assert!(response.ok, "{}", response.message);
        assert_eq!(storage.monthly_fees().list(Some(student_id)).unwrap().len(), 4);

        let listed = controller.list(Some(student_id)).data.unwrap();
        assert_eq!(listed[0].class, "Grade 5");
    }
}
