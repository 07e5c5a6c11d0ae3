//! Monthly fee controller

use chrono::NaiveDate;

use super::response::{confirm, found, respond, ApiResponse, OneOrMany};
use crate::models::{
    GenerateFees, Money, MonthlyFee, MonthlyFeeId, MonthlyFeeInput, MonthlyFeeRecord,
    MonthlyFeeUpdate, StudentId,
};
use crate::services::MonthlyFeeService;
use crate::storage::Storage;

pub struct MonthlyFeeController<'a> {
    service: MonthlyFeeService<'a>,
}

impl<'a> MonthlyFeeController<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            service: MonthlyFeeService::new(storage),
        }
    }

    pub fn create(&self, data: MonthlyFeeInput) -> ApiResponse<MonthlyFeeId> {
        respond(
            self.service.create(data),
            "Monthly fee created successfully",
            "Error while creating monthly fee",
        )
    }

    /// Returns the credit used to pre-pay the generated charges
    pub fn generate(&self, data: GenerateFees) -> ApiResponse<Money> {
        respond(
            self.service.generate(data),
            "Monthly fees generated successfully",
            "Error while generating monthly fees",
        )
    }

    pub fn update(&self, id: MonthlyFeeId, data: MonthlyFeeUpdate) -> ApiResponse<bool> {
        confirm(
            self.service.update(id, data),
            "Monthly fee updated successfully",
            "Monthly fee not found or no changes made",
            "Error while updating monthly fee",
        )
    }

    pub fn delete(&self, ids: OneOrMany<MonthlyFeeId>) -> ApiResponse<bool> {
        confirm(
            self.service.delete(&ids.into_vec()),
            "Monthly fee deleted successfully",
            "Monthly fee not found or no changes made",
            "Error while deleting monthly fees",
        )
    }

    /// Charges of one student, or of everyone
    pub fn list(&self, student_id: Option<StudentId>) -> ApiResponse<Vec<MonthlyFeeRecord>> {
        respond(
            self.service.list(student_id),
            "Monthly fees fetched successfully",
            "Error while listing monthly fees",
        )
    }

    pub fn list_by_date_range(
        &self,
        student_id: StudentId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResponse<Vec<MonthlyFeeRecord>> {
        respond(
            self.service.list_by_date_range(student_id, from, to),
            "Monthly fees fetched successfully",
            "Error while listing monthly fees",
        )
    }

    pub fn fetch(&self, id: MonthlyFeeId) -> ApiResponse<MonthlyFee> {
        found(
            self.service.get(id),
            "Monthly fee fetched successfully",
            "Monthly fee not found",
            "Error while fetching monthly fee",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassInput, StudentInput};

    #[test]
    fn test_generate_then_list() {
        let storage = Storage::open_in_memory().unwrap();
        let class_id = storage
            .classes()
            .insert(&ClassInput::new("Grade 1", Money::zero(), Money::from_units(90)))
            .unwrap();
        let student_id = storage.students().insert(&StudentInput::new("Kofi")).unwrap();
        let controller = MonthlyFeeController::new(&storage);

        let generated = controller.generate(GenerateFees {
            student_id,
            class_id,
            from: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            count: 2,
            fee: None,
        });
        assert!(generated.ok);
        assert_eq!(generated.data, Some(Money::zero()));

        let records = controller.list(Some(student_id)).data.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.amount == Money::from_units(90)));
    }

    #[test]
    fn test_fetch_missing() {
        let storage = Storage::open_in_memory().unwrap();
        let controller = MonthlyFeeController::new(&storage);

        let response = controller.fetch(MonthlyFeeId::new(3));
        assert_eq!(response.message, "Monthly fee not found");
        let response = controller.delete(OneOrMany::One(MonthlyFeeId::new(3)));
        assert_eq!(response.message, "Monthly fee not found or no changes made");
    }
}
