//! Class controller

use super::response::{confirm, found, respond, ApiResponse, OneOrMany};
use crate::models::{Class, ClassId, ClassInput};
use crate::services::ClassService;
use crate::storage::Storage;

pub struct ClassController<'a> {
    service: ClassService<'a>,
}

impl<'a> ClassController<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            service: ClassService::new(storage),
        }
    }

    pub fn create(&self, data: ClassInput) -> ApiResponse<ClassId> {
        respond(
            self.service.create(data),
            "Class created successfully",
            "Error while creating class",
        )
    }

    pub fn update(&self, id: ClassId, data: ClassInput) -> ApiResponse<bool> {
        confirm(
            self.service.update(id, data),
            "Class updated successfully",
            "Class not found or no changes made",
            "Error while updating class",
        )
    }

    pub fn delete(&self, ids: OneOrMany<ClassId>) -> ApiResponse<bool> {
        confirm(
            self.service.delete(&ids.into_vec()),
            "Class deleted successfully",
            "Class not found or no changes made",
            "Error while deleting class",
        )
    }

    pub fn list(&self, id: Option<ClassId>) -> ApiResponse<Vec<Class>> {
        respond(
            self.service.list(id),
            "Class fetched successfully",
            "Error while fetching class",
        )
    }

    pub fn fetch(&self, id: ClassId) -> ApiResponse<Class> {
        found(
            self.service.get(id),
            "Class fetched successfully",
            "Class not found",
            "Error while fetching class",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_crud_envelopes() {
        let storage = Storage::open_in_memory().unwrap();
        let controller = ClassController::new(&storage);

        let created = controller.create(ClassInput::new("KG", Money::zero(), Money::from_units(50)));
        assert!(created.ok);
        assert_eq!(created.message, "Class created successfully");
        let id = created.data.unwrap();

        let fetched = controller.fetch(id);
        assert_eq!(fetched.data.unwrap().name, "KG");

        let deleted = controller.delete(OneOrMany::Many(vec![id]));
        assert!(deleted.ok);

        let missing = controller.fetch(id);
        assert!(!missing.ok);
        assert_eq!(missing.message, "Class not found");
    }

    #[test]
    fn test_falsy_results_become_errors() {
        let storage = Storage::open_in_memory().unwrap();
        let controller = ClassController::new(&storage);

        let input = ClassInput::new("X", Money::zero(), Money::zero());
        let update = controller.update(ClassId::new(9), input);
        assert!(!update.ok);
        assert_eq!(update.message, "Class not found or no changes made");

        let delete = controller.delete(OneOrMany::One(ClassId::new(9)));
        assert_eq!(delete.message, "Class not found or no changes made");
    }

    #[test]
    fn test_validation_failure_is_prefixed() {
        let storage = Storage::open_in_memory().unwrap();
        let controller = ClassController::new(&storage);

        let response = controller.create(ClassInput::new("  ", Money::zero(), Money::zero()));
        assert!(!response.ok);
        assert!(response.message.starts_with("Error while creating class: "));
    }
}
