//! Payment controller

use super::response::{confirm, found, respond, ApiResponse, OneOrMany};
use crate::models::{Payment, PaymentId, PaymentInput, PaymentRecord, StudentId};
use crate::services::PaymentService;
use crate::storage::Storage;

pub struct PaymentController<'a> {
    service: PaymentService<'a>,
}

impl<'a> PaymentController<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            service: PaymentService::new(storage),
        }
    }

    pub fn create(&self, data: PaymentInput) -> ApiResponse<PaymentId> {
        respond(
            self.service.create(data),
            "Payment created successfully",
            "Error while creating payment",
        )
    }

    pub fn update(&self, id: PaymentId, data: PaymentInput) -> ApiResponse<bool> {
        confirm(
            self.service.update(id, data),
            "Payment updated successfully",
            "Payment not found or no changes made",
            "Error while updating payment",
        )
    }

    pub fn delete(&self, ids: OneOrMany<PaymentId>) -> ApiResponse<bool> {
        confirm(
            self.service.delete(&ids.into_vec()),
            "Payment deleted successfully",
            "Payment not found or no changes made",
            "Error while deleting payment",
        )
    }

    pub fn list(&self, student_id: Option<StudentId>) -> ApiResponse<Vec<PaymentRecord>> {
        respond(
            self.service.list(student_id),
            "Payments fetched successfully",
            "Error while fetching payments",
        )
    }

    pub fn fetch(&self, id: PaymentId) -> ApiResponse<Payment> {
        found(
            self.service.get(id),
            "Payment fetched successfully",
            "Payment not found",
            "Error while fetching payment",
        )
    }
}
