//! Request controllers
//!
//! One controller per entity. Each operation makes one service call and
//! turns the result into an [`ApiResponse`]; no error escapes as anything
//! other than `{"ok": false, "message": ...}`.

pub mod admission;
pub mod class;
pub mod monthly_fee;
pub mod payment;
pub mod response;
pub mod student;

pub use admission::AdmissionController;
pub use class::ClassController;
pub use monthly_fee::MonthlyFeeController;
pub use payment::PaymentController;
pub use response::{api_error, api_success, ApiResponse, OneOrMany};
pub use student::StudentController;
