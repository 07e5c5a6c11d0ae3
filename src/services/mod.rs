//! Service layer for the school ledger
//!
//! Services sit on top of the storage layer and handle validation, the
//! fee allocator, balance bookkeeping and audit logging. Operations that
//! touch more than one row run in a single transaction; the ones that
//! compose into larger transactions take a `&Transaction` explicitly.

pub mod admission;
pub mod allocator;
pub mod class;
pub mod monthly_fee;
pub mod payment;
pub mod student;

pub use admission::AdmissionService;
pub use allocator::{allocate, plan_allocation, plan_bulk, AllocationPlan, ChargeDelta};
pub use class::ClassService;
pub use monthly_fee::MonthlyFeeService;
pub use payment::{PaymentService, Rebalance};
pub use student::StudentService;
