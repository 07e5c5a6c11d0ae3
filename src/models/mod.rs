//! Core data models for the school ledger
//!
//! Classes, students, the two charge kinds (monthly fees and admissions),
//! payments, and the money and ID types they share.

pub mod admission;
pub mod charge;
pub mod class;
pub mod ids;
pub mod monthly_fee;
pub mod money;
pub mod payment;
pub mod student;

pub use admission::{Admission, AdmissionInput, AdmissionRecord, AdmissionUpdate};
pub use charge::{first_of_month, nth_month, ChargeSnapshot, UsageKind};
pub use class::{Class, ClassInput};
pub use ids::{AdmissionId, ClassId, MonthlyFeeId, PaymentId, StudentId};
pub use monthly_fee::{
    BulkCreate, GenerateFees, MonthlyFee, MonthlyFeeInput, MonthlyFeeRecord, MonthlyFeeUpdate,
};
pub use money::Money;
pub use payment::{Payment, PaymentInput, PaymentRecord};
pub use student::{BalanceReport, Student, StudentBalance, StudentInput};
