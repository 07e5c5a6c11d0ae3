//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print
//! human-readable output; the JSON surface lives in [`crate::ipc`].

pub mod admission;
pub mod class;
pub mod fee;
pub mod payment;
pub mod student;

pub use admission::{handle_admission_command, AdmissionCommands};
pub use class::{handle_class_command, ClassCommands};
pub use fee::{handle_fee_command, FeeCommands};
pub use payment::{handle_payment_command, PaymentCommands};
pub use student::{handle_student_command, StudentCommands};

use std::str::FromStr;

use chrono::{Local, NaiveDate};

use crate::error::{SchoolError, SchoolResult};
use crate::models::{Class, Money, Student};
use crate::services::{ClassService, StudentService};
use crate::storage::Storage;

/// Parse an amount such as "150" or "150.50"
pub(crate) fn parse_amount(input: &str) -> SchoolResult<Money> {
    Money::parse(input).map_err(|e| SchoolError::Validation(e.to_string()))
}

/// Parse `input` when given, otherwise keep `current`
pub(crate) fn or_current(input: Option<&str>, current: Money) -> SchoolResult<Money> {
    input.map(parse_amount).transpose().map(|m| m.unwrap_or(current))
}

/// Parse a YYYY-MM-DD date, defaulting to today
pub(crate) fn parse_date(input: Option<&str>) -> SchoolResult<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            SchoolError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD format", s))
        }),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse a record ID in either `12` or display form
pub(crate) fn parse_id<I: FromStr>(input: &str, entity: &str) -> SchoolResult<I> {
    input
        .parse()
        .map_err(|_| SchoolError::Validation(format!("Invalid {} ID: {}", entity, input)))
}

pub(crate) fn resolve_class(storage: &Storage, identifier: &str) -> SchoolResult<Class> {
    ClassService::new(storage)
        .find(identifier)?
        .ok_or_else(|| SchoolError::class_not_found(identifier))
}

pub(crate) fn resolve_student(storage: &Storage, identifier: &str) -> SchoolResult<Student> {
    StudentService::new(storage)
        .find(identifier)?
        .ok_or_else(|| SchoolError::student_not_found(identifier))
}
