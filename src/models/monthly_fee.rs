//! Monthly fee model
//!
//! One row per student per month of enrollment. Dates are always the first
//! day of the month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::charge::first_of_month;
use super::ids::{ClassId, MonthlyFeeId, StudentId};
use super::money::Money;

/// A stored monthly charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFee {
    pub id: MonthlyFeeId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub date: NaiveDate,
    pub amount: Money,
    pub paid: Money,
}

impl MonthlyFee {
    pub fn is_settled(&self) -> bool {
        self.paid >= self.amount
    }
}

/// Fields for inserting a monthly charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFeeInput {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub date: NaiveDate,
    pub amount: Money,
    #[serde(default)]
    pub paid: Money,
}

impl MonthlyFeeInput {
    /// Validate and normalize the date to the first of its month
    pub fn validate(mut self) -> Result<Self, String> {
        self.date = first_of_month(self.date);
        if self.amount.is_negative() {
            return Err("Monthly fee amount cannot be negative".into());
        }
        if self.paid.is_negative() || self.paid > self.amount {
            return Err(format!(
                "Paid amount {} must be between 0 and {}",
                self.paid, self.amount
            ));
        }
        Ok(self)
    }
}

/// Fields that may be changed on an existing monthly charge
///
/// `paid` is deliberately absent: it only moves through allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFeeUpdate {
    pub class_id: ClassId,
    pub date: NaiveDate,
    pub amount: Money,
}

/// A monthly charge joined with its class and student names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFeeRecord {
    pub id: MonthlyFeeId,
    pub date: NaiveDate,
    pub amount: Money,
    pub paid: Money,
    pub class_name: String,
    pub student_name: String,
}

/// Request to generate a run of monthly charges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreate {
    pub student_id: StudentId,
    pub class_id: ClassId,
    /// Any day in the first month of the run
    pub from: NaiveDate,
    /// Number of months; zero or less generates nothing
    pub count: i64,
    pub fee: Money,
    /// Credit available to pre-pay the generated charges
    #[serde(default)]
    pub have_amount: Money,
}

/// Request to generate monthly charges paid from the student's credit
///
/// `fee` defaults to the class's monthly fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateFees {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub from: NaiveDate,
    pub count: i64,
    #[serde(default)]
    pub fee: Option<Money>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_normalizes_date() {
        let input = MonthlyFeeInput {
            student_id: StudentId::new(1),
            class_id: ClassId::new(1),
            date: NaiveDate::from_ymd_opt(2025, 4, 19).unwrap(),
            amount: Money::from_units(100),
            paid: Money::zero(),
        };
        let input = input.validate().unwrap();
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn test_input_rejects_overpaid() {
        let input = MonthlyFeeInput {
            student_id: StudentId::new(1),
            class_id: ClassId::new(1),
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            amount: Money::from_units(100),
            paid: Money::from_units(101),
        };
        assert!(input.validate().is_err());
    }
}
