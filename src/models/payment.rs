//! Payment model
//!
//! Money received from a student. Payments credit the student's balance;
//! the allocator then spreads that credit over the student's charges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{PaymentId, StudentId};
use super::money::Money;

/// A stored payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub student_id: StudentId,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Fields accepted when recording or editing a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInput {
    pub student_id: StudentId,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub remark: Option<String>,
}

impl PaymentInput {
    pub fn validate(self) -> Result<Self, String> {
        if !self.amount.is_positive() {
            return Err("Payment amount must be positive".into());
        }
        Ok(self)
    }
}

/// A payment joined with the student's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub student_id: StudentId,
    pub student_name: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub remark: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_must_be_positive() {
        let input = PaymentInput {
            student_id: StudentId::new(1),
            amount: Money::zero(),
            date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            remark: None,
        };
        assert!(input.validate().is_err());
    }
}
