//! Student model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::StudentId;
use super::money::Money;

/// A stored student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub student_name: String,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Inactive students are kept for their history but hidden by default
    pub active: bool,
}

/// Fields accepted when creating or updating a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    pub student_name: String,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl StudentInput {
    pub fn new(student_name: impl Into<String>) -> Self {
        Self {
            student_name: student_name.into(),
            guardian_name: String::new(),
            phone: String::new(),
            address: String::new(),
            active: true,
        }
    }

    pub fn validate(mut self) -> Result<Self, String> {
        self.student_name = self.student_name.trim().to_string();
        if self.student_name.is_empty() {
            return Err("Student name cannot be empty".into());
        }
        Ok(self)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.student_name, self.id)
    }
}

/// Running payment bookkeeping for one student
///
/// `available` is credit received but not yet absorbed by any charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudentBalance {
    pub student_id: Option<StudentId>,
    /// Sum of all payments received
    pub total_paid: Money,
    /// Portion of `total_paid` absorbed by admission charges
    pub admission_used: Money,
    /// Portion of `total_paid` absorbed by monthly charges
    pub monthly_used: Money,
}

impl StudentBalance {
    pub fn used(&self) -> Money {
        self.admission_used + self.monthly_used
    }

    pub fn available(&self) -> Money {
        self.total_paid - self.used()
    }
}

/// Balance plus what the student still owes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub student_id: StudentId,
    pub total_paid: Money,
    pub admission_used: Money,
    pub monthly_used: Money,
    pub available: Money,
    /// Outstanding `amount - paid` across every charge
    pub due: Money,
}
