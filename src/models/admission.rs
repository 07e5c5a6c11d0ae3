//! Admission model
//!
//! An admission enrolls a student in a class and carries a one-time charge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{AdmissionId, ClassId, StudentId};
use super::money::Money;

/// A stored admission charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub id: AdmissionId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub amount: Money,
    pub paid: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Admission request as sent by the UI
///
/// Besides the admission charge itself, `months` monthly charges of
/// `monthly` each are generated starting from the admission month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionInput {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub amount: Money,
    #[serde(default)]
    pub monthly: Money,
    #[serde(default)]
    pub months: Option<u32>,
    pub date: NaiveDate,
    #[serde(default)]
    pub remark: Option<String>,
}

impl AdmissionInput {
    pub fn validate(self) -> Result<Self, String> {
        if self.amount.is_negative() {
            return Err("Admission amount cannot be negative".into());
        }
        if self.monthly.is_negative() {
            return Err("Monthly fee cannot be negative".into());
        }
        Ok(self)
    }
}

/// Fields that may be changed on an existing admission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionUpdate {
    pub class_id: ClassId,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub remark: Option<String>,
}

/// An admission joined with its class name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRecord {
    pub id: AdmissionId,
    pub class: String,
    pub amount: Money,
    pub paid: Money,
    pub date: NaiveDate,
    pub remark: Option<String>,
}
