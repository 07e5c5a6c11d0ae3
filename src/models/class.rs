//! Class model
//!
//! A class (grade, section, course) that students are admitted into. The fee
//! fields are defaults offered when admitting a student; each charge keeps
//! its own amount.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ClassId;
use super::money::Money;

/// A stored class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    /// One-time fee charged on admission
    pub admission_fee: Money,
    /// Fee charged for every month of enrollment
    pub monthly_fee: Money,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Fields accepted when creating or updating a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInput {
    pub name: String,
    #[serde(default)]
    pub admission_fee: Money,
    #[serde(default)]
    pub monthly_fee: Money,
    #[serde(default)]
    pub remark: Option<String>,
}

impl ClassInput {
    pub fn new(name: impl Into<String>, admission_fee: Money, monthly_fee: Money) -> Self {
        Self {
            name: name.into(),
            admission_fee,
            monthly_fee,
            remark: None,
        }
    }

    /// Validate the input and return it with the name trimmed
    pub fn validate(mut self) -> Result<Self, ClassValidationError> {
        self.name = self.name.trim().to_string();

        if self.name.is_empty() {
            return Err(ClassValidationError::EmptyName);
        }
        if self.name.len() > 100 {
            return Err(ClassValidationError::NameTooLong(self.name.len()));
        }
        if self.admission_fee.is_negative() || self.monthly_fee.is_negative() {
            return Err(ClassValidationError::NegativeFee);
        }

        Ok(self)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Validation errors for classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeFee,
}

impl fmt::Display for ClassValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Class name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Class name too long ({} chars, max 100)", len)
            }
            Self::NegativeFee => write!(f, "Class fees cannot be negative"),
        }
    }
}

impl std::error::Error for ClassValidationError {}
