//! Charge snapshots shared by monthly fees and admissions
//!
//! A charge is anything a student owes with an `amount` and a running `paid`
//! total. The allocator only ever sees these snapshots.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// The state of one charge at the moment it was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeSnapshot<I> {
    pub id: I,
    pub date: NaiveDate,
    pub amount: Money,
    pub paid: Money,
}

impl<I> ChargeSnapshot<I> {
    /// What is still owed on this charge
    pub fn remaining_due(&self) -> Money {
        (self.amount - self.paid).non_negative()
    }

    /// What a reversal may take back from this charge
    pub fn collectible(&self) -> Money {
        self.paid.non_negative()
    }
}

/// Which bucket of a student's balance a charge draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageKind {
    Admission,
    Monthly,
}

impl fmt::Display for UsageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admission => write!(f, "admission"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `offset` months after `start`'s month
pub fn nth_month(start: NaiveDate, offset: u32) -> Option<NaiveDate> {
    first_of_month(start).checked_add_months(Months::new(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_remaining_and_collectible() {
        let charge = ChargeSnapshot {
            id: 1,
            date: date(2025, 1, 1),
            amount: Money::from_units(100),
            paid: Money::from_units(40),
        };
        assert_eq!(charge.remaining_due(), Money::from_units(60));
        assert_eq!(charge.collectible(), Money::from_units(40));
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(first_of_month(date(2025, 3, 17)), date(2025, 3, 1));
        assert_eq!(nth_month(date(2025, 11, 30), 2), Some(date(2026, 1, 1)));
        assert_eq!(nth_month(date(2024, 1, 31), 1), Some(date(2024, 2, 1)));
    }
}
