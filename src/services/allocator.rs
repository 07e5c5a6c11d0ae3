//! Fee allocation
//!
//! Spreads a signed amount over a student's charges. A positive amount
//! fills unpaid charges, a negative amount takes money back from paid
//! ones. Planning is a pure function over snapshots; [`allocate`] reads the
//! snapshots from a ledger and applies the resulting plan.
//!
//! With three unpaid charges of 100 (Jan, Feb, Mar), allocating 150 pays
//! Jan in full and Feb by 50. Reversing 30 afterwards takes it from Feb,
//! the least-paid charge, leaving Feb at 20.

use serde::Serialize;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{ChargeSnapshot, Money, StudentId};
use crate::storage::ChargeLedger;

/// A change to one charge's `paid`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChargeDelta<I> {
    pub id: I,
    pub delta: Money,
}

/// The outcome of planning (and possibly applying) an allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationPlan<I> {
    /// The signed amount that was asked for
    pub requested: Money,
    /// The signed amount actually absorbed; same sign as `requested`
    pub used: Money,
    pub updates: Vec<ChargeDelta<I>>,
}

impl<I> AllocationPlan<I> {
    pub fn empty(requested: Money) -> Self {
        Self {
            requested,
            used: Money::zero(),
            updates: Vec::new(),
        }
    }

    /// The part of the request no charge could absorb
    pub fn unused(&self) -> Money {
        self.requested - self.used
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

impl<I: Serialize> AllocationPlan<I> {
    /// An audit entry for a plan that moved money, keyed by student
    pub fn audit_entry(&self, entity_type: EntityType, student_id: StudentId) -> Option<AuditEntry> {
        if self.is_empty() {
            return None;
        }
        let verb = if self.used.is_negative() { "reversed" } else { "applied" };
        let summary = format!(
            "{} {} across {} charge(s), {} requested",
            verb,
            self.used.abs(),
            self.updates.len(),
            self.requested.abs()
        );
        Some(AuditEntry::allocate(entity_type, student_id.to_string(), self, summary))
    }
}

/// Plan an allocation over `charges`, visited in the order given
///
/// For a payment the charges should be in unpaid-list order, for a
/// reversal in paid-list order. Each charge stays within `0..=amount`.
pub fn plan_allocation<I: Copy>(charges: &[ChargeSnapshot<I>], amount: Money) -> AllocationPlan<I> {
    let mut plan = AllocationPlan::empty(amount);
    if amount.is_zero() {
        return plan;
    }

    let reversing = amount.is_negative();
    let mut leftover = amount.abs();

    for charge in charges {
        if leftover.is_zero() {
            break;
        }

        let room = if reversing {
            charge.collectible()
        } else {
            charge.remaining_due()
        };
        let step = room.min(leftover);
        if step.is_zero() {
            continue;
        }

        leftover -= step;
        let delta = if reversing { -step } else { step };
        plan.used += delta;
        plan.updates.push(ChargeDelta { id: charge.id, delta });
    }

    plan
}

/// Paid amounts for `count` new charges of `fee` each, filled in order
/// from `have`
///
/// Charge `i` gets `min(fee, max(0, have - i * fee))`. A `count` of zero or
/// less yields nothing. The amounts are produced lazily so callers can
/// stop early.
pub fn plan_bulk(count: i64, fee: Money, have: Money) -> impl Iterator<Item = Money> {
    let fee = fee.non_negative();
    let mut remain = have.non_negative();
    (0..count.max(0)).map(move |_| {
        let paid = fee.min(remain);
        remain -= paid;
        paid
    })
}

/// Allocate `amount` against one ledger of a student's charges
///
/// The ledger should borrow the caller's transaction so the updates land
/// together with whatever else the caller writes.
pub fn allocate<L: ChargeLedger>(
    ledger: &L,
    student_id: StudentId,
    amount: Money,
) -> SchoolResult<AllocationPlan<L::Id>> {
    if amount.is_zero() {
        return Ok(AllocationPlan::empty(amount));
    }

    let charges = if amount.is_positive() {
        ledger.unpaid_list(student_id)?
    } else {
        ledger.paid_list(student_id)?
    };

    let plan = plan_allocation(&charges, amount);
    for update in &plan.updates {
        if !ledger.apply_delta(update.id, update.delta)? {
            return Err(SchoolError::Database {
                operation: "applying payment to charge",
                message: format!("charge {} no longer exists", update.id),
            });
        }
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn charge(id: u32, month: u32, amount: i64, paid: i64) -> ChargeSnapshot<u32> {
        ChargeSnapshot {
            id,
            date: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            amount: Money::from_minor(amount),
            paid: Money::from_minor(paid),
        }
    }

    fn deltas(plan: &AllocationPlan<u32>) -> Vec<(u32, i64)> {
        plan.updates.iter().map(|u| (u.id, u.delta.minor())).collect()
    }

    #[test]
    fn test_zero_is_noop() {
        let plan = plan_allocation(&[charge(1, 1, 100, 0)], Money::zero());
        assert!(plan.is_empty());
        assert_eq!(plan.used, Money::zero());
    }

    #[test]
    fn test_payment_fills_in_order() {
        let charges = [charge(1, 1, 100, 0), charge(2, 2, 100, 0), charge(3, 3, 100, 0)];
        let plan = plan_allocation(&charges, Money::from_minor(150));

        assert_eq!(deltas(&plan), vec![(1, 100), (2, 50)]);
        assert_eq!(plan.used, Money::from_minor(150));
        assert_eq!(plan.unused(), Money::zero());
    }

    #[test]
    fn test_payment_surplus_is_unused() {
        let charges = [charge(1, 1, 100, 40), charge(2, 2, 100, 0)];
        let plan = plan_allocation(&charges, Money::from_minor(500));

        assert_eq!(deltas(&plan), vec![(1, 60), (2, 100)]);
        assert_eq!(plan.used, Money::from_minor(160));
        assert_eq!(plan.unused(), Money::from_minor(340));
    }

    #[test]
    fn test_reversal_collects_in_order() {
        // paid-list order: least paid first
        let charges = [charge(2, 2, 100, 50), charge(1, 1, 100, 100)];
        let plan = plan_allocation(&charges, Money::from_minor(-30));

        assert_eq!(deltas(&plan), vec![(2, -30)]);
        assert_eq!(plan.used, Money::from_minor(-30));
    }

    #[test]
    fn test_reversal_spans_charges_and_saturates() {
        let charges = [charge(2, 2, 100, 50), charge(1, 1, 100, 100)];
        let plan = plan_allocation(&charges, Money::from_minor(-400));

        assert_eq!(deltas(&plan), vec![(2, -50), (1, -100)]);
        assert_eq!(plan.used, Money::from_minor(-150));
        assert_eq!(plan.unused(), Money::from_minor(-250));
    }

    #[test]
    fn test_settled_charges_are_skipped() {
        let charges = [charge(1, 1, 100, 100), charge(2, 2, 0, 0), charge(3, 3, 100, 0)];
        let plan = plan_allocation(&charges, Money::from_minor(10));
        assert_eq!(deltas(&plan), vec![(3, 10)]);
    }

    #[test]
    fn test_used_never_exceeds_request() {
        let charges = [charge(1, 1, 70, 0), charge(2, 2, 70, 10), charge(3, 3, 70, 0)];
        for amount in [-500, -60, -1, 1, 59, 60, 61, 200, 1000] {
            let plan = plan_allocation(&charges, Money::from_minor(amount));
            assert!(plan.used.abs() <= plan.requested.abs());
            assert!(plan.used.is_zero() || (plan.used.is_negative() == (amount < 0)));
        }
    }

    #[test]
    fn test_audit_entry_only_when_money_moved() {
        let empty: AllocationPlan<u32> = AllocationPlan::empty(Money::from_minor(10));
        assert!(empty.audit_entry(EntityType::MonthlyFee, StudentId::new(1)).is_none());

        let plan = plan_allocation(&[charge(1, 1, 100, 0)], Money::from_minor(40));
        let entry = plan.audit_entry(EntityType::MonthlyFee, StudentId::new(1)).unwrap();
        assert_eq!(entry.entity_id, "stu-1");
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("applied 0.40 across 1 charge(s), 0.40 requested")
        );
    }

    #[test]
    fn test_bulk_formula() {
        let fee = Money::from_minor(100);
        let have = Money::from_minor(250);
        let paid: Vec<_> = plan_bulk(4, fee, have).collect();

        let expected: Vec<_> = (0..4i64)
            .map(|i| fee.min((have - Money::from_minor(i * 100)).non_negative()))
            .collect();
        assert_eq!(paid, expected);
        assert_eq!(paid, vec![
            Money::from_minor(100),
            Money::from_minor(100),
            Money::from_minor(50),
            Money::zero(),
        ]);
    }

    #[test]
    fn test_bulk_non_positive_count() {
        assert_eq!(plan_bulk(0, Money::from_minor(100), Money::from_minor(1000)).count(), 0);
        assert_eq!(plan_bulk(-3, Money::from_minor(100), Money::from_minor(1000)).count(), 0);
    }

    #[test]
    fn test_bulk_is_lazy() {
        let mut paid = plan_bulk(i64::MAX, Money::from_minor(100), Money::from_minor(150));
        assert_eq!(paid.next(), Some(Money::from_minor(100)));
        assert_eq!(paid.next(), Some(Money::from_minor(50)));
        assert_eq!(paid.next(), Some(Money::zero()));
    }
}
