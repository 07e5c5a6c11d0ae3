//! Payment service
//!
//! Payments credit the student's balance and the credit is then spread
//! over the student's charges: admission charges first, then monthly
//! charges. When a payment shrinks or goes away and the credit turns
//! negative, allocations are taken back in the opposite order.

use rusqlite::Transaction;
use serde::Serialize;

use super::allocator::{self, AllocationPlan};
use crate::audit::{generate_diff, AuditEntry, EntityType};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{
    AdmissionId, Money, MonthlyFeeId, Payment, PaymentId, PaymentInput, PaymentRecord, StudentId,
};
use crate::storage::{
    AdmissionRepository, BalanceRepository, ChargeLedger, MonthlyFeeRepository, PaymentRepository,
    Storage, StudentRepository,
};

/// What one rebalance moved for a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rebalance {
    pub student_id: StudentId,
    pub admission: AllocationPlan<AdmissionId>,
    pub monthly: AllocationPlan<MonthlyFeeId>,
}

impl Rebalance {
    fn audit_entries(&self) -> Vec<AuditEntry> {
        self.admission
            .audit_entry(EntityType::Admission, self.student_id)
            .into_iter()
            .chain(self.monthly.audit_entry(EntityType::MonthlyFee, self.student_id))
            .collect()
    }
}

/// Service for payments
pub struct PaymentService<'a> {
    storage: &'a Storage,
}

impl<'a> PaymentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a payment and allocate it
    pub fn create(&self, input: PaymentInput) -> SchoolResult<PaymentId> {
        let input = input.validate().map_err(SchoolError::Validation)?;

        let (payment, rebalance) = self.storage.in_transaction(|tx| {
            require_student(tx, input.student_id)?;

            let payments = PaymentRepository::new(tx);
            let id = payments.insert(&input)?;
            let rebalance = Self::credit(input.student_id, input.amount, tx)?;
            let payment = payments
                .get(id)?
                .ok_or_else(|| SchoolError::payment_not_found(id.to_string()))?;
            Ok((payment, rebalance))
        })?;

        let mut entries = vec![AuditEntry::create(
            EntityType::Payment,
            payment.id.to_string(),
            None,
            &payment,
        )];
        entries.extend(rebalance.audit_entries());
        self.storage.log_batch(&entries)?;

        Ok(payment.id)
    }

    /// Edit a payment and re-run allocation for the affected students
    pub fn update(&self, id: PaymentId, input: PaymentInput) -> SchoolResult<bool> {
        let input = input.validate().map_err(SchoolError::Validation)?;

        let outcome = self.storage.in_transaction(|tx| {
            let payments = PaymentRepository::new(tx);
            let Some(before) = payments.get(id)? else {
                return Ok(None);
            };
            require_student(tx, input.student_id)?;
            if !payments.update(id, &input)? {
                return Ok(None);
            }

            let mut rebalances = Vec::with_capacity(2);
            if before.student_id == input.student_id {
                rebalances.push(Self::credit(
                    input.student_id,
                    input.amount - before.amount,
                    tx,
                )?);
            } else {
                rebalances.push(Self::credit(before.student_id, -before.amount, tx)?);
                rebalances.push(Self::credit(input.student_id, input.amount, tx)?);
            }

            let after = payments
                .get(id)?
                .ok_or_else(|| SchoolError::payment_not_found(id.to_string()))?;
            Ok(Some((before, after, rebalances)))
        })?;

        let Some((before, after, rebalances)) = outcome else {
            return Ok(false);
        };

        let mut entries = vec![AuditEntry::update(
            EntityType::Payment,
            id.to_string(),
            None,
            &before,
            &after,
            generate_diff(&before, &after),
        )];
        entries.extend(rebalances.iter().flat_map(Rebalance::audit_entries));
        self.storage.log_batch(&entries)?;

        Ok(true)
    }

    /// Delete payments and take their money back off the students' charges
    pub fn delete(&self, ids: &[PaymentId]) -> SchoolResult<bool> {
        let (removed, rebalances) = self.storage.in_transaction(|tx| {
            let payments = PaymentRepository::new(tx);
            let rows = payments.get_many(ids)?;
            payments.delete(ids)?;

            let mut rebalances = Vec::with_capacity(rows.len());
            for payment in &rows {
                rebalances.push(Self::credit(payment.student_id, -payment.amount, tx)?);
            }
            Ok((rows, rebalances))
        })?;

        let mut entries: Vec<_> = removed
            .iter()
            .map(|p| AuditEntry::delete(EntityType::Payment, p.id.to_string(), None, p))
            .collect();
        entries.extend(rebalances.iter().flat_map(Rebalance::audit_entries));
        self.storage.log_batch(&entries)?;

        Ok(!removed.is_empty())
    }

    pub fn list(&self, student_id: Option<StudentId>) -> SchoolResult<Vec<PaymentRecord>> {
        self.storage.payments().list(student_id)
    }

    pub fn get(&self, id: PaymentId) -> SchoolResult<Option<Payment>> {
        self.storage.payments().get(id)
    }

    /// Add `delta` to the student's received total, then rebalance
    pub fn credit(student_id: StudentId, delta: Money, tx: &Transaction<'_>) -> SchoolResult<Rebalance> {
        if !delta.is_zero() {
            BalanceRepository::new(tx).add_paid(student_id, delta)?;
        }
        Self::rebalance(student_id, tx)
    }

    /// Bring the student's charges in line with their available credit
    ///
    /// Positive credit pays admission charges, then monthly charges.
    /// Negative credit is recovered from monthly charges, then admission
    /// charges. Each moved amount is recorded against its usage bucket.
    pub fn rebalance(student_id: StudentId, tx: &Transaction<'_>) -> SchoolResult<Rebalance> {
        let available = BalanceRepository::new(tx).get(student_id)?.available();

        let admissions = AdmissionRepository::new(tx);
        let monthly_fees = MonthlyFeeRepository::new(tx);

        let (admission, monthly) = if available.is_negative() {
            let monthly = Self::allocate_into(&monthly_fees, student_id, available, tx)?;
            let admission =
                Self::allocate_into(&admissions, student_id, available - monthly.used, tx)?;
            (admission, monthly)
        } else {
            let admission = Self::allocate_into(&admissions, student_id, available, tx)?;
            let monthly =
                Self::allocate_into(&monthly_fees, student_id, available - admission.used, tx)?;
            (admission, monthly)
        };

        Ok(Rebalance {
            student_id,
            admission,
            monthly,
        })
    }

    /// Allocate against one ledger and record what moved under that
    /// ledger's usage bucket
    fn allocate_into<L: ChargeLedger>(
        ledger: &L,
        student_id: StudentId,
        amount: Money,
        tx: &Transaction<'_>,
    ) -> SchoolResult<AllocationPlan<L::Id>> {
        let plan = allocator::allocate(ledger, student_id, amount)?;
        if !plan.used.is_zero() {
            BalanceRepository::new(tx).adjust_used(student_id, plan.used, L::KIND)?;
        }
        Ok(plan)
    }
}

fn require_student(tx: &Transaction<'_>, id: StudentId) -> SchoolResult<()> {
    if StudentRepository::new(tx).exists(id)? {
        Ok(())
    } else {
        Err(SchoolError::student_not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdmissionInput, BulkCreate, ClassId, ClassInput, StudentInput};
    use crate::services::{AdmissionService, MonthlyFeeService};
    use chrono::NaiveDate;

    fn setup() -> (Storage, StudentId, ClassId) {
        let storage = Storage::open_in_memory().unwrap();
        let class_id = storage
            .classes()
            .insert(&ClassInput::new("Grade 4", Money::from_units(200), Money::from_units(100)))
            .unwrap();
        let student_id = storage.students().insert(&StudentInput::new("Hana")).unwrap();
        (storage, student_id, class_id)
    }

    fn admit(storage: &Storage, student_id: StudentId, class_id: ClassId) {
        AdmissionService::new(storage)
            .create(AdmissionInput {
                student_id,
                class_id,
                amount: Money::from_units(200),
                monthly: Money::from_units(100),
                months: Some(3),
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                remark: None,
            })
            .unwrap();
    }

    fn pay(student_id: StudentId, units: i64) -> PaymentInput {
        PaymentInput {
            student_id,
            amount: Money::from_units(units),
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            remark: None,
        }
    }

    fn paid_totals(storage: &Storage, student_id: StudentId) -> (Money, Money) {
        let admission = storage
            .admissions()
            .list(Some(student_id))
            .unwrap()
            .iter()
            .map(|a| a.paid)
            .sum();
        let monthly = storage
            .monthly_fees()
            .list(Some(student_id))
            .unwrap()
            .iter()
            .map(|m| m.paid)
            .sum();
        (admission, monthly)
    }

    #[test]
    fn test_payment_pays_admission_then_monthly() {
        let (storage, student, class) = setup();
        admit(&storage, student, class);
        let service = PaymentService::new(&storage);

        service.create(pay(student, 350)).unwrap();

        assert_eq!(
            paid_totals(&storage, student),
            (Money::from_units(200), Money::from_units(150))
        );
        let balance = storage.balances().get(student).unwrap();
        assert_eq!(balance.total_paid, Money::from_units(350));
        assert_eq!(balance.available(), Money::zero());
    }

    #[test]
    fn test_usage_recorded_per_ledger() {
        let (storage, student, class) = setup();
        admit(&storage, student, class);
        let service = PaymentService::new(&storage);
        let id = service.create(pay(student, 260)).unwrap();

        let balance = storage.balances().get(student).unwrap();
        assert_eq!(balance.admission_used, Money::from_units(200));
        assert_eq!(balance.monthly_used, Money::from_units(60));

        assert!(service.delete(&[id]).unwrap());
        let balance = storage.balances().get(student).unwrap();
        assert_eq!(balance.admission_used, Money::zero());
        assert_eq!(balance.monthly_used, Money::zero());
    }

    #[test]
    fn test_overpayment_stays_as_credit() {
        let (storage, student, class) = setup();
        admit(&storage, student, class);
        let service = PaymentService::new(&storage);

        service.create(pay(student, 600)).unwrap();

        assert_eq!(
            paid_totals(&storage, student),
            (Money::from_units(200), Money::from_units(300))
        );
        assert_eq!(
            storage.balances().get(student).unwrap().available(),
            Money::from_units(100)
        );
    }

    #[test]
    fn test_delete_reverses_monthly_first() {
        let (storage, student, class) = setup();
        admit(&storage, student, class);
        let service = PaymentService::new(&storage);
        let first = service.create(pay(student, 250)).unwrap();
        service.create(pay(student, 100)).unwrap();

        assert!(service.delete(&[first]).unwrap());

        // 100 left: monthly allocations were taken back before admission ones
        assert_eq!(
            paid_totals(&storage, student),
            (Money::from_units(100), Money::zero())
        );
        let balance = storage.balances().get(student).unwrap();
        assert_eq!(balance.total_paid, Money::from_units(100));
        assert_eq!(balance.available(), Money::zero());
    }

    #[test]
    fn test_update_amount_rebalances() {
        let (storage, student, class) = setup();
        admit(&storage, student, class);
        let service = PaymentService::new(&storage);
        let id = service.create(pay(student, 300)).unwrap();

        assert!(service.update(id, pay(student, 220)).unwrap());
        assert_eq!(
            paid_totals(&storage, student),
            (Money::from_units(200), Money::from_units(20))
        );

        assert!(service.update(id, pay(student, 500)).unwrap());
        assert_eq!(
            paid_totals(&storage, student),
            (Money::from_units(200), Money::from_units(300))
        );
    }

    #[test]
    fn test_update_moves_payment_between_students() {
        let (storage, student, class) = setup();
        let other = storage.students().insert(&StudentInput::new("Ivo")).unwrap();
        storage
            .in_transaction(|tx| {
                MonthlyFeeService::create_bulk(
                    &BulkCreate {
                        student_id: other,
                        class_id: class,
                        from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                        count: 1,
                        fee: Money::from_units(100),
                        have_amount: Money::zero(),
                    },
                    tx,
                )
            })
            .unwrap();
        admit(&storage, student, class);
        let service = PaymentService::new(&storage);
        let id = service.create(pay(student, 100)).unwrap();

        assert!(service.update(id, pay(other, 100)).unwrap());

        assert_eq!(paid_totals(&storage, student), (Money::zero(), Money::zero()));
        assert_eq!(paid_totals(&storage, other), (Money::zero(), Money::from_units(100)));
    }

    #[test]
    fn test_missing_rows() {
        let (storage, student, _) = setup();
        let service = PaymentService::new(&storage);

        assert!(!service.update(PaymentId::new(8), pay(student, 10)).unwrap());
        assert!(!service.delete(&[PaymentId::new(8)]).unwrap());
        assert!(service
            .create(pay(StudentId::new(404), 10))
            .unwrap_err()
            .is_not_found());
    }
}
