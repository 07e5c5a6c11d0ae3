//! Monthly fee service
//!
//! Monthly charges are created one at a time or in runs of consecutive
//! months. Their `paid` column only moves through allocation, and every
//! change to it is mirrored in the student's `monthly_used` total so that
//! available credit stays correct.

use chrono::NaiveDate;
use rusqlite::Transaction;

use super::allocator::{self, plan_bulk, AllocationPlan};
use crate::audit::{generate_diff, AuditEntry, EntityType};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{
    first_of_month, nth_month, BulkCreate, GenerateFees, Money, MonthlyFee, MonthlyFeeId,
    MonthlyFeeInput, MonthlyFeeRecord, MonthlyFeeUpdate, StudentId, UsageKind,
};
use crate::storage::{BalanceRepository, ClassRepository, MonthlyFeeRepository, Storage};

/// Service for monthly fee management
pub struct MonthlyFeeService<'a> {
    storage: &'a Storage,
}

impl<'a> MonthlyFeeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a single monthly charge
    ///
    /// A non-zero `paid` is taken from the student's available credit and
    /// fails if there is not enough of it.
    pub fn create(&self, input: MonthlyFeeInput) -> SchoolResult<MonthlyFeeId> {
        let input = input.validate().map_err(SchoolError::Validation)?;
        self.require_student(input.student_id)?;

        let (id, fee) = self.storage.in_transaction(|tx| {
            if input.paid.is_positive() {
                let available = BalanceRepository::new(tx).get(input.student_id)?.available();
                if input.paid > available {
                    return Err(SchoolError::Validation(format!(
                        "Paid amount {} exceeds available credit {}",
                        input.paid, available
                    )));
                }
                BalanceRepository::new(tx).adjust_used(
                    input.student_id,
                    input.paid,
                    UsageKind::Monthly,
                )?;
            }

            let fees = MonthlyFeeRepository::new(tx);
            let id = fees.insert(&input)?;
            Ok((id, fees.get(id)?))
        })?;

        if let Some(fee) = fee {
            self.storage
                .log_create(EntityType::MonthlyFee, id.to_string(), None, &fee)?;
        }

        Ok(id)
    }

    /// Insert `count` charges on consecutive months, pre-paid greedily from
    /// `have_amount`, and return how much of it was used
    ///
    /// Only the charges are written; see [`Self::create_bulk_with_payment`]
    /// for the variant that also records the usage.
    pub fn create_bulk(bulk: &BulkCreate, tx: &Transaction<'_>) -> SchoolResult<Money> {
        if bulk.fee.is_negative() {
            return Err(SchoolError::Validation("Monthly fee cannot be negative".into()));
        }

        if bulk.count <= 0 {
            return Ok(Money::zero());
        }

        let out_of_range = || {
            SchoolError::Validation(format!(
                "{} months from {} is out of range",
                bulk.count, bulk.from
            ))
        };
        // The whole run must fit in the calendar before anything is written.
        let last = u32::try_from(bulk.count - 1).map_err(|_| out_of_range())?;
        nth_month(bulk.from, last).ok_or_else(out_of_range)?;

        let fees = MonthlyFeeRepository::new(tx);
        let mut used = Money::zero();

        for (offset, paid) in (0..=last).zip(plan_bulk(bulk.count, bulk.fee, bulk.have_amount)) {
            let date = nth_month(bulk.from, offset).ok_or_else(out_of_range)?;

            fees.insert(&MonthlyFeeInput {
                student_id: bulk.student_id,
                class_id: bulk.class_id,
                date,
                amount: bulk.fee,
                paid,
            })?;
            used += paid;
        }

        Ok(used)
    }

    /// [`Self::create_bulk`] plus recording the used amount as monthly usage
    pub fn create_bulk_with_payment(bulk: &BulkCreate, tx: &Transaction<'_>) -> SchoolResult<Money> {
        let used = Self::create_bulk(bulk, tx)?;
        if !used.is_zero() {
            BalanceRepository::new(tx).adjust_used(bulk.student_id, used, UsageKind::Monthly)?;
        }
        Ok(used)
    }

    /// Generate a run of charges paid from the student's available credit
    pub fn generate(&self, request: GenerateFees) -> SchoolResult<Money> {
        self.require_student(request.student_id)?;

        let used = self.storage.in_transaction(|tx| {
            let class = ClassRepository::new(tx)
                .get(request.class_id)?
                .ok_or_else(|| SchoolError::class_not_found(request.class_id.to_string()))?;
            let have_amount = BalanceRepository::new(tx)
                .get(request.student_id)?
                .available()
                .non_negative();

            let bulk = BulkCreate {
                student_id: request.student_id,
                class_id: request.class_id,
                from: request.from,
                count: request.count,
                fee: request.fee.unwrap_or(class.monthly_fee),
                have_amount,
            };
            Self::create_bulk_with_payment(&bulk, tx)
        })?;

        if request.count > 0 {
            self.storage.log_allocation(
                EntityType::MonthlyFee,
                request.student_id.to_string(),
                &request,
                format!("generated {} monthly fee(s), {} paid from credit", request.count, used),
            )?;
        }

        Ok(used)
    }

    /// Change class, month or amount of a charge
    ///
    /// Lowering the amount below what was paid releases the excess back
    /// to the student's credit.
    pub fn update(&self, id: MonthlyFeeId, update: MonthlyFeeUpdate) -> SchoolResult<bool> {
        if update.amount.is_negative() {
            return Err(SchoolError::Validation(
                "Monthly fee amount cannot be negative".into(),
            ));
        }
        let update = MonthlyFeeUpdate {
            date: first_of_month(update.date),
            ..update
        };

        let outcome = self.storage.in_transaction(|tx| {
            let fees = MonthlyFeeRepository::new(tx);
            let Some(before) = fees.get(id)? else {
                return Ok(None);
            };
            if !fees.update(id, &update)? {
                return Ok(None);
            }

            let released = before.paid - before.paid.min(update.amount);
            if released.is_positive() {
                BalanceRepository::new(tx).adjust_used(
                    before.student_id,
                    -released,
                    UsageKind::Monthly,
                )?;
            }

            Ok(fees.get(id)?.map(|after| (before, after)))
        })?;

        match outcome {
            Some((before, after)) => {
                self.storage.log_update(
                    EntityType::MonthlyFee,
                    id.to_string(),
                    None,
                    &before,
                    &after,
                    generate_diff(&before, &after),
                )?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete charges, releasing whatever was paid on them to the
    /// students' credit
    pub fn delete(&self, ids: &[MonthlyFeeId]) -> SchoolResult<bool> {
        let removed = self.storage.in_transaction(|tx| {
            let fees = MonthlyFeeRepository::new(tx);
            let rows = fees.get_many(ids)?;
            fees.delete(ids)?;

            let balances = BalanceRepository::new(tx);
            for fee in rows.iter().filter(|f| f.paid.is_positive()) {
                balances.adjust_used(fee.student_id, -fee.paid, UsageKind::Monthly)?;
            }
            Ok(rows)
        })?;

        let entries: Vec<_> = removed
            .iter()
            .map(|fee| AuditEntry::delete(EntityType::MonthlyFee, fee.id.to_string(), None, fee))
            .collect();
        self.storage.log_batch(&entries)?;

        Ok(!removed.is_empty())
    }

    /// One student's charges, or every charge when `student_id` is `None`
    pub fn list(&self, student_id: Option<StudentId>) -> SchoolResult<Vec<MonthlyFeeRecord>> {
        self.storage.monthly_fees().list(student_id)
    }

    pub fn list_by_date_range(
        &self,
        student_id: StudentId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> SchoolResult<Vec<MonthlyFeeRecord>> {
        if from > to {
            return Err(SchoolError::Validation(format!(
                "Start date {} is after end date {}",
                from, to
            )));
        }
        self.storage.monthly_fees().list_by_date_range(student_id, from, to)
    }

    pub fn get(&self, id: MonthlyFeeId) -> SchoolResult<Option<MonthlyFee>> {
        self.storage.monthly_fees().get(id)
    }

    /// Apply a signed amount to the student's monthly charges inside `tx`
    ///
    /// Positive amounts fill unpaid charges, negative amounts take back
    /// from paid ones. The plan's `used` is what actually moved.
    pub fn allocate(
        student_id: StudentId,
        amount: Money,
        tx: &Transaction<'_>,
    ) -> SchoolResult<AllocationPlan<MonthlyFeeId>> {
        allocator::allocate(&MonthlyFeeRepository::new(tx), student_id, amount)
    }

    /// [`Self::allocate`] in a transaction of its own
    pub fn allocate_now(&self, student_id: StudentId, amount: Money) -> SchoolResult<Money> {
        let plan = self
            .storage
            .in_transaction(|tx| Self::allocate(student_id, amount, tx))?;

        if let Some(entry) = plan.audit_entry(EntityType::MonthlyFee, student_id) {
            self.storage.log_batch(&[entry])?;
        }

        Ok(plan.used)
    }

    fn require_student(&self, id: StudentId) -> SchoolResult<()> {
        if self.storage.students().exists(id)? {
            Ok(())
        } else {
            Err(SchoolError::student_not_found(id.to_string()))
        }
    }
}
