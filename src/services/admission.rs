//! Admission service
//!
//! Admitting a student writes the admission charge and the first run of
//! monthly charges in one transaction. Both are pre-paid from whatever
//! credit the student already has, admission first.

use super::monthly_fee::MonthlyFeeService;
use crate::audit::{generate_diff, AuditEntry, EntityType};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{
    Admission, AdmissionId, AdmissionInput, AdmissionRecord, AdmissionUpdate, BulkCreate, Money,
    StudentId, UsageKind,
};
use crate::storage::{
    AdmissionRepository, BalanceRepository, ClassRepository, NewAdmission, Storage,
};

/// Service for admissions
pub struct AdmissionService<'a> {
    storage: &'a Storage,
    default_months: u32,
}

impl<'a> AdmissionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            default_months: 1,
        }
    }

    /// Months of fees generated when a request does not say
    pub fn with_default_months(mut self, months: u32) -> Self {
        self.default_months = months;
        self
    }

    /// Admit a student
    ///
    /// The admission charge takes `min(amount, available)` from the
    /// student's credit; what remains pre-pays the generated monthly
    /// charges. No monthly charges are generated when `monthly` is zero.
    pub fn create(&self, input: AdmissionInput) -> SchoolResult<AdmissionId> {
        let input = input.validate().map_err(SchoolError::Validation)?;
        if !self.storage.students().exists(input.student_id)? {
            return Err(SchoolError::student_not_found(input.student_id.to_string()));
        }
        let months = input.months.unwrap_or(self.default_months);

        let (id, admission) = self.storage.in_transaction(|tx| {
            if ClassRepository::new(tx).get(input.class_id)?.is_none() {
                return Err(SchoolError::class_not_found(input.class_id.to_string()));
            }

            let balances = BalanceRepository::new(tx);
            let available = balances.get(input.student_id)?.available().non_negative();
            let paid = input.amount.min(available);

            let admissions = AdmissionRepository::new(tx);
            let id = admissions.insert(&NewAdmission {
                student_id: input.student_id,
                class_id: input.class_id,
                amount: input.amount,
                paid,
                date: input.date,
                remark: input.remark.clone(),
            })?;
            if paid.is_positive() {
                balances.adjust_used(input.student_id, paid, UsageKind::Admission)?;
            }

            if months > 0 && input.monthly.is_positive() {
                MonthlyFeeService::create_bulk_with_payment(
                    &BulkCreate {
                        student_id: input.student_id,
                        class_id: input.class_id,
                        from: input.date,
                        count: i64::from(months),
                        fee: input.monthly,
                        have_amount: available - paid,
                    },
                    tx,
                )?;
            }

            Ok((id, admissions.get(id)?))
        })?;

        if let Some(admission) = admission {
            self.storage
                .log_create(EntityType::Admission, id.to_string(), None, &admission)?;
        }

        Ok(id)
    }

    /// Change class, amount, date or remark
    ///
    /// Lowering the amount below what was paid releases the excess.
    pub fn update(&self, id: AdmissionId, update: AdmissionUpdate) -> SchoolResult<bool> {
        if update.amount.is_negative() {
            return Err(SchoolError::Validation(
                "Admission amount cannot be negative".into(),
            ));
        }

        let outcome = self.storage.in_transaction(|tx| {
            let admissions = AdmissionRepository::new(tx);
            let Some(before) = admissions.get(id)? else {
                return Ok(None);
            };
            if !admissions.update(id, &update)? {
                return Ok(None);
            }

            let released = before.paid - before.paid.min(update.amount);
            if released.is_positive() {
                BalanceRepository::new(tx).adjust_used(
                    before.student_id,
                    -released,
                    UsageKind::Admission,
                )?;
            }

            Ok(admissions.get(id)?.map(|after| (before, after)))
        })?;

        let Some((before, after)) = outcome else {
            return Ok(false);
        };
        self.storage.log_update(
            EntityType::Admission,
            id.to_string(),
            None,
            &before,
            &after,
            generate_diff(&before, &after),
        )?;
        Ok(true)
    }

    /// Delete admissions, releasing what was paid on them
    ///
    /// Monthly charges generated alongside an admission are left alone.
    pub fn delete(&self, ids: &[AdmissionId]) -> SchoolResult<bool> {
        let removed = self.storage.in_transaction(|tx| {
            let admissions = AdmissionRepository::new(tx);
            let rows = admissions.get_many(ids)?;
            admissions.delete(ids)?;

            let balances = BalanceRepository::new(tx);
            for admission in rows.iter().filter(|a| a.paid.is_positive()) {
                balances.adjust_used(admission.student_id, -admission.paid, UsageKind::Admission)?;
            }
            Ok(rows)
        })?;

        let entries: Vec<_> = removed
            .iter()
            .map(|a| AuditEntry::delete(EntityType::Admission, a.id.to_string(), None, a))
            .collect();
        self.storage.log_batch(&entries)?;

        Ok(!removed.is_empty())
    }

    pub fn list(&self, student_id: Option<StudentId>) -> SchoolResult<Vec<AdmissionRecord>> {
        self.storage.admissions().list(student_id)
    }

    pub fn get(&self, id: AdmissionId) -> SchoolResult<Option<Admission>> {
        self.storage.admissions().get(id)
    }
}
