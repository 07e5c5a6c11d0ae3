//! Storage layer for the school ledger
//!
//! A single SQLite connection with one repository per table. Repositories
//! borrow a connection, so the same code runs against the live connection
//! or inside a transaction:
//!
//! ```rust,ignore
//! storage.in_transaction(|tx| {
//!     let fees = MonthlyFeeRepository::new(tx);
//!     fees.apply_delta(id, Money::from_units(50))
//! })?;
//! ```

pub mod admissions;
pub mod balances;
pub mod classes;
pub mod ledger;
pub mod monthly_fees;
pub mod payments;
pub mod schema;
pub mod students;

pub use admissions::{AdmissionRepository, NewAdmission};
pub use balances::BalanceRepository;
pub use classes::ClassRepository;
pub use ledger::ChargeLedger;
pub use monthly_fees::MonthlyFeeRepository;
pub use payments::PaymentRepository;
pub use schema::initialize_schema;
pub use students::StudentRepository;

use rusqlite::{Connection, Transaction};
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::SchoolPaths;
use crate::config::settings::Settings;
use crate::error::{DbContext, SchoolResult};

/// Owns the database connection and the optional audit log
pub struct Storage {
    conn: Connection,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open (and if needed create) the database under `paths`
    pub fn open(paths: &SchoolPaths, settings: &Settings) -> SchoolResult<Self> {
        paths.ensure_directories()?;

        let conn = Connection::open(paths.database_file()).db_context("opening database")?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .db_context("enabling write-ahead log")?;
        initialize_schema(&conn)?;

        let audit = settings
            .audit_enabled
            .then(|| AuditLogger::new(paths.audit_log()));

        Ok(Self { conn, audit })
    }

    /// An in-memory database without an audit log (useful for testing)
    pub fn open_in_memory() -> SchoolResult<Self> {
        let conn = Connection::open_in_memory().db_context("opening database")?;
        initialize_schema(&conn)?;
        Ok(Self { conn, audit: None })
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Run `f` inside one transaction
    ///
    /// Commits when `f` returns `Ok`; any error rolls every statement back.
    pub fn in_transaction<T, F>(&self, f: F) -> SchoolResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> SchoolResult<T>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .db_context("starting transaction")?;
        let value = f(&tx)?;
        tx.commit().db_context("committing transaction")?;
        Ok(value)
    }

    pub fn classes(&self) -> ClassRepository<'_> {
        ClassRepository::new(&self.conn)
    }

    pub fn students(&self) -> StudentRepository<'_> {
        StudentRepository::new(&self.conn)
    }

    pub fn monthly_fees(&self) -> MonthlyFeeRepository<'_> {
        MonthlyFeeRepository::new(&self.conn)
    }

    pub fn admissions(&self) -> AdmissionRepository<'_> {
        AdmissionRepository::new(&self.conn)
    }

    pub fn payments(&self) -> PaymentRepository<'_> {
        PaymentRepository::new(&self.conn)
    }

    pub fn balances(&self) -> BalanceRepository<'_> {
        BalanceRepository::new(&self.conn)
    }

    /// Append entries to the audit log, if one is attached
    pub fn log_batch(&self, entries: &[AuditEntry]) -> SchoolResult<()> {
        match &self.audit {
            Some(logger) => logger.log_batch(entries),
            None => Ok(()),
        }
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> SchoolResult<()> {
        if self.audit.is_none() {
            return Ok(());
        }
        self.log_batch(&[AuditEntry::create(entity_type, entity_id, entity_name, entity)])
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff: Option<String>,
    ) -> SchoolResult<()> {
        if self.audit.is_none() {
            return Ok(());
        }
        self.log_batch(&[AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        )])
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> SchoolResult<()> {
        if self.audit.is_none() {
            return Ok(());
        }
        self.log_batch(&[AuditEntry::delete(entity_type, entity_id, entity_name, entity)])
    }

    pub fn log_allocation<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        details: &T,
        summary: String,
    ) -> SchoolResult<()> {
        if self.audit.is_none() {
            return Ok(());
        }
        self.log_batch(&[AuditEntry::allocate(entity_type, entity_id, details, summary)])
    }
}

/// `?1, ?2, ...` for an `IN (...)` clause
pub(crate) fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchoolError;
    use crate::models::ClassInput;
    use tempfile::TempDir;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(3), "?1, ?2, ?3");
        assert_eq!(placeholders(1), "?1");
    }

    #[test]
    fn test_open_creates_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SchoolPaths::with_base_dir(temp_dir.path().to_path_buf());

        let storage = Storage::open(&paths, &Settings::default()).unwrap();

        assert!(paths.database_file().exists());
        assert!(storage.audit().is_some());
    }

    #[test]
    fn test_audit_disabled_by_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SchoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            audit_enabled: false,
            ..Settings::default()
        };

        let storage = Storage::open(&paths, &settings).unwrap();
        assert!(storage.audit().is_none());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let storage = Storage::open_in_memory().unwrap();

        let result: SchoolResult<()> = storage.in_transaction(|tx| {
            ClassRepository::new(tx).insert(&ClassInput::new(
                "Grade 1",
                Default::default(),
                Default::default(),
            ))?;
            Err(SchoolError::Validation("abort".into()))
        });

        assert!(result.is_err());
        assert!(storage.classes().list(None).unwrap().is_empty());
    }

    #[test]
    fn test_transaction_commits() {
        let storage = Storage::open_in_memory().unwrap();

        storage
            .in_transaction(|tx| {
                ClassRepository::new(tx).insert(&ClassInput::new(
                    "Grade 1",
                    Default::default(),
                    Default::default(),
                ))
            })
            .unwrap();

        assert_eq!(storage.classes().list(None).unwrap().len(), 1);
    }
}
