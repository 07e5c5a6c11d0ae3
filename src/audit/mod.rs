//! Audit logging for the school ledger
//!
//! Every create, update, delete and allocation is appended to a JSON-lines
//! log with before/after values.
//!
//! - `AuditEntry`: one logged operation
//! - `AuditLogger`: appends entries to the log file and reads them back
//! - `generate_diff`: human-readable summary of what changed in an update
//!
//! # Example
//!
//! ```rust,ignore
//! use school_ledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Class,
//!     class.id.to_string(),
//!     Some(class.name.clone()),
//!     &class,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{changed_fields, generate_diff, FieldChange};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
