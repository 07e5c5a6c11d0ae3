//! School Ledger - student fee bookkeeping over SQLite
//!
//! Classes, students, admission and monthly fee charges, and payments.
//! Payments credit a per-student balance which is applied to outstanding
//! charges by a greedy allocator, and reversed in the opposite order when a
//! payment shrinks or disappears.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: the crate error type
//! - `models`: records, inputs, IDs and `Money`
//! - `storage`: SQLite repositories and the charge ledger seam
//! - `services`: validation, allocation, balance bookkeeping, audit logging
//! - `controller`: services wrapped in the `{ok, data, message}` envelope
//! - `ipc`: channel router over the controllers
//! - `audit`: append-only JSON-lines audit log
//! - `cli` / `display`: the `school` binary's commands and output
//!
//! # Example
//!
//! ```rust,ignore
//! use school_ledger::config::{SchoolPaths, Settings};
//! use school_ledger::storage::Storage;
//!
//! let paths = SchoolPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths, &settings)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod ipc;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SchoolError, SchoolResult};
