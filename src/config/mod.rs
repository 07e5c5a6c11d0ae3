//! Configuration module for the school ledger
//!
//! - Path resolution for the database, settings and audit log
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::SchoolPaths;
pub use settings::Settings;
