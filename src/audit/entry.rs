//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Funds were applied to (or taken back from) a student's charges
    Allocate,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Allocate => write!(f, "ALLOCATE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Class,
    Student,
    MonthlyFee,
    Admission,
    Payment,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Class => write!(f, "Class"),
            EntityType::Student => write!(f, "Student"),
            EntityType::MonthlyFee => write!(f, "MonthlyFee"),
            EntityType::Admission => write!(f, "Admission"),
            EntityType::Payment => write!(f, "Payment"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Human-readable label, e.g. the class or student name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id.into())
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::base(Operation::Update, entity_type, entity_id.into())
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Delete, entity_type, entity_id.into())
        }
    }

    /// Record an allocation run; `entity_id` is the student and `summary`
    /// describes what moved
    pub fn allocate<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        details: &T,
        summary: String,
    ) -> Self {
        Self {
            after: serde_json::to_value(details).ok(),
            diff_summary: Some(summary),
            ..Self::base(Operation::Allocate, entity_type, entity_id.into())
        }
    }

    /// One line per entry, plus an indented change line when there is one
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Allocate.to_string(), "ALLOCATE");
        assert_eq!(Operation::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            EntityType::Class,
            "cls-1",
            Some("Grade 5".to_string()),
            &json!({"name": "Grade 5", "monthly_fee": 10000}),
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_allocate_entry_round_trip() {
        let entry = AuditEntry::allocate(
            EntityType::MonthlyFee,
            "stu-4",
            &json!([{"id": 1, "delta": 10000}]),
            "applied 100.00 of 150.00".to_string(),
        );

        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"entity_type\":\"monthly_fee\""));

        let back: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.operation, Operation::Allocate);
        assert_eq!(back.diff_summary.as_deref(), Some("applied 100.00 of 150.00"));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::delete(
            EntityType::Student,
            "stu-2",
            Some("Amina".to_string()),
            &json!({"student_name": "Amina"}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("DELETE Student stu-2 (Amina)"));
    }
}
