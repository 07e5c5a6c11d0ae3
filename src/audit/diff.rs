//! Field-level diffs for audit entries
//!
//! Compares the top-level fields of two serialized records and describes
//! what changed, e.g. `amount: 10000 -> 12000, date: "2025-01-01" -> "2025-02-01"`.

use serde::Serialize;
use serde_json::Value;

/// One changed top-level field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl std::fmt::Display for FieldChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let before = self.before.as_deref().unwrap_or("(none)");
        let after = self.after.as_deref().unwrap_or("(none)");
        write!(f, "{}: {} -> {}", self.field, before, after)
    }
}

/// List the top-level fields that differ between two JSON objects
///
/// Non-object values are compared as a whole under the field name `value`.
pub fn changed_fields(before: &Value, after: &Value) -> Vec<FieldChange> {
    let (Value::Object(old), Value::Object(new)) = (before, after) else {
        if before == after {
            return Vec::new();
        }
        return vec![FieldChange {
            field: "value".to_string(),
            before: Some(render(before)),
            after: Some(render(after)),
        }];
    };

    let mut changes: Vec<FieldChange> = old
        .iter()
        .filter(|(key, value)| new.get(*key) != Some(value))
        .map(|(key, value)| FieldChange {
            field: key.clone(),
            before: Some(render(value)),
            after: new.get(key).map(render),
        })
        .collect();

    changes.extend(
        new.iter()
            .filter(|(key, _)| !old.contains_key(*key))
            .map(|(key, value)| FieldChange {
                field: key.clone(),
                before: None,
                after: Some(render(value)),
            }),
    );

    changes
}

/// Summarize the changes between two records, `None` if nothing changed
pub fn generate_diff<T: Serialize>(before: &T, after: &T) -> Option<String> {
    let before = serde_json::to_value(before).ok()?;
    let after = serde_json::to_value(after).ok()?;

    let changes = changed_fields(&before, &after);
    if changes.is_empty() {
        return None;
    }

    Some(
        changes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_amount_only() {
        let before = json!({"amount": 10000, "paid": 0, "date": "2025-01-01"});
        let after = json!({"amount": 12000, "paid": 0, "date": "2025-01-01"});

        assert_eq!(
            generate_diff(&before, &after).as_deref(),
            Some("amount: 10000 -> 12000")
        );
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"name": "Grade 5", "remark": "morning"});
        let after = json!({"name": "Grade 5", "room": 12});

        let changes = changed_fields(&before, &after);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].to_string(), "remark: \"morning\" -> (none)");
        assert_eq!(changes[1].to_string(), "room: (none) -> 12");
    }

    #[test]
    fn test_no_changes() {
        let record = json!({"student_name": "Amina", "active": true});
        assert!(generate_diff(&record, &record).is_none());
    }

    #[test]
    fn test_long_string_truncated() {
        let before = json!({"remark": "x".repeat(80)});
        let after = json!({"remark": "short"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\" -> \"short\""));
    }

    #[test]
    fn test_scalar_values() {
        let changes = changed_fields(&json!(1), &json!(2));
        assert_eq!(changes[0].to_string(), "value: 1 -> 2");
    }
}
