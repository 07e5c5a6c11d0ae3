//! Class display formatting

use tabled::Tabled;

use super::{or_dash, render};
use crate::models::Class;

#[derive(Tabled)]
struct ClassRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Admission")]
    admission_fee: String,
    #[tabled(rename = "Monthly")]
    monthly_fee: String,
    #[tabled(rename = "Remark")]
    remark: String,
}

/// Format classes as a table
pub fn format_class_list(classes: &[Class], symbol: &str) -> String {
    if classes.is_empty() {
        return "No classes found.\n\nCreate one with 'school class create <NAME>'.\n".to_string();
    }

    render(
        classes
            .iter()
            .map(|class| ClassRow {
                id: class.id.to_string(),
                name: class.name.clone(),
                admission_fee: class.admission_fee.format_with_symbol(symbol),
                monthly_fee: class.monthly_fee.format_with_symbol(symbol),
                remark: or_dash(class.remark.as_deref().unwrap_or_default()),
            })
            .collect(),
    )
}

/// Format a single class
pub fn format_class_details(class: &Class, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Class: {}\n", class.name));
    output.push_str(&format!("  ID:            {}\n", class.id));
    output.push_str(&format!(
        "  Admission Fee: {}\n",
        class.admission_fee.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Monthly Fee:   {}\n",
        class.monthly_fee.format_with_symbol(symbol)
    ));
    if let Some(remark) = class.remark.as_deref().filter(|r| !r.is_empty()) {
        output.push_str(&format!("  Remark:        {}\n", remark));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassId, Money};

    fn grade(id: i64, name: &str) -> Class {
        Class {
            id: ClassId::new(id),
            name: name.into(),
            admission_fee: Money::from_units(500),
            monthly_fee: Money::from_minor(12050),
            remark: None,
        }
    }

    #[test]
    fn test_empty_list() {
        assert!(format_class_list(&[], "$").contains("No classes found"));
    }

    #[test]
    fn test_list_shows_each_class() {
        let output = format_class_list(&[grade(1, "Grade 1"), grade(2, "Grade 2")], "$");
        assert!(output.contains("Grade 1"));
        assert!(output.contains("cls-2"));
        assert!(output.contains("$120.50"));
        assert!(output.contains("Monthly"));
    }

    #[test]
    fn test_details() {
        let mut class = grade(4, "Nursery");
        class.remark = Some("Morning shift".into());
        let output = format_class_details(&class, "Rs ");
        assert!(output.contains("Class: Nursery"));
        assert!(output.contains("Rs 500.00"));
        assert!(output.contains("Morning shift"));
    }
}
