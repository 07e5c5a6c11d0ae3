//! Student display formatting

use tabled::Tabled;

use super::{or_dash, render};
use crate::models::{BalanceReport, Student};

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Guardian")]
    guardian: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format students as a table
pub fn format_student_list(students: &[Student]) -> String {
    if students.is_empty() {
        return "No students found.\n".to_string();
    }

    render(
        students
            .iter()
            .map(|student| StudentRow {
                id: student.id.to_string(),
                name: student.student_name.clone(),
                guardian: or_dash(&student.guardian_name),
                phone: or_dash(&student.phone),
                status: if student.active { "" } else { "Inactive" },
            })
            .collect(),
    )
}

/// Format a single student
pub fn format_student_details(student: &Student) -> String {
    let mut output = String::new();

    output.push_str(&format!("Student: {}\n", student.student_name));
    output.push_str(&format!("  ID:       {}\n", student.id));
    output.push_str(&format!("  Guardian: {}\n", or_dash(&student.guardian_name)));
    output.push_str(&format!("  Phone:    {}\n", or_dash(&student.phone)));
    output.push_str(&format!("  Address:  {}\n", or_dash(&student.address)));
    output.push_str(&format!(
        "  Active:   {}\n",
        if student.active { "Yes" } else { "No" }
    ));

    output
}

/// Format what a student has paid, what it went to and what is still owed
pub fn format_balance_report(student: &Student, report: &BalanceReport, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Balance for {} ({})\n", student.student_name, student.id));
    output.push_str(&format!(
        "  Total Paid:     {:>12}\n",
        report.total_paid.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Admission Used: {:>12}\n",
        report.admission_used.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Monthly Used:   {:>12}\n",
        report.monthly_used.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  {:-<29}\n", ""));
    output.push_str(&format!(
        "  Available:      {:>12}\n",
        report.available.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Outstanding:    {:>12}\n",
        report.due.format_with_symbol(symbol)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, StudentId};

    fn student(active: bool) -> Student {
        Student {
            id: StudentId::new(3),
            student_name: "Asha".into(),
            guardian_name: String::new(),
            phone: "555-0100".into(),
            address: String::new(),
            active,
        }
    }

    #[test]
    fn test_list_marks_inactive() {
        let output = format_student_list(&[student(false)]);
        assert!(output.contains("Asha"));
        assert!(output.contains("Inactive"));
        assert!(output.contains("555-0100"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_student_list(&[]), "No students found.\n");
    }

    #[test]
    fn test_balance_report() {
        let report = BalanceReport {
            student_id: StudentId::new(3),
            total_paid: Money::from_units(1000),
            admission_used: Money::from_units(600),
            monthly_used: Money::from_units(400),
            available: Money::zero(),
            due: Money::from_units(200),
        };
        let output = format_balance_report(&student(true), &report, "$");
        assert!(output.contains("Balance for Asha (stu-3)"));
        assert!(output.contains("$1000.00"));
        assert!(output.contains("$200.00"));
    }
}
