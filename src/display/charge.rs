//! Monthly fee and admission display formatting
//!
//! Both charge kinds show amount, paid and the remaining due side by side.

use tabled::Tabled;

use super::{or_dash, render};
use crate::models::{Admission, AdmissionRecord, Money, MonthlyFee, MonthlyFeeRecord};

#[derive(Tabled)]
struct FeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Due")]
    due: String,
}

#[derive(Tabled)]
struct AdmissionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Remark")]
    remark: String,
}

fn totals(amount: Money, paid: Money, symbol: &str) -> String {
    format!(
        "Charged {}, paid {}, due {}\n",
        amount.format_with_symbol(symbol),
        paid.format_with_symbol(symbol),
        (amount - paid).format_with_symbol(symbol)
    )
}

/// Format monthly fees as a table
pub fn format_fee_list(fees: &[MonthlyFeeRecord], symbol: &str) -> String {
    if fees.is_empty() {
        return "No monthly fees found.\n".to_string();
    }

    let mut output = render(
        fees.iter()
            .map(|fee| FeeRow {
                id: fee.id.to_string(),
                month: fee.date.format("%Y-%m").to_string(),
                student: fee.student_name.clone(),
                class: fee.class_name.clone(),
                amount: fee.amount.format_with_symbol(symbol),
                paid: fee.paid.format_with_symbol(symbol),
                due: (fee.amount - fee.paid).format_with_symbol(symbol),
            })
            .collect(),
    );

    output.push_str(&totals(
        fees.iter().map(|f| f.amount).sum(),
        fees.iter().map(|f| f.paid).sum(),
        symbol,
    ));
    output
}

/// Format a single monthly fee
pub fn format_fee_details(fee: &MonthlyFee, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Monthly fee: {}\n", fee.id));
    output.push_str(&format!("  Student: {}\n", fee.student_id));
    output.push_str(&format!("  Class:   {}\n", fee.class_id));
    output.push_str(&format!("  Month:   {}\n", fee.date.format("%Y-%m")));
    output.push_str(&format!("  Amount:  {}\n", fee.amount.format_with_symbol(symbol)));
    output.push_str(&format!("  Paid:    {}\n", fee.paid.format_with_symbol(symbol)));
    output.push_str(&format!(
        "  Status:  {}\n",
        if fee.is_settled() { "Settled" } else { "Open" }
    ));

    output
}

/// Format admissions as a table
pub fn format_admission_list(admissions: &[AdmissionRecord], symbol: &str) -> String {
    if admissions.is_empty() {
        return "No admissions found.\n".to_string();
    }

    let mut output = render(
        admissions
            .iter()
            .map(|admission| AdmissionRow {
                id: admission.id.to_string(),
                date: admission.date.to_string(),
                class: admission.class.clone(),
                amount: admission.amount.format_with_symbol(symbol),
                paid: admission.paid.format_with_symbol(symbol),
                due: (admission.amount - admission.paid).format_with_symbol(symbol),
                remark: or_dash(admission.remark.as_deref().unwrap_or_default()),
            })
            .collect(),
    );

    output.push_str(&totals(
        admissions.iter().map(|a| a.amount).sum(),
        admissions.iter().map(|a| a.paid).sum(),
        symbol,
    ));
    output
}

/// Format a single admission
pub fn format_admission_details(admission: &Admission, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Admission: {}\n", admission.id));
    output.push_str(&format!("  Student: {}\n", admission.student_id));
    output.push_str(&format!("  Class:   {}\n", admission.class_id));
    output.push_str(&format!("  Date:    {}\n", admission.date));
    output.push_str(&format!(
        "  Amount:  {}\n",
        admission.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  Paid:    {}\n", admission.paid.format_with_symbol(symbol)));
    if let Some(remark) = admission.remark.as_deref().filter(|r| !r.is_empty()) {
        output.push_str(&format!("  Remark:  {}\n", remark));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthlyFeeId;
    use chrono::NaiveDate;

    #[test]
    fn test_fee_list_totals() {
        let fees = vec![
            MonthlyFeeRecord {
                id: MonthlyFeeId::new(1),
                date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                amount: Money::from_units(100),
                paid: Money::from_units(40),
                class_name: "Grade 1".into(),
                student_name: "Lina".into(),
            },
            MonthlyFeeRecord {
                id: MonthlyFeeId::new(2),
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                amount: Money::from_units(100),
                paid: Money::from_units(100),
                class_name: "Grade 1".into(),
                student_name: "Lina".into(),
            },
        ];

        let output = format_fee_list(&fees, "$");
        assert!(output.contains("2025-02"));
        assert!(output.contains("$60.00"));
        assert!(output.contains("Charged $200.00, paid $140.00, due $60.00"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_fee_list(&[], "$"), "No monthly fees found.\n");
        assert_eq!(format_admission_list(&[], "$"), "No admissions found.\n");
    }
}
