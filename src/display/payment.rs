//! Payment display formatting

use tabled::Tabled;

use super::{or_dash, render};
use crate::models::{Money, Payment, PaymentRecord};

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Remark")]
    remark: String,
}

/// Format payments as a table with a total line underneath
pub fn format_payment_list(payments: &[PaymentRecord], symbol: &str) -> String {
    if payments.is_empty() {
        return "No payments found.\n".to_string();
    }

    let mut output = render(
        payments
            .iter()
            .map(|payment| PaymentRow {
                id: payment.id.to_string(),
                date: payment.date.to_string(),
                student: payment.student_name.clone(),
                amount: payment.amount.format_with_symbol(symbol),
                remark: or_dash(payment.remark.as_deref().unwrap_or_default()),
            })
            .collect(),
    );

    let total: Money = payments.iter().map(|p| p.amount).sum();
    output.push_str(&format!(
        "{} payment(s), total {}\n",
        payments.len(),
        total.format_with_symbol(symbol)
    ));
    output
}

/// Format a single payment
pub fn format_payment_details(payment: &Payment, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Payment: {}\n", payment.id));
    output.push_str(&format!("  Student: {}\n", payment.student_id));
    output.push_str(&format!("  Amount:  {}\n", payment.amount.format_with_symbol(symbol)));
    output.push_str(&format!("  Date:    {}\n", payment.date));
    if let Some(remark) = payment.remark.as_deref().filter(|r| !r.is_empty()) {
        output.push_str(&format!("  Remark:  {}\n", remark));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentId, StudentId};
    use chrono::NaiveDate;

    fn record(id: i64, units: i64) -> PaymentRecord {
        PaymentRecord {
            id: PaymentId::new(id),
            student_id: StudentId::new(1),
            student_name: "Ravi".into(),
            amount: Money::from_units(units),
            date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
            remark: None,
        }
    }

    #[test]
    fn test_list_totals() {
        let output = format_payment_list(&[record(1, 100), record(2, 250)], "$");
        assert!(output.contains("Ravi"));
        assert!(output.contains("2025-03-05"));
        assert!(output.contains("2 payment(s), total $350.00"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_payment_list(&[], "$"), "No payments found.\n");
    }
}
