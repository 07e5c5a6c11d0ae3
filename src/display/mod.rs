//! Display formatting for terminal output
//!
//! Lists are rendered as `tabled` tables, single records as indented
//! detail blocks. Every formatter returns a `String`; printing is left to
//! the CLI handlers.

pub mod charge;
pub mod class;
pub mod payment;
pub mod student;

use tabled::settings::Style;
use tabled::{Table, Tabled};

pub use charge::{
    format_admission_details, format_admission_list, format_fee_details, format_fee_list,
};
pub use class::{format_class_details, format_class_list};
pub use payment::{format_payment_details, format_payment_list};
pub use student::{format_balance_report, format_student_details, format_student_list};

/// Render rows with the style shared by every list
fn render<R: Tabled>(rows: Vec<R>) -> String {
    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
