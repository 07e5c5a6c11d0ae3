//! Payment CLI commands
//!
//! Recording, editing or deleting a payment moves the student's credit and
//! re-runs allocation over their charges.

use clap::Subcommand;

use super::{or_current, parse_amount, parse_date, parse_id, resolve_student};
use crate::display::{format_payment_details, format_payment_list};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{PaymentId, PaymentInput};
use crate::services::PaymentService;
use crate::storage::Storage;

/// Payment subcommands
#[derive(Subcommand)]
pub enum PaymentCommands {
    /// List payments
    List {
        /// Only payments from this student (name or ID)
        #[arg(short, long)]
        student: Option<String>,
    },

    /// Record a payment
    Add {
        /// Student name or ID
        student: String,
        /// Amount paid (e.g., "1500" or "1500.00")
        amount: String,
        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form remark
        #[arg(short, long)]
        remark: Option<String>,
    },

    /// Show payment details
    Show {
        /// Payment ID
        id: String,
    },

    /// Edit a payment
    Edit {
        /// Payment ID
        id: String,
        /// Move the payment to another student
        #[arg(short, long)]
        student: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New remark
        #[arg(short, long)]
        remark: Option<String>,
    },

    /// Delete payments
    Delete {
        /// Payment IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Handle a payment command
pub fn handle_payment_command(
    storage: &Storage,
    symbol: &str,
    cmd: PaymentCommands,
) -> SchoolResult<()> {
    let service = PaymentService::new(storage);

    match cmd {
        PaymentCommands::List { student } => {
            let student_id = match student {
                Some(s) => Some(resolve_student(storage, &s)?.id),
                None => None,
            };
            print!("{}", format_payment_list(&service.list(student_id)?, symbol));
        }

        PaymentCommands::Add {
            student,
            amount,
            date,
            remark,
        } => {
            let student = resolve_student(storage, &student)?;
            let id = service.create(PaymentInput {
                student_id: student.id,
                amount: parse_amount(&amount)?,
                date: parse_date(date.as_deref())?,
                remark,
            })?;

            println!("Recorded payment: {}", id);
            let balance = storage.balances().get(student.id)?;
            println!(
                "  Credit left for {}: {}",
                student.student_name,
                balance.available().format_with_symbol(symbol)
            );
        }

        PaymentCommands::Show { id } => {
            let id: PaymentId = parse_id(&id, "payment")?;
            let payment = service
                .get(id)?
                .ok_or_else(|| SchoolError::payment_not_found(id.to_string()))?;
            print!("{}", format_payment_details(&payment, symbol));
        }

        PaymentCommands::Edit {
            id,
            student,
            amount,
            date,
            remark,
        } => {
            let id: PaymentId = parse_id(&id, "payment")?;
            let payment = service
                .get(id)?
                .ok_or_else(|| SchoolError::payment_not_found(id.to_string()))?;

            let student_id = match student {
                Some(s) => resolve_student(storage, &s)?.id,
                None => payment.student_id,
            };
            let input = PaymentInput {
                student_id,
                amount: or_current(amount.as_deref(), payment.amount)?,
                date: match date {
                    Some(d) => parse_date(Some(&d))?,
                    None => payment.date,
                },
                remark: remark.or(payment.remark),
            };

            if service.update(id, input)? {
                println!("Updated payment: {}", id);
            } else {
                println!("No changes made to {}", id);
            }
        }

        PaymentCommands::Delete { ids } => {
            let ids = ids
                .iter()
                .map(|id| parse_id(id, "payment"))
                .collect::<SchoolResult<Vec<PaymentId>>>()?;

            if !service.delete(&ids)? {
                return Err(SchoolError::payment_not_found(
                    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
                ));
            }
            println!("Deleted {} payment(s)", ids.len());
        }
    }

    Ok(())
}
