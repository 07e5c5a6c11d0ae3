//! Monthly fee CLI commands

use clap::Subcommand;

use super::{or_current, parse_amount, parse_date, parse_id, resolve_class, resolve_student};
use crate::display::{format_fee_details, format_fee_list};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{GenerateFees, Money, MonthlyFeeId, MonthlyFeeInput, MonthlyFeeUpdate};
use crate::services::MonthlyFeeService;
use crate::storage::Storage;

/// Monthly fee subcommands
#[derive(Subcommand)]
pub enum FeeCommands {
    /// List monthly fees, newest first
    List {
        /// Only fees of this student (name or ID)
        #[arg(short, long)]
        student: Option<String>,
    },

    /// Add a single monthly charge
    Add {
        /// Student name or ID
        student: String,
        /// Class name or ID
        class: String,
        /// Charge amount (defaults to the class monthly fee)
        #[arg(short, long)]
        amount: Option<String>,
        /// Any day of the month charged (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Portion already paid, taken from the student's credit
        #[arg(short, long)]
        paid: Option<String>,
    },

    /// Generate consecutive monthly charges paid from available credit
    Generate {
        /// Student name or ID
        student: String,
        /// Class name or ID
        class: String,
        /// First month (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        from: Option<String>,
        /// Number of months
        #[arg(short, long, default_value = "1")]
        count: i64,
        /// Fee per month (defaults to the class monthly fee)
        #[arg(long)]
        fee: Option<String>,
    },

    /// List one student's fees between two dates, oldest first
    Range {
        /// Student name or ID
        student: String,
        /// Start date (YYYY-MM-DD)
        from: String,
        /// End date (YYYY-MM-DD), inclusive
        to: String,
    },

    /// Show monthly fee details
    Show {
        /// Monthly fee ID
        id: String,
    },

    /// Edit a monthly charge
    Edit {
        /// Monthly fee ID
        id: String,
        /// New class name or ID
        #[arg(short, long)]
        class: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New month
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete monthly charges, releasing what was paid on them
    Delete {
        /// Monthly fee IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Handle a monthly fee command
pub fn handle_fee_command(storage: &Storage, symbol: &str, cmd: FeeCommands) -> SchoolResult<()> {
    let service = MonthlyFeeService::new(storage);

    match cmd {
        FeeCommands::List { student } => {
            let student_id = match student {
                Some(s) => Some(resolve_student(storage, &s)?.id),
                None => None,
            };
            print!("{}", format_fee_list(&service.list(student_id)?, symbol));
        }

        FeeCommands::Add {
            student,
            class,
            amount,
            date,
            paid,
        } => {
            let student = resolve_student(storage, &student)?;
            let class = resolve_class(storage, &class)?;
            let id = service.create(MonthlyFeeInput {
                student_id: student.id,
                class_id: class.id,
                date: parse_date(date.as_deref())?,
                amount: or_current(amount.as_deref(), class.monthly_fee)?,
                paid: or_current(paid.as_deref(), Money::zero())?,
            })?;

            println!("Created monthly fee: {}", id);
        }

        FeeCommands::Generate {
            student,
            class,
            from,
            count,
            fee,
        } => {
            let student = resolve_student(storage, &student)?;
            let class = resolve_class(storage, &class)?;
            let used = service.generate(GenerateFees {
                student_id: student.id,
                class_id: class.id,
                from: parse_date(from.as_deref())?,
                count,
                fee: fee.as_deref().map(parse_amount).transpose()?,
            })?;

            println!(
                "Generated {} monthly fee(s) for {}",
                count.max(0),
                student.student_name
            );
            println!("  Paid from credit: {}", used.format_with_symbol(symbol));
        }

        FeeCommands::Range { student, from, to } => {
            let student = resolve_student(storage, &student)?;
            let fees = service.list_by_date_range(
                student.id,
                parse_date(Some(&from))?,
                parse_date(Some(&to))?,
            )?;
            print!("{}", format_fee_list(&fees, symbol));
        }

        FeeCommands::Show { id } => {
            let id: MonthlyFeeId = parse_id(&id, "monthly fee")?;
            let fee = service
                .get(id)?
                .ok_or_else(|| SchoolError::monthly_fee_not_found(id.to_string()))?;
            print!("{}", format_fee_details(&fee, symbol));
        }

        FeeCommands::Edit {
            id,
            class,
            amount,
            date,
        } => {
            let id: MonthlyFeeId = parse_id(&id, "monthly fee")?;
            let fee = service
                .get(id)?
                .ok_or_else(|| SchoolError::monthly_fee_not_found(id.to_string()))?;

            let update = MonthlyFeeUpdate {
                class_id: match class {
                    Some(c) => resolve_class(storage, &c)?.id,
                    None => fee.class_id,
                },
                date: match date {
                    Some(d) => parse_date(Some(&d))?,
                    None => fee.date,
                },
                amount: or_current(amount.as_deref(), fee.amount)?,
            };

            if service.update(id, update)? {
                println!("Updated monthly fee: {}", id);
            } else {
                println!("No changes made to {}", id);
            }
        }

        FeeCommands::Delete { ids } => {
            let ids = ids
                .iter()
                .map(|id| parse_id(id, "monthly fee"))
                .collect::<SchoolResult<Vec<MonthlyFeeId>>>()?;

            if !service.delete(&ids)? {
                return Err(SchoolError::monthly_fee_not_found(
                    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
                ));
            }
            println!("Deleted {} monthly fee(s)", ids.len());
        }
    }

    Ok(())
}
