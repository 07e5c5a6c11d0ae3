//! Admission CLI commands

use clap::Subcommand;

use super::{or_current, parse_date, parse_id, resolve_class, resolve_student};
use crate::display::{format_admission_details, format_admission_list};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{AdmissionId, AdmissionInput, AdmissionUpdate};
use crate::services::AdmissionService;
use crate::storage::Storage;

/// Admission subcommands
#[derive(Subcommand)]
pub enum AdmissionCommands {
    /// List admissions, newest first
    List {
        /// Only admissions of this student (name or ID)
        #[arg(short, long)]
        student: Option<String>,
    },

    /// Admit a student into a class
    ///
    /// Creates the admission charge and the first months of fees, paying
    /// them from the student's credit, admission first.
    Create {
        /// Student name or ID
        student: String,
        /// Class name or ID
        class: String,
        /// Admission charge (defaults to the class admission fee)
        #[arg(short, long)]
        amount: Option<String>,
        /// Monthly fee to generate (defaults to the class monthly fee)
        #[arg(short, long)]
        monthly: Option<String>,
        /// Months of fees to generate (defaults to the configured value)
        #[arg(short = 'n', long)]
        months: Option<u32>,
        /// Admission date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form remark
        #[arg(short, long)]
        remark: Option<String>,
    },

    /// Show admission details
    Show {
        /// Admission ID
        id: String,
    },

    /// Edit an admission
    Edit {
        /// Admission ID
        id: String,
        /// New class name or ID
        #[arg(short, long)]
        class: Option<String>,
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

    /// Delete admissions, releasing what was paid on them
    Delete {
        /// Admission IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Handle an admission command
pub fn handle_admission_command(
    storage: &Storage,
    symbol: &str,
    default_months: u32,
    cmd: AdmissionCommands,
) -> SchoolResult<()> {
    let service = AdmissionService::new(storage).with_default_months(default_months);

    match cmd {
        AdmissionCommands::List { student } => {
            let student_id = match student {
                Some(s) => Some(resolve_student(storage, &s)?.id),
                None => None,
            };
            print!("{}", format_admission_list(&service.list(student_id)?, symbol));
        }

        AdmissionCommands::Create {
            student,
            class,
            amount,
            monthly,
            months,
            date,
            remark,
        } => {
            let student = resolve_student(storage, &student)?;
            let class = resolve_class(storage, &class)?;
            let id = service.create(AdmissionInput {
                student_id: student.id,
                class_id: class.id,
                amount: or_current(amount.as_deref(), class.admission_fee)?,
                monthly: or_current(monthly.as_deref(), class.monthly_fee)?,
                months,
                date: parse_date(date.as_deref())?,
                remark,
            })?;

            println!("Admitted {} into {}", student.student_name, class.name);
            println!("  ID: {}", id);
        }

        AdmissionCommands::Show { id } => {
            let id: AdmissionId = parse_id(&id, "admission")?;
            let admission = service
                .get(id)?
                .ok_or_else(|| SchoolError::admission_not_found(id.to_string()))?;
            print!("{}", format_admission_details(&admission, symbol));
        }

        AdmissionCommands::Edit {
            id,
            class,
            amount,
            date,
            remark,
        } => {
            let id: AdmissionId = parse_id(&id, "admission")?;
            let admission = service
                .get(id)?
                .ok_or_else(|| SchoolError::admission_not_found(id.to_string()))?;

            let update = AdmissionUpdate {
                class_id: match class {
                    Some(c) => resolve_class(storage, &c)?.id,
                    None => admission.class_id,
                },
                amount: or_current(amount.as_deref(), admission.amount)?,
                date: match date {
                    Some(d) => parse_date(Some(&d))?,
                    None => admission.date,
                },
                remark: remark.or(admission.remark),
            };

            if service.update(id, update)? {
                println!("Updated admission: {}", id);
            } else {
                println!("No changes made to {}", id);
            }
        }

        AdmissionCommands::Delete { ids } => {
            let ids = ids
                .iter()
                .map(|id| parse_id(id, "admission"))
                .collect::<SchoolResult<Vec<AdmissionId>>>()?;

            if !service.delete(&ids)? {
                return Err(SchoolError::admission_not_found(
                    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
                ));
            }
            println!("Deleted {} admission(s)", ids.len());
        }
    }

    Ok(())
}
