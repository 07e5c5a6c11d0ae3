//! Student CLI commands

use clap::Subcommand;

use super::resolve_student;
use crate::display::{format_balance_report, format_student_details, format_student_list};
use crate::error::SchoolResult;
use crate::models::StudentInput;
use crate::services::StudentService;
use crate::storage::Storage;

/// Student subcommands
#[derive(Subcommand)]
pub enum StudentCommands {
    /// List students
    List {
        /// Include inactive students
        #[arg(short, long)]
        all: bool,
    },

    /// Register a new student
    Create {
        /// Student name
        name: String,
        /// Guardian name
        #[arg(short, long)]
        guardian: Option<String>,
        /// Contact phone
        #[arg(short, long)]
        phone: Option<String>,
        /// Home address
        #[arg(short, long)]
        address: Option<String>,
    },

    /// Show student details
    Show {
        /// Student name or ID
        student: String,
    },

    /// Edit a student
    Edit {
        /// Student name or ID
        student: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New guardian name
        #[arg(short, long)]
        guardian: Option<String>,
        /// New phone
        #[arg(short, long)]
        phone: Option<String>,
        /// New address
        #[arg(short, long)]
        address: Option<String>,
        /// Mark the student inactive
        #[arg(long, conflicts_with = "activate")]
        deactivate: bool,
        /// Mark the student active again
        #[arg(long)]
        activate: bool,
    },

    /// Delete a student with all of their charges and payments
    Delete {
        /// Student name or ID
        student: String,
    },

    /// Show payments, credit and outstanding dues
    Balance {
        /// Student name or ID
        student: String,
    },
}

/// Handle a student command
pub fn handle_student_command(
    storage: &Storage,
    symbol: &str,
    cmd: StudentCommands,
) -> SchoolResult<()> {
    let service = StudentService::new(storage);

    match cmd {
        StudentCommands::List { all } => {
            let students: Vec<_> = service
                .list(None)?
                .into_iter()
                .filter(|s| all || s.active)
                .collect();
            print!("{}", format_student_list(&students));
        }

        StudentCommands::Create {
            name,
            guardian,
            phone,
            address,
        } => {
            let input = StudentInput {
                guardian_name: guardian.unwrap_or_default(),
                phone: phone.unwrap_or_default(),
                address: address.unwrap_or_default(),
                ..StudentInput::new(name)
            };
            let id = service.create(input)?;

            println!("Created student: {}", id);
        }

        StudentCommands::Show { student } => {
            let student = resolve_student(storage, &student)?;
            print!("{}", format_student_details(&student));
        }

        StudentCommands::Edit {
            student,
            name,
            guardian,
            phone,
            address,
            deactivate,
            activate,
        } => {
            let student = resolve_student(storage, &student)?;
            let active = if deactivate {
                false
            } else {
                activate || student.active
            };
            let input = StudentInput {
                student_name: name.unwrap_or_else(|| student.student_name.clone()),
                guardian_name: guardian.unwrap_or_else(|| student.guardian_name.clone()),
                phone: phone.unwrap_or_else(|| student.phone.clone()),
                address: address.unwrap_or_else(|| student.address.clone()),
                active,
            };

            if service.update(student.id, input)? {
                println!("Updated student: {}", student.id);
            } else {
                println!("No changes made to {}", student.student_name);
            }
        }

        StudentCommands::Delete { student } => {
            let student = resolve_student(storage, &student)?;
            service.delete(&[student.id])?;
            println!("Deleted student: {}", student.student_name);
        }

        StudentCommands::Balance { student } => {
            let student = resolve_student(storage, &student)?;
            let report = service.balance(student.id)?;
            print!("{}", format_balance_report(&student, &report, symbol));
        }
    }

    Ok(())
}
