//! Class CLI commands

use clap::Subcommand;

use super::{or_current, resolve_class};
use crate::display::{format_class_details, format_class_list};
use crate::error::SchoolResult;
use crate::models::{ClassInput, Money};
use crate::services::ClassService;
use crate::storage::Storage;

/// Class subcommands
#[derive(Subcommand)]
pub enum ClassCommands {
    /// List all classes
    List,

    /// Create a new class
    Create {
        /// Class name
        name: String,
        /// One-time admission fee (e.g., "500" or "500.00")
        #[arg(short, long)]
        admission_fee: Option<String>,
        /// Fee charged per month
        #[arg(short, long)]
        monthly_fee: Option<String>,
        /// Free-form remark
        #[arg(short, long)]
        remark: Option<String>,
    },

    /// Show class details
    Show {
        /// Class name or ID
        class: String,
    },

    /// Edit a class
    Edit {
        /// Class name or ID
        class: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New admission fee
        #[arg(short, long)]
        admission_fee: Option<String>,
        /// New monthly fee
        #[arg(short, long)]
        monthly_fee: Option<String>,
        /// New remark
        #[arg(short, long)]
        remark: Option<String>,
    },

    /// Delete a class (fails while charges still reference it)
    Delete {
        /// Class name or ID
        class: String,
    },
}

/// Handle a class command
pub fn handle_class_command(
    storage: &Storage,
    symbol: &str,
    cmd: ClassCommands,
) -> SchoolResult<()> {
    let service = ClassService::new(storage);

    match cmd {
        ClassCommands::List => {
            print!("{}", format_class_list(&service.list(None)?, symbol));
        }

        ClassCommands::Create {
            name,
            admission_fee,
            monthly_fee,
            remark,
        } => {
            let input = ClassInput {
                name,
                admission_fee: or_current(admission_fee.as_deref(), Money::zero())?,
                monthly_fee: or_current(monthly_fee.as_deref(), Money::zero())?,
                remark,
            };
            let id = service.create(input)?;

            println!("Created class: {}", id);
            if let Some(class) = service.get(id)? {
                print!("{}", format_class_details(&class, symbol));
            }
        }

        ClassCommands::Show { class } => {
            let class = resolve_class(storage, &class)?;
            print!("{}", format_class_details(&class, symbol));
        }

        ClassCommands::Edit {
            class,
            name,
            admission_fee,
            monthly_fee,
            remark,
        } => {
            let class = resolve_class(storage, &class)?;
            let input = ClassInput {
                name: name.unwrap_or_else(|| class.name.clone()),
                admission_fee: or_current(admission_fee.as_deref(), class.admission_fee)?,
                monthly_fee: or_current(monthly_fee.as_deref(), class.monthly_fee)?,
                remark: remark.or_else(|| class.remark.clone()),
            };

            if service.update(class.id, input)? {
                println!("Updated class: {}", class.id);
            } else {
                println!("No changes made to {}", class.name);
            }
        }

        ClassCommands::Delete { class } => {
            let class = resolve_class(storage, &class)?;
            service.delete(&[class.id])?;
            println!("Deleted class: {}", class.name);
        }
    }

    Ok(())
}
