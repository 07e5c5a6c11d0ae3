use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};

use school_ledger::audit::AuditLogger;
use school_ledger::cli::{
    handle_admission_command, handle_class_command, handle_fee_command, handle_payment_command,
    handle_student_command,
};
use school_ledger::config::{SchoolPaths, Settings};
use school_ledger::ipc::IpcRouter;
use school_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "school",
    author = "Kaylee Beyene",
    version,
    about = "Student fee ledger for small schools",
    long_about = "Keeps classes, students, admission and monthly fee charges and \
                  payments in a local SQLite database. Payments are applied to \
                  outstanding charges automatically, oldest month first."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Class management commands
    #[command(subcommand)]
    Class(school_ledger::cli::ClassCommands),

    /// Student management commands
    #[command(subcommand)]
    Student(school_ledger::cli::StudentCommands),

    /// Monthly fee commands
    #[command(subcommand)]
    Fee(school_ledger::cli::FeeCommands),

    /// Admission commands
    #[command(subcommand)]
    Admission(school_ledger::cli::AdmissionCommands),

    /// Payment commands
    #[command(subcommand, alias = "pay")]
    Payment(school_ledger::cli::PaymentCommands),

    /// Show recent audit log entries
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Answer JSON requests on stdin, one per line
    Ipc,

    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = SchoolPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let symbol = settings.currency_symbol.as_str();

    match cli.command {
        Some(Commands::Class(cmd)) => {
            let storage = Storage::open(&paths, &settings)?;
            handle_class_command(&storage, symbol, cmd)?;
        }
        Some(Commands::Student(cmd)) => {
            let storage = Storage::open(&paths, &settings)?;
            handle_student_command(&storage, symbol, cmd)?;
        }
        Some(Commands::Fee(cmd)) => {
            let storage = Storage::open(&paths, &settings)?;
            handle_fee_command(&storage, symbol, cmd)?;
        }
        Some(Commands::Admission(cmd)) => {
            let storage = Storage::open(&paths, &settings)?;
            handle_admission_command(&storage, symbol, settings.default_admission_months, cmd)?;
        }
        Some(Commands::Payment(cmd)) => {
            let storage = Storage::open(&paths, &settings)?;
            handle_payment_command(&storage, symbol, cmd)?;
        }
        Some(Commands::History { limit }) => {
            let entries = AuditLogger::new(paths.audit_log()).read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries found.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Ipc) => {
            let storage = Storage::open(&paths, &settings)?;
            let router = IpcRouter::new(&storage, &settings);
            router.serve(io::stdin().lock(), io::stdout().lock())?;
        }
        Some(Commands::Init) => {
            println!("Initializing school ledger at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            Storage::open(&paths, &settings)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'school class create <NAME>' to add your first class.");
        }
        Some(Commands::Config) => {
            println!("School Ledger Configuration");
            println!("===========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Database:       {}", paths.database_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:          {}", settings.currency_symbol);
            println!("  Date format:              {}", settings.date_format);
            println!("  Audit enabled:            {}", settings.audit_enabled);
            println!("  Default admission months: {}", settings.default_admission_months);
        }
        None => {
            println!("School Ledger - student fees from the command line");
            println!();
            println!("Run 'school --help' for usage information.");
        }
    }

    Ok(())
}
