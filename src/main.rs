use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pharmalog::config::{Config, Overrides};
use pharmalog::logging::init_tracing;

mod cmd;

#[derive(Parser)]
#[command(name = "pharmalog")]
#[command(version, about = "Production records for a compounding pharmacy: employees, formulas, incidents")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Directory holding pharmalog.toml (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Data directory. Overrides PHARMALOG_DATA_DIR and pharmalog.toml.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create pharmalog.toml and the empty data files
    Init,
    /// Manage employees
    Employee {
        #[command(subcommand)]
        command: EmployeeCommands,
    },
    /// Manage the error-type vocabulary used by incidents
    ErrorType {
        #[command(subcommand)]
        command: ErrorTypeCommands,
    },
    /// Record or list formulas
    Formula {
        #[command(subcommand)]
        command: FormulaCommands,
    },
    /// Record or list incidents
    Incident {
        #[command(subcommand)]
        command: IncidentCommands,
    },
    /// Show a dashboard
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Serve the REST API
    Serve {
        /// Address to bind (overrides PHARMALOG_HOST and pharmalog.toml)
        #[arg(long)]
        host: Option<String>,

        /// Port to serve on (overrides PHARMALOG_PORT and pharmalog.toml)
        #[arg(short, long)]
        port: Option<u16>,

        /// Disable cross-origin headers
        #[arg(long)]
        no_cors: bool,
    },
    /// Generate fake records for trying out the dashboards
    Seed {
        #[command(subcommand)]
        command: SeedCommands,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum EmployeeCommands {
    /// Register an employee
    Add {
        name: Option<String>,
        /// Farmaceutico or Operador
        #[arg(long, conflicts_with = "pharmacist")]
        role: Option<String>,
        /// Shorthand for --role Farmaceutico
        #[arg(long)]
        pharmacist: bool,
        #[arg(short, long)]
        interactive: bool,
    },
    /// Remove an employee
    Remove { name: String },
    /// List employees
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ErrorTypeCommands {
    /// Add an error type
    Add {
        name: Option<String>,
        #[arg(short, long)]
        interactive: bool,
    },
    /// Remove an error type
    Remove { name: String },
    /// List error types
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum FormulaCommands {
    /// Record a formula
    Add(FormulaArgs),
    /// List recorded formulas
    List(ListArgs),
}

#[derive(Args, Clone, Default)]
pub struct FormulaArgs {
    /// Prompt for every field
    #[arg(short, long)]
    pub interactive: bool,
    #[arg(long)]
    pub nr: Option<String>,
    /// YYYY-MM-DD; defaults per [forms] default_date
    #[arg(long)]
    pub date: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub time: Option<String>,
    /// manha or tarde
    #[arg(long)]
    pub shift: Option<String>,
    #[arg(long = "type")]
    pub formula_type: Option<String>,
    #[arg(long)]
    pub weighing: Option<String>,
    #[arg(long)]
    pub handling: Option<String>,
    #[arg(long)]
    pub pm: Option<String>,
    #[arg(long)]
    pub redo_pm: bool,
    #[arg(long)]
    pub redo_exc: bool,
    #[arg(long)]
    pub stock_used: bool,
    #[arg(long)]
    pub stock_made: bool,
    #[arg(long)]
    pub pm_over_20: bool,
}

#[derive(Subcommand, Clone)]
pub enum IncidentCommands {
    /// Record an incident
    Add(IncidentArgs),
    /// List recorded incidents
    List(ListArgs),
}

#[derive(Args, Clone, Default)]
pub struct IncidentArgs {
    /// Prompt for every field
    #[arg(short, long)]
    pub interactive: bool,
    #[arg(long)]
    pub nr: Option<String>,
    /// Error type; repeat for several
    #[arg(long = "error-type")]
    pub error_types: Vec<String>,
    #[arg(long)]
    pub employee: Option<String>,
    /// Amount; `12,50` and `12.50` are both accepted
    #[arg(long)]
    pub value: Option<String>,
    /// YYYY-MM-DD; defaults to today
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub discounted: bool,
    #[arg(long)]
    pub billed: bool,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Clone, Default)]
pub struct ListArgs {
    /// Only show the most recent N records
    #[arg(long)]
    pub last: Option<usize>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Clone)]
pub enum ReportCommands {
    /// Formula production dashboard
    Production(ReportArgs),
    /// Incident cost dashboard
    Costs(ReportArgs),
}

#[derive(Args, Clone, Default)]
pub struct ReportArgs {
    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    /// day, week or month
    #[arg(long)]
    pub group: Option<String>,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Clone)]
pub enum SeedCommands {
    /// Generate formula records
    Formulas(SeedArgs),
    /// Generate incident records
    Incidents(SeedArgs),
}

#[derive(Args, Clone)]
pub struct SeedArgs {
    /// Number of records (900 formulas / 200 incidents when omitted)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
    /// Write to this file instead of appending to the store
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// RNG seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
    /// Last day of the generated window (YYYY-MM-DD)
    #[arg(long, default_value = "2025-09-15")]
    pub end: String,
    /// Length of the window in days
    #[arg(long, default_value = "180")]
    pub days: i64,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default pharmalog.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    // Config commands must work even when pharmalog.toml does not parse.
    if let Commands::Config { command } = &cli.command {
        let _guard = init_tracing(cli.verbose, cli.log_json, None);
        return cmd::cmd_config(&project_dir, command.clone());
    }

    let mut overrides = Overrides {
        data_dir: cli.data_dir.clone(),
        ..Default::default()
    };
    if let Commands::Serve { host, port, .. } = &cli.command {
        overrides.host = host.clone();
        overrides.port = *port;
    }
    let config = Config::load(&project_dir, &overrides)?;
    let log_dir = config.log_dir();
    let _guard = init_tracing(
        cli.verbose,
        cli.log_json || config.toml.logging.json,
        log_dir.as_deref(),
    );
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    match &cli.command {
        Commands::Init => cmd::cmd_init(&config)?,
        Commands::Employee { command } => cmd::cmd_employee(&config, &cli, command.clone())?,
        Commands::ErrorType { command } => cmd::cmd_error_type(&config, &cli, command.clone())?,
        Commands::Formula { command } => cmd::cmd_formula(&config, command.clone())?,
        Commands::Incident { command } => cmd::cmd_incident(&config, command.clone())?,
        Commands::Report { command } => cmd::cmd_report(&config, command.clone())?,
        Commands::Serve { no_cors, .. } => cmd::cmd_serve(&config, *no_cors).await?,
        Commands::Seed { command } => cmd::cmd_seed(&config, command.clone())?,
        Commands::Config { .. } => unreachable!("handled before configuration is loaded"),
    }

    Ok(())
}
