use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "amberbridge CLI - Evaluate Amber force-field energies and gradients of a crystal structure under its space-group symmetry.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand the asymmetric unit of a job to the full unit cell and print the sites.
    Expand(ExpandArgs),
    /// Evaluate the force-field energy (and gradients) of a job through a live Amber process.
    Evaluate(EvaluateArgs),
}

/// Arguments shared by every command that reads a job file.
#[derive(Args, Debug, Clone)]
pub struct JobArgs {
    /// Path to the job file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Set a specific configuration value, overriding the job file.
    /// Can be used multiple times. Example: -S evaluation.normalization=true
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `expand` subcommand.
#[derive(Args, Debug)]
pub struct ExpandArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Write the expanded sites to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Override the command used to launch the force-field process.
    /// Example: --backend-command "python3 sander_server.py"
    #[arg(short, long, value_name = "COMMAND")]
    pub backend_command: Option<String>,

    /// Override `amber.topology-file-name` from the job file.
    #[arg(short = 'p', long, value_name = "PATH")]
    pub topology: Option<PathBuf>,

    /// Override `amber.coordinate-file-name` from the job file.
    #[arg(short = 'x', long, value_name = "PATH")]
    pub coordinates: Option<PathBuf>,

    /// Override the gradient reduction policy ('first-image' or 'symmetry-average').
    #[arg(short, long, value_name = "POLICY")]
    pub gradient_reduction: Option<String>,

    /// Override `structure.number-of-restraints` from the job file.
    #[arg(short, long, value_name = "INT")]
    pub number_of_restraints: Option<usize>,

    /// Evaluate the energy only, skipping gradients.
    #[arg(long)]
    pub no_gradients: bool,

    /// Divide the target and gradients by the number of restraints.
    #[arg(long)]
    pub normalization: bool,
}
