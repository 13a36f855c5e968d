//! tailor - per-school personal statement variants

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tailor")]
#[command(version, about = "Tailor a personal statement per school and diff the result")]
pub struct Cli {
    /// Store file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Diff two files
    Diff {
        old: PathBuf,
        new: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
        /// Do not refine replaced words character by character
        #[arg(long)]
        no_refine: bool,
    },
    /// Show or replace the stored template
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Manage the school list
    School {
        #[command(subcommand)]
        action: SchoolAction,
    },
    /// Generate and store the variant for a school
    Generate {
        school: String,
        /// Print the diff against the template instead of the variant
        #[arg(long)]
        diff: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Show or replace a stored variant
    Variant {
        #[command(subcommand)]
        action: VariantAction,
    },
    /// Write variants to <DIR>/<school>/personal_statement.txt
    Export {
        dir: PathBuf,
        /// Only export this school
        #[arg(long)]
        school: Option<String>,
    },
    /// Read variants back from an export directory
    Import { dir: PathBuf },
    /// Package every variant into an uncompressed ZIP file
    Zip { out: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    Show,
    Set { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum SchoolAction {
    List,
    Add { name: String },
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
pub enum VariantAction {
    Show {
        school: String,
        /// Print the diff against the template instead of the variant
        #[arg(long)]
        diff: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    Set {
        school: String,
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// `[-deleted-]{+inserted+}` markers
    Plain,
    /// `<span>` markup
    Markup,
    /// The edit script as JSON
    Json,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::Config::load(cli.config.as_deref()).context("Failed to load config")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(cli.command, cli.store, &config, &mut out)
}
