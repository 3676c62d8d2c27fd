//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::output::{Output, OutputFormat};
use super::{query, skill};
use crate::domain::SkillStatus;
use crate::storage::{Config, InitOptions, Project, SeedFile};

#[derive(Parser)]
#[command(name = "skills")]
#[command(author, version, about = "Skill progression matrix with credit-gated unlocks")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a skills project with a matrix
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Seed file (JSON, YAML or TOML); the built-in Neural Link matrix otherwise
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Starting credit balance
        #[arg(long)]
        credits: Option<u64>,
    },

    /// List all skills
    List {
        /// Only show skills with this status (locked, available, mastered)
        #[arg(long)]
        status: Option<SkillStatus>,
    },

    /// Show a skill with its prerequisites and dependents
    Show {
        /// Skill ID
        id: String,
    },

    /// Unlock an available skill, spending its cost
    Unlock {
        /// Skill ID
        id: String,
    },

    /// Show skills that can be unlocked now
    Available {
        /// Only include skills the current balance can pay for
        #[arg(long)]
        affordable: bool,
    },

    /// Show the credit balance
    Balance,

    /// Show progression overview
    Status,

    /// List skills with prerequisites first
    Order,

    /// Check a seed file without touching project state
    Validate {
        /// Seed file (JSON, YAML or TOML)
        file: PathBuf,
    },
}

/// Installs the tracing subscriber on stderr
///
/// `RUST_LOG` wins when set; otherwise `--verbose` enables debug events.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "warn,skill_matrix=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Ignore the error if a subscriber is already installed (tests)
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load()
            .map(|config| OutputFormat::from(config.global.default_format))
            .unwrap_or_default(),
    };
    let output = Output::new(format, cli.verbose);

    output.note("skills", "starting");

    match cli.command {
        Commands::Init {
            path,
            seed,
            credits,
        } => {
            output.note("init", format_args!("Initializing project at: {}", path.display()));
            let seed = match seed {
                Some(seed_path) => {
                    output.note("init", format_args!("Reading seed: {}", seed_path.display()));
                    Some(SeedFile::load(&seed_path)?)
                }
                None => None,
            };

            let (project, created) = Project::init(&path, InitOptions { seed, credits })?;
            if created {
                output.message(&format!(
                    "Initialized skills project at {}",
                    project.root().display()
                ))?;
            } else {
                output.message(&format!(
                    "Skills project already initialized at {} (state kept)",
                    project.root().display()
                ))?;
            }
        }

        Commands::List { status } => {
            output.note("list", format_args!("Status filter: {:?}", status));
            query::list(&output, status)?
        }
        Commands::Show { id } => query::show(&output, &id)?,
        Commands::Unlock { id } => skill::unlock(&output, &id)?,
        Commands::Available { affordable } => query::available(&output, affordable)?,
        Commands::Balance => query::balance(&output)?,
        Commands::Status => query::status(&output)?,
        Commands::Order => query::order(&output)?,
        Commands::Validate { file } => query::validate(&output, &file)?,
    }

    Ok(())
}
