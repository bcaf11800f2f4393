use clap::{Parser, Subcommand};
use colored::Colorize;
use snapvc_core::{ErrorClass, SourceConflictPolicy};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod prompt;

use commands::{add, branch, checkout, commit, init, log, merge, remove, status};

const USAGE_EXIT: u8 = 64;

#[derive(Parser)]
#[command(name = "snapvc")]
#[command(version, about = "Minimal local snapshot version control", long_about = None)]
struct Cli {
    /// Repository root directory
    #[arg(long, global = true, env = "SNAPVC_REPO", default_value = ".vcs")]
    repo: PathBuf,

    /// Log state transitions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty repository with a `main` branch
    Init,

    /// Stage a copy of a file
    Add {
        /// File to track (only its base name is kept)
        file: PathBuf,
    },

    /// Remove a file from the staging area
    Remove {
        /// Staged file name
        file: String,
    },

    /// Snapshot the staging area as a new version
    Commit {
        /// Commit message
        message: String,
    },

    /// Show the current branch's history
    Log {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the current branch, version and tracked files
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Restore a version of the current branch
    Checkout {
        /// Version number
        version: u32,
    },

    /// Create a branch from the current branch's latest version
    CreateBranch {
        /// Branch name
        name: String,
    },

    /// Switch to a branch and restore its latest version
    CheckoutBranch {
        /// Branch name
        name: String,
    },

    /// List branches
    Branches,

    /// Merge the latest version of SOURCE into a new version of TARGET
    Merge {
        /// Branch receiving the merge
        target: String,

        /// Branch whose files are offered
        source: String,

        /// Answer "yes" to every question instead of prompting
        #[arg(short, long)]
        yes: bool,

        /// How source files clashing with the result are handled
        #[arg(long)]
        policy: Option<SourceConflictPolicy>,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(USAGE_EXIT)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let repo = cli.repo;

    match cli.command {
        Commands::Init => init::run(repo),
        Commands::Add { file } => add::run(repo, file),
        Commands::Remove { file } => remove::run(repo, file),
        Commands::Commit { message } => commit::run(repo, message),
        Commands::Log { json } => log::run(repo, json),
        Commands::Status { json } => status::run(repo, json),
        Commands::Checkout { version } => checkout::run(repo, version),
        Commands::CreateBranch { name } => branch::create(repo, name),
        Commands::CheckoutBranch { name } => branch::switch(repo, name),
        Commands::Branches => branch::list(repo),
        Commands::Merge {
            target,
            source,
            yes,
            policy,
        } => merge::run(repo, target, source, yes, policy),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Distinct exit status per failure class; 1 for anything unclassified.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<snapvc_core::Error>().map(|e| e.class()) {
        Some(ErrorClass::NotInitialized) => 2,
        Some(ErrorClass::AlreadyExists) => 3,
        Some(ErrorClass::NotFound) => 4,
        Some(ErrorClass::Format) => 5,
        Some(ErrorClass::Io) => 6,
        Some(ErrorClass::InvalidName) => 7,
        Some(ErrorClass::LockTimeout) => 8,
        Some(ErrorClass::Config) => 9,
        None => 1,
    }
}
