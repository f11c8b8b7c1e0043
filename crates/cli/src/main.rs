mod args;
mod commands;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use args::{InitArgs, RunArgs};
use commands::{init, inspect, run};

/// Chromevo: an evolutionary computation simulator
///
/// Evolves populations of organisms carrying mutable symbol sequences toward
/// a fitness goal through selection, crossover and mutation.
#[derive(Parser, Debug)]
#[command(name = "chromevo")]
#[command(author, version, about = "Evolves populations of sequence-carrying organisms", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a population configuration file.
    ///
    /// Starts from the built-in defaults; any option given overrides them.
    Init(InitArgs),

    /// Run a population described by a configuration file.
    ///
    /// Writes one report line per generation and freezes checkpoints.
    Run(Box<RunArgs>),

    /// Show the contents of a frozen population (.gap file).
    Inspect {
        /// Snapshot path
        artifact: PathBuf,

        /// List every organism
        #[arg(long)]
        organisms: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => {
            init::init_config(&args)?;
        }
        Commands::Run(args) => {
            run::run_population(&args)?;
        }
        Commands::Inspect {
            artifact,
            organisms,
        } => {
            inspect::show_snapshot(&artifact, organisms)?;
        }
    }

    Ok(())
}
