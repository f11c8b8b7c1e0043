use chromevo_sim::evolution::MutationKind;
use chromevo_sim::simulation::ReportFormat;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration path
    #[arg(short, long, default_value = "population.json")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Population size
    #[arg(short = 'n', long)]
    pub population_size: Option<usize>,

    /// Generation limit (no limit when omitted)
    #[arg(short = 'g', long)]
    pub generations: Option<usize>,

    /// Target average fitness
    #[arg(long)]
    pub goal: Option<f64>,

    /// Start from random chromosomes of this length instead of the defined
    /// default chromosome
    #[arg(long)]
    pub random_length: Option<usize>,

    /// Chromosomes per organism
    #[arg(long)]
    pub genome_size: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mutation kind of the built-in scheme (point, insert, delete, invert,
    /// duplicate, translocate)
    #[arg(long)]
    pub mutation_kind: Option<MutationKind>,

    /// Per-symbol mutation rate of the built-in scheme
    #[arg(long)]
    pub mutation_rate: Option<f64>,

    /// Background mutation rate of every chromosome
    #[arg(long)]
    pub background_rate: Option<f64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Population configuration (JSON)
    #[arg(short, long, default_value = "population.json")]
    pub config: PathBuf,

    /// Results file, one line per generation
    #[arg(short, long, default_value = "results.txt")]
    pub results: PathBuf,

    /// Results line format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pipe)]
    pub format: OutputFormat,

    /// Override the generation limit
    #[arg(short = 'g', long)]
    pub generations: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep running after the goal is reached (requires a generation limit)
    #[arg(long)]
    pub no_goal_stop: bool,

    /// Freeze a sample every N generations
    #[arg(long)]
    pub freeze_every: Option<usize>,

    /// Prefix of snapshot files
    #[arg(long, default_value = "pop")]
    pub freeze_prefix: String,

    /// Proportion of the population kept by interval freezes
    #[arg(long, default_value_t = 0.01)]
    pub freeze_proportion: f64,

    /// Skip the full freeze at the end of the run
    #[arg(long)]
    pub no_final_freeze: bool,

    /// Replace the initial organisms with a frozen population
    #[arg(long)]
    pub revive: Option<PathBuf>,

    /// Keep the organisms in a SQLite store at this path
    #[arg(long)]
    pub durable: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// generation|N|average fitness|X|% to goal|Y
    Pipe,
    /// One JSON object per line
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Pipe => ReportFormat::Pipe,
            OutputFormat::Json => ReportFormat::JsonLines,
        }
    }
}
