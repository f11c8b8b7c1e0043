use anyhow::{bail, Context, Result};
use chromevo_sim::simulation::{InitialChromosome, PopulationBuilder, PopulationConfig};

use crate::args::InitArgs;
use crate::printing::print_config;

pub fn init_config(args: &InitArgs) -> Result<()> {
    println!("🧬 Chromevo - Evolutionary Population Simulator");
    println!("============================================\n");

    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let config = build_config(args);
    PopulationBuilder::from_config(config.clone())
        .build()
        .context("Invalid population configuration")?;
    config
        .to_json_file(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    print_config(&config);
    println!("\n✓ Configuration written to {}", args.output.display());
    println!("  Run it with: chromevo run --config {}", args.output.display());
    Ok(())
}

fn build_config(args: &InitArgs) -> PopulationConfig<u8> {
    let mut config = PopulationConfig::default();

    if let Some(size) = args.population_size {
        config.population_size = size;
    }
    if let Some(generations) = args.generations {
        config.max_generations = Some(generations);
    }
    if let Some(goal) = args.goal {
        config.goal = goal;
    }
    if let Some(length) = args.random_length {
        config.chromosome = InitialChromosome::Random { length };
    }
    if let Some(genome_size) = args.genome_size {
        config.genome_size = genome_size;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(kind) = args.mutation_kind {
        config.mutation.kind = kind;
    }
    if let Some(rate) = args.mutation_rate {
        config.mutation.rate = rate;
    }
    if let Some(rate) = args.background_rate {
        config.background_mutation = rate;
    }
    config
}
