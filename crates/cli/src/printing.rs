use chromevo_sim::simulation::{InitialChromosome, PopulationConfig, RunSummary};

pub fn print_config(config: &PopulationConfig<u8>) {
    println!("\n📋 Population Configuration");
    println!("  • Population size: {} [-n, --population-size]", config.population_size);
    match config.max_generations {
        Some(max) => println!("  • Generations: {max} [-g, --generations]"),
        None => println!("  • Generations: unbounded [-g, --generations]"),
    }
    println!("  • Goal: {} [--goal]", config.goal);
    match config.seed {
        Some(seed) => println!("  • Random seed: {seed} [--seed]"),
        None => println!("  • Random seed: random [--seed]"),
    }

    println!("\n🧬 Genome");
    match &config.chromosome {
        InitialChromosome::Defined { sequence } => {
            println!("  • Founding chromosome: defined, {} symbols", sequence.len())
        }
        InitialChromosome::Uniform { length, symbol } => {
            println!("  • Founding chromosome: {length} × {symbol}")
        }
        InitialChromosome::Random { length } => {
            println!("  • Founding chromosome: random, {length} symbols [--random-length]")
        }
    }
    match &config.alphabet {
        Some(alphabet) => println!("  • Alphabet: {alphabet:?}"),
        None => println!("  • Alphabet: default"),
    }
    println!("  • Chromosomes per organism: {} [--genome-size]", config.genome_size);

    println!("\n⚡ Mutation");
    println!(
        "  • Scheme: {} at {} per symbol [--mutation-kind, --mutation-rate]",
        config.mutation.kind, config.mutation.rate
    );
    println!("  • Background rate: {:.2e} [--background-rate]", config.background_mutation);

    println!("\n🛡  Limits");
    println!("  • Survivor cap: {}", config.limits.survivor_cap);
    println!("  • Extinction floor: {}", config.limits.extinction_floor);
    println!("  • Full freeze below: {}", config.limits.full_freeze_below);
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n📈 Run Summary");
    println!("  • Generations run: {}", summary.steps);
    if let Some(report) = &summary.last_report {
        println!("  • Final generation: {}", report.generation);
        println!("  • Average fitness: {:.6}", report.average_fitness);
        println!("  • % to goal: {:.2}", report.percent_to_goal);
    }
    println!(
        "  • Goal reached: {}",
        if summary.goal_reached { "yes" } else { "no" }
    );
    for path in &summary.snapshots {
        println!("  • Snapshot: {}", path.display());
    }
}
