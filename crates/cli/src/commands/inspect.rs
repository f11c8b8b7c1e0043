use anyhow::{Context, Result};
use chromevo_sim::storage::read_snapshot;
use std::path::Path;

pub fn show_snapshot(artifact: &Path, list_organisms: bool) -> Result<()> {
    let frozen = read_snapshot::<u8>(artifact)
        .with_context(|| format!("Failed to read {}", artifact.display()))?;

    println!("\n📊 Frozen Population");
    println!("{}", "=".repeat(50));
    println!("File: {}", artifact.display());
    println!("Generation: {}", frozen.generation);
    println!("Goal: {}", frozen.goal);
    println!("Sample size: {}", frozen.len());
    match frozen.mean_fitness() {
        Some(mean) => println!("Mean fitness: {mean:.6}"),
        None => println!("Mean fitness: n/a"),
    }
    let alive = frozen.organisms.iter().filter(|o| o.is_alive()).count();
    println!("Alive: {alive}");

    if list_organisms {
        println!("\n{:>6}  {:>10}  {:>12}  {:>6}", "index", "length", "fitness", "alive");
        for (i, organism) in frozen.organisms.iter().enumerate() {
            println!(
                "{:>6}  {:>10}  {:>12.6}  {:>6}",
                i,
                organism.total_length(),
                organism.fitness(),
                organism.is_alive()
            );
        }
    }

    Ok(())
}
