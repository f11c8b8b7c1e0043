use anyhow::{bail, Context, Result};
use chromevo_sim::simulation::{
    Evolvable, PopulationBuilder, PopulationConfig, ReportSink, ResultFile, RevivalMode,
    RunConfig, RunSummary, Runner,
};
use chromevo_sim::storage::DurablePopulation;
use indicatif::{ProgressBar, ProgressStyle};

use crate::args::RunArgs;
use crate::printing::{print_config, print_summary};

pub fn run_population(args: &RunArgs) -> Result<()> {
    println!("🧬 Chromevo - Running Population");
    println!("============================================\n");

    let mut config = PopulationConfig::<u8>::from_json_file(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    if args.generations.is_some() {
        config.max_generations = args.generations;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_goal_stop && config.max_generations.is_none() {
        bail!("--no-goal-stop needs a generation limit (--generations)");
    }
    print_config(&config);

    let limits = config.limits;
    let seed = config.seed;
    let mut population = PopulationBuilder::from_config(config)
        .build()
        .context("Invalid population configuration")?;
    if let Some(path) = &args.revive {
        let count = population
            .revive(path, RevivalMode::Replace)
            .with_context(|| format!("Failed to revive {}", path.display()))?;
        println!("\n✓ Revived {count} organisms from {}", path.display());
    }

    let runner = Runner::new(RunConfig {
        freeze_interval: args.freeze_every,
        freeze_prefix: args.freeze_prefix.clone(),
        freeze_proportion: args.freeze_proportion,
        stop_at_goal: !args.no_goal_stop,
        final_freeze: !args.no_final_freeze,
    });
    let mut sink = ResultFile::create(&args.results, args.format.into())
        .with_context(|| format!("Failed to create {}", args.results.display()))?;

    let summary = match &args.durable {
        Some(db_path) => {
            let mut store = DurablePopulation::create(
                db_path,
                population.goal(),
                population.max_generations(),
                population.organisms().to_vec(),
            )
            .with_context(|| format!("Failed to create store {}", db_path.display()))?
            .with_limits(limits)
            .with_behavior(population.behavior().clone());
            if let Some(seed) = seed {
                store = store.with_seed(seed);
            }
            println!("\n💾 Organisms stored in {}", db_path.display());

            let summary = drive(&runner, &mut store, &mut sink, args.progress)?;
            store.close().context("Failed to close store")?;
            summary
        }
        None => drive(&runner, &mut population, &mut sink, args.progress)?,
    };

    log::debug!("Flushed reports to {}", args.results.display());
    print_summary(&summary);
    println!("\n✓ Results written to {}", args.results.display());
    Ok(())
}

fn drive<P: Evolvable>(
    runner: &Runner,
    population: &mut P,
    sink: &mut dyn ReportSink,
    show_progress: bool,
) -> Result<RunSummary> {
    let start_generation = population.generation();
    let pb = if show_progress {
        let pb = match population.max_generations() {
            Some(max) => {
                let pb = ProgressBar::new(max as u64);
                pb.set_position(start_generation as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
                        )?
                        .progress_chars("#>-"),
                );
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        Some(pb)
    } else {
        None
    };

    let summary = runner
        .run_with(population, sink, |report| {
            if let Some(pb) = &pb {
                pb.set_position(report.generation as u64);
                pb.set_message(format!("mean fitness {:.4}", report.average_fitness));
            }
        })
        .context("Run failed")?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }
    Ok(summary)
}
