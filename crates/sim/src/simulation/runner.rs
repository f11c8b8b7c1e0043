//! Run driver: step a population to its budget or goal.

use super::population::Population;
use super::report::{GenerationReport, ReportSink};
use crate::base::Symbol;
use crate::errors::PopulationError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A population the [`Runner`] can drive.
pub trait Evolvable {
    fn generation_step(&mut self) -> Result<GenerationReport, PopulationError>;

    fn generation(&self) -> usize;

    fn max_generations(&self) -> Option<usize>;

    fn goal(&self) -> f64;

    fn freeze(&mut self, prefix: &str, proportion: f64) -> Result<PathBuf, PopulationError>;
}

impl<S: Symbol> Evolvable for Population<S> {
    fn generation_step(&mut self) -> Result<GenerationReport, PopulationError> {
        Population::generation_step(self)
    }

    fn generation(&self) -> usize {
        Population::generation(self)
    }

    fn max_generations(&self) -> Option<usize> {
        Population::max_generations(self)
    }

    fn goal(&self) -> f64 {
        Population::goal(self)
    }

    fn freeze(&mut self, prefix: &str, proportion: f64) -> Result<PathBuf, PopulationError> {
        Population::freeze(self, prefix, proportion)
    }
}

/// Checkpointing and stopping rules of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Freeze every this many generations; `None` or 0 disables it.
    pub freeze_interval: Option<usize>,
    pub freeze_prefix: String,
    pub freeze_proportion: f64,
    /// Stop as soon as the average fitness reaches the goal.
    pub stop_at_goal: bool,
    /// Freeze the whole population when the run ends.
    pub final_freeze: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            freeze_interval: None,
            freeze_prefix: "pop".to_string(),
            freeze_proportion: 0.01,
            stop_at_goal: true,
            final_freeze: true,
        }
    }
}

/// Outcome of [`Runner::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Steps taken by this run.
    pub steps: usize,
    pub last_report: Option<GenerationReport>,
    pub goal_reached: bool,
    /// Snapshots written, in order.
    pub snapshots: Vec<PathBuf>,
}

/// Drives a population generation by generation.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run until the generation limit or, with `stop_at_goal`, the goal.
    pub fn run<P: Evolvable>(
        &self,
        population: &mut P,
        sink: &mut dyn ReportSink,
    ) -> Result<RunSummary, PopulationError> {
        self.run_with(population, sink, |_| {})
    }

    /// Like [`run`](Runner::run), calling `on_step` after every report.
    pub fn run_with<P: Evolvable>(
        &self,
        population: &mut P,
        sink: &mut dyn ReportSink,
        mut on_step: impl FnMut(&GenerationReport),
    ) -> Result<RunSummary, PopulationError> {
        let max_generations = population.max_generations();
        if max_generations.is_none() && !self.config.stop_at_goal {
            return Err(PopulationError::Unbounded);
        }

        log::info!(
            "Starting run at generation {} (limit {:?}, goal {})",
            population.generation(),
            max_generations,
            population.goal()
        );

        let mut summary = RunSummary {
            steps: 0,
            last_report: None,
            goal_reached: false,
            snapshots: Vec::new(),
        };

        while !max_generations.is_some_and(|max| population.generation() >= max) {
            let report = population.generation_step()?;
            summary.steps += 1;
            sink.write_report(&report)?;
            on_step(&report);

            if let Some(interval) = self.config.freeze_interval.filter(|&k| k > 0) {
                if report.generation % interval == 0 {
                    let path =
                        population.freeze(&self.config.freeze_prefix, self.config.freeze_proportion)?;
                    summary.snapshots.push(path);
                }
            }

            summary.last_report = Some(report);
            if self.config.stop_at_goal && report.average_fitness >= population.goal() {
                summary.goal_reached = true;
                log::info!(
                    "Goal {} reached at generation {}",
                    population.goal(),
                    report.generation
                );
                break;
            }
        }
        sink.flush()?;

        if self.config.final_freeze {
            summary
                .snapshots
                .push(population.freeze(&self.config.freeze_prefix, 1.0)?);
        }

        log::info!(
            "Run finished after {} generation(s) at generation {}",
            summary.steps,
            population.generation()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{InitialChromosome, PopulationBuilder};

    fn population(goal: f64, max_generations: usize) -> Population {
        PopulationBuilder::new()
            .alphabet(vec![1, 0])
            .chromosome(InitialChromosome::Uniform {
                length: 10,
                symbol: 0,
            })
            .population_size(4)
            .goal(goal)
            .max_generations(max_generations)
            .seed(7)
            .build()
            .unwrap()
    }

    fn config(dir: &std::path::Path) -> RunConfig {
        RunConfig {
            freeze_prefix: dir.join("pop").to_string_lossy().to_string(),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_run_to_budget() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(RunConfig {
            stop_at_goal: false,
            final_freeze: false,
            ..config(dir.path())
        });
        let mut pop = population(100.0, 3);
        let mut reports: Vec<GenerationReport> = Vec::new();

        let summary = runner.run(&mut pop, &mut reports).unwrap();

        assert_eq!(summary.steps, 3);
        assert!(!summary.goal_reached);
        assert!(summary.snapshots.is_empty());
        let generations: Vec<usize> = reports.iter().map(|r| r.generation).collect();
        assert_eq!(generations, vec![1, 2, 3]);
        assert_eq!(pop.generation(), 3);
    }

    #[test]
    fn test_run_stops_at_goal() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(config(dir.path()));
        // Any positive mean reaches a tiny goal after the first mutation round
        let mut pop = population(1e-9, 50);
        let mut reports: Vec<GenerationReport> = Vec::new();

        let summary = runner.run(&mut pop, &mut reports).unwrap();

        assert!(summary.goal_reached);
        assert_eq!(summary.steps, reports.len());
        assert!(summary.steps < 50);
        assert_eq!(summary.snapshots.len(), 1);
        assert!(summary.snapshots[0].exists());
    }

    #[test]
    fn test_run_freezes_on_interval() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(RunConfig {
            freeze_interval: Some(2),
            freeze_proportion: 1.0,
            stop_at_goal: false,
            ..config(dir.path())
        });
        let mut pop = population(100.0, 4);
        let mut reports: Vec<GenerationReport> = Vec::new();

        let summary = runner.run(&mut pop, &mut reports).unwrap();

        // Generations 2 and 4, then the final freeze
        assert_eq!(summary.snapshots.len(), 3);
        let name = summary.snapshots[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("pop2_"));
        assert!(name.ends_with(".gap"));
    }

    #[test]
    fn test_unbounded_run_is_rejected() {
        let runner = Runner::new(RunConfig {
            stop_at_goal: false,
            ..RunConfig::default()
        });
        let mut pop = PopulationBuilder::<u8>::new()
            .chromosome(InitialChromosome::Random { length: 4 })
            .population_size(2)
            .goal(1.0)
            .build()
            .unwrap();
        let mut reports: Vec<GenerationReport> = Vec::new();

        let err = runner.run(&mut pop, &mut reports).unwrap_err();
        assert!(matches!(err, PopulationError::Unbounded));
        assert!(reports.is_empty());
    }
}
