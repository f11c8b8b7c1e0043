//! Per-generation reports and where they are written.

use crate::errors::PopulationError;
use crate::evolution::selection::mean;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Summary of a population after a generation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub average_fitness: f64,
    /// `(average_fitness - goal) / goal * 100`.
    pub percent_to_goal: f64,
}

impl GenerationReport {
    /// Build the mean-fitness report for `fitness` values against `goal`.
    pub fn from_fitness(
        generation: usize,
        fitness: &[f64],
        goal: f64,
    ) -> Result<Self, PopulationError> {
        if goal == 0.0 {
            return Err(PopulationError::InvalidGoal);
        }
        let average_fitness = mean(fitness).ok_or(PopulationError::EmptyPopulation)?;
        Ok(Self {
            generation,
            average_fitness,
            percent_to_goal: (average_fitness - goal) / goal * 100.0,
        })
    }

    /// `generation|<n>|average fitness|<x>|% to goal|<y>`
    pub fn to_pipe_line(&self) -> String {
        format!(
            "generation|{}|average fitness|{}|% to goal|{}",
            self.generation, self.average_fitness, self.percent_to_goal
        )
    }
}

/// Line format of a [`ResultFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Pipe,
    JsonLines,
}

/// Destination for generation reports.
pub trait ReportSink {
    fn write_report(&mut self, report: &GenerationReport) -> Result<(), PopulationError>;

    fn flush(&mut self) -> Result<(), PopulationError> {
        Ok(())
    }
}

/// Collects reports in memory.
impl ReportSink for Vec<GenerationReport> {
    fn write_report(&mut self, report: &GenerationReport) -> Result<(), PopulationError> {
        self.push(*report);
        Ok(())
    }
}

/// Writes one report per line to a file.
#[derive(Debug)]
pub struct ResultFile {
    writer: BufWriter<File>,
    format: ReportFormat,
}

impl ResultFile {
    /// Create (or truncate) `path`.
    pub fn create(path: impl AsRef<Path>, format: ReportFormat) -> Result<Self, PopulationError> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            format,
        })
    }

    /// Open `path` for appending, creating it if needed.
    pub fn append(path: impl AsRef<Path>, format: ReportFormat) -> Result<Self, PopulationError> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            format,
        })
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }
}

impl ReportSink for ResultFile {
    fn write_report(&mut self, report: &GenerationReport) -> Result<(), PopulationError> {
        let line = match self.format {
            ReportFormat::Pipe => report.to_pipe_line(),
            ReportFormat::JsonLines => serde_json::to_string(report)
                .map_err(|e| PopulationError::Encoding(e.to_string()))?,
        };
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PopulationError> {
        self.writer.flush()?;
        Ok(())
    }
}
