//! Store-backed population.
//!
//! [`DurablePopulation`] keeps its organisms in the `organisms` table of a
//! [`Database`], one bincode blob per random 63-bit key, and its generation
//! and goal in `metadata`, so a store can be closed and reopened between
//! steps.
//!
//! The generational loop is the built-in one: truncation selection (from
//! generation 1 on), random crossover mating, the organism behaviour's
//! mutation scheme, then the mean-fitness report. Selection deletes and
//! copies rows, mating reads two parents per round, and mutation reads,
//! mutates and writes back one organism at a time inside a transaction.

use super::database::Database;
use super::snapshot::{freeze_sample_size, read_snapshot, write_snapshot, FrozenPopulation};
use crate::base::Symbol;
use crate::errors::{DatabaseError, PopulationError};
use crate::evolution::behavior::{default_behavior, OrganismBehavior};
use crate::evolution::selection::{sample_with_replacement, truncate_above_mean};
use crate::evolution::Selection;
use crate::genome::Organism;
use crate::simulation::policy::crossover_offspring;
use crate::simulation::runner::Evolvable;
use crate::simulation::{GenerationReport, PopulationLimits, RevivalMode};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

const GENERATION_KEY: &str = "generation";
const GOAL_KEY: &str = "goal";
const MAX_GENERATIONS_KEY: &str = "max_generations";
const SYMBOL_TYPE_KEY: &str = "symbol_type";

/// A population whose organisms live in a SQLite store.
///
/// The generation step is fixed: selection, mating, the behaviour's mutation
/// and the mean-fitness report. Unlike [`Population`], there is no
/// [`PopulationPolicy`] to override; post-population control and generation
/// events are no-ops. Custom fitness and mutation still apply through
/// [`with_behavior`](DurablePopulation::with_behavior).
///
/// [`Population`]: crate::simulation::Population
/// [`PopulationPolicy`]: crate::simulation::PopulationPolicy
#[derive(Debug)]
pub struct DurablePopulation<S: Symbol = u8> {
    db: Database,
    goal: f64,
    max_generations: Option<usize>,
    generation: usize,
    limits: PopulationLimits,
    rng: Xoshiro256PlusPlus,
    behavior: Arc<dyn OrganismBehavior<S>>,
}

impl<S: Symbol> DurablePopulation<S> {
    /// Create a store at `path` holding `organisms` at generation 0.
    ///
    /// Any organisms already in the store are discarded.
    pub fn create(
        path: impl AsRef<Path>,
        goal: f64,
        max_generations: Option<usize>,
        organisms: impl IntoIterator<Item = Organism<S>>,
    ) -> Result<Self, PopulationError> {
        let db = Database::open(path)?;
        let mut population = Self {
            db,
            goal,
            max_generations,
            generation: 0,
            limits: PopulationLimits::default(),
            rng: Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
            behavior: default_behavior(),
        };

        population.db.set_metadata(SYMBOL_TYPE_KEY, std::any::type_name::<S>())?;
        population.db.set_metadata(GOAL_KEY, &goal.to_string())?;
        population.db.set_metadata(
            MAX_GENERATIONS_KEY,
            &max_generations.map(|m| m.to_string()).unwrap_or_default(),
        )?;
        population.save_generation()?;

        let tx = population.db.transaction()?;
        tx.execute("DELETE FROM organisms", [])
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let mut count = 0usize;
        for organism in organisms {
            insert_organism(&tx, &mut population.rng, &organism)?;
            count += 1;
        }
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        log::info!(
            "Created durable population of {count} organisms at {}",
            population.db.path()
        );
        Ok(population)
    }

    /// Reopen a store written by [`create`](DurablePopulation::create).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PopulationError> {
        let db = Database::open(path)?;

        let symbol_type = required_metadata(&db, SYMBOL_TYPE_KEY)?;
        let expected = std::any::type_name::<S>();
        if symbol_type != expected {
            return Err(DatabaseError::Encoding(format!(
                "store holds {symbol_type} symbols, expected {expected}"
            ))
            .into());
        }
        let goal = parse_metadata(&db, GOAL_KEY)?;
        let generation = parse_metadata(&db, GENERATION_KEY)?;
        let max_generations = match db.metadata(MAX_GENERATIONS_KEY)?.as_deref() {
            None | Some("") => None,
            Some(value) => Some(value.parse::<usize>().map_err(|e| {
                DatabaseError::Encoding(format!("metadata {MAX_GENERATIONS_KEY}: {e}"))
            })?),
        };

        log::info!(
            "Reopened durable population at generation {generation} from {}",
            db.path()
        );
        Ok(Self {
            db,
            goal,
            max_generations,
            generation,
            limits: PopulationLimits::default(),
            rng: Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
            behavior: default_behavior(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self
    }

    /// Behaviour given to every organism read from the store.
    pub fn with_behavior(mut self, behavior: Arc<dyn OrganismBehavior<S>>) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_limits(mut self, limits: PopulationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn max_generations(&self) -> Option<usize> {
        self.max_generations
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Number of stored organisms.
    pub fn size(&self) -> Result<usize, PopulationError> {
        Ok(self.db.count("organisms")?)
    }

    /// Keys of all stored organisms, ascending.
    pub fn keys(&self) -> Result<Vec<i64>, PopulationError> {
        Ok(list_keys(self.db.connection())?)
    }

    /// Read one organism.
    pub fn get(&self, key: i64) -> Result<Option<Organism<S>>, PopulationError> {
        let organism = read_organism::<S>(self.db.connection(), key)?;
        Ok(organism.map(|o| o.with_behavior(Arc::clone(&self.behavior))))
    }

    /// Store an organism under a fresh key and return the key.
    pub fn add_organism(&mut self, organism: &Organism<S>) -> Result<i64, PopulationError> {
        Ok(insert_organism(self.db.connection(), &mut self.rng, organism)?)
    }

    /// Delete one organism; returns whether it existed.
    pub fn remove(&mut self, key: i64) -> Result<bool, PopulationError> {
        let changed = self
            .db
            .connection()
            .execute("DELETE FROM organisms WHERE key = ?1", params![key])
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Read every organism, in key order.
    pub fn organisms(&self) -> Result<Vec<Organism<S>>, PopulationError> {
        let mut organisms = Vec::new();
        for key in self.keys()? {
            if let Some(organism) = self.get(key)? {
                organisms.push(organism);
            }
        }
        Ok(organisms)
    }

    /// `(key, fitness)` of every organism, in key order.
    pub fn fitness_values(&self) -> Result<Vec<(i64, f64)>, PopulationError> {
        let mut values = Vec::new();
        for key in self.keys()? {
            if let Some(organism) = self.get(key)? {
                values.push((key, organism.fitness()));
            }
        }
        Ok(values)
    }

    /// Mean-fitness report at the current generation.
    pub fn report(&self) -> Result<GenerationReport, PopulationError> {
        let fitness: Vec<f64> = self.fitness_values()?.into_iter().map(|(_, f)| f).collect();
        GenerationReport::from_fitness(self.generation, &fitness, self.goal)
    }

    /// Run one generation and return its report.
    pub fn generation_step(&mut self) -> Result<GenerationReport, PopulationError> {
        if self.generation > 0 {
            self.truncation_selection()?;
        }
        self.mating()?;
        self.apply_mutation()?;
        self.generation += 1;
        self.save_generation()?;

        self.report()
    }

    /// Run `generations` steps and return the last report.
    pub fn run_for(&mut self, generations: usize) -> Result<Option<GenerationReport>, PopulationError> {
        let mut last = None;
        for _ in 0..generations {
            last = Some(self.generation_step()?);
        }
        Ok(last)
    }

    fn truncation_selection(&mut self) -> Result<Selection, PopulationError> {
        let scored = self.fitness_values()?;
        let fitness: Vec<f64> = scored.iter().map(|&(_, f)| f).collect();
        let selection = truncate_above_mean(
            &fitness,
            self.limits.survivor_cap,
            self.limits.extinction_floor,
            &mut self.rng,
        );

        match &selection {
            Selection::Adopt(indices) => {
                let mut copies: HashMap<i64, usize> = HashMap::new();
                for &i in indices {
                    *copies.entry(scored[i].0).or_default() += 1;
                }

                let tx = self.db.transaction()?;
                for &(key, _) in &scored {
                    match copies.get(&key) {
                        None => {
                            tx.execute("DELETE FROM organisms WHERE key = ?1", params![key])
                                .map_err(|e| DatabaseError::Query(e.to_string()))?;
                        }
                        Some(&n) => {
                            for _ in 1..n {
                                copy_organism(&tx, &mut self.rng, key)?;
                            }
                        }
                    }
                }
                tx.commit()
                    .map_err(|e| DatabaseError::Transaction(e.to_string()))?;
            }
            Selection::KeepPrevious { survivors } => {
                log::debug!(
                    "Generation {}: only {survivors} above the mean, keeping previous {} organisms",
                    self.generation,
                    scored.len()
                );
            }
        }
        Ok(selection)
    }

    fn mating(&mut self) -> Result<usize, PopulationError> {
        let keys = self.keys()?;
        if keys.is_empty() {
            log::debug!("No organisms to mate");
            return Ok(0);
        }

        let tx = self.db.transaction()?;
        for _ in 0..keys.len() {
            let key1 = keys[self.rng.random_range(0..keys.len())];
            let key2 = keys[self.rng.random_range(0..keys.len())];
            let (Some(parent1), Some(parent2)) = (
                read_organism::<S>(&tx, key1)?,
                read_organism::<S>(&tx, key2)?,
            ) else {
                log::debug!("Skipping mating of missing organisms {key1} and {key2}");
                continue;
            };
            let child = crossover_offspring(&parent1, &parent2, &mut self.rng)?;
            insert_organism(&tx, &mut self.rng, &child)?;
        }
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;
        Ok(keys.len())
    }

    fn apply_mutation(&mut self) -> Result<(), PopulationError> {
        let keys = self.keys()?;
        let seeds: Vec<u64> = (0..keys.len()).map(|_| self.rng.random()).collect();

        let tx = self.db.transaction()?;
        for (&key, &seed) in keys.iter().zip(&seeds) {
            let Some(organism) = read_organism::<S>(&tx, key)? else {
                continue;
            };
            let mut organism = organism.with_behavior(Arc::clone(&self.behavior));
            let mut local_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            organism.mutation_scheme(&mut local_rng);
            write_organism(&tx, key, &organism)?;
        }
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;
        Ok(())
    }

    /// Write a sample of the store to `<prefix><generation>_<n>.gap`.
    pub fn freeze(&mut self, prefix: &str, proportion: f64) -> Result<PathBuf, PopulationError> {
        let keys = self.keys()?;
        let sample = match freeze_sample_size(keys.len(), proportion, self.limits.full_freeze_below)
        {
            None => self.organisms()?,
            Some(count) => {
                let drawn = sample_with_replacement(&keys, count, &mut self.rng);
                let mut sample = Vec::with_capacity(drawn.len());
                for key in drawn {
                    if let Some(organism) = self.get(key)? {
                        sample.push(organism);
                    }
                }
                sample
            }
        };

        let frozen = FrozenPopulation::new(self.generation, self.goal, sample);
        Ok(write_snapshot(prefix, &frozen)?)
    }

    /// Restore a frozen sample into the store and return the number of
    /// organisms revived.
    pub fn revive(&mut self, path: impl AsRef<Path>, mode: RevivalMode) -> Result<usize, PopulationError> {
        let path = path.as_ref();
        let frozen = read_snapshot::<S>(path)?;

        let tx = self.db.transaction()?;
        if mode == RevivalMode::Replace {
            tx.execute("DELETE FROM organisms", [])
                .map_err(|e| DatabaseError::Query(e.to_string()))?;
        }
        for organism in &frozen.organisms {
            insert_organism(&tx, &mut self.rng, organism)?;
        }
        tx.commit()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        log::info!(
            "Revived {} organisms from {} into {} ({mode:?})",
            frozen.len(),
            path.display(),
            self.db.path()
        );
        Ok(frozen.len())
    }

    /// Close the store, compacting it and checkpointing the WAL.
    pub fn close(self) -> Result<(), PopulationError> {
        Ok(self.db.close()?)
    }

    fn save_generation(&self) -> Result<(), DatabaseError> {
        self.db
            .set_metadata(GENERATION_KEY, &self.generation.to_string())
    }
}

impl<S: Symbol> Evolvable for DurablePopulation<S> {
    fn generation_step(&mut self) -> Result<GenerationReport, PopulationError> {
        DurablePopulation::generation_step(self)
    }

    fn generation(&self) -> usize {
        self.generation
    }

    fn max_generations(&self) -> Option<usize> {
        self.max_generations
    }

    fn goal(&self) -> f64 {
        self.goal
    }

    fn freeze(&mut self, prefix: &str, proportion: f64) -> Result<PathBuf, PopulationError> {
        DurablePopulation::freeze(self, prefix, proportion)
    }
}

fn required_metadata(db: &Database, key: &str) -> Result<String, DatabaseError> {
    db.metadata(key)?
        .ok_or_else(|| DatabaseError::Query(format!("missing metadata {key}")))
}

fn parse_metadata<T: FromStr>(db: &Database, key: &str) -> Result<T, DatabaseError>
where
    T::Err: std::fmt::Display,
{
    required_metadata(db, key)?
        .parse()
        .map_err(|e| DatabaseError::Encoding(format!("metadata {key}: {e}")))
}

fn list_keys(conn: &Connection) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn
        .prepare("SELECT key FROM organisms ORDER BY key")
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
    let keys = stmt
        .query_map([], |row| row.get(0))
        .map_err(|e| DatabaseError::Query(e.to_string()))?
        .collect::<Result<Vec<i64>, _>>()
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(keys)
}

fn encode<S: Symbol>(organism: &Organism<S>) -> Result<Vec<u8>, DatabaseError> {
    bincode::serialize(organism).map_err(|e| DatabaseError::Encoding(e.to_string()))
}

fn read_organism<S: Symbol>(conn: &Connection, key: i64) -> Result<Option<Organism<S>>, DatabaseError> {
    let data: Option<Vec<u8>> = conn
        .query_row(
            "SELECT data FROM organisms WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| DatabaseError::Query(e.to_string()))?;

    let Some(data) = data else {
        return Ok(None);
    };
    let organism: Organism<S> = bincode::deserialize(&data)
        .map_err(|e| DatabaseError::Encoding(format!("organism {key}: {e}")))?;
    organism
        .check_genome()
        .map_err(|e| DatabaseError::Encoding(format!("organism {key}: {e}")))?;
    Ok(Some(organism))
}

fn write_organism<S: Symbol>(
    conn: &Connection,
    key: i64,
    organism: &Organism<S>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE organisms SET data = ?2 WHERE key = ?1",
        params![key, encode(organism)?],
    )
    .map_err(|e| DatabaseError::Insert(e.to_string()))?;
    Ok(())
}

/// Random non-negative 63-bit key.
fn random_key<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    (rng.random::<u64>() >> 1) as i64
}

fn insert_organism<S: Symbol, R: Rng + ?Sized>(
    conn: &Connection,
    rng: &mut R,
    organism: &Organism<S>,
) -> Result<i64, DatabaseError> {
    let data = encode(organism)?;
    loop {
        let key = random_key(rng);
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO organisms (key, data) VALUES (?1, ?2)",
                params![key, data],
            )
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        if inserted > 0 {
            return Ok(key);
        }
    }
}

fn copy_organism<R: Rng + ?Sized>(conn: &Connection, rng: &mut R, key: i64) -> Result<i64, DatabaseError> {
    loop {
        let new_key = random_key(rng);
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO organisms (key, data)
                 SELECT ?1, data FROM organisms WHERE key = ?2",
                params![new_key, key],
            )
            .map_err(|e| DatabaseError::Insert(e.to_string()))?;
        if inserted > 0 {
            return Ok(new_key);
        }
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM organisms WHERE key = ?1)",
                params![key],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        if !exists {
            return Err(DatabaseError::Query(format!("organism {key} not found")));
        }
    }
}
