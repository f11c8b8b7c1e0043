//! Per-organism strategies: fitness evaluation and the mutation scheme.
//!
//! Applications specialise organisms by implementing [`OrganismBehavior`]
//! and handing it to the organism (or to the population, which hands it to
//! every organism it creates). Both methods have working defaults.

use super::mutation::{MutationKind, Region};
use crate::base::Symbol;
use crate::genome::Organism;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// Default per-symbol mutation rate applied by the built-in scheme.
pub const DEFAULT_MUTATION_RATE: f64 = 0.1;

/// Fitness and mutation strategy of an organism.
pub trait OrganismBehavior<S: Symbol>: Send + Sync + Debug {
    /// Fitness of `organism`. Defaults to [`mean_symbol_value`].
    fn fitness(&self, organism: &Organism<S>) -> f64 {
        mean_symbol_value(organism)
    }

    /// Mutate `organism` in place. Defaults to point mutation at 0.1 over
    /// every chromosome.
    fn mutation_scheme(&self, organism: &mut Organism<S>, rng: &mut dyn RngCore) {
        mutate_every_chromosome(
            organism,
            MutationKind::Point,
            DEFAULT_MUTATION_RATE,
            Region::whole(),
            rng,
        );
    }
}

/// Sum of symbol values over the total genome length; 0 for an empty genome.
pub fn mean_symbol_value<S: Symbol>(organism: &Organism<S>) -> f64 {
    let (total, len) = organism
        .chromosomes()
        .iter()
        .fold((0.0, 0usize), |(total, len), chr| {
            (total + chr.total_value(), len + chr.len())
        });
    if len == 0 {
        0.0
    } else {
        total / len as f64
    }
}

/// Apply `rmutate(kind, rate, region)` to each chromosome independently.
///
/// Returns the total number of edits applied.
pub fn mutate_every_chromosome<S: Symbol>(
    organism: &mut Organism<S>,
    kind: MutationKind,
    rate: f64,
    region: Region,
    rng: &mut dyn RngCore,
) -> usize {
    let mut applied = 0;
    for chr in organism.chromosomes_mut() {
        applied += chr.rmutate(kind, rate, region, &mut *rng);
    }
    applied
}

/// Built-in behaviour: mean symbol value fitness and a single configurable
/// random-mutation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultBehavior {
    pub kind: MutationKind,
    pub rate: f64,
}

impl Default for DefaultBehavior {
    fn default() -> Self {
        Self {
            kind: MutationKind::Point,
            rate: DEFAULT_MUTATION_RATE,
        }
    }
}

impl DefaultBehavior {
    pub fn new(kind: MutationKind, rate: f64) -> Self {
        Self { kind, rate }
    }
}

impl<S: Symbol> OrganismBehavior<S> for DefaultBehavior {
    fn mutation_scheme(&self, organism: &mut Organism<S>, rng: &mut dyn RngCore) {
        mutate_every_chromosome(organism, self.kind, self.rate, Region::whole(), rng);
    }
}

/// Shared handle to the built-in behaviour.
pub fn default_behavior<S: Symbol>() -> Arc<dyn OrganismBehavior<S>> {
    Arc::new(DefaultBehavior::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Chromosome;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn organism(values: Vec<Vec<u8>>) -> Organism {
        let chromosomes = values
            .into_iter()
            .map(|v| Chromosome::new(v, vec![1, 0], 0.0).unwrap())
            .collect();
        Organism::new(chromosomes).unwrap()
    }

    #[test]
    fn test_mean_symbol_value() {
        let org = organism(vec![vec![1, 1, 0, 0], vec![1, 1]]);
        assert!((mean_symbol_value(&org) - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_symbol_value_empty_genome() {
        let org = organism(vec![vec![]]);
        assert_eq!(mean_symbol_value(&org), 0.0);
    }

    #[test]
    fn test_default_mutation_scheme_touches_every_chromosome() {
        let mut org = organism(vec![vec![0; 100], vec![0; 50]]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);

        let edits = mutate_every_chromosome(
            &mut org,
            MutationKind::Point,
            0.1,
            Region::whole(),
            &mut rng,
        );

        assert_eq!(edits, 15);
        assert_eq!(org.chromosomes()[0].len(), 100);
        assert_eq!(org.chromosomes()[1].len(), 50);
    }

    #[test]
    fn test_configured_behavior_kind() {
        let behavior = DefaultBehavior::new(MutationKind::Insert, 0.1);
        let mut org = organism(vec![vec![0; 100]]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

        OrganismBehavior::<u8>::mutation_scheme(&behavior, &mut org, &mut rng);

        assert_eq!(org.chromosomes()[0].len(), 110);
    }

    #[derive(Debug)]
    struct LengthFitness;

    impl OrganismBehavior<u8> for LengthFitness {
        fn fitness(&self, organism: &Organism) -> f64 {
            organism.total_length() as f64
        }
    }

    #[test]
    fn test_custom_fitness_keeps_default_mutation() {
        let mut org = organism(vec![vec![0; 20]]).with_behavior(Arc::new(LengthFitness));
        assert_eq!(org.fitness(), 20.0);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        org.mutation_scheme(&mut rng);
        assert_eq!(org.total_length(), 20);
    }
}
