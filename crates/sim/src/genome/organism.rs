use super::status::{Status, StatusUpdate, StatusValue};
use super::Chromosome;
use crate::base::Symbol;
use crate::errors::OrganismError;
use crate::evolution::behavior::{default_behavior, OrganismBehavior};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An organism: one or more chromosomes, an optional gender tag and a
/// status record.
///
/// Fitness and the mutation scheme are delegated to an [`OrganismBehavior`].
/// The behaviour is not part of the serialized form; deserialized organisms
/// get the built-in behaviour until [`set_behavior`] is called.
///
/// `clone` deep-copies chromosomes and status and shares the behaviour.
///
/// [`set_behavior`]: Organism::set_behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "S: Symbol", deserialize = "S: Symbol"))]
pub struct Organism<S: Symbol = u8> {
    chromosomes: Vec<Chromosome<S>>,
    gender: Option<String>,
    status: Status,
    #[serde(skip, default = "default_behavior")]
    behavior: Arc<dyn OrganismBehavior<S>>,
}

impl<S: Symbol> Organism<S> {
    /// Create an organism from a caller-supplied genome.
    pub fn new(chromosomes: Vec<Chromosome<S>>) -> Result<Self, OrganismError> {
        if chromosomes.is_empty() {
            return Err(OrganismError::EmptyGenome);
        }
        Ok(Self::from_genome(chromosomes))
    }

    fn from_genome(chromosomes: Vec<Chromosome<S>>) -> Self {
        Self {
            chromosomes,
            gender: None,
            status: Status::default(),
            behavior: default_behavior(),
        }
    }

    /// An organism carrying a single one-symbol chromosome.
    pub fn dummy() -> Self {
        Self::from_genome(vec![Chromosome::dummy()])
    }

    pub fn with_behavior(mut self, behavior: Arc<dyn OrganismBehavior<S>>) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn set_behavior(&mut self, behavior: Arc<dyn OrganismBehavior<S>>) {
        self.behavior = behavior;
    }

    pub fn behavior(&self) -> &Arc<dyn OrganismBehavior<S>> {
        &self.behavior
    }

    #[inline]
    pub fn chromosomes(&self) -> &[Chromosome<S>] {
        &self.chromosomes
    }

    /// Mutable view of the genome. The chromosome count cannot change.
    #[inline]
    pub fn chromosomes_mut(&mut self) -> &mut [Chromosome<S>] {
        &mut self.chromosomes
    }

    /// `EmptyGenome` when the chromosome list is empty, which only
    /// deserialized data can produce.
    pub fn check_genome(&self) -> Result<(), OrganismError> {
        if self.chromosomes.is_empty() {
            return Err(OrganismError::EmptyGenome);
        }
        Ok(())
    }

    /// The first chromosome, used by the default mating.
    pub fn first_chromosome(&self) -> &Chromosome<S> {
        &self.chromosomes[0]
    }

    /// Replace the first chromosome, keeping the rest of the genome.
    pub fn set_first_chromosome(&mut self, chromosome: Chromosome<S>) {
        self.chromosomes[0] = chromosome;
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn set_gender(&mut self, gender: Option<String>) {
        self.gender = gender;
    }

    /// Total number of symbols across all chromosomes.
    pub fn total_length(&self) -> usize {
        self.chromosomes.iter().map(Chromosome::len).sum()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    /// Apply a status update, enforcing the status transition rules.
    pub fn set_status(&mut self, update: StatusUpdate) {
        self.status.apply(update);
    }

    /// Look up a status field by name.
    pub fn get_status(&self, name: &str) -> Result<StatusValue, OrganismError> {
        self.status.get(name)
    }

    pub fn fitness(&self) -> f64 {
        self.behavior.fitness(self)
    }

    pub fn mutation_scheme(&mut self, rng: &mut dyn RngCore) {
        let behavior = Arc::clone(&self.behavior);
        behavior.mutation_scheme(self, rng);
    }
}

/// A single default chromosome.
impl<S: Symbol> Default for Organism<S> {
    fn default() -> Self {
        Self::from_genome(vec![Chromosome::default()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::status::DeathCause;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_organism_rejects_empty_genome() {
        assert!(matches!(
            Organism::<u8>::new(vec![]),
            Err(OrganismError::EmptyGenome)
        ));
    }

    #[test]
    fn test_organism_default_genome() {
        let org: Organism = Organism::default();
        assert_eq!(org.chromosomes().len(), 1);
        assert_eq!(org.total_length(), 1000);
        assert_eq!(org.fitness(), 0.0);
        assert!(org.is_alive());
        assert_eq!(org.gender(), None);
    }

    #[test]
    fn test_organism_dummy_genome() {
        let org: Organism = Organism::dummy();
        assert_eq!(org.total_length(), 1);
    }

    #[test]
    fn test_organism_status_round_trip() {
        let mut org: Organism = Organism::dummy();
        org.set_status(StatusUpdate::Age(100.0));

        assert!(!org.is_alive());
        assert_eq!(
            org.get_status("death").unwrap(),
            StatusValue::Death(Some(DeathCause::MaxAge))
        );
        assert!(org.get_status("unknown").is_err());
    }

    #[test]
    fn test_organism_clone_is_deep() {
        let original: Organism = Organism::default().with_gender("f");
        let mut copy = original.clone();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        copy.mutation_scheme(&mut rng);
        copy.set_status(StatusUpdate::Vitality(10.0));

        assert_eq!(original.status().vitality(), 100.0);
        assert_eq!(copy.status().vitality(), 10.0);
        assert!(original.first_chromosome().sequence().iter().all(|&s| s == 0));
        assert_ne!(original.first_chromosome(), copy.first_chromosome());
        assert_eq!(copy.gender(), Some("f"));
    }

    #[test]
    fn test_organism_serde_drops_behavior() {
        let org = Organism::new(vec![Chromosome::new(vec![1u8, 1], vec![1, 0], 0.0).unwrap()])
            .unwrap();
        let bytes = bincode::serialize(&org).unwrap();
        let back: Organism = bincode::deserialize(&bytes).unwrap();

        assert_eq!(back.chromosomes(), org.chromosomes());
        assert_eq!(back.status(), org.status());
        assert_eq!(back.fitness(), 1.0);
    }
}
