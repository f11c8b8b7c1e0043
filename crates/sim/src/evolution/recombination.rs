//! Recombination of chromosomes.
//!
//! Single-point crossover swaps the tails of two chromosomes at a shared cut
//! position. Cuts beyond a chromosome's length clamp to that length, so a
//! chromosome shorter than the cut contributes no tail of its own.

use crate::base::{Sequence, Symbol};
use crate::genome::Chromosome;

/// Cross two chromosomes at `position`.
///
/// Returns newly allocated chromosomes:
///
/// - `first  = seq1[..min(p, len1)] ++ seq2[min(p, len2)..]`
/// - `second = seq2[..min(p, len2)] ++ seq1[min(p, len1)..]`
///
/// Each product keeps the alphabet and background rate of the parent that
/// supplies its head. The inputs are not modified.
///
/// ```rust
/// # use chromevo_sim::genome::Chromosome;
/// # use chromevo_sim::evolution::crossover;
/// let a = Chromosome::new(vec![0u8; 4], vec![1, 0], 0.0).unwrap();
/// let b = Chromosome::new(vec![1u8; 4], vec![1, 0], 0.0).unwrap();
/// let (x, y) = crossover(&a, &b, 1);
/// assert_eq!(x.to_string(), "0111");
/// assert_eq!(y.to_string(), "1000");
/// ```
pub fn crossover<S: Symbol>(
    chromosome1: &Chromosome<S>,
    chromosome2: &Chromosome<S>,
    position: usize,
) -> (Chromosome<S>, Chromosome<S>) {
    let (head1, tail1) = chromosome1.sequence().split_clamped(position);
    let (head2, tail2) = chromosome2.sequence().split_clamped(position);

    let first = join(head1, tail2);
    let second = join(head2, tail1);

    (
        chromosome1.with_sequence(first),
        chromosome2.with_sequence(second),
    )
}

fn join<S: Copy>(head: &[S], tail: &[S]) -> Sequence<S> {
    let mut sequence = Sequence::with_capacity(head.len() + tail.len());
    for &symbol in head.iter().chain(tail) {
        sequence.push(symbol);
    }
    sequence
}
