//! Fixed-size population of networks evaluated one at a time.
//!
//! The population is an arena with a cursor: `individuals[current]` is the
//! live network, everything before it already carries this generation's
//! fitness.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use super::brain::{Network, Topology};
use super::error::{Error, Result};
use super::evolution::fill_random;

/// Attempts made to draw two distinct parents before accepting a collision.
pub const PARENT_DRAW_ATTEMPTS: usize = 100;

/// Ordered set of individuals for one generation.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Network>,
    current: usize,
    generation: u32,
}

impl Population {
    /// Creates `size` freshly initialised networks, generation 0.
    pub fn new_random(size: usize, topology: Topology) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfiguration(
                "population_size must be > 0".to_string(),
            ));
        }

        let mut individuals = Vec::with_capacity(size);
        fill_random(&mut individuals, size, topology)?;
        Ok(Self::from_individuals(individuals, 0))
    }

    /// Wraps an existing set of individuals with the cursor at 0.
    pub fn from_individuals(individuals: Vec<Network>, generation: u32) -> Self {
        Self {
            individuals,
            current: 0,
            generation,
        }
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// True when the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// All individuals in their current order.
    pub fn individuals(&self) -> &[Network] {
        &self.individuals
    }

    /// Index of the live individual.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The live individual.
    pub fn current(&self) -> &Network {
        &self.individuals[self.current]
    }

    /// Generation counter, starting at 0.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// True when the live individual is the last one of the generation.
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.individuals.len()
    }

    /// Stores `fitness` on the live individual.
    pub fn record_fitness(&mut self, fitness: f32) {
        self.individuals[self.current].fitness = fitness;
    }

    /// Moves the cursor to the next individual. Returns `false` at the end.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Sorts individuals by fitness, highest first.
    ///
    /// Uses IEEE total ordering, so NaN fitness sorts without panicking.
    pub fn sort_descending_by_fitness(&mut self) {
        self.individuals.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    /// Highest and mean fitness of the generation.
    pub fn fitness_summary(&self) -> (f32, f32) {
        let best = self
            .individuals
            .iter()
            .map(|n| n.fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        let total: f32 = self.individuals.iter().map(|n| n.fitness).sum();
        (best, total / self.individuals.len() as f32)
    }

    /// Copies the top `best_k` individuals as elites and builds the gene pool
    /// from the top `best_k` and bottom `worst_k`.
    ///
    /// Call after [`Population::sort_descending_by_fitness`]. Elites keep
    /// their genes but start with zero fitness. Gene-pool entries are indices
    /// into this (sorted) population.
    pub fn select_breeding_pool(
        &self,
        best_k: usize,
        worst_k: usize,
        topology: Topology,
    ) -> Result<(Vec<Network>, GenePool)> {
        let len = self.individuals.len();
        let mut elites = Vec::with_capacity(len);
        let mut gene_pool = GenePool::default();

        for (index, individual) in self.individuals.iter().enumerate().take(best_k) {
            elites.push(individual.copy(topology)?);
            gene_pool.add(index, individual.fitness);
        }

        for offset in 0..worst_k.min(len) {
            let index = len - 1 - offset;
            gene_pool.add(index, self.individuals[index].fitness);
        }

        Ok((elites, gene_pool))
    }

    /// Swaps in the next generation and rewinds the cursor.
    pub fn replace(&mut self, individuals: Vec<Network>) {
        self.individuals = individuals;
        self.current = 0;
        self.generation += 1;
    }
}

/// Weighted multiset of population indices used to pick parents.
///
/// An index carries `round(fitness * 10)` copies, so fitter individuals are
/// drawn more often. Copies are stored as counts, not repeated entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenePool {
    entries: Vec<(usize, usize)>,
}

impl GenePool {
    /// Upper bound on the copies a single fitness report can earn.
    pub const MAX_WEIGHT: usize = u32::MAX as usize;

    /// Number of copies `fitness` earns. Negative and NaN fitness earn none,
    /// infinite fitness earns [`GenePool::MAX_WEIGHT`].
    pub fn weight(fitness: f32) -> usize {
        let scaled = (f64::from(fitness) * 10.0).round_ties_even();
        if scaled.is_nan() || scaled <= 0.0 {
            0
        } else {
            scaled.min(Self::MAX_WEIGHT as f64) as usize
        }
    }

    /// Adds `index` with the weight its fitness earns.
    pub fn add(&mut self, index: usize, fitness: f32) {
        let copies = Self::weight(fitness);
        if copies > 0 {
            self.entries.push((index, copies));
        }
    }

    /// Total number of copies across all indices.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .fold(0usize, |total, &(_, copies)| total.saturating_add(copies))
    }

    /// True when no individual earned any weight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(index, copies)` pairs in insertion order.
    pub fn entries(&self) -> &[(usize, usize)] {
        &self.entries
    }

    /// How many copies of `index` the pool holds.
    pub fn count_of(&self, index: usize) -> usize {
        self.entries
            .iter()
            .filter(|&&(e, _)| e == index)
            .map(|&(_, copies)| copies)
            .sum()
    }

    /// Draws one index. An empty pool falls back to a uniform draw over
    /// `0..population_len`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, population_len: usize) -> usize {
        self.draw_from(self.sampler().as_ref(), rng, population_len)
    }

    /// Draws two parent indices, retrying up to [`PARENT_DRAW_ATTEMPTS`]
    /// times for a distinct pair. The last draw is kept if every attempt
    /// collides.
    pub fn draw_parents<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        population_len: usize,
    ) -> (usize, usize) {
        let sampler = self.sampler();
        if sampler.is_none() {
            log::debug!("gene pool empty, drawing parents uniformly");
        }

        let mut pair = (0, 0);
        for _ in 0..PARENT_DRAW_ATTEMPTS {
            pair = (
                self.draw_from(sampler.as_ref(), rng, population_len),
                self.draw_from(sampler.as_ref(), rng, population_len),
            );
            if pair.0 != pair.1 {
                return pair;
            }
        }

        log::debug!(
            "no distinct parents after {} attempts, pairing {} with itself",
            PARENT_DRAW_ATTEMPTS,
            pair.0
        );
        pair
    }

    fn sampler(&self) -> Option<WeightedIndex<u64>> {
        WeightedIndex::new(self.entries.iter().map(|&(_, copies)| copies as u64)).ok()
    }

    fn draw_from<R: Rng + ?Sized>(
        &self,
        sampler: Option<&WeightedIndex<u64>>,
        rng: &mut R,
        population_len: usize,
    ) -> usize {
        match sampler {
            Some(sampler) => self.entries[sampler.sample(rng)].0,
            None => rng.random_range(0..population_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_rounds_half_to_even() {
        assert_eq!(GenePool::weight(0.25), 2);
        assert_eq!(GenePool::weight(0.75), 8);
        assert_eq!(GenePool::weight(0.94), 9);
        assert_eq!(GenePool::weight(9.0), 90);
    }

    #[test]
    fn weight_is_zero_for_negative_or_nan() {
        assert_eq!(GenePool::weight(-3.0), 0);
        assert_eq!(GenePool::weight(0.0), 0);
        assert_eq!(GenePool::weight(f32::NAN), 0);
    }

    #[test]
    fn weight_saturates_for_huge_fitness() {
        assert_eq!(GenePool::weight(2.0e7), 200_000_000);
        assert_eq!(GenePool::weight(f32::MAX), GenePool::MAX_WEIGHT);
        assert_eq!(GenePool::weight(f32::INFINITY), GenePool::MAX_WEIGHT);
    }
}
