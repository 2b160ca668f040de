//! Generation lifecycle: selection, crossover, mutation and refill.
//!
//! The [`EvolutionEngine`] evaluates individuals one at a time. Each call to
//! [`EvolutionEngine::on_death`] scores the live network; after the last one
//! the engine breeds the next generation:
//!
//! 1. sort by fitness, highest first
//! 2. copy the top `best_agent_selection` as elites, build the gene pool
//! 3. breed `number_to_crossover` children by whole-matrix crossover
//! 4. mutate the children
//! 5. fill the remaining slots with random networks

use ndarray::{Array2, ArrayViewMut2};
use rand::Rng;

use super::brain::{Network, Topology};
use super::error::{Error, Result};
use super::params::Params;
use super::population::{GenePool, Population};
use super::stats::GenerationReport;

/// What happened after a death was recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum DeathOutcome {
    /// The cursor moved to the next individual of the same generation.
    Advanced {
        /// Index of the new live individual.
        next_index: usize,
    },
    /// The whole population was scored and replaced.
    Repopulated(GenerationReport),
}

/// Drives the evaluate-then-breed cycle over a fixed-size population.
#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    params: Params,
    topology: Topology,
    population: Population,
}

impl EvolutionEngine {
    /// Validates `params` and creates a random first generation.
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;
        let topology = params.topology();
        let population = Population::new_random(params.population_size, topology)?;

        log::info!(
            "created population of {} networks ({} hidden x {} neurons)",
            params.population_size,
            topology.hidden_layer_count,
            topology.neuron_count
        );

        Ok(Self {
            params,
            topology,
            population,
        })
    }

    /// The network the evaluator should be driving right now.
    ///
    /// Re-fetch after every [`EvolutionEngine::on_death`]; the live
    /// individual changes.
    pub fn current_network(&self) -> &Network {
        self.population.current()
    }

    /// Index of the live individual within its generation.
    pub fn current_index(&self) -> usize {
        self.population.current_index()
    }

    /// Generation counter, starting at 0.
    pub fn generation(&self) -> u32 {
        self.population.generation()
    }

    /// The current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Parameters the engine was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Network topology shared by every individual.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Records the live individual's final fitness and moves on.
    ///
    /// After the last individual of a generation this breeds the next one.
    pub fn on_death(&mut self, fitness: f32) -> Result<DeathOutcome> {
        self.on_death_with(fitness, &mut rand::rng())
    }

    /// [`EvolutionEngine::on_death`] with an explicit random source.
    pub fn on_death_with<R: Rng + ?Sized>(
        &mut self,
        fitness: f32,
        rng: &mut R,
    ) -> Result<DeathOutcome> {
        log::debug!(
            "generation {} individual {} died with fitness {:.3}",
            self.population.generation(),
            self.population.current_index(),
            fitness
        );
        self.population.record_fitness(fitness);

        if self.population.advance() {
            return Ok(DeathOutcome::Advanced {
                next_index: self.population.current_index(),
            });
        }

        let report = self.repopulate(rng)?;
        log::info!("{}", report);
        Ok(DeathOutcome::Repopulated(report))
    }

    /// Breeds the next generation from the current fitness values.
    fn repopulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GenerationReport> {
        let (best_fitness, mean_fitness) = self.population.fitness_summary();
        let size = self.params.population_size;

        self.population.sort_descending_by_fitness();
        let (mut next, gene_pool) = self.population.select_breeding_pool(
            self.params.best_agent_selection,
            self.params.worst_agent_selection,
            self.topology,
        )?;
        let elites = next.len();

        let mut children = crossover(
            rng,
            self.params.number_to_crossover,
            &gene_pool,
            self.population.individuals(),
            self.topology,
        )?;
        mutate(
            rng,
            &mut children,
            self.params.mutation_rate,
            self.params.mutation_divider,
        );
        let bred = children.len();
        next.append(&mut children);

        fill_random(&mut next, size, self.topology)?;

        let report = GenerationReport {
            generation: self.population.generation(),
            best_fitness,
            mean_fitness,
            gene_pool_size: gene_pool.len(),
            elites,
            children: bred,
            randoms: size - elites - bred,
        };

        self.population.replace(next);
        Ok(report)
    }
}

/// Breeds `target_count` children, two per parent pair. An odd count is
/// rejected.
///
/// Parents are drawn from `gene_pool` (indices into `population`). Every
/// weight matrix and every bias is inherited whole from one parent, chosen
/// by a fair coin per slot; the sibling receives the other parent's slot.
pub fn crossover<R: Rng + ?Sized>(
    rng: &mut R,
    target_count: usize,
    gene_pool: &GenePool,
    population: &[Network],
    topology: Topology,
) -> Result<Vec<Network>> {
    if target_count % 2 != 0 {
        return Err(Error::InvalidConfiguration(format!(
            "crossover count must be even, got {target_count}"
        )));
    }

    let mut children = Vec::with_capacity(target_count);
    for _ in 0..target_count / 2 {
        let (a, b) = gene_pool.draw_parents(rng, population.len());
        let (child_1, child_2) = breed_pair(rng, &population[a], &population[b], topology)?;
        children.push(child_1);
        children.push(child_2);
    }
    Ok(children)
}

/// Produces two complementary children from two parents.
pub fn breed_pair<R: Rng + ?Sized>(
    rng: &mut R,
    parent_1: &Network,
    parent_2: &Network,
    topology: Topology,
) -> Result<(Network, Network)> {
    let count = parent_1.layer_count();
    let mut weights_1: Vec<Array2<f32>> = Vec::with_capacity(count);
    let mut weights_2: Vec<Array2<f32>> = Vec::with_capacity(count);

    for i in 0..count {
        let (first, second) = if rng.random_bool(0.5) {
            (parent_1, parent_2)
        } else {
            (parent_2, parent_1)
        };
        weights_1.push(first.weights(i).clone());
        weights_2.push(second.weights(i).clone());
    }

    let mut biases_1 = Vec::with_capacity(count);
    let mut biases_2 = Vec::with_capacity(count);

    for i in 0..count {
        let (first, second) = if rng.random_bool(0.5) {
            (parent_1, parent_2)
        } else {
            (parent_2, parent_1)
        };
        biases_1.push(first.bias(i));
        biases_2.push(second.bias(i));
    }

    Ok((
        Network::from_parts(topology, weights_1, biases_1)?,
        Network::from_parts(topology, weights_2, biases_2)?,
    ))
}

/// Mutates each child's weight matrices with probability `mutation_rate`.
///
/// Biases are left untouched.
pub fn mutate<R: Rng + ?Sized>(
    rng: &mut R,
    children: &mut [Network],
    mutation_rate: f32,
    mutation_divider: usize,
) {
    for child in children.iter_mut() {
        for i in 0..child.layer_count() {
            if rng.random::<f32>() < mutation_rate {
                mutate_matrix(rng, child.weights_mut(i), mutation_divider);
            }
        }
    }
}

/// Nudges a random number of random cells by up to ±1, clamped to `[-1, 1]`.
///
/// The number of points is drawn from `1..cells / mutation_divider`; when
/// that range is empty exactly one point is mutated.
pub fn mutate_matrix<R: Rng + ?Sized>(
    rng: &mut R,
    mut matrix: ArrayViewMut2<'_, f32>,
    mutation_divider: usize,
) {
    let (rows, cols) = matrix.dim();
    if rows == 0 || cols == 0 {
        return;
    }

    let upper = (rows * cols) / mutation_divider.max(1);
    let points = if upper > 1 {
        rng.random_range(1..upper)
    } else {
        1
    };

    for _ in 0..points {
        let cell = (rng.random_range(0..rows), rng.random_range(0..cols));
        let nudged = matrix[cell] + rng.random_range(-1.0..=1.0);
        matrix[cell] = nudged.clamp(-1.0, 1.0);
    }
}

/// Appends freshly initialised networks until `individuals` holds `size`.
pub fn fill_random(individuals: &mut Vec<Network>, size: usize, topology: Topology) -> Result<()> {
    while individuals.len() < size {
        individuals.push(Network::initialize(topology)?);
    }
    Ok(())
}
