//! Generation summaries and the best-so-far fitness tracker.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Summary of one finished generation, produced at the generation transition.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Generation that was just evaluated.
    pub generation: u32,
    /// Highest fitness reported this generation.
    pub best_fitness: f32,
    /// Mean fitness over the whole population.
    pub mean_fitness: f32,
    /// Entries in the gene pool used for breeding.
    pub gene_pool_size: usize,
    /// Elites carried into the next generation.
    pub elites: usize,
    /// Crossover children bred for the next generation.
    pub children: usize,
    /// Fresh random individuals added to fill the population.
    pub randoms: usize,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: best {:.2}, mean {:.2}, gene pool {}, next = {} elite + {} bred + {} random",
            self.generation,
            self.best_fitness,
            self.mean_fitness,
            self.gene_pool_size,
            self.elites,
            self.children,
            self.randoms
        )
    }
}

/// Shared handle to the highest fitness seen across all generations.
///
/// Clones share the same value, so the driver and whoever displays the
/// record can each hold one.
#[derive(Debug, Clone, Default)]
pub struct BestFitness {
    best: Rc<Cell<f32>>,
}

impl BestFitness {
    /// Creates a tracker starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `fitness`, keeping the maximum. Returns `true` on a new record.
    pub fn update(&self, fitness: f32) -> bool {
        if fitness > self.best.get() {
            self.best.set(fitness);
            true
        } else {
            false
        }
    }

    /// Highest fitness recorded so far.
    pub fn get(&self) -> f32 {
        self.best.get()
    }
}
