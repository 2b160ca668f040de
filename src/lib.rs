//! # Evo Drive - Neuroevolution of a wall-avoiding vehicle
//!
//! Small feed-forward networks steer a car from three distance sensors. A
//! genetic algorithm evaluates one network at a time and, once every
//! individual has reported its fitness, breeds the next generation.
//!
//! ## Features
//!
//! - Fixed 3-input / 2-output networks with equal-width hidden layers
//! - Fitness-weighted gene pool with elitism
//! - Whole-matrix crossover and clamped point mutation
//! - Headless oval track with ray sensors for evaluation
//! - JSON configuration
//!
//! ## Core Modules
//!
//! - [`simulation::brain`] - Network representation and forward pass
//! - [`simulation::population`] - Population arena and gene pool
//! - [`simulation::evolution`] - Generation lifecycle
//! - [`simulation::driver`] - Evaluation driver

/// Evolution core and the headless evaluation environment.
pub mod simulation {
    /// Feed-forward network used as an individual's genome.
    pub mod brain;
    /// Vehicle body, sensors and fitness accounting.
    pub mod car;
    /// Evaluation driver connecting the track to the engine.
    pub mod driver;
    /// Error types.
    pub mod error;
    /// Selection, crossover, mutation and the generation state machine.
    pub mod evolution;
    /// Ray and collision geometry.
    pub mod geometric_utils;
    /// Run configuration.
    pub mod params;
    /// Population arena and gene pool.
    pub mod population;
    /// Generation reports and best-so-far tracking.
    pub mod stats;
    /// Headless circuit.
    pub mod track;
}

pub use simulation::brain::{Network, Topology};
pub use simulation::error::{Error, Result};
pub use simulation::evolution::{DeathOutcome, EvolutionEngine};
pub use simulation::params::{Config, DriverParams, Params};
