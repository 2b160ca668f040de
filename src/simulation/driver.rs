//! Evaluation driver: runs the live network on the track and reports deaths.
//!
//! The driver owns the engine, the track and a [`BestFitness`] handle passed
//! in by the caller. It is the only code that calls
//! [`EvolutionEngine::on_death`].

use super::car::{Car, DeathCause};
use super::error::Result;
use super::evolution::{DeathOutcome, EvolutionEngine};
use super::params::DriverParams;
use super::stats::{BestFitness, GenerationReport};
use super::track::Track;

/// Result of a single simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// The live car is still running.
    Alive,
    /// The live car's run ended and the engine moved on.
    Died {
        /// Final fitness reported to the engine.
        fitness: f32,
        /// Why the run ended.
        cause: DeathCause,
        /// What the engine did with the report.
        outcome: DeathOutcome,
    },
}

/// Headless evaluator feeding sensor readings to the engine's live network.
#[derive(Debug)]
pub struct EvaluationDriver {
    engine: EvolutionEngine,
    track: Track,
    params: DriverParams,
    car: Car,
    best: BestFitness,
}

impl EvaluationDriver {
    /// Creates a driver with the car at the track's start.
    pub fn new(
        engine: EvolutionEngine,
        track: Track,
        params: DriverParams,
        best: BestFitness,
    ) -> Result<Self> {
        params.validate()?;
        let car = Car::at_start(&track);
        Ok(Self {
            engine,
            track,
            params,
            car,
            best,
        })
    }

    /// Advances the live car by one time step.
    pub fn tick(&mut self) -> Result<Tick> {
        let network = self.engine.current_network();
        let Some(cause) = self.car.step(network, &self.track, &self.params) else {
            return Ok(Tick::Alive);
        };

        let fitness = self.car.fitness;
        if self.best.update(fitness) {
            log::info!(
                "new best fitness {:.2} (generation {}, individual {})",
                fitness,
                self.engine.generation(),
                self.engine.current_index()
            );
        }

        let outcome = self.engine.on_death(fitness)?;
        self.car.reset(&self.track);

        Ok(Tick::Died {
            fitness,
            cause,
            outcome,
        })
    }

    /// Ticks until the current individual's run ends.
    pub fn run_individual(&mut self) -> Result<(f32, DeathCause, DeathOutcome)> {
        loop {
            if let Tick::Died {
                fitness,
                cause,
                outcome,
            } = self.tick()?
            {
                return Ok((fitness, cause, outcome));
            }
        }
    }

    /// Evaluates every remaining individual of the current generation.
    pub fn run_generation(&mut self) -> Result<GenerationReport> {
        loop {
            if let (_, _, DeathOutcome::Repopulated(report)) = self.run_individual()? {
                return Ok(report);
            }
        }
    }

    /// The engine being driven.
    pub fn engine(&self) -> &EvolutionEngine {
        &self.engine
    }

    /// The live car.
    pub fn car(&self) -> &Car {
        &self.car
    }

    /// The track.
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Shared best-so-far tracker.
    pub fn best(&self) -> &BestFitness {
        &self.best
    }
}
