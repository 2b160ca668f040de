//! Run parameters: the evolution engine options, the headless driver's
//! vehicle and fitness constants, and logging.
//!
//! Everything is plain data loaded once at startup, either from defaults or
//! from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::brain::Topology;
use super::error::{Error, Result};

/// Genetic algorithm parameters, fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Number of individuals evaluated per generation.
    pub population_size: usize,
    /// Number of hidden layers between the 3 inputs and the 2 outputs.
    pub hidden_layer_count: usize,
    /// Width of every hidden layer.
    pub neuron_count: usize,
    /// Probability that a child's weight matrix is mutated.
    pub mutation_rate: f32,
    /// Divides a matrix's cell count to bound the number of mutated cells.
    pub mutation_divider: usize,
    /// Top performers copied unchanged into the next generation.
    pub best_agent_selection: usize,
    /// Bottom performers that still feed the gene pool.
    pub worst_agent_selection: usize,
    /// Children bred by crossover each generation. Must be even.
    pub number_to_crossover: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            population_size: 85,
            hidden_layer_count: 1,
            neuron_count: 10,
            mutation_rate: 0.055,
            mutation_divider: 7,
            best_agent_selection: 8,
            worst_agent_selection: 3,
            number_to_crossover: 14,
        }
    }
}

impl Params {
    /// Network shape described by these parameters.
    pub fn topology(&self) -> Topology {
        Topology::new(self.hidden_layer_count, self.neuron_count)
    }

    /// Checks every option. Must pass before any network is allocated.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return invalid("population_size must be > 0");
        }
        if self.neuron_count < 1 {
            return invalid("neuron_count must be >= 1");
        }
        if self.number_to_crossover % 2 != 0 {
            return invalid(format!(
                "number_to_crossover must be even, got {}",
                self.number_to_crossover
            ));
        }
        if self.best_agent_selection > self.population_size {
            return invalid(format!(
                "best_agent_selection ({}) exceeds population_size ({})",
                self.best_agent_selection, self.population_size
            ));
        }
        if self.worst_agent_selection > self.population_size {
            return invalid(format!(
                "worst_agent_selection ({}) exceeds population_size ({})",
                self.worst_agent_selection, self.population_size
            ));
        }
        if self.best_agent_selection + self.number_to_crossover > self.population_size {
            return invalid(format!(
                "best_agent_selection + number_to_crossover ({}) exceeds population_size ({})",
                self.best_agent_selection + self.number_to_crossover,
                self.population_size
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!(
                "mutation_rate must lie in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if self.mutation_divider == 0 {
            return invalid("mutation_divider must be > 0");
        }
        Ok(())
    }
}

/// Vehicle, sensor and fitness constants for the headless driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverParams {
    /// Forward distance per tick at full acceleration, before smoothing.
    pub speed_multiplier: f32,
    /// Fraction of the commanded motion applied each tick.
    pub smoothness: f32,
    /// Fitness weight of total distance travelled.
    pub distance_multiplier: f32,
    /// Fitness weight of average speed.
    pub average_speed_multiplier: f32,
    /// Fitness weight of the mean sensor reading.
    pub sensor_multiplier: f32,
    /// Fitness at which a run ends as a success.
    pub win_condition: f32,
    /// Fitness a car must reach by `lose_time` to stay alive.
    pub lose_condition: f32,
    /// Seconds of grace before `lose_condition` is enforced.
    pub lose_time: f32,
    /// Simulated seconds per tick.
    pub time_step: f32,
    /// Maximum distance a sensor ray can report.
    pub sensor_range: f32,
    /// Collision radius of the car body.
    pub body_radius: f32,
    /// Hard cap on a single run, in simulated seconds.
    pub max_lifetime: f32,
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            speed_multiplier: 11.4,
            smoothness: 0.02,
            distance_multiplier: 1.4,
            average_speed_multiplier: 0.2,
            sensor_multiplier: 0.1,
            win_condition: 1000.0,
            lose_condition: 40.0,
            lose_time: 20.0,
            time_step: 0.02,
            sensor_range: 100.0,
            body_radius: 0.5,
            max_lifetime: 120.0,
        }
    }
}

impl DriverParams {
    /// Rejects non-finite values and non-positive rates.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("speed_multiplier", self.speed_multiplier),
            ("smoothness", self.smoothness),
            ("time_step", self.time_step),
            ("sensor_range", self.sensor_range),
            ("body_radius", self.body_radius),
            ("max_lifetime", self.max_lifetime),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be a positive number, got {value}"));
            }
        }

        let finite = [
            ("distance_multiplier", self.distance_multiplier),
            ("average_speed_multiplier", self.average_speed_multiplier),
            ("sensor_multiplier", self.sensor_multiplier),
            ("win_condition", self.win_condition),
            ("lose_condition", self.lose_condition),
            ("lose_time", self.lose_time),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return invalid(format!("{name} must be finite, got {value}"));
            }
        }
        Ok(())
    }
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingParams {
    /// Default log filter (error, warn, info, debug, trace).
    pub log_level: String,
}

impl Default for LoggingParams {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Complete run configuration, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Genetic algorithm options.
    pub evolution: Params,
    /// Headless driver options.
    pub driver: DriverParams,
    /// Logging options.
    pub logging: LoggingParams,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        self.evolution.validate()?;
        self.driver.validate()
    }
}

fn invalid<T>(message: impl Into<String>) -> Result<T> {
    Err(Error::InvalidConfiguration(message.into()))
}
