//! Vehicle body, distance sensors and fitness accounting.
//!
//! A car reads three rays (front-right, front, front-left), feeds them to a
//! network, moves by the network's acceleration and turning, and accumulates
//! fitness from distance, average speed and wall clearance.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use ndarray::{Array1, array};

use super::brain::Network;
use super::geometric_utils::{cast_ray, path_crosses_walls, point_wall_distance, to_point};
use super::params::DriverParams;
use super::track::Track;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// The body hit a wall.
    Crashed,
    /// Fitness stayed below the lose condition past the grace period.
    TooSlow,
    /// Fitness reached the win condition.
    Won,
    /// The run hit the lifetime cap.
    Expired,
}

/// A single vehicle run.
#[derive(Debug, Clone)]
pub struct Car {
    /// Position in track coordinates.
    pub pos: Array1<f32>,
    /// Heading in radians, counter-clockwise from +x.
    pub heading: f32,
    /// Simulated seconds since the run started.
    pub time_alive: f32,
    /// Total path length driven.
    pub distance_travelled: f32,
    /// Fitness accumulated so far.
    pub fitness: f32,
    /// Last normalised sensor readings (front-right, front, front-left).
    pub sensors: [f32; 3],
}

impl Car {
    /// Places a car at the track's start pose.
    pub fn at_start(track: &Track) -> Self {
        Self {
            pos: track.start_position().clone(),
            heading: track.start_heading(),
            time_alive: 0.0,
            distance_travelled: 0.0,
            fitness: 0.0,
            sensors: [0.0; 3],
        }
    }

    /// Returns the car to the start pose with all accounting cleared.
    pub fn reset(&mut self, track: &Track) {
        *self = Self::at_start(track);
    }

    /// Unit vector the car is facing.
    pub fn forward(&self) -> Array1<f32> {
        array![self.heading.cos(), self.heading.sin()]
    }

    /// Casts the three sensor rays and normalises the readings to unit length.
    ///
    /// A ray that hits nothing reads `range`.
    pub fn sense(&mut self, track: &Track, range: f32) -> [f32; 3] {
        let origin = to_point(&self.pos);
        let raw = [
            self.heading - FRAC_PI_4,
            self.heading,
            self.heading + FRAC_PI_4,
        ]
        .map(|angle| cast_ray(origin, (angle.cos(), angle.sin()), range, track.walls()));

        let magnitude = raw.iter().map(|d| d * d).sum::<f32>().sqrt();
        self.sensors = if magnitude > 1e-5 {
            raw.map(|d| d / magnitude)
        } else {
            [0.0; 3]
        };
        self.sensors
    }

    /// Moves forward by `acceleration` and turns by `turning`.
    ///
    /// Positive turning steers right (clockwise).
    pub fn drive(&mut self, acceleration: f32, turning: f32, params: &DriverParams) {
        let step = acceleration * params.speed_multiplier * params.smoothness;
        self.pos = &self.pos + &(self.forward() * step);
        self.heading -= turning * FRAC_PI_2 * params.smoothness;
    }

    /// Advances the run by one tick under `network`'s control.
    ///
    /// Returns the cause of death if the run ended on this tick.
    pub fn step(
        &mut self,
        network: &Network,
        track: &Track,
        params: &DriverParams,
    ) -> Option<DeathCause> {
        let [a, b, c] = self.sense(track, params.sensor_range);
        let last_pos = self.pos.clone();

        let (acceleration, turning) = network.forward(a, b, c);
        self.drive(acceleration, turning, params);
        self.time_alive += params.time_step;

        self.distance_travelled += (&self.pos - &last_pos).mapv(|x| x * x).sum().sqrt();
        self.update_fitness(params);

        if self.collided(track, &last_pos, params.body_radius) {
            return Some(DeathCause::Crashed);
        }
        if self.fitness >= params.win_condition {
            return Some(DeathCause::Won);
        }
        if self.time_alive > params.lose_time && self.fitness < params.lose_condition {
            return Some(DeathCause::TooSlow);
        }
        if self.time_alive >= params.max_lifetime {
            return Some(DeathCause::Expired);
        }
        None
    }

    /// Recomputes fitness from distance, average speed and sensor clearance.
    pub fn update_fitness(&mut self, params: &DriverParams) {
        let average_speed = if self.time_alive > 0.0 {
            self.distance_travelled / self.time_alive
        } else {
            0.0
        };
        let mean_sensor = self.sensors.iter().sum::<f32>() / 3.0;

        self.fitness = self.distance_travelled * params.distance_multiplier
            + average_speed * params.average_speed_multiplier
            + mean_sensor * params.sensor_multiplier;
    }

    /// True if the body overlaps a wall or the last move passed through one.
    pub fn collided(&self, track: &Track, last_pos: &Array1<f32>, body_radius: f32) -> bool {
        let here = to_point(&self.pos);
        path_crosses_walls(to_point(last_pos), here, track.walls())
            || track
                .walls()
                .iter()
                .any(|wall| point_wall_distance(here, wall) < body_radius)
    }
}
