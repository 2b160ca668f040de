#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_drive::simulation::brain::{Network, Topology};
use evo_drive::simulation::car::{Car, DeathCause};
use evo_drive::simulation::driver::EvaluationDriver;
use evo_drive::simulation::evolution::{DeathOutcome, EvolutionEngine};
use evo_drive::simulation::params::{DriverParams, Params};
use evo_drive::simulation::stats::BestFitness;
use evo_drive::simulation::track::Track;
use geo::{Line, Point};
use ndarray::array;

fn small_params() -> Params {
    Params {
        population_size: 4,
        hidden_layer_count: 1,
        neuron_count: 3,
        mutation_rate: 0.5,
        mutation_divider: 2,
        best_agent_selection: 1,
        worst_agent_selection: 1,
        number_to_crossover: 2,
    }
}

fn quick_driver_params() -> DriverParams {
    DriverParams {
        lose_time: 1.0,
        max_lifetime: 4.0,
        ..DriverParams::default()
    }
}

#[test]
fn test_oval_track_layout() {
    let track = Track::oval((0.0, 0.0), (10.0, 8.0), (20.0, 16.0), 32).unwrap();

    assert_eq!(track.walls().len(), 64);
    assert_eq!(track.start_position(), &array![15.0, 0.0]);
}

#[test]
fn test_oval_rejects_bad_geometry() {
    assert!(Track::oval((0.0, 0.0), (10.0, 8.0), (20.0, 16.0), 2).is_err());
    assert!(Track::oval((0.0, 0.0), (20.0, 8.0), (10.0, 16.0), 16).is_err());
    assert!(Track::oval((0.0, 0.0), (0.0, 8.0), (10.0, 16.0), 16).is_err());
}

#[test]
fn test_sensors_are_normalised() {
    let track = Track::default();
    let mut car = Car::at_start(&track);

    let readings = car.sense(&track, 100.0);
    let magnitude = readings.iter().map(|r| r * r).sum::<f32>().sqrt();
    assert!((magnitude - 1.0).abs() < 1e-4);
    assert!(readings.iter().all(|&r| r > 0.0));
}

#[test]
fn test_sensor_reads_range_without_walls() {
    let track = Track::from_walls(Vec::new(), array![0.0, 0.0], 0.0);
    let mut car = Car::at_start(&track);

    let readings = car.sense(&track, 10.0);
    let expected = 1.0 / 3.0_f32.sqrt();
    assert!(readings.iter().all(|r| (r - expected).abs() < 1e-5));
}

#[test]
fn test_drive_moves_forward_and_turns_right() {
    let track = Track::from_walls(Vec::new(), array![0.0, 0.0], 0.0);
    let params = DriverParams::default();
    let mut car = Car::at_start(&track);

    car.drive(1.0, 1.0, &params);

    let expected_step = params.speed_multiplier * params.smoothness;
    assert!((car.pos[0] - expected_step).abs() < 1e-5);
    assert!(car.pos[1].abs() < 1e-6);
    assert!(car.heading < 0.0);
}

#[test]
fn test_car_crashes_into_wall_ahead() {
    let wall = Line::new(Point::new(-100.0, 2.0), Point::new(100.0, 2.0));
    let track = Track::from_walls(vec![wall], array![0.0, 0.0], std::f32::consts::FRAC_PI_2);
    let params = DriverParams::default();
    let network = Network::initialize(Topology::new(1, 4)).unwrap();
    let mut car = Car::at_start(&track);

    let mut cause = None;
    for _ in 0..1000 {
        cause = car.step(&network, &track, &params);
        if cause.is_some() {
            break;
        }
    }
    assert_eq!(cause, Some(DeathCause::Crashed));
}

#[test]
fn test_slow_car_dies_after_grace_period() {
    let track = Track::from_walls(Vec::new(), array![0.0, 0.0], 0.0);
    let params = quick_driver_params();
    let network = Network::initialize(Topology::new(1, 4)).unwrap();
    let mut car = Car::at_start(&track);

    let mut ticks = 0;
    let cause = loop {
        ticks += 1;
        if let Some(cause) = car.step(&network, &track, &params) {
            break cause;
        }
    };

    assert_eq!(cause, DeathCause::TooSlow);
    assert!(car.time_alive > params.lose_time);
    assert!(ticks as f32 * params.time_step <= params.lose_time + 2.0 * params.time_step);
}

#[test]
fn test_best_fitness_tracker_is_shared() {
    let best = BestFitness::new();
    let handle = best.clone();

    assert!(best.update(3.0));
    assert!(!handle.update(2.0));
    assert!(handle.update(4.5));
    assert_eq!(best.get(), 4.5);
}

#[test]
fn test_tick_reports_death_to_engine() {
    let engine = EvolutionEngine::new(small_params()).unwrap();
    let mut driver = EvaluationDriver::new(
        engine,
        Track::default(),
        quick_driver_params(),
        BestFitness::new(),
    )
    .unwrap();

    let (fitness, _, outcome) = driver.run_individual().unwrap();
    assert!(fitness > 0.0);
    assert_eq!(outcome, DeathOutcome::Advanced { next_index: 1 });
    assert_eq!(driver.engine().population().individuals()[0].fitness, fitness);
    assert_eq!(driver.car().time_alive, 0.0);
}

#[test]
fn test_run_generation_advances_engine() {
    let engine = EvolutionEngine::new(small_params()).unwrap();
    let best = BestFitness::new();
    let mut driver = EvaluationDriver::new(
        engine,
        Track::default(),
        quick_driver_params(),
        best.clone(),
    )
    .unwrap();

    let report = driver.run_generation().unwrap();
    assert_eq!(report.generation, 0);
    assert_eq!(driver.engine().generation(), 1);
    assert_eq!(driver.engine().current_index(), 0);
    assert!(report.best_fitness > 0.0);
    assert!((best.get() - report.best_fitness).abs() < 1e-6);

    let report = driver.run_generation().unwrap();
    assert_eq!(report.generation, 1);
    assert!(best.get() >= report.best_fitness);
}

#[test]
fn test_driver_rejects_invalid_params() {
    let engine = EvolutionEngine::new(small_params()).unwrap();
    let params = DriverParams {
        time_step: 0.0,
        ..DriverParams::default()
    };
    assert!(EvaluationDriver::new(engine, Track::default(), params, BestFitness::new()).is_err());
}
