use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info};

use super::body::{compute_body_force, init_body, Body, Vec3, DT, SOFTENING};
use super::record::PositionRecorder;
use crate::{
    new_work_balancing_executor, new_work_stealing_executor, Executor, Future, PoolError,
    SchedulingMode,
};

/// How the simulation's per-body work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run everything on the calling thread.
    Sequential,
    /// Run on a work-stealing executor.
    WorkStealing,
    /// Run on a work-balancing executor.
    WorkBalancing,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub bodies: usize,
    pub iterations: usize,
    pub threads: usize,
    /// CSV file that receives body positions, if any.
    pub record: Option<PathBuf>,
    pub seed: u64,
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("failed to record positions: {0}")]
    Record(#[from] io::Error),
}

type Recorder = PositionRecorder<BufWriter<File>>;

/// Runs the simulation described by `config` and returns the final bodies.
pub fn run(config: &Config) -> Result<Vec<Body>, SimulationError> {
    info!(
        mode = ?config.mode,
        bodies = config.bodies,
        iterations = config.iterations,
        threads = config.threads,
        "starting simulation"
    );

    let recorder = match &config.record {
        Some(path) => Some(PositionRecorder::new(
            BufWriter::new(File::create(path)?),
            config.iterations,
        )),
        None => None,
    };

    // Per-pass budgets scale with the amount of work each worker would get.
    let per_worker = config.bodies / config.threads.max(1);
    let threshold = (per_worker / 10).max(1);
    let threshold_balance = per_worker / 50;

    match config.mode {
        Mode::Sequential => run_sequential(config, recorder),
        Mode::WorkStealing => {
            let executor = new_work_stealing_executor(config.threads, threshold)?;
            run_parallel(executor, config, recorder)
        }
        Mode::WorkBalancing => {
            let executor =
                new_work_balancing_executor(config.threads, threshold, threshold_balance)?;
            run_parallel(executor, config, recorder)
        }
    }
}

pub fn run_sequential(
    config: &Config,
    mut recorder: Option<Recorder>,
) -> Result<Vec<Body>, SimulationError> {
    let mut bodies: Vec<Body> = (0..config.bodies)
        .map(|id| init_body(id, config.seed))
        .collect();

    for iteration in 0..=config.iterations {
        if let Some(recorder) = recorder.as_mut() {
            recorder.observe(iteration, &bodies)?;
        }

        let positions = positions_of(&bodies);
        for (id, body) in bodies.iter_mut().enumerate() {
            body.accelerate(compute_body_force(id, &positions, DT, SOFTENING));
        }
        for body in bodies.iter_mut() {
            body.integrate(DT);
        }
    }

    if let Some(recorder) = recorder {
        recorder.finish()?;
    }
    Ok(bodies)
}

/// Runs the simulation on `executor`, one task per body per phase, and shuts the
/// executor down once the last step is done.
pub fn run_parallel<M: SchedulingMode>(
    executor: Executor<M>,
    config: &Config,
    mut recorder: Option<Recorder>,
) -> Result<Vec<Body>, SimulationError> {
    let seed = config.seed;
    let initial: Vec<Future<Body>> = (0..config.bodies)
        .map(|id| executor.submit_callable(move || init_body(id, seed)))
        .collect();

    let bodies: Arc<Vec<Mutex<Body>>> = Arc::new(
        initial
            .iter()
            .map(|f| Mutex::new(f.get().copied().unwrap_or_default()))
            .collect(),
    );

    for iteration in 0..=config.iterations {
        let snapshot = snapshot(&bodies);
        if let Some(recorder) = recorder.as_mut() {
            recorder.observe(iteration, &snapshot)?;
        }

        let positions: Arc<Vec<Vec3>> = Arc::new(positions_of(&snapshot));
        let forces: Vec<_> = (0..bodies.len())
            .map(|id| {
                let bodies = Arc::clone(&bodies);
                let positions = Arc::clone(&positions);
                executor.submit_runnable(move || {
                    let dv = compute_body_force(id, &positions, DT, SOFTENING);
                    lock(&bodies[id]).accelerate(dv);
                })
            })
            .collect();
        forces.iter().for_each(Future::wait);

        let moves: Vec<_> = (0..bodies.len())
            .map(|id| {
                let bodies = Arc::clone(&bodies);
                executor.submit_runnable(move || lock(&bodies[id]).integrate(DT))
            })
            .collect();
        moves.iter().for_each(Future::wait);

        debug!(iteration, "step complete");
    }

    executor.shutdown();

    if let Some(recorder) = recorder {
        recorder.finish()?;
    }
    Ok(snapshot(&bodies))
}

fn lock(body: &Mutex<Body>) -> std::sync::MutexGuard<'_, Body> {
    body.lock().unwrap_or_else(PoisonError::into_inner)
}

fn snapshot(bodies: &[Mutex<Body>]) -> Vec<Body> {
    bodies.iter().map(|b| *lock(b)).collect()
}

fn positions_of(bodies: &[Body]) -> Vec<Vec3> {
    bodies.iter().map(|b| b.position).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: Mode) -> Config {
        Config {
            mode,
            bodies: 60,
            iterations: 10,
            threads: 3,
            record: None,
            seed: 9,
        }
    }

    #[test]
    fn every_mode_produces_the_same_trajectory() {
        let sequential = run(&config(Mode::Sequential)).unwrap();
        let stealing = run(&config(Mode::WorkStealing)).unwrap();
        let balancing = run(&config(Mode::WorkBalancing)).unwrap();

        assert_eq!(sequential.len(), 60);
        assert_eq!(sequential, stealing);
        assert_eq!(sequential, balancing);
        assert!(sequential.iter().any(|b| b.velocity != [0.0; 3]));
    }

    #[test]
    fn zero_threads_is_a_configuration_error() {
        let mut cfg = config(Mode::WorkStealing);
        cfg.threads = 0;
        assert!(matches!(
            run(&cfg),
            Err(SimulationError::Pool(PoolError::InvalidCapacity(0)))
        ));
    }

    #[test]
    fn recording_writes_eleven_frames() {
        let path = std::env::temp_dir().join(format!("dequepool-nbody-{}.csv", std::process::id()));
        let mut cfg = config(Mode::WorkBalancing);
        cfg.bodies = 9;
        cfg.record = Some(path.clone());
        run(&cfg).unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(csv.lines().count(), 9 * 11);
        assert!(csv.lines().last().unwrap().starts_with("10, "));
    }
}
