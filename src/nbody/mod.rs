//! N-body gravity simulation used to exercise the executor.
//!
//! Every body interacts with every other body, so each step is one force task and
//! one integration task per body. The same physics runs sequentially or on either
//! scheduling discipline, and a fixed seed makes all three produce identical
//! trajectories.

mod body;
mod record;
mod simulation;

pub use body::{compute_body_force, init_body, Body, Vec3, DT, SOFTENING};
pub use record::PositionRecorder;
pub use simulation::{run, run_parallel, run_sequential, Config, Mode, SimulationError};
