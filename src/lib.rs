//! Continuous Actor-Critic Learning Automaton (CACLA) for robot arm control.
//!
//! The learner keeps two function approximators: an actor mapping observations to actions and a
//! critic estimating state values. Every step the critic is fit toward the temporal-difference
//! target and the actor is fit toward the explored action only when that action turned out better
//! than expected (positive TD error). Rejected transitions are rolled back in the simulator.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)]
pub mod approximators;
pub mod cacla;
pub mod cli;
pub mod config;
pub mod envs;
mod error;
pub mod logging;
pub mod simulation;
pub mod spaces;
pub mod torch;
pub mod utils;

pub use approximators::FunctionApproximator;
pub use cacla::{Cacla, CaclaCheckpoint, CaclaConfig, Hyperparameters};
pub use config::RunConfig;
pub use envs::{ArmEnvironment, ArmStep, PlanarArm, PlanarArmConfig};
pub use error::CaclaError;
pub use simulation::{evaluate, run_batch, run_episode, train, TrainConfig};

/// Pseudo-random number generator used throughout the crate.
pub type Prng = rand_chacha::ChaCha8Rng;
