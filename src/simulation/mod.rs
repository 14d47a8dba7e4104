//! Running episodes, training and evaluation
mod batch;
mod episode;
mod evaluate;
mod run_dir;
mod stats;
mod step;
mod train;

pub use batch::run_batch;
pub use episode::run_episode;
pub use evaluate::{evaluate, EvalEpisode};
pub use run_dir::RunDir;
pub use stats::{BatchStats, StatsError, Summary};
pub use step::{Trajectory, TrajectoryStep};
pub use train::{exploration_schedule, train, ExplorationSchedule, TrainConfig, TrainSummary};
