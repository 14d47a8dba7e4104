//! CACLA training loop
use super::{run_batch, BatchStats, RunDir};
use crate::approximators::FunctionApproximator;
use crate::cacla::Cacla;
use crate::config::ConfigError;
use crate::envs::ArmEnvironment;
use crate::logging::{ScopedLogger, StatsLogger};
use crate::utils::save::SaveLoad;
use crate::CaclaError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the exploration factor shrinks between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplorationSchedule {
    /// Anneal linearly to zero at the end of training. See [`exploration_schedule`].
    Linear,
    /// Multiply by the learner's `exploration_decay` after every batch.
    Exponential,
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self::Linear
    }
}

/// Configuration for [`train`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Total number of training episodes.
    pub n_episodes: usize,
    /// Number of episodes per batch.
    pub batch_size: usize,
    /// Render the environment during training.
    pub animate: bool,
    pub exploration_schedule: ExplorationSchedule,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            n_episodes: 10_000,
            batch_size: 50,
            animate: false,
            exploration_schedule: ExplorationSchedule::default(),
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be positive".into()));
        }
        Ok(())
    }
}

/// Exploration decay factor applied after a batch.
///
/// Equal to `(n - e) / (n - e + b)` for `n` total episodes, `e` episodes completed so far
/// and batch size `b`. The product of these factors telescopes so that after `k` batches the
/// exploration factor is `(n - k b) / n` times its initial value: a linear anneal reaching zero
/// after the last batch. Returns zero once `e >= n`.
pub fn exploration_schedule(n_episodes: usize, episode: usize, batch_size: usize) -> f64 {
    let remaining = n_episodes.saturating_sub(episode);
    if remaining == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let (remaining, batch_size) = (remaining as f64, batch_size as f64);
    remaining / (remaining + batch_size)
}

/// Summary of a completed training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainSummary {
    pub num_batches: usize,
    pub num_episodes: usize,
    pub num_steps: usize,
    /// Highest batch mean reward; the one saved as the best model.
    pub best_mean_reward: f64,
    /// Statistics of the final batch.
    pub last_batch: Option<BatchStats>,
}

/// Train a learner with CACLA.
///
/// Runs batches of episodes until `n_episodes` have completed. After each batch:
/// * batch statistics are logged under the `batch` scope and the logger is flushed;
/// * the learner is saved to [`RunDir::best_model`] if the batch mean reward is at least the
///   best seen so far;
/// * the learning rates are decayed by `lr_decay`;
/// * the exploration factor is decayed according to `config.exploration_schedule`.
///
/// The final learner is saved to [`RunDir::final_model`].
pub fn train<A, C, E, R>(
    learner: &mut Cacla<A, C>,
    env: &mut E,
    config: &TrainConfig,
    run_dir: &RunDir,
    rng: &mut R,
    logger: &mut dyn StatsLogger,
) -> Result<TrainSummary, CaclaError>
where
    A: FunctionApproximator,
    C: FunctionApproximator,
    E: ArmEnvironment + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    let mut summary = TrainSummary {
        num_batches: 0,
        num_episodes: 0,
        num_steps: 0,
        best_mean_reward: f64::NEG_INFINITY,
        last_batch: None,
    };

    while summary.num_episodes < config.n_episodes {
        let trajectories = run_batch(
            learner,
            env,
            config.batch_size,
            rng,
            config.animate,
            logger,
        )?;
        summary.num_episodes += config.batch_size;
        summary.num_batches += 1;

        let stats = BatchStats::from_trajectories(
            &trajectories,
            summary.num_episodes,
            learner.hyperparameters(),
        )?;
        summary.num_steps += stats.num_steps;
        stats.log(&mut ScopedLogger::new(&mut *logger, "batch"))?;
        logger.flush()?;

        if stats.reward.mean >= summary.best_mean_reward {
            summary.best_mean_reward = stats.reward.mean;
            learner.checkpoint().save(run_dir.best_model())?;
        }
        summary.last_batch = Some(stats);

        learner.update_lr(learner.hyperparameters().lr_decay)?;
        let exploration_decay = match config.exploration_schedule {
            ExplorationSchedule::Linear => exploration_schedule(
                config.n_episodes,
                summary.num_episodes,
                config.batch_size,
            ),
            ExplorationSchedule::Exponential => learner.hyperparameters().exploration_decay,
        };
        learner.update_exploration(exploration_decay);
    }

    learner.checkpoint().save(run_dir.final_model())?;
    logger.flush()?;
    Ok(summary)
}
