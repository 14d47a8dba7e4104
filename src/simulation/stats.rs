//! Batch statistics
use super::Trajectory;
use crate::cacla::Hyperparameters;
use crate::logging::{LogError, ScopedLogger, StatsLogger};
use ndarray::Array1;
use ndarray_stats::{errors::MinMaxError, QuantileExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error computing summary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("no values to summarize")]
    Empty,
    #[error("values are not totally ordered (NaN)")]
    UndefinedOrder,
}

impl From<MinMaxError> for StatsError {
    fn from(err: MinMaxError) -> Self {
        match err {
            MinMaxError::EmptyInput => Self::Empty,
            MinMaxError::UndefinedOrder => Self::UndefinedOrder,
        }
    }
}

/// Minimum, maximum, mean and population standard deviation of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl Summary {
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Result<Self, StatsError> {
        let values: Array1<f64> = values.into_iter().collect();
        let min = *values.min()?;
        let max = *values.max()?;
        let mean = values.mean().ok_or(StatsError::Empty)?;
        Ok(Self {
            min,
            max,
            mean,
            std: values.std(0.0),
        })
    }

    /// Log the summary under `scope` as `min`, `max`, `mean` and `std`.
    pub fn log(&self, logger: &mut dyn StatsLogger, scope: &'static str) -> Result<(), LogError> {
        let mut logger = ScopedLogger::new(logger, scope);
        logger.log_scalar("min", self.min)?;
        logger.log_scalar("max", self.max)?;
        logger.log_scalar("mean", self.mean)?;
        logger.log_scalar("std", self.std)
    }
}

/// Aggregate statistics of one training batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Total episodes completed, including this batch.
    pub episode: usize,
    pub num_episodes: usize,
    pub num_steps: usize,
    /// Per-step rewards.
    pub reward: Summary,
    /// All elements of the actor outputs before exploration.
    pub raw_action: Summary,
    /// All elements of the observations the learner acted on.
    pub observation: Summary,
    /// Per-step mean squared difference between applied and raw actions.
    pub policy_loss: Summary,
    /// Per-step squared temporal difference error.
    pub value_loss: Summary,
    /// Fraction of steps with positive temporal difference error.
    pub acceptance_rate: f64,
    pub policy_lr: f64,
    pub value_lr: f64,
    pub exploration_factor: f64,
}

impl BatchStats {
    /// Summarize a batch of trajectories.
    ///
    /// # Args
    /// * `trajectories` - The episodes of the batch.
    /// * `episode` - Total episodes completed including this batch.
    /// * `hyperparameters` - Learner hyperparameters used for the batch.
    pub fn from_trajectories(
        trajectories: &[Trajectory],
        episode: usize,
        hyperparameters: &Hyperparameters,
    ) -> Result<Self, StatsError> {
        let steps = || trajectories.iter().flatten();
        let num_steps = steps().count();
        if num_steps == 0 {
            return Err(StatsError::Empty);
        }
        let num_accepted = steps().filter(|step| step.accepted).count();
        #[allow(clippy::cast_precision_loss)]
        let acceptance_rate = num_accepted as f64 / num_steps as f64;

        Ok(Self {
            episode,
            num_episodes: trajectories.len(),
            num_steps,
            reward: Summary::from_values(steps().map(|step| step.reward))?,
            raw_action: Summary::from_values(
                steps().flat_map(|step| step.raw_action.iter().copied()),
            )?,
            observation: Summary::from_values(
                steps().flat_map(|step| step.observation0.iter().copied()),
            )?,
            policy_loss: Summary::from_values(steps().map(|step| step.policy_error()))?,
            value_loss: Summary::from_values(steps().map(|step| step.squared_delta()))?,
            acceptance_rate,
            policy_lr: hyperparameters.alpha,
            value_lr: hyperparameters.beta,
            exploration_factor: hyperparameters.exploration_factor,
        })
    }

    /// Log the statistics with each summary in its own scope.
    pub fn log(&self, logger: &mut dyn StatsLogger) -> Result<(), LogError> {
        self.reward.log(logger, "reward")?;
        self.raw_action.log(logger, "action")?;
        self.observation.log(logger, "observation")?;
        self.policy_loss.log(logger, "policy_loss")?;
        self.value_loss.log(logger, "value_loss")?;
        logger.log_scalar("acceptance_rate", self.acceptance_rate)?;
        logger.log_scalar("policy_lr", self.policy_lr)?;
        logger.log_scalar("value_lr", self.value_lr)?;
        logger.log_scalar("exploration_factor", self.exploration_factor)?;
        #[allow(clippy::cast_precision_loss)]
        let episode = self.episode as f64;
        logger.log_scalar("episode", episode)
    }
}
