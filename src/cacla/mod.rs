//! Continuous Actor-Critic Learning Automaton
mod checkpoint;
mod config;

pub use checkpoint::{CaclaCheckpoint, MlpCheckpoint};
pub use config::CaclaConfig;

use crate::approximators::{FitError, FunctionApproximator};
use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CACLA learning hyperparameters.
///
/// The learning rates and the exploration factor change over the course of training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Actor learning rate.
    pub alpha: f64,
    /// Critic learning rate.
    pub beta: f64,
    /// Discount factor.
    pub gamma: f64,
    /// Multiplicative learning rate decay applied after every batch.
    pub lr_decay: f64,
    /// Per-batch exploration decay used by the exponential exploration schedule.
    pub exploration_decay: f64,
    /// Standard deviation of the Gaussian exploration noise.
    pub exploration_factor: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            alpha: 0.0005,
            beta: 0.0005,
            gamma: 0.0,
            lr_decay: 1.0,
            exploration_decay: 0.997,
            exploration_factor: 0.1,
        }
    }
}

/// Invalid exploration noise.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SampleError {
    #[error("exploration std must be finite and non-negative, got {0}")]
    InvalidExploration(f64),
}

/// Add independent Gaussian noise with standard deviation `exploration` to each action dimension.
///
/// Returns the action unchanged, without drawing from `rng`, when `exploration` is zero.
pub fn sample<R: Rng + ?Sized>(
    action: &Array1<f64>,
    exploration: f64,
    rng: &mut R,
) -> Result<Array1<f64>, SampleError> {
    if !exploration.is_finite() || exploration < 0.0 {
        return Err(SampleError::InvalidExploration(exploration));
    }
    if exploration == 0.0 {
        return Ok(action.clone());
    }
    let noise =
        Normal::new(0.0, exploration).map_err(|_| SampleError::InvalidExploration(exploration))?;
    Ok(action.mapv(|a| a + noise.sample(rng)))
}

/// CACLA learner: an actor, a critic, and the hyperparameters that drive their updates.
#[derive(Debug)]
pub struct Cacla<A, C> {
    actor: A,
    critic: C,
    hyperparameters: Hyperparameters,
}

impl<A, C> Cacla<A, C>
where
    A: FunctionApproximator,
    C: FunctionApproximator,
{
    /// Create a learner, setting the actor and critic learning rates to `alpha` and `beta`.
    pub fn new(
        mut actor: A,
        mut critic: C,
        hyperparameters: Hyperparameters,
    ) -> Result<Self, FitError> {
        FitError::check_dim("critic output", critic.output_dim(), 1)?;
        FitError::check_dim("critic input", critic.input_dim(), actor.input_dim())?;
        actor.set_learning_rate(hyperparameters.alpha)?;
        critic.set_learning_rate(hyperparameters.beta)?;
        Ok(Self {
            actor,
            critic,
            hyperparameters,
        })
    }

    pub const fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub const fn exploration_factor(&self) -> f64 {
        self.hyperparameters.exploration_factor
    }

    pub const fn actor(&self) -> &A {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut A {
        &mut self.actor
    }

    pub const fn critic(&self) -> &C {
        &self.critic
    }

    pub fn critic_mut(&mut self) -> &mut C {
        &mut self.critic
    }

    /// Observation dimension expected by both approximators.
    pub fn observation_dim(&self) -> usize {
        self.actor.input_dim()
    }

    /// Action dimension produced by the actor.
    pub fn action_dim(&self) -> usize {
        self.actor.output_dim()
    }

    /// The actor's action for an observation.
    pub fn act(&self, observation: &Array1<f64>) -> Result<Array1<f64>, FitError> {
        self.actor.predict_one(observation.view())
    }

    /// The critic's value estimate for an observation.
    pub fn value(&self, observation: &Array1<f64>) -> Result<f64, FitError> {
        Ok(self.critic.predict_one(observation.view())?[0])
    }

    /// Perturb an action with the current exploration noise.
    pub fn explore<R: Rng + ?Sized>(
        &self,
        action: &Array1<f64>,
        rng: &mut R,
    ) -> Result<Array1<f64>, SampleError> {
        sample(action, self.hyperparameters.exploration_factor, rng)
    }

    /// Scale both learning rates by `decay` and apply them to the optimizers.
    pub fn update_lr(&mut self, decay: f64) -> Result<(), FitError> {
        self.hyperparameters.alpha *= decay;
        self.hyperparameters.beta *= decay;
        self.actor.set_learning_rate(self.hyperparameters.alpha)?;
        self.critic.set_learning_rate(self.hyperparameters.beta)
    }

    /// Scale the exploration factor by `decay`.
    pub fn update_exploration(&mut self, decay: f64) {
        self.hyperparameters.exploration_factor *= decay;
    }

    /// Snapshot the hyperparameters and the approximator weights.
    pub fn checkpoint(&self) -> CaclaCheckpoint<A::Weights, C::Weights> {
        CaclaCheckpoint {
            hyperparameters: self.hyperparameters,
            actor: self.actor.weights(),
            critic: self.critic.weights(),
        }
    }

    /// Restore a snapshot created by [`Cacla::checkpoint`].
    pub fn load_checkpoint(
        &mut self,
        checkpoint: &CaclaCheckpoint<A::Weights, C::Weights>,
    ) -> Result<(), FitError> {
        self.actor.load_weights(&checkpoint.actor)?;
        self.critic.load_weights(&checkpoint.critic)?;
        self.actor.set_learning_rate(checkpoint.hyperparameters.alpha)?;
        self.critic.set_learning_rate(checkpoint.hyperparameters.beta)?;
        self.hyperparameters = checkpoint.hyperparameters;
        Ok(())
    }
}
