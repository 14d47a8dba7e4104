//! Learner configuration
use super::{Cacla, Hyperparameters};
use crate::approximators::FitError;
use crate::envs::ArmEnvironment;
use crate::torch::{MlpRegressor, MlpRegressorConfig};
use serde::{Deserialize, Serialize};
use tch::Device;

/// Configuration for a [`Cacla`] learner with MLP actor and critic.
/// Both networks default to one hidden layer of 100 sigmoid units with a linear output.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaclaConfig {
    pub hyperparameters: Hyperparameters,
    pub actor: MlpRegressorConfig,
    pub critic: MlpRegressorConfig,
}

impl CaclaConfig {
    /// Build a learner for the given observation and action dimensions.
    pub fn build(
        &self,
        observation_dim: usize,
        action_dim: usize,
        device: Device,
    ) -> Result<Cacla<MlpRegressor, MlpRegressor>, FitError> {
        let actor = self.actor.build_regressor(
            observation_dim,
            action_dim,
            self.hyperparameters.alpha,
            device,
        )?;
        let critic = self
            .critic
            .build_regressor(observation_dim, 1, self.hyperparameters.beta, device)?;
        Cacla::new(actor, critic, self.hyperparameters)
    }

    /// Build a learner sized for an environment.
    pub fn build_for_env<E: ArmEnvironment + ?Sized>(
        &self,
        env: &E,
        device: Device,
    ) -> Result<Cacla<MlpRegressor, MlpRegressor>, FitError> {
        self.build(
            env.observation_space().dim(),
            env.action_space().dim(),
            device,
        )
    }
}
