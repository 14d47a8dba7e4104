//! Learner checkpoints
use super::Hyperparameters;
use crate::torch::RegressorWeights;
use serde::{Deserialize, Serialize};

/// Snapshot of a [`Cacla`](super::Cacla) learner.
///
/// Owns copies of the weights; independent of the live approximators.
/// Saved and loaded with [`SaveLoad`](crate::utils::save::SaveLoad).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaclaCheckpoint<AW, CW> {
    pub hyperparameters: Hyperparameters,
    pub actor: AW,
    pub critic: CW,
}

/// Checkpoint of a learner with MLP actor and critic.
pub type MlpCheckpoint = CaclaCheckpoint<RegressorWeights, RegressorWeights>;
