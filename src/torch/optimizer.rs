//! Torch optimizer configuration
use serde::{Deserialize, Serialize};
use tch::{nn::VarStore, COptimizer, TchError};

/// Configuration for the SGD optimizer.
///
/// The learning rate is not part of the configuration; it is owned by the learner and changes
/// over the course of training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdConfig {
    /// Momentum
    pub momentum: f64,
    /// Weight decay (L2 penalty)
    pub weight_decay: f64,
    /// Dampening for momentum
    pub dampening: f64,
    /// Enables Nesterov momentum
    pub nesterov: bool,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            momentum: 0.0,
            weight_decay: 0.0,
            dampening: 0.0,
            nesterov: false,
        }
    }
}

impl SgdConfig {
    /// Build an optimizer for the trainable variables of `vs`.
    pub fn build_optimizer(
        &self,
        vs: &VarStore,
        learning_rate: f64,
    ) -> Result<COptimizer, TchError> {
        let mut optimizer = COptimizer::sgd(
            learning_rate,
            self.momentum,
            self.dampening,
            self.weight_decay,
            self.nesterov,
        )?;
        for var in vs.trainable_variables() {
            optimizer.add_parameters(&var, 0)?;
        }
        Ok(optimizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{Device, Kind};

    #[test]
    fn sgd_step_descends() {
        let vs = VarStore::new(Device::Cpu);
        let x = vs.root().zeros("x", &[1]);
        let mut optimizer = SgdConfig::default().build_optimizer(&vs, 0.1).unwrap();

        // loss = (x - 1)^2, gradient at 0 is -2
        let loss = (&x - 1.0).square().sum(Kind::Float);
        optimizer.zero_grad().unwrap();
        loss.backward();
        optimizer.step().unwrap();
        let value = x.double_value(&[0]);
        assert!((value - 0.2).abs() < 1e-6, "{}", value);
    }

    #[test]
    fn learning_rate_change_applies() {
        let vs = VarStore::new(Device::Cpu);
        let x = vs.root().zeros("x", &[1]);
        let mut optimizer = SgdConfig::default().build_optimizer(&vs, 0.1).unwrap();
        optimizer.set_learning_rate(0.0).unwrap();

        let loss = (&x - 1.0).square().sum(Kind::Float);
        optimizer.zero_grad().unwrap();
        loss.backward();
        optimizer.step().unwrap();
        assert_eq!(x.double_value(&[0]), 0.0);
    }
}
