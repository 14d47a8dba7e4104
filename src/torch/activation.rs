//! Activation functions
use serde::{Deserialize, Serialize};
use tch::Tensor;

/// Activation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    /// No transformation
    Identity,
    /// Rectified linear
    Relu,
    /// Sigmoid function
    Sigmoid,
    /// Hyperbolic tangent
    Tanh,
}

impl Default for Activation {
    fn default() -> Self {
        Self::Identity
    }
}

impl Activation {
    /// The activation function, or `None` for the identity.
    pub fn maybe_function(self) -> Option<fn(&Tensor) -> Tensor> {
        match self {
            Self::Identity => None,
            Self::Relu => Some(Tensor::relu),
            Self::Sigmoid => Some(Tensor::sigmoid),
            Self::Tanh => Some(Tensor::tanh),
        }
    }

    /// Apply the activation function to a tensor.
    pub fn forward(self, input: &Tensor) -> Tensor {
        match self.maybe_function() {
            Some(f) => f(input),
            None => input.shallow_clone(),
        }
    }
}
