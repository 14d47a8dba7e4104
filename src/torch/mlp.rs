//! Multi-layer perceptron
use super::Activation;
use serde::{Deserialize, Serialize};
use std::iter;
use tch::{
    nn::{self, Linear, Module, Path},
    Tensor,
};

/// Configuration for the [`Mlp`] module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlpConfig {
    /// Sizes of the hidden layers
    pub hidden_sizes: Vec<usize>,
    /// Activation function between hidden layers.
    pub activation: Activation,
    /// Activation function on the output.
    pub output_activation: Activation,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden_sizes: vec![100],
            activation: Activation::Sigmoid,
            output_activation: Activation::Identity,
        }
    }
}

impl MlpConfig {
    pub fn build_module(&self, vs: &Path, in_dim: usize, out_dim: usize) -> Mlp {
        Mlp::new(vs, in_dim, out_dim, self)
    }
}

/// Multi-layer perceptron
#[derive(Debug)]
pub struct Mlp {
    layers: Vec<Linear>,
    activation: Activation,
    output_activation: Activation,
}

impl Mlp {
    pub fn new(vs: &Path, in_dim: usize, out_dim: usize, config: &MlpConfig) -> Self {
        let in_dims = iter::once(&in_dim).chain(&config.hidden_sizes);
        let out_dims = config.hidden_sizes.iter().chain(iter::once(&out_dim));

        #[allow(clippy::cast_possible_wrap)]
        let layers: Vec<_> = in_dims
            .zip(out_dims)
            .enumerate()
            .map(|(i, (in_, out_))| {
                nn::linear(
                    vs / format!("layer_{}", i),
                    *in_ as i64,
                    *out_ as i64,
                    nn::LinearConfig::default(),
                )
            })
            .collect();

        Self {
            layers,
            activation: config.activation,
            output_activation: config.output_activation,
        }
    }

    /// Number of linear layers.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }
}

impl Module for Mlp {
    fn forward(&self, input: &Tensor) -> Tensor {
        let mut hidden = input.shallow_clone();
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            hidden = layer.forward(&hidden);
            if i < last {
                hidden = self.activation.forward(&hidden);
            }
        }
        self.output_activation.forward(&hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{Device, Kind};

    #[test]
    fn forward_batch_shape() {
        let vs = nn::VarStore::new(Device::Cpu);
        let mlp = MlpConfig::default().build_module(&vs.root(), 3, 2);
        let input = Tensor::rand(&[4, 3], (Kind::Float, Device::Cpu));
        let output = mlp.forward(&input);
        assert_eq!(output.size(), vec![4, 2]);
    }

    #[test]
    fn layer_count_and_variables() {
        let vs = nn::VarStore::new(Device::Cpu);
        let config = MlpConfig {
            hidden_sizes: vec![8, 5],
            ..MlpConfig::default()
        };
        let mlp = config.build_module(&vs.root(), 3, 1);
        assert_eq!(mlp.num_layers(), 3);
        // weight and bias per layer
        assert_eq!(vs.trainable_variables().len(), 6);
    }

    #[test]
    fn no_hidden_layers_is_linear() {
        let vs = nn::VarStore::new(Device::Cpu);
        let config = MlpConfig {
            hidden_sizes: vec![],
            ..MlpConfig::default()
        };
        let mlp = config.build_module(&vs.root(), 2, 1);
        assert_eq!(mlp.num_layers(), 1);
        let zero = Tensor::zeros(&[1, 2], (Kind::Float, Device::Cpu));
        let one = Tensor::ones(&[1, 2], (Kind::Float, Device::Cpu));
        let two = &one * 2.0;
        // f(2x) - f(x) == f(x) - f(0) for an affine map
        let d1 = mlp.forward(&one) - mlp.forward(&zero);
        let d2 = mlp.forward(&two) - mlp.forward(&one);
        assert!((d1 - d2).abs().max().double_value(&[]) < 1e-5);
    }

    #[test]
    fn sigmoid_output_bounded() {
        let vs = nn::VarStore::new(Device::Cpu);
        let config = MlpConfig {
            output_activation: Activation::Sigmoid,
            ..MlpConfig::default()
        };
        let mlp = config.build_module(&vs.root(), 3, 4);
        let input = Tensor::randn(&[10, 3], (Kind::Float, Device::Cpu)) * 100.0;
        let output = mlp.forward(&input);
        assert!(output.min().double_value(&[]) >= 0.0);
        assert!(output.max().double_value(&[]) <= 1.0);
    }
}
