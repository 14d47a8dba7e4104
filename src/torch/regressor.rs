//! Multi-layer perceptron regression trained by SGD
use super::{Mlp, MlpConfig, SgdConfig, TensorData};
use crate::approximators::{FitError, FunctionApproximator};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;
use tch::{
    nn::{Module, VarStore},
    COptimizer, Device, Kind, Reduction, Tensor,
};

/// Named parameter tensors of an [`MlpRegressor`].
pub type RegressorWeights = BTreeMap<String, TensorData>;

/// Configuration for [`MlpRegressor`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlpRegressorConfig {
    pub network: MlpConfig,
    pub optimizer: SgdConfig,
}

impl MlpRegressorConfig {
    pub fn build_regressor(
        &self,
        input_dim: usize,
        output_dim: usize,
        learning_rate: f64,
        device: Device,
    ) -> Result<MlpRegressor, FitError> {
        FitError::check_learning_rate(learning_rate)?;
        let vs = VarStore::new(device);
        let mlp = self.network.build_module(&vs.root(), input_dim, output_dim);
        let optimizer = self.optimizer.build_optimizer(&vs, learning_rate)?;
        Ok(MlpRegressor {
            vs,
            mlp,
            optimizer,
            learning_rate,
            input_dim,
            output_dim,
            device,
        })
    }
}

/// Multi-layer perceptron with a mean squared error loss and an SGD optimizer.
///
/// Computation is done in single precision.
pub struct MlpRegressor {
    vs: VarStore,
    mlp: Mlp,
    optimizer: COptimizer,
    learning_rate: f64,
    input_dim: usize,
    output_dim: usize,
    device: Device,
}

impl fmt::Debug for MlpRegressor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MlpRegressor")
            .field("mlp", &self.mlp)
            .field("learning_rate", &self.learning_rate)
            .field("input_dim", &self.input_dim)
            .field("output_dim", &self.output_dim)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl MlpRegressor {
    fn to_tensor(&self, array: ArrayView2<f64>) -> Tensor {
        let (rows, cols) = array.dim();
        #[allow(clippy::cast_possible_truncation)]
        let data: Vec<f32> = array.iter().map(|&x| x as f32).collect();
        #[allow(clippy::cast_possible_wrap)]
        let shape = [rows as i64, cols as i64];
        Tensor::of_slice(&data).reshape(&shape).to_device(self.device)
    }
}

/// Copy a matrix tensor into an array.
fn to_array(tensor: &Tensor) -> Result<Array2<f64>, FitError> {
    let size = tensor.size();
    let (rows, cols) = match *size.as_slice() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        [rows, cols] => (rows as usize, cols as usize),
        _ => {
            return Err(FitError::DimensionMismatch {
                what: "tensor rank",
                expected: 2,
                actual: size.len(),
            })
        }
    };
    let tensor = tensor
        .to_kind(Kind::Double)
        .to_device(Device::Cpu)
        .contiguous();
    let mut data = vec![0.0; rows * cols];
    tensor.copy_data(&mut data, rows * cols);
    Ok(Array2::from_shape_vec((rows, cols), data)?)
}

impl FunctionApproximator for MlpRegressor {
    type Weights = RegressorWeights;

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array2<f64>, FitError> {
        FitError::check_dim("inputs", inputs.ncols(), self.input_dim)?;
        let input = self.to_tensor(inputs);
        let output = tch::no_grad(|| self.mlp.forward(&input));
        to_array(&output)
    }

    fn fit(
        &mut self,
        inputs: ArrayView2<f64>,
        targets: ArrayView2<f64>,
        batch_size: usize,
    ) -> Result<f64, FitError> {
        FitError::check_fit_shapes(&inputs, &targets, self.input_dim, self.output_dim, batch_size)?;
        let num_rows = inputs.nrows();
        let inputs = self.to_tensor(inputs);
        let targets = self.to_tensor(targets);

        let mut total_loss = 0.0;
        let mut num_batches = 0_u32;
        for start in (0..num_rows).step_by(batch_size) {
            let len = batch_size.min(num_rows - start);
            #[allow(clippy::cast_possible_wrap)]
            let (start, len) = (start as i64, len as i64);
            let batch_inputs = inputs.narrow(0, start, len);
            let batch_targets = targets.narrow(0, start, len);

            let loss = self
                .mlp
                .forward(&batch_inputs)
                .mse_loss(&batch_targets, Reduction::Mean);
            let loss_value = loss.double_value(&[]);
            if loss_value.is_nan() {
                return Err(FitError::NaNLoss);
            }
            self.optimizer.zero_grad()?;
            loss.backward();
            self.optimizer.step()?;

            total_loss += loss_value;
            num_batches += 1;
        }
        Ok(total_loss / f64::from(num_batches))
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, learning_rate: f64) -> Result<(), FitError> {
        FitError::check_learning_rate(learning_rate)?;
        self.optimizer.set_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    fn weights(&self) -> Self::Weights {
        self.vs
            .variables()
            .iter()
            .map(|(name, tensor)| (name.clone(), TensorData::from(tensor)))
            .collect()
    }

    /// Replace the parameters.
    ///
    /// All tensors are checked before any is copied so on error the parameters are unchanged.
    fn load_weights(&mut self, weights: &Self::Weights) -> Result<(), FitError> {
        let mut variables = self.vs.variables();
        if variables.len() != weights.len() {
            return Err(FitError::WeightsMismatch(format!(
                "expected {} tensors, got {}",
                variables.len(),
                weights.len()
            )));
        }

        let mut sources = Vec::with_capacity(variables.len());
        for (name, var) in &variables {
            let data = weights
                .get(name)
                .ok_or_else(|| FitError::WeightsMismatch(format!("missing tensor {:?}", name)))?;
            if data.shape != var.size() {
                return Err(FitError::WeightsMismatch(format!(
                    "tensor {:?} has shape {:?}, expected {:?}",
                    name,
                    data.shape,
                    var.size()
                )));
            }
            if data.data.len() != data.numel() * data.kind.elt_size_in_bytes() {
                return Err(FitError::WeightsMismatch(format!(
                    "tensor {:?} has {} data bytes for shape {:?}",
                    name,
                    data.data.len(),
                    data.shape
                )));
            }
            let source = Tensor::try_from(data)
                .map_err(|err| FitError::WeightsMismatch(err.to_string()))?;
            sources.push((name.clone(), source.to_device(self.device)));
        }

        tch::no_grad(|| {
            for (name, source) in &sources {
                if let Some(var) = variables.get_mut(name) {
                    var.copy_(source);
                }
            }
        });
        Ok(())
    }
}
