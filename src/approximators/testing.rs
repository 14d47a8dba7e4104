//! Function approximator testing utilities
use super::{FitError, FunctionApproximator};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::fmt;

/// Arguments of one [`FunctionApproximator::fit`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct FitCall {
    pub inputs: Array2<f64>,
    pub targets: Array2<f64>,
    pub batch_size: usize,
}

/// Approximator with a fixed prediction function that records every fit.
///
/// Fitting never changes the predictions.
pub struct RecordingApproximator {
    pub input_dim: usize,
    pub output_dim: usize,
    pub predictor: Box<dyn Fn(ArrayView1<f64>) -> Array1<f64>>,
    pub fits: Vec<FitCall>,
    pub learning_rate: f64,
    /// Stand-in parameters; only touched by `weights` and `load_weights`.
    pub parameters: Vec<f64>,
}

impl fmt::Debug for RecordingApproximator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RecordingApproximator")
            .field("input_dim", &self.input_dim)
            .field("output_dim", &self.output_dim)
            .field("fits", &self.fits.len())
            .field("learning_rate", &self.learning_rate)
            .finish_non_exhaustive()
    }
}

impl RecordingApproximator {
    /// Approximator that always predicts `output`.
    pub fn constant(input_dim: usize, output: Array1<f64>) -> Self {
        let output_dim = output.len();
        Self::from_fn(input_dim, output_dim, move |_| output.clone())
    }

    /// Approximator predicting with the given function.
    pub fn from_fn<F>(input_dim: usize, output_dim: usize, predictor: F) -> Self
    where
        F: Fn(ArrayView1<f64>) -> Array1<f64> + 'static,
    {
        Self {
            input_dim,
            output_dim,
            predictor: Box::new(predictor),
            fits: Vec::new(),
            learning_rate: 0.0,
            parameters: Vec::new(),
        }
    }
}

impl FunctionApproximator for RecordingApproximator {
    type Weights = Vec<f64>;

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array2<f64>, FitError> {
        FitError::check_dim("inputs", inputs.ncols(), self.input_dim)?;
        let mut outputs = Array2::zeros((inputs.nrows(), self.output_dim));
        for (input, mut output) in inputs.outer_iter().zip(outputs.outer_iter_mut()) {
            output.assign(&(self.predictor)(input));
        }
        Ok(outputs)
    }

    fn fit(
        &mut self,
        inputs: ArrayView2<f64>,
        targets: ArrayView2<f64>,
        batch_size: usize,
    ) -> Result<f64, FitError> {
        FitError::check_fit_shapes(&inputs, &targets, self.input_dim, self.output_dim, batch_size)?;
        let loss = (&self.predict(inputs.view())? - &targets)
            .mapv(|x| x * x)
            .mean()
            .unwrap_or(0.0);
        self.fits.push(FitCall {
            inputs: inputs.to_owned(),
            targets: targets.to_owned(),
            batch_size,
        });
        Ok(loss)
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, learning_rate: f64) -> Result<(), FitError> {
        FitError::check_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    fn weights(&self) -> Self::Weights {
        self.parameters.clone()
    }

    fn load_weights(&mut self, weights: &Self::Weights) -> Result<(), FitError> {
        self.parameters = weights.clone();
        Ok(())
    }
}
