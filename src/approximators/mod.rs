//! Function approximators for the actor and critic
#[cfg(test)]
pub mod testing;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// A trainable regression model from input vectors to output vectors.
///
/// Batches are matrices with one row per example.
pub trait FunctionApproximator {
    /// Snapshot of the trainable parameters; independent of any live model.
    type Weights: Serialize + DeserializeOwned;

    /// Input vector dimension.
    fn input_dim(&self) -> usize;

    /// Output vector dimension.
    fn output_dim(&self) -> usize;

    /// Predict the outputs for a batch of inputs.
    fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array2<f64>, FitError>;

    /// Fit the model toward the given targets.
    ///
    /// Makes one pass over the data taking one gradient step per minibatch of `batch_size` rows.
    ///
    /// # Returns
    /// The mean loss over minibatches, evaluated before each step.
    fn fit(
        &mut self,
        inputs: ArrayView2<f64>,
        targets: ArrayView2<f64>,
        batch_size: usize,
    ) -> Result<f64, FitError>;

    /// The current optimizer learning rate.
    fn learning_rate(&self) -> f64;

    /// Set the optimizer learning rate.
    fn set_learning_rate(&mut self, learning_rate: f64) -> Result<(), FitError>;

    /// Copy out the current parameters.
    fn weights(&self) -> Self::Weights;

    /// Replace the current parameters.
    fn load_weights(&mut self, weights: &Self::Weights) -> Result<(), FitError>;

    /// Predict the output for a single input.
    fn predict_one(&self, input: ArrayView1<f64>) -> Result<Array1<f64>, FitError> {
        let outputs = self.predict(input.insert_axis(Axis(0)))?;
        Ok(outputs.index_axis_move(Axis(0), 0))
    }

    /// Take a single gradient step toward `target` for one input.
    fn fit_one(
        &mut self,
        input: ArrayView1<f64>,
        target: ArrayView1<f64>,
    ) -> Result<f64, FitError> {
        self.fit(input.insert_axis(Axis(0)), target.insert_axis(Axis(0)), 1)
    }
}

/// Error evaluating or fitting a function approximator.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("{what} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("inputs have {inputs} rows but targets have {targets}")]
    BatchMismatch { inputs: usize, targets: usize },
    #[error("cannot fit an empty batch")]
    EmptyBatch,
    #[error("batch size must be positive")]
    ZeroBatchSize,
    #[error("loss is NaN")]
    NaNLoss,
    #[error("invalid learning rate {0}")]
    InvalidLearningRate(f64),
    #[error("weights do not match the model: {0}")]
    WeightsMismatch(String),
    #[error("array shape error {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error(transparent)]
    Torch(#[from] tch::TchError),
}

impl FitError {
    /// Check the shapes of a fit call.
    pub fn check_fit_shapes(
        inputs: &ArrayView2<f64>,
        targets: &ArrayView2<f64>,
        input_dim: usize,
        output_dim: usize,
        batch_size: usize,
    ) -> Result<(), Self> {
        Self::check_dim("inputs", inputs.ncols(), input_dim)?;
        Self::check_dim("targets", targets.ncols(), output_dim)?;
        if inputs.nrows() != targets.nrows() {
            return Err(Self::BatchMismatch {
                inputs: inputs.nrows(),
                targets: targets.nrows(),
            });
        }
        if inputs.nrows() == 0 {
            return Err(Self::EmptyBatch);
        }
        if batch_size == 0 {
            return Err(Self::ZeroBatchSize);
        }
        Ok(())
    }

    pub const fn check_dim(what: &'static str, actual: usize, expected: usize) -> Result<(), Self> {
        if actual == expected {
            Ok(())
        } else {
            Err(Self::DimensionMismatch {
                what,
                expected,
                actual,
            })
        }
    }

    pub fn check_learning_rate(learning_rate: f64) -> Result<(), Self> {
        if learning_rate.is_finite() && learning_rate >= 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidLearningRate(learning_rate))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingApproximator;
    use super::*;
    use ndarray::array;

    #[test]
    fn predict_one_takes_first_row() {
        let approx = RecordingApproximator::constant(2, array![0.5, -1.0]);
        let output = approx.predict_one(array![1.0, 2.0].view()).unwrap();
        assert_eq!(output, array![0.5, -1.0]);
    }

    #[test]
    fn fit_one_is_single_row_batch() {
        let mut approx = RecordingApproximator::constant(2, array![0.0]);
        approx
            .fit_one(array![1.0, 2.0].view(), array![3.0].view())
            .unwrap();
        assert_eq!(approx.fits.len(), 1);
        assert_eq!(approx.fits[0].inputs, array![[1.0, 2.0]]);
        assert_eq!(approx.fits[0].targets, array![[3.0]]);
        assert_eq!(approx.fits[0].batch_size, 1);
    }

    #[test]
    fn check_fit_shapes_errors() {
        let inputs = Array2::<f64>::zeros((2, 3));
        let targets = Array2::<f64>::zeros((1, 1));
        assert!(matches!(
            FitError::check_fit_shapes(&inputs.view(), &targets.view(), 3, 1, 1),
            Err(FitError::BatchMismatch {
                inputs: 2,
                targets: 1
            })
        ));
        assert!(matches!(
            FitError::check_fit_shapes(&inputs.view(), &targets.view(), 4, 1, 1),
            Err(FitError::DimensionMismatch {
                what: "inputs",
                ..
            })
        ));
        let empty = Array2::<f64>::zeros((0, 3));
        let empty_targets = Array2::<f64>::zeros((0, 1));
        assert!(matches!(
            FitError::check_fit_shapes(&empty.view(), &empty_targets.view(), 3, 1, 1),
            Err(FitError::EmptyBatch)
        ));
    }
}
