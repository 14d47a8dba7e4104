//! Robot arm environments
mod planar_arm;
#[cfg(test)]
pub mod testing;

pub use planar_arm::{PlanarArm, PlanarArmConfig};

use crate::spaces::BoxSpace;
use ndarray::Array1;
use thiserror::Error;

/// Environment observation vector.
pub type Observation = Array1<f64>;
/// Environment action vector: target joint positions (absolute) or joint offsets (relative).
pub type Action = Array1<f64>;

/// Description of an environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmStep {
    /// The observation after the step.
    pub observation: Observation,
    /// The reward for this transition.
    pub reward: f64,
    /// Whether this step ends the episode.
    pub done: bool,
    /// Additional information about the step.
    pub info: StepInfo,
}

/// Additional information reported by [`ArmEnvironment::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// The action that was actually applied.
    ///
    /// Differs from the requested action when the simulator clamps or otherwise modifies it.
    /// Expressed in the same mode (absolute or relative) as the request.
    pub actual_action: Action,
    /// Distance from the end effector to the target after the step.
    pub distance: f64,
    /// Whether the end effector is within the goal tolerance of the target.
    pub reached: bool,
}

/// A robot arm simulator.
///
/// Every call may block on the simulator.
/// Any error is a simulator fault; callers are not expected to recover from it.
pub trait ArmEnvironment {
    /// Short name used to label run directories.
    fn name(&self) -> &str;

    /// Space containing all possible observations.
    fn observation_space(&self) -> BoxSpace;

    /// Space of joint positions. Absolute actions are elements of this space.
    fn action_space(&self) -> BoxSpace;

    /// Upper bound on the end effector to target distance.
    fn max_distance(&self) -> f64;

    /// Current distance from the end effector to the target.
    fn distance(&self) -> f64;

    /// Start a new episode and return the initial observation.
    fn reset(&mut self) -> Result<Observation, EnvError>;

    /// Apply an action.
    ///
    /// # Args
    /// * `action` - Target joint positions if `absolute` is true, otherwise joint offsets.
    /// * `absolute` - Whether `action` is absolute or relative to the current joint positions.
    fn step(&mut self, action: &Action, absolute: bool) -> Result<ArmStep, EnvError>;

    /// Current joint positions.
    fn joint_positions(&self) -> Result<Array1<f64>, EnvError>;

    /// Move the joints directly to the given positions.
    ///
    /// Only the joint positions are restored. Other simulator state, like the episode step
    /// counter, is unaffected.
    fn set_joint_positions(&mut self, positions: &Array1<f64>) -> Result<(), EnvError>;

    /// Display the current state.
    fn render(&mut self) -> Result<(), EnvError>;
}

impl<E: ArmEnvironment + ?Sized> ArmEnvironment for Box<E> {
    fn name(&self) -> &str {
        E::name(self)
    }
    fn observation_space(&self) -> BoxSpace {
        E::observation_space(self)
    }
    fn action_space(&self) -> BoxSpace {
        E::action_space(self)
    }
    fn max_distance(&self) -> f64 {
        E::max_distance(self)
    }
    fn distance(&self) -> f64 {
        E::distance(self)
    }
    fn reset(&mut self) -> Result<Observation, EnvError> {
        E::reset(self)
    }
    fn step(&mut self, action: &Action, absolute: bool) -> Result<ArmStep, EnvError> {
        E::step(self, action, absolute)
    }
    fn joint_positions(&self) -> Result<Array1<f64>, EnvError> {
        E::joint_positions(self)
    }
    fn set_joint_positions(&mut self, positions: &Array1<f64>) -> Result<(), EnvError> {
        E::set_joint_positions(self, positions)
    }
    fn render(&mut self) -> Result<(), EnvError> {
        E::render(self)
    }
}

/// Simulator fault.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("simulator disconnected: {0}")]
    Disconnected(String),
    #[error("{what} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{what} contains non-finite values")]
    NonFinite { what: &'static str },
    #[error("step called before reset")]
    NotReset,
    #[error("render error {0}")]
    Io(#[from] std::io::Error),
}

impl EnvError {
    /// Check that a vector has the expected dimension and finite entries.
    pub fn check_vector(
        what: &'static str,
        value: &Array1<f64>,
        expected: usize,
    ) -> Result<(), Self> {
        if value.len() != expected {
            return Err(Self::DimensionMismatch {
                what,
                expected,
                actual: value.len(),
            });
        }
        if !value.iter().all(|x| x.is_finite()) {
            return Err(Self::NonFinite { what });
        }
        Ok(())
    }
}

/// Error building an environment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildEnvError {
    #[error("invalid environment configuration: {0}")]
    InvalidConfig(String),
}
