//! Trajectory steps
use ndarray::Array1;

/// Record of one step of a training episode.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryStep {
    /// Observation the actor and critic were evaluated on for this step.
    pub input: Array1<f64>,
    /// The learner's current observation once the step is resolved.
    ///
    /// Equal to `observation1` if the transition was accepted, otherwise to `input`.
    pub observation0: Array1<f64>,
    /// Observation returned by the environment step.
    pub observation1: Array1<f64>,
    /// Critic value of `input`.
    pub v0: f64,
    /// Critic value of `observation1`.
    pub v1: f64,
    /// Actor output before exploration noise.
    pub raw_action: Array1<f64>,
    /// Action applied by the environment.
    pub action: Array1<f64>,
    pub reward: f64,
    /// Temporal difference error `reward + gamma * v1 - v0`.
    pub delta: f64,
    /// Whether the transition was kept (`delta > 0`) or rolled back.
    pub accepted: bool,
    /// Whether this step ended the episode.
    pub done: bool,
}

impl TrajectoryStep {
    /// Mean squared difference between the applied action and the actor output.
    pub fn policy_error(&self) -> f64 {
        (&self.action - &self.raw_action)
            .mapv(|x| x * x)
            .mean()
            .unwrap_or(0.0)
    }

    /// Squared temporal difference error.
    pub fn squared_delta(&self) -> f64 {
        self.delta * self.delta
    }
}

/// The steps of one episode in order.
pub type Trajectory = Vec<TrajectoryStep>;
