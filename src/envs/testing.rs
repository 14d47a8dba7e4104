//! Environment testing utilities
use super::{Action, ArmEnvironment, ArmStep, EnvError, Observation, StepInfo};
use crate::spaces::BoxSpace;
use ndarray::{concatenate, Array1, Axis};

/// Deterministic arm that records the calls made to it.
///
/// Observations are `[step counter, joint positions...]` so that a rollback of the joints
/// is visible while the step counter keeps advancing.
/// Every step gives the same reward and the episode ends after `episode_len` steps.
/// Absolute actions are clamped to `[-action_limit, action_limit]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedArm {
    pub episode_len: u64,
    pub reward: f64,
    pub action_limit: f64,
    pub joints: Array1<f64>,
    /// Steps taken in the current episode
    pub steps: u64,
    pub resets: usize,
    pub renders: usize,
    /// Every action passed to `step`
    pub actions: Vec<Array1<f64>>,
    /// Every value passed to `set_joint_positions`
    pub restores: Vec<Array1<f64>>,
}

impl ScriptedArm {
    pub fn new(num_joints: usize, episode_len: u64, reward: f64) -> Self {
        Self {
            episode_len,
            reward,
            action_limit: f64::INFINITY,
            joints: Array1::zeros(num_joints),
            steps: 0,
            resets: 0,
            renders: 0,
            actions: Vec::new(),
            restores: Vec::new(),
        }
    }

    pub fn observe(&self) -> Observation {
        #[allow(clippy::cast_precision_loss)]
        let counter = Array1::from_elem(1, self.steps as f64);
        concatenate![Axis(0), counter, self.joints]
    }
}

impl ArmEnvironment for ScriptedArm {
    fn name(&self) -> &str {
        "ScriptedArm"
    }

    fn observation_space(&self) -> BoxSpace {
        BoxSpace::unbounded(self.joints.len() + 1)
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::uniform(self.joints.len(), -self.action_limit, self.action_limit)
    }

    fn max_distance(&self) -> f64 {
        1.0
    }

    fn distance(&self) -> f64 {
        self.joints.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.resets += 1;
        self.steps = 0;
        self.joints.fill(0.0);
        Ok(self.observe())
    }

    fn step(&mut self, action: &Action, absolute: bool) -> Result<ArmStep, EnvError> {
        EnvError::check_vector("action", action, self.joints.len())?;
        self.actions.push(action.clone());
        let target = if absolute {
            action.clone()
        } else {
            &self.joints + action
        };
        self.joints = self.action_space().clip(&target);
        self.steps += 1;
        Ok(ArmStep {
            observation: self.observe(),
            reward: self.reward,
            done: self.steps >= self.episode_len,
            info: StepInfo {
                actual_action: self.joints.clone(),
                distance: self.distance(),
                reached: false,
            },
        })
    }

    fn joint_positions(&self) -> Result<Array1<f64>, EnvError> {
        Ok(self.joints.clone())
    }

    fn set_joint_positions(&mut self, positions: &Array1<f64>) -> Result<(), EnvError> {
        self.restores.push(positions.clone());
        self.joints = positions.clone();
        Ok(())
    }

    fn render(&mut self) -> Result<(), EnvError> {
        self.renders += 1;
        Ok(())
    }
}
