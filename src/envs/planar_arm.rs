//! Planar robot arm environment
use super::{Action, ArmEnvironment, ArmStep, BuildEnvError, EnvError, Observation, StepInfo};
use crate::spaces::BoxSpace;
use crate::utils::fmt::Vector;
use crate::Prng;
use ndarray::{s, Array1};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use yansi::Paint;

/// Configuration for the [`PlanarArm`] environment.
///
/// The default link lengths approximate the humerus, ulna and gripper of a Lynxmotion AL5D.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanarArmConfig {
    /// Length of each link from the base outward (m).
    pub link_lengths: Vec<f64>,
    /// Maximum absolute joint angle (rad). Every joint is limited to `[-joint_limit, joint_limit]`.
    pub joint_limit: f64,
    /// Maximum change of any joint angle in a single step (rad).
    pub max_joint_step: f64,
    /// The episode ends once the end effector is within this distance of the target (m).
    pub goal_tolerance: f64,
    /// Maximum number of steps in an episode.
    pub max_steps: u64,
}

impl Default for PlanarArmConfig {
    fn default() -> Self {
        Self {
            link_lengths: vec![0.146, 0.187, 0.1],
            joint_limit: 0.5 * PI,
            max_joint_step: 0.2,
            goal_tolerance: 0.01,
            max_steps: 50,
        }
    }
}

impl PlanarArmConfig {
    /// Build an environment instance.
    ///
    /// # Args
    /// * `seed` - Seed for the target sampling.
    pub fn build_env(&self, seed: u64) -> Result<PlanarArm, BuildEnvError> {
        PlanarArm::new(self.clone(), seed)
    }

    fn validate(&self) -> Result<(), BuildEnvError> {
        let invalid = |message: &str| Err(BuildEnvError::InvalidConfig(message.into()));
        if self.link_lengths.is_empty() {
            return invalid("arm must have at least one link");
        }
        if !self.link_lengths.iter().all(|l| l.is_finite() && *l > 0.0) {
            return invalid("link lengths must be positive");
        }
        if !(self.joint_limit > 0.0 && self.joint_limit <= PI) {
            return invalid("joint limit must be in (0, pi]");
        }
        if !(self.max_joint_step > 0.0) {
            return invalid("max joint step must be positive");
        }
        if !(self.goal_tolerance > 0.0) {
            return invalid("goal tolerance must be positive");
        }
        if self.max_steps == 0 {
            return invalid("max steps must be positive");
        }
        Ok(())
    }
}

/// Planar arm of revolute joints reaching for a target point.
///
/// # Observation
/// `[joint angles..., target x, target y, end effector x, end effector y]`
///
/// # Action
/// Target joint angles (absolute) or joint angle offsets (relative).
/// Each joint moves at most `max_joint_step` per step and stays within the joint limits;
/// the resulting motion is reported as the actual action.
///
/// # Reward
/// The negative distance between the end effector and the target.
///
/// Targets are sampled by placing the arm in a uniformly random joint configuration
/// so every target is reachable.
#[derive(Debug, Clone)]
pub struct PlanarArm {
    config: PlanarArmConfig,
    reach: f64,
    joints: Array1<f64>,
    target: [f64; 2],
    steps: u64,
    in_episode: bool,
    rng: Prng,
}

impl PlanarArm {
    pub fn new(config: PlanarArmConfig, seed: u64) -> Result<Self, BuildEnvError> {
        config.validate()?;
        let reach = config.link_lengths.iter().sum();
        let joints = Array1::zeros(config.link_lengths.len());
        let target = forward_kinematics(&config.link_lengths, &joints);
        Ok(Self {
            config,
            reach,
            joints,
            target,
            steps: 0,
            in_episode: false,
            rng: Prng::seed_from_u64(seed),
        })
    }

    pub fn num_joints(&self) -> usize {
        self.config.link_lengths.len()
    }

    /// Current target position.
    pub const fn target(&self) -> [f64; 2] {
        self.target
    }

    /// Current end effector position.
    pub fn end_effector(&self) -> [f64; 2] {
        forward_kinematics(&self.config.link_lengths, &self.joints)
    }

    /// Number of steps taken in the current episode.
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    fn joint_space(&self) -> BoxSpace {
        BoxSpace::uniform(
            self.num_joints(),
            -self.config.joint_limit,
            self.config.joint_limit,
        )
    }

    fn observe(&self) -> Observation {
        let n = self.num_joints();
        let [tip_x, tip_y] = self.end_effector();
        let mut observation = Array1::zeros(n + 4);
        observation.slice_mut(s![..n]).assign(&self.joints);
        observation[n] = self.target[0];
        observation[n + 1] = self.target[1];
        observation[n + 2] = tip_x;
        observation[n + 3] = tip_y;
        observation
    }
}

/// End effector position of a planar chain of revolute joints rooted at the origin.
///
/// Each joint angle is relative to the previous link; the first is relative to the x axis.
pub fn forward_kinematics(link_lengths: &[f64], joints: &Array1<f64>) -> [f64; 2] {
    let mut angle = 0.0;
    let mut position = [0.0, 0.0];
    for (length, joint) in link_lengths.iter().zip(joints) {
        angle += joint;
        position[0] += length * angle.cos();
        position[1] += length * angle.sin();
    }
    position
}

impl ArmEnvironment for PlanarArm {
    fn name(&self) -> &str {
        "PlanarArm"
    }

    fn observation_space(&self) -> BoxSpace {
        let n = self.num_joints();
        let mut low = Array1::from_elem(n + 4, -self.reach);
        let mut high = Array1::from_elem(n + 4, self.reach);
        low.slice_mut(s![..n]).fill(-self.config.joint_limit);
        high.slice_mut(s![..n]).fill(self.config.joint_limit);
        BoxSpace::new(low, high)
    }

    fn action_space(&self) -> BoxSpace {
        self.joint_space()
    }

    fn max_distance(&self) -> f64 {
        2.0 * self.reach
    }

    fn distance(&self) -> f64 {
        let [x, y] = self.end_effector();
        (x - self.target[0]).hypot(y - self.target[1])
    }

    fn reset(&mut self) -> Result<Observation, EnvError> {
        let limit = self.config.joint_limit;
        let joint_dist = Uniform::new_inclusive(-limit, limit);
        let target_joints: Array1<f64> = (0..self.num_joints())
            .map(|_| joint_dist.sample(&mut self.rng))
            .collect();
        self.target = forward_kinematics(&self.config.link_lengths, &target_joints);
        self.joints.fill(0.0);
        self.steps = 0;
        self.in_episode = true;
        Ok(self.observe())
    }

    fn step(&mut self, action: &Action, absolute: bool) -> Result<ArmStep, EnvError> {
        if !self.in_episode {
            return Err(EnvError::NotReset);
        }
        EnvError::check_vector("action", action, self.num_joints())?;

        let max_step = self.config.max_joint_step;
        let requested = if absolute {
            action - &self.joints
        } else {
            action.clone()
        };
        let motion = requested.mapv(|d| d.clamp(-max_step, max_step));
        let new_joints = self.joint_space().clip(&(&self.joints + &motion));
        let actual_action = if absolute {
            new_joints.clone()
        } else {
            &new_joints - &self.joints
        };
        self.joints = new_joints;
        self.steps += 1;

        let distance = self.distance();
        let reached = distance < self.config.goal_tolerance;
        let done = reached || self.steps >= self.config.max_steps;
        self.in_episode = !done;
        Ok(ArmStep {
            observation: self.observe(),
            reward: -distance,
            done,
            info: StepInfo {
                actual_action,
                distance,
                reached,
            },
        })
    }

    fn joint_positions(&self) -> Result<Array1<f64>, EnvError> {
        Ok(self.joints.clone())
    }

    fn set_joint_positions(&mut self, positions: &Array1<f64>) -> Result<(), EnvError> {
        EnvError::check_vector("joint positions", positions, self.num_joints())?;
        self.joints = self.joint_space().clip(positions);
        Ok(())
    }

    fn render(&mut self) -> Result<(), EnvError> {
        let distance = self.distance();
        let distance_paint = if distance < self.config.goal_tolerance {
            Paint::green(distance)
        } else {
            Paint::yellow(distance)
        };
        println!(
            "{} {:>3}  joints {}  tip {}  target {}  distance {:.4}",
            Paint::fixed(35, "arm"),
            self.steps,
            Vector(self.joints.as_slice().unwrap_or(&[])),
            Vector(&self.end_effector()),
            Vector(&self.target),
            distance_paint,
        );
        Ok(())
    }
}
