//! Single CACLA training episode
use super::{Trajectory, TrajectoryStep};
use crate::approximators::FunctionApproximator;
use crate::cacla::Cacla;
use crate::envs::{ArmEnvironment, ArmStep};
use crate::logging::StatsLogger;
use crate::CaclaError;
use ndarray::Array1;
use rand::Rng;

/// Run one training episode, updating the learner online after every step.
///
/// Each step:
/// 1. evaluate the critic value `v0` and actor action `A0` on the current observation;
/// 2. perturb `A0` with exploration noise and apply it as an absolute joint target,
///    remembering the joint positions from before the step;
/// 3. compute `delta = reward + gamma * v1 - v0` from the critic value of the new observation;
/// 4. fit the critic toward `reward + gamma * v1`;
/// 5. if `delta > 0` fit the actor toward the applied action and continue from the new
///    observation, otherwise restore the previous joint positions and keep the old observation.
///
/// A rejected step only restores the joint positions. Any other simulator state, in particular
/// its step counter, keeps advancing and the episode still ends when the environment says so.
///
/// # Args
/// * `learner` - Learner to evaluate and update.
/// * `env` - Environment; reset at the start of the episode.
/// * `rng` - Source of exploration noise.
/// * `animate` - Render the environment before every step.
/// * `logger` - Receives `delta`, `critic_loss`, `actor_loss` and `accepted` for every step.
pub fn run_episode<A, C, E, R>(
    learner: &mut Cacla<A, C>,
    env: &mut E,
    rng: &mut R,
    animate: bool,
    logger: &mut dyn StatsLogger,
) -> Result<Trajectory, CaclaError>
where
    A: FunctionApproximator,
    C: FunctionApproximator,
    E: ArmEnvironment + ?Sized,
    R: Rng + ?Sized,
{
    let mut trajectory = Vec::new();
    let mut observation0 = env.reset()?;
    loop {
        if animate {
            env.render()?;
        }
        let v0 = learner.value(&observation0)?;
        let raw_action = learner.act(&observation0)?;
        let explored_action = learner.explore(&raw_action, rng)?;

        let snapshot = env.joint_positions()?;
        let ArmStep {
            observation: observation1,
            reward,
            done,
            info,
        } = env.step(&explored_action, true)?;
        let action = info.actual_action;

        let v1 = learner.value(&observation1)?;
        let target = reward + learner.hyperparameters().gamma * v1;
        let delta = target - v0;

        let critic_loss = learner
            .critic_mut()
            .fit_one(observation0.view(), Array1::from_elem(1, target).view())?;
        logger.log_scalar("critic_loss", critic_loss)?;

        let accepted = delta > 0.0;
        if accepted {
            let actor_loss = learner
                .actor_mut()
                .fit_one(observation0.view(), action.view())?;
            logger.log_scalar("actor_loss", actor_loss)?;
        } else {
            env.set_joint_positions(&snapshot)?;
        }
        logger.log_scalar("delta", delta)?;
        logger.log_scalar("accepted", if accepted { 1.0 } else { 0.0 })?;

        // Continue from the new observation only if the transition was kept
        let input = if accepted {
            std::mem::replace(&mut observation0, observation1.clone())
        } else {
            observation0.clone()
        };
        trajectory.push(TrajectoryStep {
            input,
            observation0: observation0.clone(),
            observation1,
            v0,
            v1,
            raw_action,
            action,
            reward,
            delta,
            accepted,
            done,
        });
        if done {
            return Ok(trajectory);
        }
    }
}
