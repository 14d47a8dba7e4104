//! Evaluating a trained actor
use crate::approximators::FunctionApproximator;
use crate::cacla::Cacla;
use crate::envs::{ArmEnvironment, ArmStep};
use crate::logging::{ScopedLogger, StatsLogger};
use crate::CaclaError;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

/// Outcome of one evaluation episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalEpisode {
    pub steps: u64,
    pub total_reward: f64,
    /// End effector to target distance after the last step.
    pub final_distance: f64,
    /// Whether the end effector finished within the goal tolerance.
    pub reached: bool,
}

/// Run `num_episodes` episodes with the actor alone.
///
/// No exploration noise and no learning. The environment is rendered before every step. The
/// iteration, reward, distance and done flag of every step are logged under the `eval` scope
/// and flushed immediately; `pause` is slept after each episode.
pub fn evaluate<A, C, E>(
    learner: &Cacla<A, C>,
    env: &mut E,
    num_episodes: usize,
    pause: Duration,
    logger: &mut dyn StatsLogger,
) -> Result<Vec<EvalEpisode>, CaclaError>
where
    A: FunctionApproximator,
    C: FunctionApproximator,
    E: ArmEnvironment + ?Sized,
{
    let mut logger = ScopedLogger::new(logger, "eval");
    let mut episodes = Vec::with_capacity(num_episodes);
    for iteration in 0..num_episodes {
        let mut observation = env.reset()?;
        let mut episode = EvalEpisode {
            steps: 0,
            total_reward: 0.0,
            final_distance: env.distance(),
            reached: false,
        };
        loop {
            env.render()?;
            let action = learner.act(&observation)?;
            let ArmStep {
                observation: next_observation,
                reward,
                done,
                info,
            } = env.step(&action, true)?;
            observation = next_observation;
            episode.steps += 1;
            episode.total_reward += reward;
            episode.final_distance = info.distance;
            episode.reached = info.reached;

            #[allow(clippy::cast_precision_loss)]
            let iteration = iteration as f64;
            logger.log_scalar("iteration", iteration)?;
            logger.log_scalar("reward", reward)?;
            logger.log_scalar("distance", info.distance)?;
            logger.log_scalar("done", if done { 1.0 } else { 0.0 })?;
            logger.flush()?;
            if done {
                break;
            }
        }
        episodes.push(episode);
        thread::sleep(pause);
    }
    Ok(episodes)
}
