//! Batches of training episodes
use super::{run_episode, Trajectory};
use crate::approximators::FunctionApproximator;
use crate::cacla::Cacla;
use crate::envs::ArmEnvironment;
use crate::logging::{ScopedLogger, StatsLogger};
use crate::utils::stats::OnlineMeanVariance;
use crate::CaclaError;
use rand::Rng;
use std::time::Instant;

/// Run `batch_size` training episodes in sequence.
///
/// Step values are logged under the `step` scope. The batch mean per-step reward, the number of
/// steps in this batch and the batch duration are logged as `mean_reward`, `steps` and `time`.
/// `total_steps` counts the steps of every batch run with the same logger.
pub fn run_batch<A, C, E, R>(
    learner: &mut Cacla<A, C>,
    env: &mut E,
    batch_size: usize,
    rng: &mut R,
    animate: bool,
    logger: &mut dyn StatsLogger,
) -> Result<Vec<Trajectory>, CaclaError>
where
    A: FunctionApproximator,
    C: FunctionApproximator,
    E: ArmEnvironment + ?Sized,
    R: Rng + ?Sized,
{
    let start = Instant::now();
    let mut trajectories = Vec::with_capacity(batch_size);
    {
        let mut step_logger = ScopedLogger::new(&mut *logger, "step");
        for _ in 0..batch_size {
            trajectories.push(run_episode(learner, env, rng, animate, &mut step_logger)?);
        }
    }

    let rewards: OnlineMeanVariance<f64> = trajectories
        .iter()
        .flatten()
        .map(|step| step.reward)
        .collect();
    if let Some(mean_reward) = rewards.mean() {
        logger.log_scalar("mean_reward", mean_reward)?;
    }
    #[allow(clippy::cast_precision_loss)]
    let num_steps = rewards.count() as f64;
    logger.log_scalar("steps", num_steps)?;
    logger.log_counter_increment("total_steps", rewards.count())?;
    logger.log_duration("time", start.elapsed())?;
    Ok(trajectories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approximators::testing::RecordingApproximator;
    use crate::cacla::Hyperparameters;
    use crate::envs::testing::ScriptedArm;
    use crate::logging::{testing::RecordingLogger, JsonLinesLogger, LogValue};
    use crate::Prng;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn runs_batch_size_episodes() {
        let mut env = ScriptedArm::new(2, 3, -0.25);
        let mut cacla = Cacla::new(
            RecordingApproximator::constant(3, array![0.0, 0.0]),
            RecordingApproximator::constant(3, array![0.0]),
            Hyperparameters::default(),
        )
        .unwrap();
        let mut rng = Prng::seed_from_u64(0);
        let mut logger = RecordingLogger::default();
        let trajectories =
            run_batch(&mut cacla, &mut env, 4, &mut rng, false, &mut logger).unwrap();

        assert_eq!(trajectories.len(), 4);
        assert!(trajectories.iter().all(|t| t.len() == 3));
        assert_eq!(env.resets, 4);
        assert_eq!(logger.scalars("mean_reward"), vec![-0.25]);
        assert_eq!(logger.scalars("step/delta").len(), 12);
        assert_eq!(logger.scalars("steps"), vec![12.0]);
        assert!(logger
            .entries
            .contains(&("total_steps".to_string(), LogValue::CounterIncrement(12))));
        assert!(logger.entries.iter().any(|(id, _)| id == "time"));
        // flushing is left to the caller
        assert_eq!(logger.flushes, 0);
    }

    #[test]
    fn steps_record_is_per_batch() {
        let mut env = ScriptedArm::new(2, 3, -0.25);
        let mut cacla = Cacla::new(
            RecordingApproximator::constant(3, array![0.0, 0.0]),
            RecordingApproximator::constant(3, array![0.0]),
            Hyperparameters::default(),
        )
        .unwrap();
        let mut rng = Prng::seed_from_u64(0);
        let mut buffer = Vec::new();
        {
            let mut logger = JsonLinesLogger::new(&mut buffer);
            run_batch(&mut cacla, &mut env, 4, &mut rng, false, &mut logger).unwrap();
            logger.flush().unwrap();
            run_batch(&mut cacla, &mut env, 2, &mut rng, false, &mut logger).unwrap();
            logger.flush().unwrap();
        }
        let records: Vec<serde_json::Value> = String::from_utf8(buffer)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["steps"], 12.0);
        assert_eq!(records[1]["steps"], 6.0);
        assert_eq!(records[1]["total_steps"], 18.0);
    }
}
