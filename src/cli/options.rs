//! Command-line options
use super::{Update, WithUpdate};
use crate::cacla::Hyperparameters;
use crate::config::{ConfigError, RunConfig};
use crate::simulation::TrainConfig;
use clap::Parser;
use std::path::PathBuf;

/// Train a CACLA agent to reach targets with a simulated robot arm, then evaluate it.
#[derive(Parser, Debug, Clone, PartialEq)]
#[clap(name = "cacla-arm", author, version)]
pub struct Options {
    /// JSON run configuration. Other options override its values.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Random seed
    #[clap(long)]
    pub seed: Option<u64>,

    /// Total number of training episodes
    #[clap(long)]
    pub episodes: Option<usize>,

    /// Number of episodes per batch
    #[clap(long)]
    pub batch_size: Option<usize>,

    /// Root directory for run logs and checkpoints
    #[clap(long)]
    pub log_dir: Option<PathBuf>,

    /// Skip training and evaluate this checkpoint
    #[clap(long)]
    pub load: Option<PathBuf>,

    /// Number of evaluation episodes
    #[clap(long)]
    pub test_episodes: Option<usize>,

    /// Render the environment during training
    #[clap(long)]
    pub animate: bool,

    /// Actor learning rate
    #[clap(long, help_heading = Some("LEARNER OPTIONS"))]
    pub alpha: Option<f64>,

    /// Critic learning rate
    #[clap(long, help_heading = Some("LEARNER OPTIONS"))]
    pub beta: Option<f64>,

    /// Discount factor
    #[clap(long, help_heading = Some("LEARNER OPTIONS"))]
    pub gamma: Option<f64>,

    /// Initial standard deviation of the exploration noise
    #[clap(long, help_heading = Some("LEARNER OPTIONS"))]
    pub exploration: Option<f64>,
}

impl Options {
    /// The run configuration: the config file (or defaults) with these options applied.
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        }
        .with_update(self);
        config.train.validate()?;
        Ok(config)
    }
}

impl Update<&Options> for RunConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(seed) = opts.seed {
            self.seed = seed;
        }
        if let Some(log_dir) = &opts.log_dir {
            self.log_root = log_dir.clone();
        }
        if let Some(test_episodes) = opts.test_episodes {
            self.test_episodes = test_episodes;
        }
        self.train.update(opts);
        self.agent.hyperparameters.update(opts);
    }
}

impl Update<&Options> for TrainConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(episodes) = opts.episodes {
            self.n_episodes = episodes;
        }
        if let Some(batch_size) = opts.batch_size {
            self.batch_size = batch_size;
        }
        if opts.animate {
            self.animate = true;
        }
    }
}

impl Update<&Options> for Hyperparameters {
    fn update(&mut self, opts: &Options) {
        if let Some(alpha) = opts.alpha {
            self.alpha = alpha;
        }
        if let Some(beta) = opts.beta {
            self.beta = beta;
        }
        if let Some(gamma) = opts.gamma {
            self.gamma = gamma;
        }
        if let Some(exploration) = opts.exploration {
            self.exploration_factor = exploration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_default() {
        let opts = Options::parse_from(["cacla-arm"]);
        assert_eq!(opts.run_config().unwrap(), RunConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let opts = Options::parse_from([
            "cacla-arm",
            "--seed",
            "3",
            "--episodes",
            "200",
            "--batch-size",
            "20",
            "--log-dir",
            "/tmp/runs",
            "--test-episodes",
            "2",
            "--animate",
            "--gamma",
            "0.5",
        ]);
        let config = opts.run_config().unwrap();
        assert_eq!(config.seed, 3);
        assert_eq!(config.train.n_episodes, 200);
        assert_eq!(config.train.batch_size, 20);
        assert!(config.train.animate);
        assert_eq!(config.log_root, PathBuf::from("/tmp/runs"));
        assert_eq!(config.test_episodes, 2);
        assert_eq!(config.agent.hyperparameters.gamma, 0.5);
        assert_eq!(config.agent.hyperparameters.alpha, 0.0005);
    }

    #[test]
    fn flags_override_config_file() {
        let path = std::env::temp_dir().join(format!(
            "cacla-cli-config-{}.json",
            std::process::id()
        ));
        let mut file_config = RunConfig::default();
        file_config.seed = 11;
        file_config.train.batch_size = 5;
        file_config.save(&path).unwrap();

        let opts = Options::parse_from([
            "cacla-arm",
            "--config",
            path.to_str().unwrap(),
            "--batch-size",
            "8",
        ]);
        let config = opts.run_config().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.seed, 11);
        assert_eq!(config.train.batch_size, 8);
    }

    #[test]
    fn zero_batch_size_flag_rejected() {
        let opts = Options::parse_from(["cacla-arm", "--batch-size", "0"]);
        assert!(opts.run_config().is_err());
    }
}
