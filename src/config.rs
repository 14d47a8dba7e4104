//! Run configuration
use crate::cacla::CaclaConfig;
use crate::envs::PlanarArmConfig;
use crate::simulation::TrainConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Everything needed to reproduce a training and evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seed for the environment, the exploration noise and network initialization.
    pub seed: u64,
    /// Run directories are created under `<log_root>/<environment name>/`.
    pub log_root: PathBuf,
    pub env: PlanarArmConfig,
    pub agent: CaclaConfig,
    pub train: TrainConfig,
    /// Number of evaluation episodes after training.
    pub test_episodes: usize,
    /// Pause between evaluation episodes.
    pub test_pause: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            log_root: PathBuf::from("log-files"),
            env: PlanarArmConfig::default(),
            agent: CaclaConfig::default(),
            train: TrainConfig::default(),
            test_episodes: 10,
            test_pause: Duration::from_secs(3),
        }
    }
}

impl RunConfig {
    /// Load from a JSON file. Missing fields take their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.train.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Error reading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("config file error {0}")]
    Io(#[from] io::Error),
    #[error("config format error {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_reference_experiment() {
        let config = RunConfig::default();
        let hyperparameters = &config.agent.hyperparameters;
        assert_eq!(hyperparameters.alpha, 0.0005);
        assert_eq!(hyperparameters.beta, 0.0005);
        assert_eq!(hyperparameters.lr_decay, 1.0);
        assert_eq!(hyperparameters.exploration_decay, 0.997);
        assert_eq!(hyperparameters.gamma, 0.0);
        assert_eq!(hyperparameters.exploration_factor, 0.1);
        assert_eq!(config.train.n_episodes, 10_000);
        assert_eq!(config.train.batch_size, 50);
        assert_eq!(config.test_episodes, 10);
    }

    #[test]
    fn save_load_round_trip() {
        let path =
            std::env::temp_dir().join(format!("cacla-config-{}.json", std::process::id()));
        let mut config = RunConfig::default();
        config.seed = 42;
        config.train.n_episodes = 100;
        config.env.max_steps = 20;
        config.save(&path).unwrap();
        let loaded = RunConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!(
            "cacla-config-partial-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{"seed": 7, "train": {"batch_size": 10}}"#).unwrap();
        let loaded = RunConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.seed, 7);
        assert_eq!(loaded.train.batch_size, 10);
        assert_eq!(loaded.train.n_episodes, 10_000);
        assert_eq!(loaded.env, PlanarArmConfig::default());
    }

    #[test]
    fn invalid_train_config_rejected() {
        let path = std::env::temp_dir().join(format!(
            "cacla-config-invalid-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{"train": {"batch_size": 0}}"#).unwrap();
        let result = RunConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
