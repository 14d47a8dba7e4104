//! Error type
use crate::approximators::FitError;
use crate::cacla::SampleError;
use crate::config::ConfigError;
use crate::envs::{BuildEnvError, EnvError};
use crate::logging::LogError;
use crate::simulation::StatsError;
use crate::utils::save::SaveLoadError;
use thiserror::Error;

/// Error from a CACLA training or evaluation run.
///
/// None of these are recovered from; they propagate up to the entry point and end the run.
#[derive(Error, Debug)]
pub enum CaclaError {
    #[error("environment error")]
    Env(#[from] EnvError),
    #[error("error building environment")]
    BuildEnv(#[from] BuildEnvError),
    #[error("function approximator error")]
    Fit(#[from] FitError),
    #[error("error sampling exploratory action")]
    Sample(#[from] SampleError),
    #[error("error computing batch statistics")]
    Stats(#[from] StatsError),
    #[error("error saving or loading a checkpoint")]
    SaveLoad(#[from] SaveLoadError),
    #[error("logging error")]
    Log(#[from] LogError),
    #[error("configuration error")]
    Config(#[from] ConfigError),
    #[error("file error {0}")]
    Io(#[from] std::io::Error),
}
