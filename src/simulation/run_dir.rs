//! Run output directories
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding the artifacts of one run.
///
/// Located at `<root>/<env_name>/<Mon-DD_HH.MM.SS>` (UTC start time).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunDir {
    path: PathBuf,
}

impl RunDir {
    /// Create the directory for a run starting at `time`.
    pub fn create<P: AsRef<Path>>(
        root: P,
        env_name: &str,
        time: DateTime<Utc>,
    ) -> io::Result<Self> {
        let path = root
            .as_ref()
            .join(env_name)
            .join(time.format("%b-%d_%H.%M.%S").to_string());
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checkpoint of the learner with the best batch mean reward.
    pub fn best_model(&self) -> PathBuf {
        self.path.join("model.cbor")
    }

    /// Checkpoint of the learner at the end of training.
    pub fn final_model(&self) -> PathBuf {
        self.path.join("model_final.cbor")
    }

    /// The run configuration.
    pub fn config_file(&self) -> PathBuf {
        self.path.join("config.json")
    }

    /// JSON lines statistics log.
    pub fn log_file(&self) -> PathBuf {
        self.path.join("log.jsonl")
    }

    /// Tensorboard event files.
    pub fn tensorboard_dir(&self) -> PathBuf {
        self.path.join("tensorboard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamped_path() {
        let root = std::env::temp_dir().join(format!("cacla-run-dir-{}", std::process::id()));
        let time = Utc.with_ymd_and_hms(2024, 1, 10, 14, 10, 37).unwrap();
        let run_dir = RunDir::create(&root, "PlanarArm", time).unwrap();
        assert_eq!(run_dir.path(), root.join("PlanarArm").join("Jan-10_14.10.37"));
        assert!(run_dir.path().is_dir());
        assert_eq!(
            run_dir.best_model(),
            root.join("PlanarArm/Jan-10_14.10.37/model.cbor")
        );
        assert_eq!(
            run_dir.final_model().file_name().unwrap(),
            "model_final.cbor"
        );
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn create_existing_is_ok() {
        let root = std::env::temp_dir().join(format!("cacla-run-dir-again-{}", std::process::id()));
        let time = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap();
        let first = RunDir::create(&root, "Env", time).unwrap();
        let second = RunDir::create(&root, "Env", time).unwrap();
        assert_eq!(first, second);
        fs::remove_dir_all(&root).unwrap();
    }
}
