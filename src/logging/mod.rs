//! Logging statistics from training runs
mod chunk;
mod display;
mod json;
mod tensorboard;

pub use chunk::{ChunkLogger, ChunkSummary, SummaryWriter};
pub use display::{DisplayBackend, DisplayLogger};
pub use json::{JsonLinesBackend, JsonLinesLogger};
pub use tensorboard::{TensorBoardBackend, TensorBoardLogger};

use std::fmt;
use std::iter::FromIterator;
use std::time::Duration;
use thiserror::Error;

/// A value that can be logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogValue {
    /// Nothing. No data to log.
    Nothing,
    /// A scalar value. Summarized by mean and standard deviation.
    Scalar(f64),
    /// Increment a counter.
    CounterIncrement(u64),
    /// A duration.
    Duration(Duration),
}

impl LogValue {
    /// The name of this variant
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Nothing => "Nothing",
            Self::Scalar(_) => "Scalar",
            Self::CounterIncrement(_) => "CounterIncrement",
            Self::Duration(_) => "Duration",
        }
    }
}

/// Hierarchical name of a logged value.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id {
    path: Vec<&'static str>,
}

impl Id {
    /// Prepend a scope to this ID.
    pub fn with_prefix(mut self, scope: &'static str) -> Self {
        self.path.insert(0, scope);
        self
    }

    /// The last path component.
    pub fn name(&self) -> &'static str {
        self.path.last().copied().unwrap_or("")
    }
}

impl From<&'static str> for Id {
    fn from(name: &'static str) -> Self {
        Self { path: vec![name] }
    }
}

impl FromIterator<&'static str> for Id {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        Self {
            path: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for part in &self.path {
            if first {
                first = false;
            } else {
                f.write_str("/")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

/// Error logging a value.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("incompatible value type; previously {prev} now {now}")]
    IncompatibleValue {
        prev: &'static str,
        now: &'static str,
    },
    #[error("log file error {0}")]
    Io(#[from] std::io::Error),
    #[error("log serialization error {0}")]
    Json(#[from] serde_json::Error),
}

/// Log time series statistics.
///
/// Values logged under the same [`Id`] are summarized until the next [`StatsLogger::flush`].
pub trait StatsLogger {
    /// Log a value.
    ///
    /// Returns an error if the value has a different type from previous values with this ID.
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError>;

    /// Write out the summaries collected since the last flush.
    fn flush(&mut self) -> Result<(), LogError>;

    /// Log a scalar value.
    #[inline]
    fn log_scalar(&mut self, name: &'static str, value: f64) -> Result<(), LogError> {
        self.log(name.into(), LogValue::Scalar(value))
    }

    /// Log a counter increment.
    #[inline]
    fn log_counter_increment(
        &mut self,
        name: &'static str,
        increment: u64,
    ) -> Result<(), LogError> {
        self.log(name.into(), LogValue::CounterIncrement(increment))
    }

    /// Log a duration.
    #[inline]
    fn log_duration(&mut self, name: &'static str, duration: Duration) -> Result<(), LogError> {
        self.log(name.into(), LogValue::Duration(duration))
    }

    /// Wrap this logger so that all IDs are prefixed by `scope`.
    ///
    /// Use [`ScopedLogger::new`] directly for `&mut dyn StatsLogger`.
    #[inline]
    fn with_scope(&mut self, scope: &'static str) -> ScopedLogger
    where
        Self: Sized,
    {
        ScopedLogger::new(self, scope)
    }
}

/// Logger that does nothing
impl StatsLogger for () {
    #[inline]
    fn log(&mut self, _: Id, _: LogValue) -> Result<(), LogError> {
        Ok(())
    }
    #[inline]
    fn flush(&mut self) -> Result<(), LogError> {
        Ok(())
    }
}

impl<L: StatsLogger + ?Sized> StatsLogger for &'_ mut L {
    #[inline]
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        L::log(self, id, value)
    }
    #[inline]
    fn flush(&mut self) -> Result<(), LogError> {
        L::flush(self)
    }
}

impl<L: StatsLogger + ?Sized> StatsLogger for Box<L> {
    #[inline]
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        L::log(self, id, value)
    }
    #[inline]
    fn flush(&mut self) -> Result<(), LogError> {
        L::flush(self)
    }
}

/// Log to both loggers.
impl<A: StatsLogger, B: StatsLogger> StatsLogger for (A, B) {
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        self.0.log(id.clone(), value)?;
        self.1.log(id, value)
    }
    fn flush(&mut self) -> Result<(), LogError> {
        self.0.flush()?;
        self.1.flush()
    }
}

/// Logger that prefixes a scope onto every logged ID.
pub struct ScopedLogger<'a> {
    logger: &'a mut dyn StatsLogger,
    scope: &'static str,
}

impl<'a> ScopedLogger<'a> {
    pub fn new(logger: &'a mut dyn StatsLogger, scope: &'static str) -> Self {
        Self { logger, scope }
    }
}

impl fmt::Debug for ScopedLogger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ScopedLogger")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl StatsLogger for ScopedLogger<'_> {
    #[inline]
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        self.logger.log(id.with_prefix(self.scope), value)
    }
    #[inline]
    fn flush(&mut self) -> Result<(), LogError> {
        self.logger.flush()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingLogger;
    use super::*;

    #[test]
    fn id_display() {
        let id: Id = ["batch", "reward", "mean"].into_iter().collect();
        assert_eq!(id.to_string(), "batch/reward/mean");
        assert_eq!(id.name(), "mean");
    }

    #[test]
    fn nested_scopes_prefix_ids() {
        let mut logger = RecordingLogger::default();
        {
            let mut outer = logger.with_scope("train");
            let mut inner = outer.with_scope("batch");
            inner.log_scalar("reward", 1.5).unwrap();
            inner.flush().unwrap();
        }
        assert_eq!(logger.scalars("train/batch/reward"), vec![1.5]);
        assert_eq!(logger.flushes, 1);
    }

    #[test]
    fn scope_through_dyn_reference() {
        let mut recorder = RecordingLogger::default();
        let logger: &mut dyn StatsLogger = &mut recorder;
        ScopedLogger::new(&mut *logger, "eval")
            .log_scalar("reward", -0.5)
            .unwrap();
        logger.log_scalar("top", 2.0).unwrap();
        assert_eq!(recorder.scalars("eval/reward"), vec![-0.5]);
        assert_eq!(recorder.scalars("top"), vec![2.0]);
    }

    #[test]
    fn pair_logs_to_both() {
        let mut pair = (RecordingLogger::default(), RecordingLogger::default());
        pair.log_counter_increment("steps", 3).unwrap();
        pair.flush().unwrap();
        assert_eq!(pair.0, pair.1);
        assert_eq!(pair.0.flushes, 1);
    }
}
