//! Tensorboard logger
use super::chunk::{ChunkLogger, ChunkSummary, SummaryWriter};
use super::{Id, LogError, LogValue, StatsLogger};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tensorboard_rs::summary_writer::SummaryWriter as TbSummaryWriter;

/// Logger that saves a scalar summary per flush to a tensorboard file.
#[derive(Debug)]
pub struct TensorBoardLogger(ChunkLogger<TensorBoardBackend>);

impl TensorBoardLogger {
    #[inline]
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Self {
        Self(ChunkLogger::new(TensorBoardBackend::new(log_dir)))
    }
}

impl StatsLogger for TensorBoardLogger {
    #[inline]
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        self.0.log(id, value)
    }
    #[inline]
    fn flush(&mut self) -> Result<(), LogError> {
        self.0.flush()
    }
}

/// Logging backend that saves summaries to a tensorboard file.
pub struct TensorBoardBackend {
    writer: TbSummaryWriter,
    summary_index: usize,
}

impl fmt::Debug for TensorBoardBackend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TensorBoardBackend")
            .field("summary_index", &self.summary_index)
            .finish_non_exhaustive()
    }
}

impl TensorBoardBackend {
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Self {
        Self {
            writer: TbSummaryWriter::new(log_dir),
            summary_index: 0,
        }
    }
}

impl SummaryWriter for TensorBoardBackend {
    fn write_summaries<'a, I>(&mut self, summaries: I, _: Duration) -> Result<(), LogError>
    where
        I: Iterator<Item = (&'a Id, &'a ChunkSummary)>,
    {
        for (id, summary) in summaries {
            if let Some(value) = summary.value() {
                #[allow(clippy::cast_possible_truncation)]
                self.writer
                    .add_scalar(&id.to_string(), value as f32, self.summary_index);
            }
        }
        self.summary_index += 1;
        self.writer.flush();
        Ok(())
    }
}
