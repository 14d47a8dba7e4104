use super::{Id, LogError, LogValue, StatsLogger};
use crate::utils::stats::OnlineMeanVariance;
use std::collections::{btree_map::Entry, BTreeMap};
use std::ops::Drop;
use std::time::{Duration, Instant};

/// Write out summaries to a backend.
pub trait SummaryWriter {
    /// Write the summaries of one chunk.
    ///
    /// `elapsed` is the wall-clock duration of the chunk.
    fn write_summaries<'a, I>(&mut self, summaries: I, elapsed: Duration) -> Result<(), LogError>
    where
        I: Iterator<Item = (&'a Id, &'a ChunkSummary)>;
}

/// Logs time series statistics by breaking the time series into chunks and summarizing each chunk.
///
/// A chunk ends each time the logger is flushed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkLogger<W: SummaryWriter> {
    writer: W,

    // A binary tree is used so that keys are retrieved in sorted order
    summaries: BTreeMap<Id, Node>,

    chunk_start: Instant,
}

impl<W: SummaryWriter> ChunkLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            summaries: BTreeMap::new(),
            chunk_start: Instant::now(),
        }
    }
}

impl<W: SummaryWriter + Default> Default for ChunkLogger<W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}

impl<W: SummaryWriter> StatsLogger for ChunkLogger<W> {
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        match self.summaries.entry(id) {
            Entry::Vacant(e) => {
                e.insert(Node::new(value.into()));
            }
            Entry::Occupied(e) => e.into_mut().push(value)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LogError> {
        let result = self.writer.write_summaries(
            self.summaries
                .iter()
                .filter(|(_, node)| node.dirty)
                .map(|(id, node)| (id, &node.summary)),
            self.chunk_start.elapsed(),
        );

        for node in self.summaries.values_mut() {
            node.reset();
        }
        self.chunk_start = Instant::now();
        result
    }
}

/// Flush when dropped
impl<W: SummaryWriter> Drop for ChunkLogger<W> {
    fn drop(&mut self) {
        if self.summaries.values().any(|node| node.dirty) {
            // Nowhere to report the error
            let _ = self.flush();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    summary: ChunkSummary,
    /// Whether the summary has been updated in this chunk
    dirty: bool,
}

impl Node {
    const fn new(summary: ChunkSummary) -> Self {
        Self {
            summary,
            dirty: true,
        }
    }

    fn push(&mut self, value: LogValue) -> Result<(), LogError> {
        self.dirty = true;
        self.summary.push(value)
    }

    fn reset(&mut self) {
        self.dirty = false;
        self.summary.reset()
    }
}

/// Summary of the values logged under one ID within a chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkSummary {
    Nothing,
    Counter { increment: u64, initial_value: u64 },
    Duration { stats: OnlineMeanVariance<f64> },
    Scalar { stats: OnlineMeanVariance<f64> },
}

impl From<LogValue> for ChunkSummary {
    fn from(value: LogValue) -> Self {
        match value {
            LogValue::Nothing => Self::Nothing,
            LogValue::CounterIncrement(i) => Self::Counter {
                increment: i,
                initial_value: 0,
            },
            LogValue::Duration(d) => {
                let mut stats = OnlineMeanVariance::new();
                stats.push(d.as_secs_f64());
                Self::Duration { stats }
            }
            LogValue::Scalar(v) => {
                let mut stats = OnlineMeanVariance::new();
                stats.push(v);
                Self::Scalar { stats }
            }
        }
    }
}

impl ChunkSummary {
    /// Add a value to the summary.
    ///
    /// The value is rejected if it is a different variant from the one that created the summary.
    fn push(&mut self, value: LogValue) -> Result<(), LogError> {
        match (self, value) {
            (Self::Nothing, LogValue::Nothing) => {}
            (Self::Counter { increment, .. }, LogValue::CounterIncrement(i)) => *increment += i,
            (Self::Duration { stats }, LogValue::Duration(d)) => stats.push(d.as_secs_f64()),
            (Self::Scalar { stats }, LogValue::Scalar(v)) => stats.push(v),
            (summary, value) => {
                return Err(LogError::IncompatibleValue {
                    prev: summary.value_variant_name(),
                    now: value.variant_name(),
                })
            }
        };
        Ok(())
    }

    /// Reset for the start of the next chunk.
    fn reset(&mut self) {
        match self {
            Self::Nothing => {}
            Self::Counter {
                increment,
                initial_value,
            } => {
                *initial_value += *increment;
                *increment = 0
            }
            Self::Duration { stats } | Self::Scalar { stats } => *stats = OnlineMeanVariance::new(),
        }
    }

    /// A single number representing this summary, if any.
    ///
    /// Counters report their running total; scalars and durations (seconds) their chunk mean.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Nothing => None,
            #[allow(clippy::cast_precision_loss)]
            Self::Counter {
                increment,
                initial_value,
            } => Some((initial_value + increment) as f64),
            Self::Duration { stats } | Self::Scalar { stats } => stats.mean(),
        }
    }

    const fn value_variant_name(&self) -> &'static str {
        match self {
            Self::Nothing => "Nothing",
            Self::Counter { .. } => "CounterIncrement",
            Self::Duration { .. } => "Duration",
            Self::Scalar { .. } => "Scalar",
        }
    }
}
