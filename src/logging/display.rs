//! Command-line logger
use super::chunk::{ChunkLogger, ChunkSummary, SummaryWriter};
use super::{Id, LogError, LogValue, StatsLogger};
use crate::utils::fmt::PrettyPrint;
use std::io::{self, Write};
use std::time::Duration;
use yansi::Paint;

/// Logger that displays summaries to standard output each time it is flushed.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLogger(ChunkLogger<DisplayBackend>);

impl DisplayLogger {
    #[inline]
    pub fn new() -> Self {
        Self(ChunkLogger::new(DisplayBackend::default()))
    }
}

impl Default for DisplayLogger {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl StatsLogger for DisplayLogger {
    #[inline]
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        self.0.log(id, value)
    }
    #[inline]
    fn flush(&mut self) -> Result<(), LogError> {
        self.0.flush()
    }
}

/// Logging backend that displays summaries to standard output.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DisplayBackend {
    /// Number of chunks displayed so far
    chunks: u64,
}

impl SummaryWriter for DisplayBackend {
    fn write_summaries<'a, I>(&mut self, summaries: I, elapsed: Duration) -> Result<(), LogError>
    where
        I: Iterator<Item = (&'a Id, &'a ChunkSummary)>,
    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(
            out,
            "\n{} {}",
            Paint::new(format!("#{}", self.chunks)).bold(),
            Paint::fixed(8, PrettyPrint(elapsed))
        )?;
        for (id, summary) in summaries {
            write!(out, "{:<32} ", Paint::fixed(35, id))?;
            write_summary(&mut out, summary, elapsed)?;
            writeln!(out)?;
        }
        self.chunks += 1;
        Ok(())
    }
}

fn write_summary<W: Write>(
    out: &mut W,
    summary: &ChunkSummary,
    elapsed: Duration,
) -> io::Result<()> {
    match summary {
        ChunkSummary::Nothing => Ok(()),
        ChunkSummary::Counter {
            increment,
            initial_value,
        } => write!(
            out,
            "{}  (+{})",
            initial_value + increment,
            Paint::fixed(253, increment)
        ),
        ChunkSummary::Duration { stats } => match stats.mean() {
            Some(mean) => write!(
                out,
                "{:.4} {}",
                PrettyPrint(Duration::from_secs_f64(mean)),
                Paint::fixed(
                    221,
                    format!("{:.2}%", mean / elapsed.as_secs_f64() * 100.0)
                )
            ),
            None => Ok(()),
        },
        ChunkSummary::Scalar { stats } => {
            if let Some(mean) = stats.mean() {
                write!(out, "{:.4}", PrettyPrint(mean))?;
            }
            match stats.stddev() {
                Some(stddev) if stats.count() > 1 => write!(
                    out,
                    " {}",
                    Paint::fixed(8, format!("(σ {:.4})", PrettyPrint(stddev)))
                ),
                _ => Ok(()),
            }
        }
    }
}
