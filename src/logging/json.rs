//! JSON lines logger
use super::chunk::{ChunkLogger, ChunkSummary, SummaryWriter};
use super::{Id, LogError, LogValue, StatsLogger};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Logger that appends one JSON object per flush to a file.
///
/// Each record maps the full ID of every value logged since the previous flush to its summary
/// value, along with the record index and the chunk duration in seconds.
#[derive(Debug)]
pub struct JsonLinesLogger<W: Write = BufWriter<File>>(ChunkLogger<JsonLinesBackend<W>>);

impl JsonLinesLogger {
    /// Create (or truncate) a log file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesLogger<W> {
    pub fn new(writer: W) -> Self {
        Self(ChunkLogger::new(JsonLinesBackend::new(writer)))
    }
}

impl<W: Write> StatsLogger for JsonLinesLogger<W> {
    #[inline]
    fn log(&mut self, id: Id, value: LogValue) -> Result<(), LogError> {
        self.0.log(id, value)
    }
    #[inline]
    fn flush(&mut self) -> Result<(), LogError> {
        self.0.flush()
    }
}

/// Logging backend that writes each chunk as a line of JSON.
#[derive(Debug)]
pub struct JsonLinesBackend<W> {
    writer: W,
    record_index: u64,
}

impl<W: Write> JsonLinesBackend<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            record_index: 0,
        }
    }
}

impl<W: Write> SummaryWriter for JsonLinesBackend<W> {
    fn write_summaries<'a, I>(&mut self, summaries: I, elapsed: Duration) -> Result<(), LogError>
    where
        I: Iterator<Item = (&'a Id, &'a ChunkSummary)>,
    {
        let mut record = Map::new();
        record.insert("record".into(), self.record_index.into());
        record.insert("elapsed_secs".into(), elapsed.as_secs_f64().into());
        for (id, summary) in summaries {
            if let Some(value) = summary.value() {
                // Non-finite values become null
                record.insert(id.to_string(), value.into());
            }
        }
        serde_json::to_writer(&mut self.writer, &Value::Object(record))?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        self.record_index += 1;
        Ok(())
    }
}
