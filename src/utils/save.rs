//! Saving and loading serializable values
use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Serialize to a file or load from a serialized file.
pub trait SaveLoad {
    /// Serialize to a file, replacing any existing file at `path`.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveLoadError>;

    /// Load from a file created by [`SaveLoad::save`].
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, SaveLoadError>
    where
        Self: Sized;
}

#[derive(Debug, Error)]
pub enum SaveLoadError {
    #[error("file error {0}")]
    Io(#[from] std::io::Error),
    #[error("(de)serialization error {0}")]
    Serialize(#[from] serde_cbor::Error),
}

impl<T: Serialize + DeserializeOwned> SaveLoad for T {
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveLoadError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_cbor::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self, SaveLoadError>
    where
        Self: Sized,
    {
        let reader = BufReader::new(File::open(path)?);
        let this = serde_cbor::from_reader(reader)?;
        Ok(this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        values: Vec<f64>,
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("cacla-save-{}.cbor", std::process::id()));
        let record = Record {
            name: "weights".into(),
            values: vec![0.5, -1.25],
        };
        record.save(&path).unwrap();
        let loaded = Record::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("cacla-save-does-not-exist.cbor");
        assert!(matches!(Record::load(path), Err(SaveLoadError::Io(_))));
    }
}
