use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use super::json_file::JsonFile;
use crate::errors::StoreError;

/// An append-only list of records stored as one JSON array.
///
/// Rows are decoded one at a time: a row that does not match the record
/// type is left out of listings but kept on disk across appends.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    file: JsonFile<Vec<Value>>,
    kind: &'static str,
    _marker: std::marker::PhantomData<fn() -> T>,
}

/// The decodable rows of a record file.
#[derive(Debug, Clone)]
pub struct Records<T> {
    pub rows: Vec<T>,
    /// Rows that could not be decoded as `T`
    pub skipped: usize,
}

impl<T> RecordStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>, kind: &'static str) -> Self {
        Self {
            file: JsonFile::new(path),
            kind,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn file(&self) -> &JsonFile<Vec<Value>> {
        &self.file
    }

    pub fn load(&self) -> Result<Records<T>, StoreError> {
        let values = self.file.load()?;
        let mut rows = Vec::with_capacity(values.len());
        let mut skipped = 0;
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value(value) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    skipped += 1;
                    warn!(kind = self.kind, index, error = %e, "skipping unreadable record");
                }
            }
        }
        Ok(Records { rows, skipped })
    }

    pub fn list(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.load()?.rows)
    }

    /// Append one record at the end; returns the new number of rows on file.
    pub fn append(&self, record: T) -> Result<usize, StoreError> {
        self.append_many(std::iter::once(record))
    }

    pub fn append_many(&self, records: impl IntoIterator<Item = T>) -> Result<usize, StoreError> {
        let values = records
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Serialize {
                path: self.file.path().to_path_buf(),
                source: e,
            })?;
        let added = values.len();
        let total = self.file.update(|list| {
            list.extend(values);
            Ok::<_, StoreError>(list.len())
        })?;
        info!(kind = self.kind, added, total, "records appended");
        Ok(total)
    }
}
