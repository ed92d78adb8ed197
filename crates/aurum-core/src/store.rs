//! Record store contract for the persisted daily series.
//!
//! The store is append-only and performs no deduplication: callers check
//! [`SeriesStore::exists`] before [`SeriesStore::append`]. That check-then-act
//! pair is not atomic. Runs are expected to be serialized by the external
//! scheduler, so no locking is attempted; two concurrent writers may both
//! append the same date.

use thiserror::Error;
use tracing::{error, warn};

use crate::{DailyBar, DailyRecord, TradeDate};

/// Errors surfaced by a series backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing data could not be read or written.
    #[error("series storage unavailable: {0}")]
    Unavailable(String),

    /// A row could not be encoded for writing.
    #[error("series encoding failed: {0}")]
    Encoding(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Unavailable(error.to_string())
    }
}

/// Append-only daily series keyed by date.
pub trait SeriesStore {
    /// True when a record with this date is already persisted.
    fn exists(&self, date: TradeDate) -> Result<bool, StorageError>;

    /// Appends a record. Writes the header first when the backing data is new.
    fn append(&mut self, record: &DailyRecord) -> Result<(), StorageError>;

    /// Every parseable record in storage order. Malformed rows are skipped.
    fn records(&self) -> Result<Vec<DailyRecord>, StorageError>;

    /// Complete records with `from <= date <= to`, in storage order.
    ///
    /// Records missing a price are skipped with a warning. An unreadable store
    /// yields an empty window.
    fn read_window(&self, from: TradeDate, to: TradeDate) -> Vec<DailyBar> {
        let records = match self.records() {
            Ok(records) => records,
            Err(err) => {
                error!(error = %err, "series unreadable; returning empty window");
                return Vec::new();
            }
        };

        records
            .iter()
            .filter(|record| from <= record.date && record.date <= to)
            .filter_map(|record| {
                let bar = record.complete();
                if bar.is_none() {
                    warn!(date = %record.date, "skipping record with missing prices");
                }
                bar
            })
            .collect()
    }
}

/// In-memory series used by tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemorySeries {
    records: Vec<DailyRecord>,
    unavailable: bool,
}

impl MemorySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<DailyRecord>) -> Self {
        Self {
            records,
            unavailable: false,
        }
    }

    /// A series whose every operation fails with [`StorageError::Unavailable`].
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            unavailable: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable(String::from(
                "memory series marked unavailable",
            )));
        }
        Ok(())
    }
}

impl SeriesStore for MemorySeries {
    fn exists(&self, date: TradeDate) -> Result<bool, StorageError> {
        self.check_available()?;
        Ok(self.records.iter().any(|record| record.date == date))
    }

    fn append(&mut self, record: &DailyRecord) -> Result<(), StorageError> {
        self.check_available()?;
        self.records.push(record.clone());
        Ok(())
    }

    fn records(&self) -> Result<Vec<DailyRecord>, StorageError> {
        self.check_available()?;
        Ok(self.records.clone())
    }
}
