//! # Aurum Store
//!
//! Append-only CSV storage for the daily per-gram series.
//!
//! The file layout is header-first with the columns
//! `date,open,high,low,close`. Prices are written with 4 decimals and absent
//! prices as empty fields. Columns are resolved by header name on read, so a
//! file from an older layout that lacks a price column still loads with that
//! price absent.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use aurum_core::{DailyRecord, SeriesStore, StorageError, TradeDate};
use csv::{Reader, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::{debug, info, warn};

/// Column order of a newly created series file.
pub const HEADER: [&str; 5] = ["date", "open", "high", "low", "close"];

/// Series persisted as a CSV file.
///
/// Every read loads the whole file. A missing file reads as an empty series
/// and is created by the first append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSeries {
    path: PathBuf,
}

impl CsvSeries {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inspects the end of the file before an append.
    fn tail(&self) -> Result<Tail, StorageError> {
        let mut file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Tail::Empty),
            Err(err) => return Err(unavailable(&self.path, err)),
        };
        let len = file
            .metadata()
            .map_err(|err| unavailable(&self.path, err))?
            .len();
        if len == 0 {
            return Ok(Tail::Empty);
        }

        let mut last = [0_u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|err| unavailable(&self.path, err))?;
        Ok(if last[0] == b'\n' {
            Tail::Terminated
        } else {
            Tail::Unterminated
        })
    }

    /// Opens the file for reading with columns resolved, or `None` when it does not exist.
    fn open_reader(&self) -> Result<Option<(Reader<fs::File>, Columns)>, StorageError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(unavailable(&self.path, err)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);
        let columns = Columns::resolve(reader.headers().map_err(csv_error)?)?;
        Ok(Some((reader, columns)))
    }
}

/// State of the last line of the series file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    Empty,
    Terminated,
    Unterminated,
}

impl SeriesStore for CsvSeries {
    /// Matches on the date column alone: a row whose prices do not parse
    /// still claims its date.
    fn exists(&self, date: TradeDate) -> Result<bool, StorageError> {
        let Some((mut reader, columns)) = self.open_reader()? else {
            return Ok(false);
        };
        for row in reader.records() {
            let Ok(row) = row else {
                continue;
            };
            if columns.date_of(&row) == Some(date) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn append(&mut self, record: &DailyRecord) -> Result<(), StorageError> {
        let tail = self.tail()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| unavailable(parent, err))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| unavailable(&self.path, err))?;
        if tail == Tail::Unterminated {
            warn!(path = %self.path.display(), "series file lacks a final newline");
            file.write_all(b"\n")
                .map_err(|err| unavailable(&self.path, err))?;
        }
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if tail == Tail::Empty {
            debug!(path = %self.path.display(), "writing series header");
            writer.write_record(HEADER).map_err(csv_error)?;
        }
        writer
            .write_record([
                record.date.format_iso(),
                format_price(record.open),
                format_price(record.high),
                format_price(record.low),
                format_price(record.close),
            ])
            .map_err(csv_error)?;
        writer.flush().map_err(|err| unavailable(&self.path, err))?;

        info!(path = %self.path.display(), date = %record.date, "record appended");
        Ok(())
    }

    fn records(&self) -> Result<Vec<DailyRecord>, StorageError> {
        let Some((mut reader, columns)) = self.open_reader()? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    warn!(line, error = %err, "skipping unreadable series row");
                    continue;
                }
            };
            match columns.parse(&row) {
                Ok(record) => records.push(record),
                Err(reason) => warn!(line, %reason, "skipping malformed series row"),
            }
        }
        Ok(records)
    }
}

/// Field positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
}

impl Columns {
    fn resolve(header: &StringRecord) -> Result<Self, StorageError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|column| column.eq_ignore_ascii_case(name))
        };

        let date = find("date").ok_or_else(|| {
            StorageError::Unavailable(String::from("series header has no 'date' column"))
        })?;
        Ok(Self {
            date,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close: find("close"),
        })
    }

    fn date_of(&self, row: &StringRecord) -> Option<TradeDate> {
        row.get(self.date).and_then(|raw| TradeDate::parse(raw).ok())
    }

    fn parse(&self, row: &StringRecord) -> Result<DailyRecord, String> {
        let raw_date = row.get(self.date).unwrap_or_default();
        let date = TradeDate::parse(raw_date).map_err(|err| err.to_string())?;

        Ok(DailyRecord::new(
            date,
            price(row, self.open, "open")?,
            price(row, self.high, "high")?,
            price(row, self.low, "low")?,
            price(row, self.close, "close")?,
        ))
    }
}

fn price(row: &StringRecord, column: Option<usize>, name: &str) -> Result<Option<f64>, String> {
    let Some(raw) = column.and_then(|index| row.get(index)) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("{name} is not numeric: '{raw}'"))
}

fn format_price(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}

fn unavailable(path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Unavailable(format!("{}: {err}", path.display()))
}

fn csv_error(err: csv::Error) -> StorageError {
    if err.is_io_error() {
        StorageError::Unavailable(err.to_string())
    } else {
        StorageError::Encoding(err.to_string())
    }
}
