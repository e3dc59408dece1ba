//! Exercise ledger (com.samsung.shealth.exercise.*.csv) parsing.
//!
//! The first line of the export is a metadata preamble
//! (`com.samsung.shealth.exercise,6130001,11`), the column header follows on
//! the second line. Columns carry the full data type prefix
//! (`com.samsung.health.exercise.start_time`) and rows regularly have one
//! more field than the header, so the reader is flexible about row length.

use crate::error::LedgerError;
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const COLUMN_PREFIX: &str = "com.samsung.health.exercise.";

pub const LOCATION_DATA_COLUMN: &str = "location_data";
pub const START_TIME_COLUMN: &str = "start_time";
pub const EXERCISE_TYPE_COLUMN: &str = "exercise_type";

/// One row of the exercise ledger
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRecord {
    /// 1-based position of the row below the header
    pub row: usize,
    pub start_time: String,
    /// Parsed exercise type code, `None` when the field is not an integer
    pub exercise_type: Option<i64>,
    pub exercise_type_raw: String,
    pub location_data: Option<String>,
}

impl ExerciseRecord {
    /// Start time with colons replaced so it can be used as a file name
    pub fn sanitized_start_time(&self) -> String {
        self.start_time.replace(':', "_")
    }

    pub fn output_file_name(&self) -> String {
        format!("{}.gpx", self.sanitized_start_time())
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    location_data: usize,
    start_time: usize,
    exercise_type: usize,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, LedgerError> {
        Ok(Self {
            location_data: find_column(headers, LOCATION_DATA_COLUMN)?,
            start_time: find_column(headers, START_TIME_COLUMN)?,
            exercise_type: find_column(headers, EXERCISE_TYPE_COLUMN)?,
        })
    }
}

/// Locate a column by exact prefixed name, then bare name, then any `.name` suffix
fn find_column(headers: &[String], name: &'static str) -> Result<usize, LedgerError> {
    let prefixed = format!("{}{}", COLUMN_PREFIX, name);
    let suffix = format!(".{}", name);

    headers
        .iter()
        .position(|h| *h == prefixed)
        .or_else(|| headers.iter().position(|h| h == name))
        .or_else(|| headers.iter().position(|h| h.ends_with(&suffix)))
        .ok_or(LedgerError::MissingColumn(name))
}

fn parse_exercise_type(raw: &str) -> Option<i64> {
    if let Ok(code) = raw.parse::<i64>() {
        return Some(code);
    }
    // spreadsheet round trips turn 1002 into 1002.0
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.fract() == 0.0)
        .map(|value| value as i64)
}

// Exports occasionally carry stray non UTF-8 bytes in free text columns,
// only the fields actually used are decoded
fn field(record: &ByteRecord, column: usize) -> String {
    record
        .get(column)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|value| !value.is_empty())
}

/// Read every row of the ledger at `path`, in file order
pub fn read_ledger(path: &Path) -> Result<Vec<ExerciseRecord>, LedgerError> {
    let io_error = |source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let mut reader = BufReader::new(file);

    let mut preamble = Vec::new();
    if reader.read_until(b'\n', &mut preamble).map_err(io_error)? == 0 {
        return Err(LedgerError::MissingHeader);
    }

    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(LedgerError::MissingHeader);
    }
    let columns = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    for (index, result) in csv_reader.byte_records().enumerate() {
        let record = result?;
        let exercise_type_raw = field(&record, columns.exercise_type);

        records.push(ExerciseRecord {
            row: index + 1,
            start_time: field(&record, columns.start_time),
            exercise_type: parse_exercise_type(&exercise_type_raw),
            exercise_type_raw,
            location_data: non_empty(field(&record, columns.location_data)),
        });
    }

    Ok(records)
}
