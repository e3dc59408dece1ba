//! Reads Samsung Health location sample files.
//!
//! A sample file is a JSON array of objects. Only `latitude`, `longitude`
//! and `start_time` (epoch milliseconds) are used; everything else the
//! watch recorded is ignored.

use crate::error::SampleError;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One recorded position
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoSample {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "start_time", deserialize_with = "epoch_millis")]
    pub timestamp_ms: i64,
}

// Some exports store the timestamp as a float (1600000000000.0)
fn epoch_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => Ok(value as i64),
        _ => Err(serde::de::Error::custom(format!(
            "start_time {} is not an integral millisecond timestamp",
            number
        ))),
    }
}

/// Parse a sample file, keeping the order of the entries as found
pub fn extract(path: &Path) -> Result<Vec<GeoSample>, SampleError> {
    let file = File::open(path).map_err(|source| SampleError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| SampleError::Json {
        path: path.to_path_buf(),
        source,
    })
}
