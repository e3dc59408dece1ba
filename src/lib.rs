//! Samsung Health export to GPX converter.
//!
//! Reads the exercise ledger of a Samsung Health data export, matches every
//! exercise with its location sample file and writes one GPX 1.1 track per
//! exercise to `<export>/SHealth2GPX/<category>/<start time>.gpx`.
//!
//! ```rust,no_run
//! use shealth2gpx::{convert_export, ConvertOptions};
//! use std::path::Path;
//!
//! let summary = convert_export(Path::new("samsunghealth_export"), &ConvertOptions::default()).unwrap();
//! println!("Wrote {} tracks", summary.written());
//! ```

pub mod converter;
pub mod error;
pub mod exercise_types;
pub mod file_index;
pub mod gpx_writer;
pub mod ledger;
pub mod report;
pub mod sample_extractor;

pub use converter::{
    convert_export, ConversionSummary, ConvertOptions, RowOutcome, RowReport, SkipReason,
};
pub use error::{ConvertError, LedgerError, SampleError, StructureError, WriteError};
pub use exercise_types::category_label;
pub use file_index::{build_index, FileIndex};
pub use gpx_writer::{write_track, TimeStyle};
pub use ledger::{read_ledger, ExerciseRecord};
pub use report::write_report;
pub use sample_extractor::{extract, GeoSample};
