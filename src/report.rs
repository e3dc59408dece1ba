//! Per-row conversion report.
//!
//! Optional CSV written next to (not inside) the GPX tree so users can see
//! which exercises were converted and why the others were not.

use crate::converter::{ConversionSummary, RowOutcome};
use crate::sample_extractor::GeoSample;
use csv::Writer;
use geo::{point, HaversineDistance};
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    row: usize,
    location_data: &'a str,
    exercise_type: &'a str,
    category: &'a str,
    output_file: String,
    points: usize,
    distance_km: f64,
    status: &'static str,
    detail: String,
}

/// Track length in kilometres along consecutive samples
pub fn track_length_km(samples: &[GeoSample]) -> f64 {
    let meters: f64 = samples
        .windows(2)
        .map(|pair| {
            let a = point!(x: pair[0].longitude, y: pair[0].latitude);
            let b = point!(x: pair[1].longitude, y: pair[1].latitude);
            a.haversine_distance(&b)
        })
        .sum();
    meters / 1000.0
}

pub fn write_report(path: &Path, summary: &ConversionSummary) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_path(path)?;

    for report in &summary.rows {
        let record = &report.record;
        let (output_file, points, distance_km) = match &report.outcome {
            RowOutcome::Written {
                path,
                points,
                distance_km,
            } => (path.display().to_string(), *points, (distance_km * 1000.0).round() / 1000.0),
            RowOutcome::EmptyTrack { path } => (path.display().to_string(), 0, 0.0),
            RowOutcome::Skipped(_) | RowOutcome::Failed { .. } => (String::new(), 0, 0.0),
        };

        wtr.serialize(ReportRow {
            row: record.row,
            location_data: record.location_data.as_deref().unwrap_or_default(),
            exercise_type: &record.exercise_type_raw,
            category: report.category.unwrap_or_default(),
            output_file,
            points,
            distance_km,
            status: report.outcome.status(),
            detail: report.outcome.detail(),
        })?;
    }

    wtr.flush()?;
    info!("Conversion report saved to {}", path.display());
    Ok(())
}
