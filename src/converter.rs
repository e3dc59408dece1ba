//! Export directory conversion.
//!
//! Validates the export layout, indexes the sample files, then walks the
//! exercise ledger and turns every row that has a sample file and a known
//! exercise type into `SHealth2GPX/<category>/<start time>.gpx`.

use crate::error::{Result, StructureError};
use crate::exercise_types::category_label;
use crate::file_index::{build_index, FileIndex};
use crate::gpx_writer::{write_track, TimeStyle};
use crate::ledger::{read_ledger, ExerciseRecord};
use crate::report::track_length_km;
use crate::sample_extractor::extract;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const JSONS_DIR: &str = "jsons";
pub const SAMPLE_DIR: &str = "com.samsung.shealth.exercise";
pub const LEDGER_PREFIX: &str = "com.samsung.shealth.exercise.2";
pub const OUTPUT_DIR: &str = "SHealth2GPX";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Worker threads for the per-row conversion; 1 runs sequentially, 0 uses every core
    pub jobs: usize,
    pub time_style: TimeStyle,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            time_style: TimeStyle::default(),
        }
    }
}

/// Why a ledger row did not produce a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingLocationData,
    UnknownSampleFile(String),
    InvalidExerciseType(String),
    UnknownExerciseType(i64),
    MissingStartTime,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingLocationData => write!(f, "no location data"),
            SkipReason::UnknownSampleFile(name) => write!(f, "sample file {} not found", name),
            SkipReason::InvalidExerciseType(raw) => write!(f, "invalid exercise type '{}'", raw),
            SkipReason::UnknownExerciseType(code) => write!(f, "unknown exercise type {}", code),
            SkipReason::MissingStartTime => write!(f, "no start time"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Written {
        path: PathBuf,
        points: usize,
        distance_km: f64,
    },
    /// Sample file without positions, nothing is left on disk
    EmptyTrack { path: PathBuf },
    Skipped(SkipReason),
    Failed { message: String },
}

impl RowOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            RowOutcome::Written { .. } => "written",
            RowOutcome::EmptyTrack { .. } => "empty",
            RowOutcome::Skipped(_) => "skipped",
            RowOutcome::Failed { .. } => "failed",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            RowOutcome::Written { .. } => String::new(),
            RowOutcome::EmptyTrack { .. } => "sample file has no positions".to_string(),
            RowOutcome::Skipped(reason) => reason.to_string(),
            RowOutcome::Failed { message } => message.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowReport {
    pub record: ExerciseRecord,
    pub category: Option<&'static str>,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub output_root: PathBuf,
    /// One entry per ledger row, in ledger order
    pub rows: Vec<RowReport>,
}

impl ConversionSummary {
    fn count(&self, status: &str) -> usize {
        self.rows.iter().filter(|r| r.outcome.status() == status).count()
    }

    pub fn written(&self) -> usize {
        self.count("written")
    }

    pub fn empty(&self) -> usize {
        self.count("empty")
    }

    pub fn skipped(&self) -> usize {
        self.count("skipped")
    }

    pub fn failed(&self) -> usize {
        self.count("failed")
    }
}

/// Everything needed to convert one row, resolved before any file is written
#[derive(Debug)]
struct ConversionJob<'a> {
    slot: usize,
    sample_path: &'a Path,
    track_name: String,
    output_dir: PathBuf,
    output_path: PathBuf,
}

/// Top level ledger file, first by name when the export holds several
fn find_ledger(export_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(export_dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(LEDGER_PREFIX) && entry.path().is_file() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

fn plan_row<'a>(
    record: &ExerciseRecord,
    index: &'a FileIndex,
    output_root: &Path,
) -> std::result::Result<(&'static str, &'a Path), SkipReason> {
    let location_data = record
        .location_data
        .as_deref()
        .ok_or(SkipReason::MissingLocationData)?;
    let sample_path = index
        .get(location_data)
        .ok_or_else(|| SkipReason::UnknownSampleFile(location_data.to_string()))?;
    let code = record
        .exercise_type
        .ok_or_else(|| SkipReason::InvalidExerciseType(record.exercise_type_raw.clone()))?;
    let category = category_label(code).ok_or(SkipReason::UnknownExerciseType(code))?;
    if record.start_time.is_empty() {
        return Err(SkipReason::MissingStartTime);
    }

    debug!(
        "Row {}: {} -> {}",
        record.row,
        sample_path.display(),
        output_root.join(category).join(record.output_file_name()).display()
    );
    Ok((category, sample_path))
}

fn run_job(job: &ConversionJob<'_>, time_style: TimeStyle) -> RowOutcome {
    if let Err(e) = fs::create_dir_all(&job.output_dir) {
        warn!("Could not create {}: {}", job.output_dir.display(), e);
        return RowOutcome::Failed {
            message: e.to_string(),
        };
    }

    let samples = match extract(job.sample_path) {
        Ok(samples) => samples,
        Err(e) => {
            warn!("Skipping {}: {}", job.track_name, e);
            return RowOutcome::Failed {
                message: e.to_string(),
            };
        }
    };

    match write_track(&job.output_path, &job.track_name, &samples, time_style) {
        Ok(true) => RowOutcome::Written {
            path: job.output_path.clone(),
            points: samples.len(),
            distance_km: track_length_km(&samples),
        },
        Ok(false) => {
            debug!("{} has no positions, no track written", job.track_name);
            RowOutcome::EmptyTrack {
                path: job.output_path.clone(),
            }
        }
        Err(e) => {
            warn!("Could not write track for {}: {}", job.track_name, e);
            RowOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}

/// Run jobs on a rayon pool. Jobs sharing an output path stay together and
/// keep ledger order so the last row still wins, as in a sequential run.
fn run_parallel(
    jobs: &[ConversionJob<'_>],
    options: &ConvertOptions,
) -> Result<Vec<(usize, RowOutcome)>> {
    let mut group_of: HashMap<&Path, usize> = HashMap::new();
    let mut groups: Vec<Vec<&ConversionJob<'_>>> = Vec::new();
    for job in jobs {
        let group = *group_of.entry(job.output_path.as_path()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(job);
    }

    let threads = if options.jobs == 0 { num_cpus::get() } else { options.jobs };
    info!("Converting {} tracks on {} threads", jobs.len(), threads);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    let outcomes: Vec<(usize, RowOutcome)> = pool.install(|| {
        groups
            .par_iter()
            .flat_map_iter(|group| {
                group
                    .iter()
                    .map(|job| (job.slot, run_job(job, options.time_style)))
                    .collect::<Vec<_>>()
            })
            .collect()
    });
    Ok(outcomes)
}

/// Convert a Samsung Health export directory into GPX tracks.
///
/// Fails only when the directory does not look like an export or the ledger
/// cannot be read. Rows without a usable sample file or with an unknown
/// exercise type are skipped, and a broken sample file only fails its own row.
pub fn convert_export(export_dir: &Path, options: &ConvertOptions) -> Result<ConversionSummary> {
    if !export_dir.join(JSONS_DIR).is_dir() {
        return Err(StructureError::MissingJsonsFolder(export_dir.to_path_buf()).into());
    }

    let ledger_path = find_ledger(export_dir)?
        .ok_or_else(|| StructureError::MissingLedger(export_dir.to_path_buf()))?;

    let sample_root = export_dir.join(JSONS_DIR).join(SAMPLE_DIR);
    if !sample_root.is_dir() {
        return Err(StructureError::MissingSampleRoot(sample_root).into());
    }

    let index = build_index(&sample_root)?;
    info!("Indexed {} sample files in {}", index.len(), sample_root.display());

    let records = read_ledger(&ledger_path)?;
    info!("Read {} exercises from {}", records.len(), ledger_path.display());

    let output_root = export_dir.join(OUTPUT_DIR);
    let mut categories = Vec::with_capacity(records.len());
    let mut outcomes: Vec<Option<RowOutcome>> = Vec::with_capacity(records.len());
    let mut jobs = Vec::new();

    for (slot, record) in records.iter().enumerate() {
        match plan_row(record, &index, &output_root) {
            Ok((category, sample_path)) => {
                let output_dir = output_root.join(category);
                jobs.push(ConversionJob {
                    slot,
                    sample_path,
                    track_name: record.location_data.clone().unwrap_or_default(),
                    output_path: output_dir.join(record.output_file_name()),
                    output_dir,
                });
                categories.push(Some(category));
                outcomes.push(None);
            }
            Err(reason) => {
                debug!("Skipping row {}: {}", record.row, reason);
                categories.push(record.exercise_type.and_then(category_label));
                outcomes.push(Some(RowOutcome::Skipped(reason)));
            }
        }
    }

    let finished: Vec<(usize, RowOutcome)> = if options.jobs == 1 {
        jobs.iter()
            .map(|job| (job.slot, run_job(job, options.time_style)))
            .collect()
    } else {
        run_parallel(&jobs, options)?
    };
    for (slot, outcome) in finished {
        outcomes[slot] = Some(outcome);
    }

    let rows = records
        .into_iter()
        .zip(categories)
        .zip(outcomes)
        .map(|((record, category), outcome)| RowReport {
            record,
            category,
            outcome: outcome.unwrap_or(RowOutcome::Failed {
                message: "not processed".to_string(),
            }),
        })
        .collect();

    let summary = ConversionSummary { output_root, rows };
    info!(
        "Wrote {} tracks to {} ({} empty, {} skipped, {} failed)",
        summary.written(),
        summary.output_root.display(),
        summary.empty(),
        summary.skipped(),
        summary.failed()
    );
    Ok(summary)
}
