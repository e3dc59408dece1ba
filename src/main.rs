use anyhow::{Context, Result};
use clap::Parser;
use shealth2gpx::{convert_export, write_report, ConvertOptions, TimeStyle};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Converts a Samsung Health export to GPX files.
/// This program is a private tool and not related in any way to Samsung or Samsung Health.
#[derive(Parser, Debug)]
#[command(name = "shealth2gpx", version)]
struct Cli {
    /// Export directory from Samsung Health (contains the jsons folder)
    export_dir: PathBuf,

    /// Worker threads for the conversion (1 = sequential, 0 = all cores)
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Write track times with their UTC offset instead of plain local time
    #[arg(long)]
    time_offset: bool,

    /// Write a CSV report with the outcome of every exercise
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Log every skipped exercise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "shealth2gpx=debug" } else { "shealth2gpx=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let options = ConvertOptions {
        jobs: cli.jobs,
        time_style: if cli.time_offset {
            TimeStyle::LocalOffset
        } else {
            TimeStyle::NaiveLocal
        },
    };

    let summary = convert_export(&cli.export_dir, &options)?;

    if let Some(report_path) = &cli.report {
        write_report(report_path, &summary)
            .with_context(|| format!("Could not write report to {}", report_path.display()))?;
    }

    println!("\n🎯 CONVERSION SUMMARY");
    println!("=====================");
    println!("Exercises in ledger: {}", summary.rows.len());
    println!("✅ Tracks written: {}", summary.written());
    println!("Empty tracks: {}", summary.empty());
    println!("Skipped: {}", summary.skipped());
    println!("❌ Failed: {}", summary.failed());
    println!("📁 Output folder: {}", summary.output_root.display());

    Ok(())
}
