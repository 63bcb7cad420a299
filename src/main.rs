mod ingest;
mod message;
mod project;
mod series;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use c19_types::InfectionReport;

const OUTPUT_DIR: &str = "output";

// Output file names, shared with the downstream chart tooling.
const FILE_SE_PROVINCE: &str = "se-province.csv";
const FILE_SE_AGG: &str = "se-aggregate.csv";
const FILE_SE_PROVINCE_GROWTH: &str = "se-province-growth.csv";

#[derive(Parser)]
#[command(
    name = "c19_extract",
    about = "Swedish COVID-19 report parser and time-series pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse raw report dumps into records → output/records.{json,csv}
    Extract {
        /// Directory of raw-entry JSON dump files
        #[arg(default_value = ".")]
        dumps: PathBuf,
        /// Directory to write records.json / records.csv into
        #[arg(long, default_value = OUTPUT_DIR)]
        output_path: PathBuf,
    },
    /// Aggregate a records CSV into per-province and national series
    Aggregate {
        /// Records CSV written by the extract phase
        records: PathBuf,
        /// Directory to write the series CSVs into
        #[arg(long, default_value = OUTPUT_DIR)]
        output_path: PathBuf,
    },
    /// Print a simulated exponential trajectory as CSV
    Project {
        /// First day of the simulated span, e.g. 2020-01-01
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the simulated span (inclusive)
        #[arg(long)]
        end: NaiveDate,
        /// Cases on the first day
        #[arg(long, default_value_t = 5)]
        cases: i64,
        /// Day-over-day growth factor
        #[arg(long, default_value_t = 1.5)]
        rate: f64,
    },
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { dumps, output_path } => run_extract(&dumps, &output_path),
        Command::Aggregate {
            records,
            output_path,
        } => run_aggregate(&records, &output_path),
        Command::Project {
            start,
            end,
            cases,
            rate,
        } => run_project(start, end, cases, rate),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  OUTPUT FILE HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn write_json<T: serde::Serialize>(path: &Path, data: &T) {
    let json = serde_json::to_string_pretty(data).expect("JSON serialization failed");
    std::fs::write(path, &json).unwrap_or_else(|e| {
        error!("cannot write {}: {e}", path.display());
        process::exit(1);
    });
    info!("wrote {} ({} bytes)", path.display(), json.len());
}

fn write_csv<T: serde::Serialize>(path: &Path, rows: &[T]) {
    let mut writer = csv::Writer::from_path(path).unwrap_or_else(|e| {
        error!("cannot write {}: {e}", path.display());
        process::exit(1);
    });
    for row in rows {
        writer.serialize(row).expect("CSV serialization failed");
    }
    writer.flush().unwrap_or_else(|e| {
        error!("cannot write {}: {e}", path.display());
        process::exit(1);
    });
    info!("wrote {} ({} rows)", path.display(), rows.len());
}

// ═══════════════════════════════════════════════════════════════════════
//  EXTRACT MODE: raw dumps → structured records
// ═══════════════════════════════════════════════════════════════════════

fn run_extract(dumps: &Path, output_path: &Path) {
    info!("scanning dumps at {}", dumps.display());

    // Phase 1: discover dump files
    let dump_files = ingest::scan_dumps(dumps);
    if dump_files.is_empty() {
        error!("no dump files under {}", dumps.display());
        process::exit(1);
    }
    info!("found {} dump file(s)", dump_files.len());

    // Phase 2: parse every entry through the message parser
    let mut records: Vec<InfectionReport> = Vec::new();
    let mut rejected = 0usize;

    for path in &dump_files {
        let Some(entries) = ingest::load_entries(path) else {
            warn!("skipping unreadable dump {}", path.display());
            continue;
        };
        for entry in entries {
            match message::parse_entry(entry.source.as_deref(), &entry.description, &entry.count)
            {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("{}: {e}", path.display());
                    rejected += 1;
                }
            }
        }
    }
    info!(
        "parsed {} record(s) ({} entries rejected)",
        records.len(),
        rejected
    );

    // Phase 3: per-location tally for the log
    let mut by_location: HashMap<&str, i64> = HashMap::new();
    let mut undisclosed = 0i64;
    for record in &records {
        match record.location.as_deref() {
            Some(location) => *by_location.entry(location).or_insert(0) += record.count,
            None => undisclosed += record.count,
        }
    }
    let mut tallies: Vec<_> = by_location.into_iter().collect();
    tallies.sort_by_key(|(_, count)| std::cmp::Reverse(*count));

    info!("cases by location:");
    for (location, count) in tallies.iter().take(15) {
        info!("  {location}: {count}");
    }
    if undisclosed > 0 {
        info!("  (location undisclosed): {undisclosed}");
    }

    // Phase 4: write output files
    std::fs::create_dir_all(output_path).unwrap_or_else(|e| {
        error!("cannot create {}: {e}", output_path.display());
        process::exit(1);
    });
    write_json(&output_path.join("records.json"), &records);
    write_csv(&output_path.join("records.csv"), &records);
}

// ═══════════════════════════════════════════════════════════════════════
//  AGGREGATE MODE: records CSV → filled series + growth rates
// ═══════════════════════════════════════════════════════════════════════

fn run_aggregate(records_path: &Path, output_path: &Path) {
    let records = ingest::read_records_csv(records_path).unwrap_or_else(|e| {
        error!("cannot read {}: {e}", records_path.display());
        process::exit(1);
    });
    info!(
        "read {} record(s) from {}",
        records.len(),
        records_path.display()
    );

    let complete = records
        .iter()
        .filter(|r| r.location.is_some() && r.date.is_some())
        .count();
    if complete < records.len() {
        warn!(
            "{} record(s) lack a date or location and are left out of the series",
            records.len() - complete
        );
    }

    let provinces = series::province_series(&records);
    if provinces.is_empty() {
        error!("no records with both date and location; nothing to aggregate");
        process::exit(1);
    }
    let national = series::national_series(&provinces);
    let growth = series::province_growth(&provinces);

    info!(
        "series spans {} → {} across {} location(s)",
        national.first().map(|p| p.date).unwrap_or_default(),
        national.last().map(|p| p.date).unwrap_or_default(),
        provinces.len() / national.len()
    );

    std::fs::create_dir_all(output_path).unwrap_or_else(|e| {
        error!("cannot create {}: {e}", output_path.display());
        process::exit(1);
    });
    write_csv(&output_path.join(FILE_SE_PROVINCE), &provinces);
    write_csv(&output_path.join(FILE_SE_AGG), &national);
    write_csv(&output_path.join(FILE_SE_PROVINCE_GROWTH), &growth);
}

// ═══════════════════════════════════════════════════════════════════════
//  PROJECT MODE: simulated exponential trajectory → stdout
// ═══════════════════════════════════════════════════════════════════════

fn run_project(start: NaiveDate, end: NaiveDate, cases: i64, rate: f64) {
    let points = project::infection_projection(start, end, cases, rate);
    if points.is_empty() {
        error!("end date {end} is before start date {start}");
        process::exit(1);
    }

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for point in &points {
        writer.serialize(point).expect("CSV serialization failed");
    }
    writer.flush().expect("cannot write to stdout");
}
