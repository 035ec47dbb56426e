// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
use berth_plan_core::prelude::{TimeInterval, TimePoint};
use berth_plan_model::prelude::{
    BerthIdentifier, EntryDraft, EntryIdentifier, Fleet, FleetView, GenerationIdentifier,
    HumanFix, ScheduleEntry, SnapshotLoader, SnapshotLoaderError, VesselIdentifier,
    to_time_point, to_utc,
};
use berth_plan_solver::prelude::{
    AllocationScheduler, Clock, ConfigError, DisplacementFeedbackLogger, FixedClock,
    InMemoryVersionStore, PlanConfig, PlanError, ReconciliationWorkflow, SystemClock,
    VersionStore, VesselHintEstimator, WeatherAdjusted,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Cli {
    snapshot: PathBuf,
    fixes: Option<PathBuf>,
    config: Option<PathBuf>,
    now: Option<String>,
    out: Option<PathBuf>,
}

fn parse_cli() -> Cli {
    let mut args = std::env::args().skip(1);

    let mut snapshot = PathBuf::from("snapshots/harbour.json");
    let mut fixes: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut now: Option<String> = None;
    let mut out: Option<PathBuf> = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "--snapshot" => snapshot = args.next().map(PathBuf::from).unwrap_or(snapshot),
            "--fixes" => fixes = args.next().map(PathBuf::from),
            "--config" => config = args.next().map(PathBuf::from),
            "--now" => now = args.next(),
            "--out" => out = args.next().map(PathBuf::from),
            other => tracing::warn!("Ignoring unknown argument {}", other),
        }
    }

    Cli {
        snapshot,
        fixes,
        config,
        now,
        out,
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
enum CliError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(ConfigError),
    Snapshot(SnapshotLoaderError),
    Plan(PlanError),
    BadTimestamp(String),
    EmptySnapshot,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            Json(e) => write!(f, "JSON error: {e}"),
            Config(e) => write!(f, "config error: {e}"),
            Snapshot(e) => write!(f, "snapshot error: {e}"),
            Plan(e) => write!(f, "{e} (status {})", e.kind().status_hint()),
            BadTimestamp(s) => write!(f, "--now expects an RFC 3339 timestamp, got {s:?}"),
            EmptySnapshot => write!(f, "snapshot contains no vessels"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<SnapshotLoaderError> for CliError {
    fn from(e: SnapshotLoaderError) -> Self {
        CliError::Snapshot(e)
    }
}

impl From<PlanError> for CliError {
    fn from(e: PlanError) -> Self {
        CliError::Plan(e)
    }
}

/// One line of a fix file: move `vessel` to `berth` for `[start, end)`.
#[derive(Debug, Deserialize)]
struct FixRecord {
    vessel: u64,
    berth: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Serialize)]
struct EntryRecord {
    entry: EntryIdentifier,
    vessel: VesselIdentifier,
    vessel_name: String,
    berth: BerthIdentifier,
    berth_name: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    superseded_by: Option<EntryIdentifier>,
}

#[derive(Serialize)]
struct FeedbackSummary {
    recorded_at: DateTime<Utc>,
    error_minutes: f64,
    pairs: usize,
}

#[derive(Serialize)]
struct RunReport {
    generation: GenerationIdentifier,
    built_at: DateTime<Utc>,
    entries: Vec<EntryRecord>,
    unscheduled: Vec<VesselIdentifier>,
    feedback: Option<FeedbackSummary>,
}

fn entry_record(fleet: &Fleet, e: &ScheduleEntry) -> Result<EntryRecord, CliError> {
    let (start, end) = e.planned().into_inner();
    Ok(EntryRecord {
        entry: e.id(),
        vessel: e.vessel(),
        vessel_name: fleet
            .vessel(e.vessel())
            .map(|v| v.name().to_string())
            .unwrap_or_default(),
        berth: e.berth(),
        berth_name: fleet
            .berth(e.berth())
            .map(|b| b.name().to_string())
            .unwrap_or_default(),
        start: to_utc(start)?,
        end: to_utc(end)?,
        superseded_by: e.superseded_by(),
    })
}

fn load_fixes(
    path: &Path,
    generation: GenerationIdentifier,
) -> Result<Vec<HumanFix>, CliError> {
    let records: Vec<FixRecord> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    Ok(records
        .into_iter()
        .map(|r| {
            HumanFix::new(
                generation,
                VesselIdentifier::new(r.vessel),
                BerthIdentifier::new(r.berth),
                TimeInterval::new(to_time_point(r.start), to_time_point(r.end)),
            )
        })
        .collect())
}

fn run(cli: &Cli) -> Result<RunReport, CliError> {
    let config = match &cli.config {
        Some(p) => PlanConfig::from_path(p)?,
        None => PlanConfig::default(),
    };

    let fleet = SnapshotLoader::new().from_path(&cli.snapshot)?;
    let fleet_generation = fleet.latest_generation().ok_or(CliError::EmptySnapshot)?;
    tracing::info!(
        "Loaded {} with {} berths and {} vessels",
        cli.snapshot.display(),
        fleet.berths().len(),
        fleet.vessel_count()
    );

    let clock: Box<dyn Clock> = match &cli.now {
        Some(s) => {
            let at = DateTime::parse_from_rfc3339(s)
                .map_err(|_| CliError::BadTimestamp(s.clone()))?
                .with_timezone(&Utc);
            Box::new(FixedClock::new(to_time_point(at)))
        }
        None => Box::new(SystemClock),
    };
    let built_at: TimePoint<i64> = clock.now();

    let estimator = Arc::new(WeatherAdjusted::new(VesselHintEstimator::new(
        config.scheduler.default_duration(),
    )));
    let scheduler =
        AllocationScheduler::new(&*clock, &config.scheduler).with_estimator(estimator);
    let schedule = scheduler.build_for_generation(&fleet, fleet_generation)?;

    let store = InMemoryVersionStore::new();
    let generation = store
        .append_generation(schedule.iter().map(EntryDraft::from).collect())
        .map_err(PlanError::from)?;

    let mut feedback = None;
    if let Some(path) = &cli.fixes {
        let fixes = load_fixes(path, generation)?;
        let logger = DisplacementFeedbackLogger::new(&*clock, &config.feedback)?;
        let workflow = ReconciliationWorkflow::new(&store, &fleet, &logger);
        let outcome = workflow.apply_vessel_fixes(generation, &fixes)?;
        if let Some(rec) = outcome.feedback() {
            feedback = Some(FeedbackSummary {
                recorded_at: to_utc(rec.recorded_at())?,
                error_minutes: rec.error(),
                pairs: rec.pairs(),
            });
        }
    }

    let entries = store
        .history_for_generation(generation)
        .map_err(PlanError::from)?
        .iter()
        .map(|e| entry_record(&fleet, e))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RunReport {
        generation,
        built_at: to_utc(built_at)?,
        entries,
        unscheduled: schedule.unscheduled().to_vec(),
        feedback,
    })
}

fn main() -> ExitCode {
    enable_tracing();
    let cli = parse_cli();

    let report = match run(&cli) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let written = serde_json::to_string_pretty(&report)
        .map_err(CliError::from)
        .and_then(|json| match &cli.out {
            Some(path) => File::create(path)
                .and_then(|mut f| f.write_all(json.as_bytes()))
                .map_err(CliError::from),
            None => {
                println!("{json}");
                Ok(())
            }
        });

    match written {
        Ok(()) => {
            tracing::info!(
                "Wrote {} entr(y/ies) for {}",
                report.entries.len(),
                report.generation
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to write report: {}", e);
            ExitCode::FAILURE
        }
    }
}
