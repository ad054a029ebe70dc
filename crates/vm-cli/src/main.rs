use std::{path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use thiserror::Error;
use tracing::info;
use vm_common::{
    api::CandidateRequest,
    logging,
    matching::{
        pipeline::{MatchingEngine, MatchingEngineConfig, MatchingError},
        prefilter::PrefilterConfig,
        ranking::CandidateResults,
    },
    run_id,
    store::{Snapshot, StoreError},
};

const APP_NAME: &str = "vm-match";

#[derive(Debug, Error)]
enum CliError {
    #[error("snapshot error: {0}")]
    Snapshot(#[from] StoreError),
    #[error("event {event_id}: {source}")]
    Matching {
        event_id: i64,
        #[source]
        source: MatchingError,
    },
    #[error("failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full results as pretty JSON
    Json,
    /// One tab separated line per ranked candidate
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "vm-match", about = "Rank volunteer candidates for an event")]
struct Cli {
    /// JSON snapshot with events, volunteers and optional participation rows
    #[arg(long, env = "VM_SNAPSHOT")]
    snapshot: PathBuf,

    /// Event to compute candidates for
    #[arg(long)]
    event_id: i64,

    /// Comma separated keywords replacing the event's stored ones
    #[arg(long)]
    custom_keywords: Option<String>,

    /// Inclusive lower bound on total score
    #[arg(long)]
    min_score: Option<f64>,

    /// Maximum number of candidates to print
    #[arg(long)]
    limit: Option<usize>,

    /// Upper bound on volunteers handed to scoring
    #[arg(long, env = "VM_PREFILTER_MAX_CANDIDATES", default_value_t = 2000)]
    max_candidates: usize,

    /// Reference time for recency (RFC 3339); defaults to now
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

impl Cli {
    fn request(&self) -> CandidateRequest {
        CandidateRequest {
            event_id: self.event_id,
            custom_keywords: self.custom_keywords.clone(),
            min_score: self.min_score,
            limit: self.limit,
            force_refresh: false,
        }
    }

    fn engine_config(&self) -> MatchingEngineConfig {
        MatchingEngineConfig {
            prefilter: PrefilterConfig {
                max_candidates: self.max_candidates.max(1),
            },
            ..MatchingEngineConfig::from_env()
        }
    }
}

fn render_table(results: &CandidateResults) -> String {
    let mut out = String::from("rank\tvolunteer_id\tscore\tmatched_keywords\tscore_breakdown\n");
    for row in results.export_rows() {
        out.push_str(&format!(
            "{}\t{}\t{:.2}\t{}\t{}\n",
            row.rank, row.volunteer_id, row.total_score, row.matched_keywords, row.score_breakdown
        ));
    }
    out
}

fn run() -> Result<(), CliError> {
    dotenv().ok();
    logging::init(&logging::LogSettings::from_env(APP_NAME));

    let cli = Cli::parse();
    info!(run_id = run_id::get(), snapshot = %cli.snapshot.display(), "starting vm-match");

    let (events, volunteers, participation) = Snapshot::load(&cli.snapshot)?.into_stores();

    let mut engine =
        MatchingEngine::new(cli.engine_config(), Arc::new(events), Arc::new(volunteers));
    if let Some(participation) = participation {
        engine = engine.with_participation_store(Arc::new(participation));
    }

    let request = cli.request();
    let results = engine
        .compute_candidates_at(&request, cli.as_of.unwrap_or_else(Utc::now))
        .map_err(|source| CliError::Matching {
            event_id: cli.event_id,
            source,
        })?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Table => print!("{}", render_table(&results)),
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{APP_NAME} failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SNAPSHOT: &str = r#"{
        "events": [{"id": 1, "event_type": "career_fair", "title": "Fall Career Fair"}],
        "volunteers": [
            {"id": 2, "title": "Career Coach", "local_status": "local"},
            {"id": 3, "title": "Pastry Chef"}
        ]
    }"#;

    #[test]
    fn parses_arguments_into_request() {
        let cli = Cli::try_parse_from([
            "vm-match",
            "--snapshot",
            "snap.json",
            "--event-id",
            "7",
            "--custom-keywords",
            "robotics, coding",
            "--limit",
            "5",
            "--max-candidates",
            "50",
            "--as-of",
            "2024-10-01T00:00:00Z",
            "--format",
            "table",
        ])
        .unwrap();

        let request = cli.request();
        assert_eq!(request.event_id, 7);
        assert_eq!(request.limit, Some(5));
        assert_eq!(request.custom_keywords.as_deref(), Some("robotics, coding"));
        assert_eq!(cli.engine_config().prefilter.max_candidates, 50);
        assert_eq!(cli.as_of, Some(Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap()));
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn table_has_one_line_per_candidate() {
        let (events, volunteers, _) = Snapshot::from_json(SNAPSHOT).unwrap().into_stores();
        let engine = MatchingEngine::new(
            MatchingEngineConfig::default(),
            Arc::new(events),
            Arc::new(volunteers),
        );
        let results = engine
            .compute_candidates_at(
                &CandidateRequest::new(1),
                Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap(),
            )
            .unwrap();

        let table = render_table(&results);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("1\t2\t0.80\tcareer\t"));
    }
}
