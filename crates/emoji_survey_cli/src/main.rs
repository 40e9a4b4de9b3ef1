//! Operator CLI for the survey store.
//!
//! # Responsibility
//! - Inspect, export and reset a survey database from a terminal.
//! - Produce share links and render shared reports without the UI.

use clap::{Parser, Subcommand};
use emoji_survey_core::db::open_db;
use emoji_survey_core::{
    build_share_url, generate_report, init_logging_from_env, resolve_db_path, snapshot_from_url,
    ServiceResult, SqliteResponseRepository, SurveyService,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Inspect and maintain an emoji survey database.
///
/// Logging is enabled by EMOJI_SURVEY_LOG_DIR (absolute directory) and tuned
/// by EMOJI_SURVEY_LOG_LEVEL.
#[derive(Parser, Debug)]
#[command(name = "emoji-survey", version)]
struct Cli {
    /// Survey database file [default: $EMOJI_SURVEY_DB_PATH, then a temp file]
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Print core linkage info
    Ping,
    /// Response count, draft presence and database size
    Stats,
    /// All responses as JSON lines
    List,
    /// Dashboard aggregates as JSON
    Summary,
    /// Write emoji_survey_<date>.csv
    Export {
        /// Target directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Print a share link for the current counts
    Share { base_url: String },
    /// Render the report carried by a share link
    Report { url: String },
    /// Remove one response
    Delete { id: String },
    /// Discard the in-progress draft
    ClearDraft,
    /// Remove every response and the draft
    Reset,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging_from_env() {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let db = cli.db.as_deref();

    match &cli.command {
        Command::Ping => Ok(format!(
            "emoji_survey_core ping={} version={}",
            emoji_survey_core::ping(),
            emoji_survey_core::core_version()
        )),
        Command::Report { url } => Ok(render_report(url)),
        Command::Stats => with_service(db, |service| service.stats()).map(|stats| {
            format!(
                "responses={} draft={} size_bytes={}",
                stats.total_responses,
                if stats.has_draft { "yes" } else { "no" },
                stats.database_size_bytes
            )
        }),
        Command::List => {
            let responses = with_service(db, |service| service.list_responses())?;
            let lines = responses
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| err.to_string())?;
            Ok(lines.join("\n"))
        }
        Command::Summary => {
            let summary = with_service(db, |service| service.dashboard_summary())?;
            serde_json::to_string_pretty(&summary).map_err(|err| err.to_string())
        }
        Command::Export { dir } => {
            let today = chrono::Local::now().date_naive();
            let (path, export) = with_service(db, |service| service.export_to_dir(dir, today))?;
            Ok(format!(
                "exported {} response(s) to {}",
                export.row_count,
                path.display()
            ))
        }
        Command::Share { base_url } => {
            let snapshot = with_service(db, |service| service.share_snapshot())?;
            Ok(build_share_url(base_url, &snapshot))
        }
        Command::Delete { id } => {
            with_service(db, |service| service.delete_response(id))?;
            Ok(format!("deleted {id}"))
        }
        Command::ClearDraft => {
            with_service(db, |service| service.clear_draft())?;
            Ok("draft cleared".to_string())
        }
        Command::Reset => {
            with_service(db, |service| service.clear_all())?;
            log::info!("event=cli_reset module=cli status=ok");
            Ok("all survey data removed".to_string())
        }
    }
}

fn with_service<T>(
    db: Option<&str>,
    f: impl FnOnce(&SurveyService<SqliteResponseRepository<'_>>) -> ServiceResult<T>,
) -> Result<T, String> {
    let db_path = resolve_db_path(db);
    let conn =
        open_db(&db_path).map_err(|err| format!("cannot open {}: {err}", db_path.display()))?;
    let repo = SqliteResponseRepository::try_new(&conn).map_err(|err| err.to_string())?;
    f(&SurveyService::new(repo)).map_err(|err| err.to_string())
}

fn render_report(url: &str) -> String {
    let snapshot = snapshot_from_url(url);
    let report = generate_report(snapshot.as_ref());

    let mut lines = vec![
        report.title.to_string(),
        report.summary,
        format!("Gerado em: {}", report.generated_at),
    ];
    for metric in report.metrics {
        lines.push(format!(
            "{}: {} ({}%)",
            metric.label, metric.value, metric.percentage
        ));
    }
    lines.join("\n")
}
