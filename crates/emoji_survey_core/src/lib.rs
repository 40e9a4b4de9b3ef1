//! Core domain logic for the emoji usage survey.
//! This crate is the single source of truth for survey invariants.

pub mod analytics;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod share;

use std::path::PathBuf;

pub use analytics::{
    dashboard_summary, distribution_by_age_bracket, distribution_by_clarity, distribution_by_day,
    distribution_by_gender, AgeBracket, AgeBracketDistribution, DailyDistribution,
    DashboardSummary, GenderDistribution, ImpactDistribution,
};
pub use export::csv::{
    build_export, export_file_name, render_csv, write_export, CsvExport, ExportError, CSV_HEADERS,
};
pub use logging::{default_log_level, init_logging, init_logging_from_env, logging_status};
pub use model::draft::SurveyDraft;
pub use model::response::{
    now_timestamp, Frequency, Gender, Impact, ResponseId, SurveyResponse, ValidationError,
    AGE_MAX, AGE_MIN,
};
pub use repo::response_repo::{
    RepoError, RepoResult, ResponseFilter, ResponseRepository, SqliteResponseRepository,
    StoreStats,
};
pub use service::survey_service::{ServiceError, ServiceResult, SurveyService};
pub use share::link::{
    build_share_url, decode_share_token, encode_share_token, share_token_from_url,
    snapshot_from_url, ShareSnapshot, SHARE_QUERY_PARAM,
};
pub use share::report::{generate_report, generate_report_at, ReportMetric, ShareReport};

/// Environment variable naming the survey database file.
pub const DB_PATH_ENV: &str = "EMOJI_SURVEY_DB_PATH";

const DEFAULT_DB_FILE_NAME: &str = "emoji_survey.sqlite3";

/// Picks the database file: explicit path, then `EMOJI_SURVEY_DB_PATH`,
/// then a file in the system temp directory.
pub fn resolve_db_path(explicit: Option<&str>) -> PathBuf {
    let from_env = std::env::var(DB_PATH_ENV).ok();
    let resolved = [explicit, from_env.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    resolved
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping, resolve_db_path, DB_PATH_ENV};
    use std::path::PathBuf;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    // The environment is process-wide: keep every `EMOJI_SURVEY_DB_PATH` case here.
    #[test]
    fn db_path_prefers_explicit_then_environment_then_temp_dir() {
        let fallback = std::env::temp_dir().join("emoji_survey.sqlite3");

        std::env::set_var(DB_PATH_ENV, "/env/survey.sqlite3");
        assert_eq!(
            resolve_db_path(Some(" /data/survey.sqlite3 ")),
            PathBuf::from("/data/survey.sqlite3")
        );
        assert_eq!(resolve_db_path(None), PathBuf::from("/env/survey.sqlite3"));
        assert_eq!(
            resolve_db_path(Some("   ")),
            PathBuf::from("/env/survey.sqlite3")
        );

        std::env::set_var(DB_PATH_ENV, "  ");
        assert_eq!(resolve_db_path(None), fallback);

        std::env::remove_var(DB_PATH_ENV);
        assert_eq!(resolve_db_path(None), fallback);
        assert_eq!(resolve_db_path(Some("")), fallback);
    }
}
