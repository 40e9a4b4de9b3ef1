//! FFI use-case API for the survey UI.
//!
//! # Responsibility
//! - Expose wizard, dashboard, export and share use-cases as sync calls.
//! - Keep error semantics simple: every call returns an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Drafts and summaries cross the boundary as camelCase JSON strings.

use emoji_survey_core::db::open_db;
use emoji_survey_core::{
    build_share_url, core_version as core_version_inner, generate_report,
    init_logging as init_logging_inner, ping as ping_inner, resolve_db_path, snapshot_from_url,
    ServiceResult, SqliteResponseRepository, SurveyDraft, SurveyService,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

static SURVEY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Exposes the core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling logs.
/// - Repeating the same pair is a no-op; a different pair returns an error.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action envelope for wizard calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyActionResponse {
    pub ok: bool,
    /// Stored response id, set by successful submissions.
    pub response_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl SurveyActionResponse {
    fn success(message: impl Into<String>, response_id: Option<String>) -> Self {
        Self {
            ok: true,
            response_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            response_id: None,
            message: message.into(),
        }
    }
}

/// JSON payload envelope for dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyJsonResponse {
    pub ok: bool,
    /// Payload; `"{}"` on failure.
    pub json: String,
    pub message: String,
}

/// Result of writing a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyExportResponse {
    pub ok: bool,
    pub file_path: Option<String>,
    pub row_count: u32,
    pub message: String,
}

/// Shareable link built from the current counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinkResponse {
    pub ok: bool,
    pub url: Option<String>,
    pub message: String,
}

/// One metric row of the shared report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedReportMetric {
    pub label: String,
    pub value: u64,
    pub percentage: u64,
}

/// Read-only report rendered by the shared view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedReportView {
    /// Whether the URL carried a decodable snapshot.
    pub has_data: bool,
    pub title: String,
    pub summary: String,
    pub generated_at: String,
    pub metrics: Vec<SharedReportMetric>,
}

/// Replaces the in-progress draft with `draft_json`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Rejects payloads that are not a draft JSON object.
#[flutter_rust_bridge::frb(sync)]
pub fn survey_save_draft(draft_json: String) -> SurveyActionResponse {
    let draft = match parse_draft(&draft_json) {
        Ok(draft) => draft,
        Err(message) => return SurveyActionResponse::failure(message),
    };
    match with_survey_service(|service| service.save_draft(&draft)) {
        Ok(()) => SurveyActionResponse::success("Draft saved.", None),
        Err(err) => SurveyActionResponse::failure(format!("survey_save_draft failed: {err}")),
    }
}

/// Loads the draft as JSON, or `None` when there is none.
///
/// # FFI contract
/// - Storage failures are logged and reported as `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn survey_get_draft() -> Option<String> {
    match with_survey_service(|service| service.get_draft()) {
        Ok(draft) => draft.and_then(|draft| serde_json::to_string(&draft).ok()),
        Err(err) => {
            warn!("event=ffi_get_draft module=ffi status=error error={err}");
            None
        }
    }
}

/// Discards the draft.
#[flutter_rust_bridge::frb(sync)]
pub fn survey_clear_draft() -> SurveyActionResponse {
    match with_survey_service(|service| service.clear_draft()) {
        Ok(()) => SurveyActionResponse::success("Draft cleared.", None),
        Err(err) => SurveyActionResponse::failure(format!("survey_clear_draft failed: {err}")),
    }
}

/// Validates `draft_json` and stores it as a completed response.
///
/// # FFI contract
/// - On success returns the generated response id; the draft is cleared.
/// - Validation failures carry the offending field in `message`.
#[flutter_rust_bridge::frb(sync)]
pub fn survey_submit_draft(draft_json: String) -> SurveyActionResponse {
    let draft = match parse_draft(&draft_json) {
        Ok(draft) => draft,
        Err(message) => return SurveyActionResponse::failure(message),
    };
    match with_survey_service(|service| service.submit_draft(&draft)) {
        Ok(response) => SurveyActionResponse::success("Response submitted.", Some(response.id)),
        Err(err) => SurveyActionResponse::failure(format!("survey_submit_draft failed: {err}")),
    }
}

/// Returns every dashboard aggregate as one JSON document.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_summary_json() -> SurveyJsonResponse {
    let summary = with_survey_service(|service| service.dashboard_summary())
        .and_then(|summary| serde_json::to_string(&summary).map_err(|err| err.to_string()));
    match summary {
        Ok(json) => SurveyJsonResponse {
            ok: true,
            json,
            message: String::new(),
        },
        Err(err) => SurveyJsonResponse {
            ok: false,
            json: "{}".to_string(),
            message: format!("dashboard_summary_json failed: {err}"),
        },
    }
}

/// Writes all responses as CSV into `dir`, named after today's date.
#[flutter_rust_bridge::frb(sync)]
pub fn survey_export_csv(dir: String) -> SurveyExportResponse {
    let today = chrono::Local::now().date_naive();
    match with_survey_service(|service| service.export_to_dir(dir.trim(), today)) {
        Ok((path, export)) => SurveyExportResponse {
            ok: true,
            file_path: Some(path.display().to_string()),
            row_count: u32::try_from(export.row_count).unwrap_or(u32::MAX),
            message: format!("Exported {} response(s).", export.row_count),
        },
        Err(err) => SurveyExportResponse {
            ok: false,
            file_path: None,
            row_count: 0,
            message: format!("survey_export_csv failed: {err}"),
        },
    }
}

/// Builds a share link for `base_url` from the current counts.
#[flutter_rust_bridge::frb(sync)]
pub fn share_link(base_url: String) -> ShareLinkResponse {
    match with_survey_service(|service| service.share_snapshot()) {
        Ok(snapshot) => ShareLinkResponse {
            ok: true,
            url: Some(build_share_url(base_url.trim(), &snapshot)),
            message: String::new(),
        },
        Err(err) => ShareLinkResponse {
            ok: false,
            url: None,
            message: format!("share_link failed: {err}"),
        },
    }
}

/// Renders the report for a share URL.
///
/// # FFI contract
/// - Never fails: an absent or invalid token yields the placeholder report
///   with `has_data = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn shared_report(url: String) -> SharedReportView {
    let snapshot = snapshot_from_url(url.trim());
    let report = generate_report(snapshot.as_ref());
    SharedReportView {
        has_data: snapshot.is_some(),
        title: report.title.to_string(),
        summary: report.summary,
        generated_at: report.generated_at,
        metrics: report
            .metrics
            .into_iter()
            .map(|metric| SharedReportMetric {
                label: metric.label.to_string(),
                value: metric.value,
                percentage: metric.percentage,
            })
            .collect(),
    }
}

fn parse_draft(draft_json: &str) -> Result<SurveyDraft, String> {
    serde_json::from_str::<SurveyDraft>(draft_json)
        .map_err(|err| format!("invalid draft payload: {err}"))
}

fn resolve_survey_db_path() -> PathBuf {
    SURVEY_DB_PATH.get_or_init(|| resolve_db_path(None)).clone()
}

fn with_survey_service<T>(
    f: impl FnOnce(&SurveyService<SqliteResponseRepository<'_>>) -> ServiceResult<T>,
) -> Result<T, String> {
    let db_path = resolve_survey_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("survey DB open failed: {err}"))?;
    let repo = SqliteResponseRepository::try_new(&conn)
        .map_err(|err| format!("survey repo init failed: {err}"))?;
    let service = SurveyService::new(repo);
    f(&service).map_err(|err| err.to_string())
}
