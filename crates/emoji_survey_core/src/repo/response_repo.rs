//! Survey response store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist completed responses and the single in-progress draft.
//! - Provide list/count/delete/reset and store statistics.
//!
//! # Invariants
//! - Response ids are unique; inserting a known id is an error, never an
//!   overwrite.
//! - Inserting a response clears the draft in the same transaction.
//! - Listing preserves insertion order.
//! - Corrupted rows are dropped on read and logged; callers never see them.

use crate::db::migrations::latest_version;
use crate::db::{table_exists, table_has_column, DbError};
use crate::model::draft::SurveyDraft;
use crate::model::response::{
    Frequency, Gender, Impact, ResponseId, SurveyResponse, ValidationError,
};
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const RESPONSE_SELECT_SQL: &str = "SELECT
    seq,
    id,
    timestamp,
    frequency,
    clarity_impact,
    tone_influence,
    professional_context,
    age,
    gender
FROM survey_responses";

const RESPONSE_COLUMNS: &[&str] = &[
    "seq",
    "id",
    "timestamp",
    "frequency",
    "clarity_impact",
    "tone_influence",
    "professional_context",
    "age",
    "gender",
];

const DRAFT_COLUMNS: &[&str] = &["slot", "draft_data", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for survey persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// A response with this id is already stored.
    DuplicateId(ResponseId),
    NotFound(ResponseId),
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "response id already exists: {id}"),
            Self::NotFound(id) => write!(f, "response not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted survey data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Exact-match filter for counting responses. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseFilter {
    pub frequency: Option<Frequency>,
    pub clarity_impact: Option<Impact>,
    pub tone_influence: Option<Impact>,
    pub professional_context: Option<Impact>,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
}

/// Store-level statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Readable responses; corrupted rows are not counted.
    pub total_responses: u64,
    pub has_draft: bool,
    pub database_size_bytes: u64,
}

/// Repository interface for the survey store.
pub trait ResponseRepository {
    /// Validates and stores one response, clearing the draft.
    fn insert_response(&self, response: &SurveyResponse) -> RepoResult<()>;
    /// Returns every readable response in insertion order.
    fn list_responses(&self) -> RepoResult<Vec<SurveyResponse>>;
    /// Counts readable responses matching `filter`.
    fn count_responses(&self, filter: &ResponseFilter) -> RepoResult<u64>;
    /// Removes one response by id.
    fn delete_response(&self, id: &str) -> RepoResult<()>;
    /// Replaces the draft slot.
    fn save_draft(&self, draft: &SurveyDraft) -> RepoResult<()>;
    /// Loads the draft; an unreadable draft is reported as absent.
    fn get_draft(&self) -> RepoResult<Option<SurveyDraft>>;
    /// Empties the draft slot. Idempotent.
    fn clear_draft(&self) -> RepoResult<()>;
    /// Removes every response and the draft.
    fn clear_all(&self) -> RepoResult<()>;
    fn stats(&self) -> RepoResult<StoreStats>;
}

/// SQLite-backed survey store.
pub struct SqliteResponseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResponseRepository<'conn> {
    /// Creates a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_responses(&self, filter: &ResponseFilter) -> RepoResult<Vec<SurveyResponse>> {
        let mut sql = format!("{RESPONSE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        let text_filters = [
            ("frequency", filter.frequency.map(Frequency::as_str)),
            ("clarity_impact", filter.clarity_impact.map(Impact::as_str)),
            ("tone_influence", filter.tone_influence.map(Impact::as_str)),
            (
                "professional_context",
                filter.professional_context.map(Impact::as_str),
            ),
            ("gender", filter.gender.map(Gender::as_str)),
        ];
        for (column, value) in text_filters {
            if let Some(value) = value {
                sql.push_str(&format!(" AND {column} = ?"));
                bind_values.push(Value::Text(value.to_string()));
            }
        }
        if let Some(age) = filter.age {
            sql.push_str(" AND age = ?");
            bind_values.push(Value::Integer(i64::from(age)));
        }

        sql.push_str(" ORDER BY seq ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut responses = Vec::new();
        let mut dropped = 0_usize;

        while let Some(row) = rows.next()? {
            match parse_response_row(row) {
                Ok(response) => responses.push(response),
                Err(RepoError::InvalidData(message)) => {
                    dropped += 1;
                    let seq: Option<i64> = row.get("seq").ok();
                    warn!(
                        "event=response_row_dropped module=repo status=recovered seq={} reason={}",
                        seq.map_or_else(|| "unknown".to_string(), |seq| seq.to_string()),
                        message
                    );
                }
                Err(other) => return Err(other),
            }
        }

        debug!(
            "event=responses_query module=repo status=ok returned={} dropped={}",
            responses.len(),
            dropped
        );
        Ok(responses)
    }
}

impl ResponseRepository for SqliteResponseRepository<'_> {
    fn insert_response(&self, response: &SurveyResponse) -> RepoResult<()> {
        response.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM survey_responses WHERE id = ?1;",
                [response.id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(RepoError::DuplicateId(response.id.clone()));
        }

        tx.execute(
            "INSERT INTO survey_responses (
                id,
                timestamp,
                frequency,
                clarity_impact,
                tone_influence,
                professional_context,
                age,
                gender
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                response.id.as_str(),
                response.timestamp.as_str(),
                response.frequency.as_str(),
                response.clarity_impact.as_str(),
                response.tone_influence.as_str(),
                response.professional_context.as_str(),
                i64::from(response.age),
                response.gender.as_str(),
            ],
        )?;
        tx.execute("DELETE FROM survey_drafts;", [])?;
        tx.commit()?;

        info!(
            "event=response_insert module=repo status=ok response_id={}",
            response.id
        );
        Ok(())
    }

    fn list_responses(&self) -> RepoResult<Vec<SurveyResponse>> {
        self.query_responses(&ResponseFilter::default())
    }

    fn count_responses(&self, filter: &ResponseFilter) -> RepoResult<u64> {
        let matched = self.query_responses(filter)?;
        Ok(matched.len() as u64)
    }

    fn delete_response(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM survey_responses WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        info!("event=response_delete module=repo status=ok response_id={id}");
        Ok(())
    }

    fn save_draft(&self, draft: &SurveyDraft) -> RepoResult<()> {
        let payload = serde_json::to_string(draft)
            .map_err(|err| RepoError::InvalidData(format!("draft is not serializable: {err}")))?;
        self.conn.execute(
            "INSERT INTO survey_drafts (slot, draft_data)
             VALUES (1, ?1)
             ON CONFLICT(slot) DO UPDATE SET
                draft_data = excluded.draft_data,
                updated_at = (strftime('%s', 'now') * 1000);",
            [payload],
        )?;
        debug!("event=draft_save module=repo status=ok");
        Ok(())
    }

    fn get_draft(&self) -> RepoResult<Option<SurveyDraft>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT draft_data FROM survey_drafts WHERE slot = 1;",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<SurveyDraft>(&payload) {
            Ok(draft) => Ok(Some(draft)),
            Err(err) => {
                warn!(
                    "event=draft_row_dropped module=repo status=recovered reason={}",
                    err
                );
                Ok(None)
            }
        }
    }

    fn clear_draft(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM survey_drafts;", [])?;
        debug!("event=draft_clear module=repo status=ok");
        Ok(())
    }

    fn clear_all(&self) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM survey_responses;", [])?;
        tx.execute("DELETE FROM survey_drafts;", [])?;
        tx.commit()?;

        info!("event=store_clear module=repo status=ok removed={removed}");
        Ok(())
    }

    fn stats(&self) -> RepoResult<StoreStats> {
        let total_responses = self.count_responses(&ResponseFilter::default())?;
        let has_draft: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM survey_drafts);",
            [],
            |row| row.get(0),
        )?;
        let page_count: i64 = self
            .conn
            .query_row("PRAGMA page_count;", [], |row| row.get(0))?;
        let page_size: i64 = self
            .conn
            .query_row("PRAGMA page_size;", [], |row| row.get(0))?;

        Ok(StoreStats {
            total_responses,
            has_draft: has_draft == 1,
            database_size_bytes: u64::try_from(page_count.saturating_mul(page_size))
                .unwrap_or(0),
        })
    }
}

fn parse_response_row(row: &Row<'_>) -> RepoResult<SurveyResponse> {
    let id = required_text(row, "id")?;
    let timestamp = required_text(row, "timestamp")?;

    let frequency_text = required_text(row, "frequency")?;
    let frequency = Frequency::parse(&frequency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid frequency `{frequency_text}` in survey_responses.frequency"
        ))
    })?;
    let clarity_impact = parse_impact_column(row, "clarity_impact")?;
    let tone_influence = parse_impact_column(row, "tone_influence")?;
    let professional_context = parse_impact_column(row, "professional_context")?;

    let age = match row.get_ref("age")?.as_i64_or_null() {
        Ok(Some(age)) => u8::try_from(age).map_err(|_| {
            RepoError::InvalidData(format!("invalid age `{age}` in survey_responses.age"))
        })?,
        _ => {
            return Err(RepoError::InvalidData(
                "missing or non-integer survey_responses.age".to_string(),
            ));
        }
    };

    let gender_text = required_text(row, "gender")?;
    let gender = Gender::parse(&gender_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid gender `{gender_text}` in survey_responses.gender"
        ))
    })?;

    let response = SurveyResponse {
        id,
        timestamp,
        frequency,
        clarity_impact,
        tone_influence,
        professional_context,
        age,
        gender,
    };
    response
        .validate()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    Ok(response)
}

fn parse_impact_column(row: &Row<'_>, column: &'static str) -> RepoResult<Impact> {
    let text = required_text(row, column)?;
    Impact::parse(&text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid impact `{text}` in survey_responses.{column}"
        ))
    })
}

fn required_text(row: &Row<'_>, column: &'static str) -> RepoResult<String> {
    match row.get_ref(column)?.as_str_or_null() {
        Ok(Some(value)) => Ok(value.to_string()),
        _ => Err(RepoError::InvalidData(format!(
            "missing or non-text survey_responses.{column}"
        ))),
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in [
        ("survey_responses", RESPONSE_COLUMNS),
        ("survey_drafts", DRAFT_COLUMNS),
    ] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}
