//! Survey use-case service.
//!
//! # Responsibility
//! - Turn wizard drafts into stored responses.
//! - Feed dashboard, export and share flows from the store.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::analytics::{self, DashboardSummary};
use crate::export::csv::{build_export, write_export, CsvExport, ExportError};
use crate::model::draft::SurveyDraft;
use crate::model::response::{now_timestamp, ResponseId, SurveyResponse, ValidationError};
use crate::repo::response_repo::{RepoError, ResponseFilter, ResponseRepository, StoreStats};
use crate::share::link::ShareSnapshot;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for survey use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller-supplied answers violate a field constraint.
    Validation(ValidationError),
    DuplicateId(ResponseId),
    NotFound(ResponseId),
    /// Export requested with no stored responses.
    EmptyDataset,
    /// Export file could not be written.
    Io(std::io::Error),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "response id already exists: {id}"),
            Self::NotFound(id) => write!(f, "response not found: {id}"),
            Self::EmptyDataset => write!(f, "no survey responses available to export"),
            Self::Io(err) => write!(f, "failed to write export: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::DuplicateId(id) => Self::DuplicateId(id),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        match value {
            ExportError::EmptyDataset => Self::EmptyDataset,
            ExportError::Io(err) => Self::Io(err),
        }
    }
}

/// Use-case service over a survey store.
pub struct SurveyService<R: ResponseRepository> {
    repo: R,
}

impl<R: ResponseRepository> SurveyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a fully built response.
    pub fn submit_response(&self, response: &SurveyResponse) -> ServiceResult<()> {
        self.repo.insert_response(response)?;
        Ok(())
    }

    /// Validates a wizard draft and stores it as a new response.
    ///
    /// # Contract
    /// - Generates a UUID v4 id and the current UTC timestamp.
    /// - On success the draft slot is empty.
    /// - On validation failure nothing is written and the draft is kept.
    pub fn submit_draft(&self, draft: &SurveyDraft) -> ServiceResult<SurveyResponse> {
        let response = draft.into_response(Uuid::new_v4().to_string(), now_timestamp())?;
        self.repo.insert_response(&response)?;
        Ok(response)
    }

    pub fn list_responses(&self) -> ServiceResult<Vec<SurveyResponse>> {
        Ok(self.repo.list_responses()?)
    }

    pub fn count_responses(&self, filter: &ResponseFilter) -> ServiceResult<u64> {
        Ok(self.repo.count_responses(filter)?)
    }

    pub fn delete_response(&self, id: &str) -> ServiceResult<()> {
        Ok(self.repo.delete_response(id)?)
    }

    pub fn save_draft(&self, draft: &SurveyDraft) -> ServiceResult<()> {
        Ok(self.repo.save_draft(draft)?)
    }

    pub fn get_draft(&self) -> ServiceResult<Option<SurveyDraft>> {
        Ok(self.repo.get_draft()?)
    }

    pub fn clear_draft(&self) -> ServiceResult<()> {
        Ok(self.repo.clear_draft()?)
    }

    pub fn clear_all(&self) -> ServiceResult<()> {
        Ok(self.repo.clear_all()?)
    }

    pub fn stats(&self) -> ServiceResult<StoreStats> {
        Ok(self.repo.stats()?)
    }

    /// Renders every stored response as CSV named after `export_date`.
    ///
    /// # Errors
    /// - `EmptyDataset` when the store holds no readable response.
    pub fn export_all(&self, export_date: NaiveDate) -> ServiceResult<CsvExport> {
        let responses = self.repo.list_responses()?;
        let export = build_export(&responses, export_date)?;
        info!(
            "event=export_render module=service status=ok rows={}",
            export.row_count
        );
        Ok(export)
    }

    /// Renders the export and writes it into `dir`.
    pub fn export_to_dir(
        &self,
        dir: impl AsRef<Path>,
        export_date: NaiveDate,
    ) -> ServiceResult<(PathBuf, CsvExport)> {
        let export = self.export_all(export_date)?;
        let path = write_export(dir, &export)?;
        Ok((path, export))
    }

    pub fn dashboard_summary(&self) -> ServiceResult<DashboardSummary> {
        let responses = self.repo.list_responses()?;
        Ok(analytics::dashboard_summary(&responses))
    }

    /// Captures the current headline counts for a share link.
    pub fn share_snapshot(&self) -> ServiceResult<ShareSnapshot> {
        let responses = self.repo.list_responses()?;
        let clarity = analytics::distribution_by_clarity(&responses);
        Ok(ShareSnapshot::from_distribution(responses.len() as u64, &clarity))
    }
}
