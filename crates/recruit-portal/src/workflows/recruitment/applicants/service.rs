use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    AnswerBundle, ApplicantId, ApplicantProfile, ApplicantRecord, DepartmentStatus, ReviewStatus,
    StatusEntry,
};
use super::repository::{ApplicantRepository, RepositoryError};
use crate::config::PortalConfig;
use crate::workflows::recruitment::departments::{DepartmentCode, DepartmentRegistry};
use crate::workflows::recruitment::progress::{is_complete, progress_percent, ProgressView};
use crate::workflows::recruitment::report::{
    ApplicantSummaryView, ListingQuery, Page, StatisticsReport,
};

/// Who is writing a review. Authentication happens upstream; this only carries the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reviewer {
    /// Core team member, may review every department.
    Core,
    /// Lead of a single department.
    DepartmentLead(DepartmentCode),
}

impl Reviewer {
    pub fn may_review(&self, department: &DepartmentCode) -> bool {
        match self {
            Reviewer::Core => true,
            Reviewer::DepartmentLead(own) => own == department,
        }
    }

    /// Department whose status drives this reviewer's listings and counts.
    pub fn scope(&self) -> Option<&DepartmentCode> {
        match self {
            Reviewer::Core => None,
            Reviewer::DepartmentLead(own) => Some(own),
        }
    }
}

/// Per-department status row for the applicant dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStatusView {
    pub department: DepartmentCode,
    pub label: String,
    pub answered: bool,
    #[serde(flatten)]
    pub status: DepartmentStatus,
}

/// Service composing the department registry, repository and portal rules.
pub struct PortalService<R> {
    registry: Arc<DepartmentRegistry>,
    repository: Arc<R>,
    config: PortalConfig,
}

static APPLICANT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_applicant_id() -> ApplicantId {
    let id = APPLICANT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicantId(format!("applicant-{id:06}"))
}

impl<R> PortalService<R>
where
    R: ApplicantRepository + 'static,
{
    pub fn new(repository: Arc<R>, registry: Arc<DepartmentRegistry>, config: PortalConfig) -> Self {
        Self {
            registry,
            repository,
            config,
        }
    }

    pub fn registry(&self) -> &DepartmentRegistry {
        &self.registry
    }

    /// Create an applicant account with an empty application.
    pub fn register(
        &self,
        profile: ApplicantProfile,
        now: DateTime<Utc>,
    ) -> Result<ApplicantRecord, PortalServiceError> {
        let record = ApplicantRecord::new(next_applicant_id(), profile, now);
        let stored = self.repository.insert(record)?;
        info!(applicant = %stored.id.0, "registered applicant");
        Ok(stored)
    }

    pub fn get(&self, id: &ApplicantId) -> Result<ApplicantRecord, PortalServiceError> {
        let record = self
            .repository
            .load(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Replace the applicant's department choice.
    ///
    /// Aliases are normalized and duplicates dropped before the limit is checked. Answers and
    /// statuses of departments that fall out of the selection are left in place.
    pub fn select_departments<S: AsRef<str>>(
        &self,
        id: &ApplicantId,
        raw_departments: &[S],
    ) -> Result<ApplicantRecord, PortalServiceError> {
        let mut record = self.get(id)?;
        if record.application_submitted {
            warn!(applicant = %id.0, "selection change after submission rejected");
            return Err(SelectionError::Locked.into());
        }

        let codes = self.registry.normalize_all(raw_departments);
        if let Some(unknown) = codes.iter().find(|code| !code.is_known()) {
            return Err(SelectionError::UnknownDepartment(unknown.to_string()).into());
        }
        if codes.len() > self.config.max_departments {
            return Err(SelectionError::TooMany {
                max: self.config.max_departments,
                requested: codes.len(),
            }
            .into());
        }

        self.repository.write_selected_departments(id, &codes)?;
        record.selected_departments = codes.iter().map(|code| code.as_str().to_string()).collect();

        info!(
            applicant = %id.0,
            departments = ?record.selected_departments,
            "updated department selection"
        );
        Ok(record)
    }

    /// Save one department form. Only that department's answers are written.
    pub fn save_answers(
        &self,
        id: &ApplicantId,
        raw_department: &str,
        answers: AnswerBundle,
    ) -> Result<ApplicantRecord, PortalServiceError> {
        let mut record = self.get(id)?;
        if record.application_submitted {
            warn!(applicant = %id.0, department = raw_department, "form edit after submission rejected");
            return Err(SelectionError::Locked.into());
        }

        let code = self.registry.normalize(raw_department);
        if !code.is_known() {
            return Err(SelectionError::UnknownDepartment(code.to_string()).into());
        }
        if !record.has_selected(&self.registry, &code) {
            return Err(SelectionError::NotSelected(code.to_string()).into());
        }

        self.repository
            .write_department_answers(id, &code, answers.clone())?;
        record
            .department_answers
            .insert(code.as_str().to_string(), answers);

        info!(
            applicant = %id.0,
            department = %code,
            progress = progress_percent(&self.registry, &record),
            "saved department answers"
        );
        Ok(record)
    }

    /// Final submission. Repeating it returns the stored record untouched.
    pub fn submit(
        &self,
        id: &ApplicantId,
        now: DateTime<Utc>,
    ) -> Result<ApplicantRecord, PortalServiceError> {
        let record = self.get(id)?;
        if record.application_submitted {
            debug!(applicant = %id.0, "application already submitted");
            return Ok(record);
        }

        if record.selected_codes(&self.registry).is_empty() {
            return Err(SubmissionError::NothingSelected.into());
        }
        if !is_complete(&self.registry, &record) {
            return Err(SubmissionError::Incomplete {
                percent: progress_percent(&self.registry, &record),
            }
            .into());
        }

        self.repository.mark_submitted(id, now)?;
        let stored = self.get(id)?;
        info!(applicant = %id.0, submitted_at = ?stored.submitted_at, "application submitted");
        Ok(stored)
    }

    /// Record a reviewer decision for one department, replacing any earlier entry for it.
    pub fn review(
        &self,
        reviewer: &Reviewer,
        id: &ApplicantId,
        raw_department: &str,
        status: ReviewStatus,
        feedback: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<StatusEntry, PortalServiceError> {
        let code = self.registry.normalize(raw_department);
        if !code.is_known() {
            return Err(ReviewError::UnknownDepartment(code.to_string()).into());
        }
        if !reviewer.may_review(&code) {
            warn!(applicant = %id.0, department = %code, ?reviewer, "review outside reviewer scope");
            return Err(ReviewError::OutsideScope(code.to_string()).into());
        }

        let record = self.get(id)?;
        if !record.application_submitted {
            return Err(ReviewError::NotSubmitted.into());
        }
        if !record.has_selected(&self.registry, &code) {
            return Err(ReviewError::NotSelected(code.to_string()).into());
        }

        let entry = StatusEntry {
            status,
            feedback: feedback.filter(|text| !text.trim().is_empty()),
            updated_at: now,
        };
        self.repository
            .write_department_status(id, &code, entry.clone())?;

        info!(
            applicant = %id.0,
            department = %code,
            status = status.label(),
            "recorded department review"
        );
        Ok(entry)
    }

    pub fn progress(&self, id: &ApplicantId) -> Result<ProgressView, PortalServiceError> {
        let record = self.get(id)?;
        Ok(ProgressView::build(&self.registry, &record))
    }

    /// Status of every selected department, pending where no review exists yet.
    pub fn statuses(
        &self,
        id: &ApplicantId,
    ) -> Result<Vec<DepartmentStatusView>, PortalServiceError> {
        let record = self.get(id)?;
        Ok(self.status_views(&record))
    }

    pub(crate) fn status_views(&self, record: &ApplicantRecord) -> Vec<DepartmentStatusView> {
        record
            .selected_codes(&self.registry)
            .into_iter()
            .map(|code| DepartmentStatusView {
                label: code.label().to_string(),
                answered: record.answers(&self.registry, code.as_str()).is_some(),
                status: record.status_for(&self.registry, &code),
                department: code,
            })
            .collect()
    }

    pub fn statistics(
        &self,
        scope: Option<&DepartmentCode>,
    ) -> Result<StatisticsReport, PortalServiceError> {
        let records = self.repository.load_all()?;
        Ok(StatisticsReport::build(&self.registry, &records, scope))
    }

    pub fn listing(
        &self,
        query: &ListingQuery,
    ) -> Result<Page<ApplicantSummaryView>, PortalServiceError> {
        let records = self.repository.load_all()?;
        let page = query.apply(&self.registry, &records, self.config.page_size);
        debug!(
            matched = page.total_items,
            page = page.page,
            "built applicant listing"
        );
        Ok(page.map(|record| {
            ApplicantSummaryView::build(&self.registry, record, query.scope.as_ref())
        }))
    }
}

/// Applicant-side edit rejected by the portal rules.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown department '{0}'")]
    UnknownDepartment(String),
    #[error("at most {max} departments may be selected, got {requested}")]
    TooMany { max: usize, requested: usize },
    #[error("department '{0}' is not part of this application")]
    NotSelected(String),
    #[error("application is already submitted and can no longer be edited")]
    Locked,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("select at least one department before submitting")]
    NothingSelected,
    #[error("every selected department form must be saved before submitting ({percent}% done)")]
    Incomplete { percent: u8 },
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("unknown department '{0}'")]
    UnknownDepartment(String),
    #[error("reviewer may not review department '{0}'")]
    OutsideScope(String),
    #[error("applicant did not apply to department '{0}'")]
    NotSelected(String),
    #[error("application has not been submitted yet")]
    NotSubmitted,
}

/// Error raised by the portal service.
#[derive(Debug, thiserror::Error)]
pub enum PortalServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Review(#[from] ReviewError),
}

impl PortalServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            PortalServiceError::Repository(RepositoryError::Conflict)
            | PortalServiceError::Selection(SelectionError::Locked)
            | PortalServiceError::Review(ReviewError::NotSubmitted) => StatusCode::CONFLICT,
            PortalServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            PortalServiceError::Review(ReviewError::OutsideScope(_)) => StatusCode::FORBIDDEN,
            PortalServiceError::Selection(_)
            | PortalServiceError::Submission(_)
            | PortalServiceError::Review(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
