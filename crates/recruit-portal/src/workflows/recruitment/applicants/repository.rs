use chrono::{DateTime, Utc};

use super::domain::{AnswerBundle, ApplicantId, ApplicantRecord, StatusEntry};
use crate::workflows::recruitment::departments::DepartmentCode;

/// Storage abstraction so the service can be exercised without a database.
///
/// Department writes are scoped: an implementation must update only the one department key it
/// is given (a field-level update in document stores), never overwrite the whole map from a
/// snapshot. Two reviewers saving different departments of the same applicant at the same time
/// must both see their entry persisted.
pub trait ApplicantRepository: Send + Sync {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError>;
    fn load_all(&self) -> Result<Vec<ApplicantRecord>, RepositoryError>;
    fn load(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError>;
    fn write_selected_departments(
        &self,
        id: &ApplicantId,
        departments: &[DepartmentCode],
    ) -> Result<(), RepositoryError>;
    fn write_department_status(
        &self,
        id: &ApplicantId,
        department: &DepartmentCode,
        entry: StatusEntry,
    ) -> Result<(), RepositoryError>;
    fn write_department_answers(
        &self,
        id: &ApplicantId,
        department: &DepartmentCode,
        answers: AnswerBundle,
    ) -> Result<(), RepositoryError>;
    /// Set the submitted flag and timestamp. Calling it on a submitted record changes nothing.
    fn mark_submitted(&self, id: &ApplicantId, at: DateTime<Utc>) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
