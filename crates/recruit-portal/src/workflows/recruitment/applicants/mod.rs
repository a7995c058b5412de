//! Applicant records, the storage seam they travel through, and the service and HTTP router
//! built on top of the derived views.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerBundle, ApplicantId, ApplicantProfile, ApplicantRecord, DepartmentStatus, DynamicField,
    ReviewStatus, StatusEntry,
};
pub use repository::{ApplicantRepository, RepositoryError};
pub use router::portal_router;
pub use service::{
    DepartmentStatusView, PortalService, PortalServiceError, ReviewError, Reviewer,
    SelectionError, SubmissionError,
};
