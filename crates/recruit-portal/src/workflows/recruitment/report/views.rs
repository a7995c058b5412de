use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::applicants::{ApplicantId, ApplicantRecord, ReviewStatus};
use super::super::departments::{DepartmentCode, DepartmentRegistry};
use super::super::progress::progress_percent;
use super::super::status::effective_overall_status;

/// Row shown in admin applicant listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantSummaryView {
    pub id: ApplicantId,
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub departments: Vec<DepartmentCode>,
    pub submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: ReviewStatus,
    pub status_label: &'static str,
    pub progress_percent: u8,
}

impl ApplicantSummaryView {
    pub fn build(
        registry: &DepartmentRegistry,
        record: &ApplicantRecord,
        scope: Option<&DepartmentCode>,
    ) -> Self {
        let status = effective_overall_status(registry, record, scope);
        Self {
            id: record.id.clone(),
            name: record.profile.name_or_empty().to_string(),
            email: record.profile.email_or_empty().to_string(),
            registration_number: record.profile.registration_number_or_empty().to_string(),
            departments: record.selected_codes(registry),
            submitted: record.application_submitted,
            submitted_at: record.submitted_at,
            status,
            status_label: status.label(),
            progress_percent: progress_percent(registry, record),
        }
    }
}
