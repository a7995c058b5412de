//! Effective status derivation shared by every admin view.

use super::applicants::{ApplicantRecord, ReviewStatus};
use super::departments::{DepartmentCode, DepartmentRegistry};

/// Status of one department; pending when no entry exists.
pub fn effective_department_status(
    registry: &DepartmentRegistry,
    record: &ApplicantRecord,
    department: &DepartmentCode,
) -> ReviewStatus {
    record.status_for(registry, department).status
}

/// Headline status for a record.
///
/// Scoped to a department (lead view) this is that department's status. Unscoped, approved in any
/// department outranks rejected in any department, which outranks pending. The result is for
/// display and counting only; it grants no write access.
pub fn effective_overall_status(
    registry: &DepartmentRegistry,
    record: &ApplicantRecord,
    scope: Option<&DepartmentCode>,
) -> ReviewStatus {
    if let Some(department) = scope {
        return effective_department_status(registry, record, department);
    }

    // one entry per department, canonical key over legacy aliases
    let statuses = record
        .status_entries(registry)
        .into_values()
        .map(|entry| entry.status);
    combine(statuses)
}

fn combine(statuses: impl IntoIterator<Item = ReviewStatus>) -> ReviewStatus {
    statuses
        .into_iter()
        .max_by_key(|status| precedence(*status))
        .unwrap_or_default()
}

const fn precedence(status: ReviewStatus) -> u8 {
    match status {
        ReviewStatus::Pending => 0,
        ReviewStatus::Rejected => 1,
        ReviewStatus::Approved => 2,
    }
}
