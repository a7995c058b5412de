//! Applicant-facing completion tracking.
//!
//! A department form counts as complete as soon as an answer entry exists for it, even when every
//! field in that entry is blank. Stored applications were accepted under that rule, so tightening
//! it would shift completion percentages applicants have already seen.

use std::collections::BTreeSet;

use serde::Serialize;

use super::applicants::ApplicantRecord;
use super::departments::{DepartmentCode, DepartmentRegistry};

/// Selected departments whose form has been saved at least once.
pub fn completed_departments(
    registry: &DepartmentRegistry,
    record: &ApplicantRecord,
) -> BTreeSet<DepartmentCode> {
    let answered = record
        .department_answers
        .keys()
        .map(|raw| registry.normalize(raw))
        .collect::<BTreeSet<_>>();

    record
        .selected_codes(registry)
        .into_iter()
        .filter(|code| answered.contains(code))
        .collect()
}

pub fn is_department_complete(
    registry: &DepartmentRegistry,
    record: &ApplicantRecord,
    raw_department: &str,
) -> bool {
    let code = registry.normalize(raw_department);
    record.has_selected(registry, &code) && record.answers(registry, raw_department).is_some()
}

/// Rounded share of selected departments with a saved form; zero when nothing is selected.
pub fn progress_percent(registry: &DepartmentRegistry, record: &ApplicantRecord) -> u8 {
    let selected = record.selected_codes(registry).len();
    let completed = completed_departments(registry, record).len();
    percent(completed, selected)
}

fn percent(completed: usize, selected: usize) -> u8 {
    if selected == 0 {
        return 0;
    }
    // round-half-up on integers: floor((200c + s) / 2s)
    let rounded = (200 * completed + selected) / (2 * selected);
    rounded.min(100) as u8
}

pub fn is_complete(registry: &DepartmentRegistry, record: &ApplicantRecord) -> bool {
    let selected = record.selected_codes(registry);
    !selected.is_empty() && completed_departments(registry, record).len() == selected.len()
}

/// Progress snapshot rendered on the applicant dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    pub selected: Vec<DepartmentCode>,
    pub completed: Vec<DepartmentCode>,
    pub remaining: Vec<DepartmentCode>,
    pub percent: u8,
    pub complete: bool,
    pub submitted: bool,
}

impl ProgressView {
    pub fn build(registry: &DepartmentRegistry, record: &ApplicantRecord) -> Self {
        let selected = record.selected_codes(registry);
        let completed_set = completed_departments(registry, record);
        let (completed, remaining): (Vec<_>, Vec<_>) = selected
            .iter()
            .cloned()
            .partition(|code| completed_set.contains(code));

        Self {
            percent: percent(completed.len(), selected.len()),
            complete: !selected.is_empty() && remaining.is_empty(),
            submitted: record.application_submitted,
            selected,
            completed,
            remaining,
        }
    }
}
