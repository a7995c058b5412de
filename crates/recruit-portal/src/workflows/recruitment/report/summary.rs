use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::super::applicants::{ApplicantRecord, ReviewStatus};
use super::super::departments::{DepartmentCode, DepartmentRegistry};
use super::super::status::effective_overall_status;

/// Head counts for one scope. Status buckets only ever hold submitted applications.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub submitted: usize,
    pub not_submitted: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl Stats {
    fn tally(&mut self, submitted: bool, status: impl FnOnce() -> ReviewStatus) {
        self.total += 1;
        if !submitted {
            self.not_submitted += 1;
            return;
        }

        self.submitted += 1;
        match status() {
            ReviewStatus::Pending => self.pending += 1,
            ReviewStatus::Approved => self.approved += 1,
            ReviewStatus::Rejected => self.rejected += 1,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.submitted + self.not_submitted == self.total
            && self.pending + self.approved + self.rejected == self.submitted
    }

    fn checked(self) -> Self {
        debug_assert_eq!(self.submitted + self.not_submitted, self.total);
        debug_assert_eq!(self.pending + self.approved + self.rejected, self.submitted);
        self
    }
}

/// Count records, optionally restricted to applicants of one department.
///
/// Without a scope every record counts, including applicants who never selected a department.
pub fn aggregate<'a, I>(
    registry: &DepartmentRegistry,
    records: I,
    scope: Option<&DepartmentCode>,
) -> Stats
where
    I: IntoIterator<Item = &'a ApplicantRecord>,
{
    let mut stats = Stats::default();
    for record in records {
        if let Some(department) = scope {
            if !record.has_selected(registry, department) {
                continue;
            }
        }
        stats.tally(record.application_submitted, || {
            effective_overall_status(registry, record, scope)
        });
    }
    stats.checked()
}

/// Counts for one department in a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStats {
    pub department: DepartmentCode,
    pub label: String,
    pub known: bool,
    #[serde(flatten)]
    pub stats: Stats,
}

/// Overall counts plus one row per department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<DepartmentCode>,
    pub overall: Stats,
    pub departments: Vec<DepartmentStats>,
}

impl StatisticsReport {
    /// Build the report in a single pass over `records`.
    ///
    /// Rows follow registry order and include departments nobody applied to; identifiers the
    /// registry does not recognize get their own rows afterwards. With a scope only that row is
    /// produced.
    pub fn build(
        registry: &DepartmentRegistry,
        records: &[ApplicantRecord],
        scope: Option<&DepartmentCode>,
    ) -> Self {
        let mut per_department: BTreeMap<DepartmentCode, Stats> = match scope {
            Some(department) => BTreeMap::from([(department.clone(), Stats::default())]),
            None => registry
                .all_codes()
                .into_iter()
                .map(|code| (code, Stats::default()))
                .collect(),
        };

        for record in records {
            // selected_codes is de-duplicated, so each applicant lands once per department
            for code in record.selected_codes(registry) {
                if scope.is_some_and(|department| *department != code) {
                    continue;
                }
                let stats = per_department.entry(code.clone()).or_default();
                stats.tally(record.application_submitted, || {
                    effective_overall_status(registry, record, Some(&code))
                });
            }
        }

        let overall = aggregate(registry, records, scope);
        let departments = per_department
            .into_iter()
            .map(|(department, stats)| DepartmentStats {
                label: department.label().to_string(),
                known: department.is_known(),
                department,
                stats: stats.checked(),
            })
            .collect::<Vec<_>>();

        debug!(
            records = records.len(),
            scope = scope.map(DepartmentCode::as_str),
            rows = departments.len(),
            "built applicant statistics"
        );

        Self {
            scope: scope.cloned(),
            overall,
            departments,
        }
    }

    /// Zeroed report shown when records could not be loaded.
    pub fn empty(registry: &DepartmentRegistry, scope: Option<&DepartmentCode>) -> Self {
        Self::build(registry, &[], scope)
    }

    pub fn department(&self, code: &DepartmentCode) -> Option<&DepartmentStats> {
        self.departments.iter().find(|row| row.department == *code)
    }
}
