use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::super::applicants::{ApplicantRecord, ReviewStatus};
use super::super::departments::{DepartmentCode, DepartmentRegistry};
use super::super::status::effective_overall_status;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionFilter {
    #[default]
    All,
    Submitted,
    NotSubmitted,
}

impl SubmissionFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Some(Self::All),
            "submitted" => Some(Self::Submitted),
            "not-submitted" | "not_submitted" | "draft" => Some(Self::NotSubmitted),
            _ => None,
        }
    }

    fn accepts(self, record: &ApplicantRecord) -> bool {
        match self {
            Self::All => true,
            Self::Submitted => record.application_submitted,
            Self::NotSubmitted => !record.application_submitted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Name,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "newest" | "" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

/// Filter, sort and page selection for an admin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring matched against name, email and registration number.
    pub search: String,
    pub status: Option<ReviewStatus>,
    /// Keep applicants who selected this department.
    pub department: Option<DepartmentCode>,
    /// Department lead restriction; also decides which status the status filter reads.
    pub scope: Option<DepartmentCode>,
    pub submission: SubmissionFilter,
    pub sort: SortKey,
    /// One-based.
    pub page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            department: None,
            scope: None,
            submission: SubmissionFilter::All,
            sort: SortKey::Newest,
            page: 1,
        }
    }
}

impl ListingQuery {
    pub fn matches(&self, registry: &DepartmentRegistry, record: &ApplicantRecord) -> bool {
        if let Some(scope) = &self.scope {
            if !record.has_selected(registry, scope) {
                return false;
            }
        }

        if let Some(department) = &self.department {
            if !record.has_selected(registry, department) {
                return false;
            }
        }

        if !self.submission.accepts(record) {
            return false;
        }

        if let Some(status) = self.status {
            // status buckets only exist for submitted applications
            if !record.application_submitted {
                return false;
            }
            let scope = self.scope.as_ref().or(self.department.as_ref());
            if effective_overall_status(registry, record, scope) != status {
                return false;
            }
        }

        matches_search(record, &self.search)
    }

    /// Filter, stable-sort and slice `records`.
    pub fn apply<'a>(
        &self,
        registry: &DepartmentRegistry,
        records: &'a [ApplicantRecord],
        page_size: usize,
    ) -> Page<&'a ApplicantRecord> {
        let mut matched = records
            .iter()
            .filter(|record| self.matches(registry, record))
            .collect::<Vec<_>>();
        sort_records(&mut matched, self.sort);
        Page::paginate(matched, self.page, page_size)
    }
}

fn matches_search(record: &ApplicantRecord, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let profile = &record.profile;
    [
        profile.name_or_empty(),
        profile.email_or_empty(),
        profile.registration_number_or_empty(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

fn sort_records(records: &mut Vec<&ApplicantRecord>, sort: SortKey) {
    match sort {
        SortKey::Newest => records.sort_by(|a, b| by_activity(a, b, true)),
        SortKey::Oldest => records.sort_by(|a, b| by_activity(a, b, false)),
        SortKey::Name => {
            let mut keyed = records
                .drain(..)
                .map(|record| (record.profile.name_or_empty().to_lowercase(), record))
                .collect::<Vec<_>>();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            records.extend(keyed.into_iter().map(|(_, record)| record));
        }
    }
}

/// Orders by activity time. Records with no timestamp go last in either direction.
fn by_activity(a: &ApplicantRecord, b: &ApplicantRecord, newest_first: bool) -> Ordering {
    match (a.activity_at(), b.activity_at()) {
        (Some(left), Some(right)) if newest_first => right.cmp(&left),
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `items` to `page`, clamped into `1..=total_pages`.
    pub fn paginate(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);

        let items = items
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Listing controls held across interactions. Changing any filter or the sort order sends the
/// view back to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    query: ListingQuery,
    page_size: usize,
}

impl ListingState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: ListingQuery::default(),
            page_size: page_size.max(1),
        }
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.query.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.query.search != search {
            self.query.search = search;
            self.query.page = 1;
        }
    }

    pub fn set_status(&mut self, status: Option<ReviewStatus>) {
        if self.query.status != status {
            self.query.status = status;
            self.query.page = 1;
        }
    }

    pub fn set_department(&mut self, department: Option<DepartmentCode>) {
        if self.query.department != department {
            self.query.department = department;
            self.query.page = 1;
        }
    }

    pub fn set_scope(&mut self, scope: Option<DepartmentCode>) {
        if self.query.scope != scope {
            self.query.scope = scope;
            self.query.page = 1;
        }
    }

    pub fn set_submission(&mut self, submission: SubmissionFilter) {
        if self.query.submission != submission {
            self.query.submission = submission;
            self.query.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.query.sort != sort {
            self.query.sort = sort;
            self.query.page = 1;
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        if self.query.page < total_pages {
            self.query.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        self.query.page = self.query.page.saturating_sub(1).max(1);
    }

    pub fn apply<'a>(
        &mut self,
        registry: &DepartmentRegistry,
        records: &'a [ApplicantRecord],
    ) -> Page<&'a ApplicantRecord> {
        let page = self.query.apply(registry, records, self.page_size);
        // remember the clamped page so next/previous move from what was shown
        self.query.page = page.page;
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::recruitment::applicants::{
        ApplicantId, ApplicantProfile, StatusEntry,
    };
    use crate::workflows::recruitment::departments::Department;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 9, 0, 0).single().expect("valid")
    }

    fn applicant(id: &str, name: Option<&str>, created: u32) -> ApplicantRecord {
        let profile = ApplicantProfile {
            name: name.map(str::to_string),
            email: Some(format!("{id}@campus.example")),
            registration_number: Some(format!("REG-{id}")),
            phone: None,
        };
        let mut record = ApplicantRecord::new(ApplicantId(id.to_string()), profile, day(created));
        record.selected_departments = vec!["dev".to_string()];
        record
    }

    fn submit(record: &mut ApplicantRecord, on: u32) {
        record.application_submitted = true;
        record.submitted_at = Some(day(on));
    }

    fn set_status(record: &mut ApplicantRecord, raw: &str, status: ReviewStatus) {
        record.department_statuses.insert(
            raw.to_string(),
            StatusEntry {
                status,
                feedback: None,
                updated_at: day(20),
            },
        );
    }

    fn ids(page: &Page<&ApplicantRecord>) -> Vec<String> {
        page.items.iter().map(|record| record.id.0.clone()).collect()
    }

    #[test]
    fn status_filter_uses_any_department_approval() {
        let registry = DepartmentRegistry::standard();
        let mut approved = applicant("a", Some("Asha"), 1);
        approved.selected_departments = vec!["dev".to_string(), "design".to_string()];
        approved.status = Some(ReviewStatus::Pending);
        set_status(&mut approved, "design", ReviewStatus::Approved);
        set_status(&mut approved, "dev", ReviewStatus::Rejected);
        submit(&mut approved, 2);
        let mut pending = applicant("b", Some("Bilal"), 1);
        submit(&mut pending, 3);

        let records = vec![approved, pending];
        let query = ListingQuery {
            status: Some(ReviewStatus::Approved),
            ..ListingQuery::default()
        };
        let page = query.apply(&registry, &records, 10);
        assert_eq!(ids(&page), vec!["a"]);
    }

    #[test]
    fn status_filter_with_department_reads_that_department() {
        let registry = DepartmentRegistry::standard();
        let mut record = applicant("a", Some("Asha"), 1);
        record.selected_departments = vec!["dev".to_string(), "design".to_string()];
        set_status(&mut record, "design", ReviewStatus::Approved);
        set_status(&mut record, "dev", ReviewStatus::Rejected);
        submit(&mut record, 2);
        let records = vec![record];

        let query = ListingQuery {
            status: Some(ReviewStatus::Approved),
            department: Some(DepartmentCode::Known(Department::Dev)),
            ..ListingQuery::default()
        };
        assert!(query.apply(&registry, &records, 10).items.is_empty());

        let query = ListingQuery {
            status: Some(ReviewStatus::Rejected),
            ..query
        };
        assert_eq!(query.apply(&registry, &records, 10).total_items, 1);
    }

    #[test]
    fn status_filter_ignores_stale_alias_entries() {
        let registry = DepartmentRegistry::standard();
        let mut record = applicant("a", Some("Asha"), 1);
        set_status(&mut record, "webDev", ReviewStatus::Approved);
        set_status(&mut record, "dev", ReviewStatus::Rejected);
        submit(&mut record, 2);
        let records = vec![record];

        let approved = ListingQuery {
            status: Some(ReviewStatus::Approved),
            ..ListingQuery::default()
        };
        assert!(approved.apply(&registry, &records, 10).items.is_empty());

        let rejected = ListingQuery {
            status: Some(ReviewStatus::Rejected),
            ..approved
        };
        assert_eq!(ids(&rejected.apply(&registry, &records, 10)), vec!["a"]);
    }

    #[test]
    fn unsubmitted_records_never_match_a_status() {
        let registry = DepartmentRegistry::standard();
        let records = vec![applicant("draft", Some("Dee"), 1)];
        let query = ListingQuery {
            status: Some(ReviewStatus::Pending),
            ..ListingQuery::default()
        };
        assert!(query.apply(&registry, &records, 10).items.is_empty());
    }

    #[test]
    fn filters_compose() {
        let registry = DepartmentRegistry::standard();
        let mut ana = applicant("ana", Some("Ana Gomez"), 1);
        submit(&mut ana, 2);
        let mut anil = applicant("anil", Some("Anil Rao"), 1);
        anil.selected_departments = vec!["robotics".to_string()];
        submit(&mut anil, 3);
        let anton = applicant("anton", Some("Anton"), 1);

        let records = vec![ana, anil, anton];
        let query = ListingQuery {
            search: "AN".to_string(),
            department: Some(DepartmentCode::Known(Department::Dev)),
            submission: SubmissionFilter::Submitted,
            ..ListingQuery::default()
        };
        assert_eq!(ids(&query.apply(&registry, &records, 10)), vec!["ana"]);
    }

    #[test]
    fn search_covers_email_and_registration_number() {
        let registry = DepartmentRegistry::standard();
        let records = vec![applicant("x1", None, 1), applicant("y2", Some("Yara"), 1)];

        let by_email = ListingQuery {
            search: "X1@CAMPUS".to_string(),
            ..ListingQuery::default()
        };
        assert_eq!(ids(&by_email.apply(&registry, &records, 10)), vec!["x1"]);

        let by_reg = ListingQuery {
            search: "reg-y2".to_string(),
            ..ListingQuery::default()
        };
        assert_eq!(ids(&by_reg.apply(&registry, &records, 10)), vec!["y2"]);
    }

    #[test]
    fn newest_and_oldest_prefer_submission_time() {
        let registry = DepartmentRegistry::standard();
        let mut early = applicant("early", Some("E"), 1);
        submit(&mut early, 10);
        let late = applicant("late", Some("L"), 5);
        let mut tie = applicant("tie", Some("T"), 2);
        submit(&mut tie, 10);
        let mut undated = applicant("undated", Some("U"), 1);
        undated.created_at = None;

        let records = vec![undated, early, late, tie];
        let newest = ListingQuery::default();
        assert_eq!(
            ids(&newest.apply(&registry, &records, 10)),
            vec!["early", "tie", "late", "undated"]
        );

        let oldest = ListingQuery {
            sort: SortKey::Oldest,
            ..ListingQuery::default()
        };
        assert_eq!(
            ids(&oldest.apply(&registry, &records, 10)),
            vec!["late", "early", "tie", "undated"]
        );
    }

    #[test]
    fn name_sort_is_case_insensitive_and_stable() {
        let registry = DepartmentRegistry::standard();
        let records = vec![
            applicant("1", Some("bea"), 1),
            applicant("2", None, 1),
            applicant("3", Some("Adam"), 1),
            applicant("4", Some("BEA"), 1),
        ];
        let query = ListingQuery {
            sort: SortKey::Name,
            ..ListingQuery::default()
        };
        assert_eq!(
            ids(&query.apply(&registry, &records, 10)),
            vec!["2", "3", "1", "4"]
        );
    }

    #[test]
    fn pages_are_clamped() {
        let page = Page::paginate((1..=25).collect::<Vec<_>>(), 9, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(!page.has_next());

        let empty = Page::paginate(Vec::<u8>::new(), 0, 10);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn changing_the_search_resets_to_first_page() {
        let registry = DepartmentRegistry::standard();
        let records = (0..30)
            .map(|n| applicant(&format!("app{n:02}"), Some("Sam"), 1))
            .collect::<Vec<_>>();
        let mut state = ListingState::new(5);
        state.set_search("a");
        state.go_to_page(3);
        assert_eq!(state.apply(&registry, &records).page, 3);

        state.set_search("ab");
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn every_filter_change_resets_pagination() {
        let mut state = ListingState::new(5);
        let changes: [fn(&mut ListingState); 5] = [
            |state: &mut ListingState| state.set_status(Some(ReviewStatus::Approved)),
            |state: &mut ListingState| {
                state.set_department(Some(DepartmentCode::Known(Department::Design)))
            },
            |state: &mut ListingState| {
                state.set_scope(Some(DepartmentCode::Known(Department::Events)))
            },
            |state: &mut ListingState| state.set_submission(SubmissionFilter::NotSubmitted),
            |state: &mut ListingState| state.set_sort(SortKey::Name),
        ];
        for change in changes {
            state.go_to_page(4);
            change(&mut state);
            assert_eq!(state.current_page(), 1);
        }

        state.go_to_page(4);
        state.set_sort(SortKey::Name);
        assert_eq!(state.current_page(), 4, "unchanged sort keeps the page");
    }

    #[test]
    fn next_and_previous_stay_in_bounds() {
        let mut state = ListingState::new(5);
        state.previous_page();
        assert_eq!(state.current_page(), 1);
        state.next_page(2);
        state.next_page(2);
        assert_eq!(state.current_page(), 2);
    }
}
