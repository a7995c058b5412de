pub mod applicants;
pub mod departments;
pub mod progress;
pub mod report;
pub mod status;

pub use departments::{Department, DepartmentCode, DepartmentRegistry};
pub use progress::ProgressView;
pub use report::{
    aggregate, ApplicantSummaryView, DepartmentStats, ListingQuery, ListingState, Page, SortKey,
    Stats, StatisticsReport, SubmissionFilter,
};
pub use status::{effective_department_status, effective_overall_status};
