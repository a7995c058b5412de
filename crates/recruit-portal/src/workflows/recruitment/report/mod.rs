mod listing;
mod summary;
pub mod views;

pub use listing::{ListingQuery, ListingState, Page, SortKey, SubmissionFilter};
pub use summary::{aggregate, DepartmentStats, Stats, StatisticsReport};
pub use views::ApplicantSummaryView;
