//! Application state model for a multi-department recruitment portal.
//!
//! Applicants pick departments, fill one form per department and submit once. Reviewers record a
//! status per department. Everything admin views show (progress, effective status, counts and
//! listings) is derived here from plain applicant records.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
