use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{AnswerBundle, ApplicantId, ApplicantProfile, ReviewStatus};
use super::repository::ApplicantRepository;
use super::service::{PortalService, PortalServiceError, Reviewer};
use crate::workflows::recruitment::departments::DepartmentCode;
use crate::workflows::recruitment::progress::ProgressView;
use crate::workflows::recruitment::report::{
    ListingQuery, SortKey, StatisticsReport, SubmissionFilter,
};

/// Router builder exposing applicant and admin endpoints.
pub fn portal_router<R>(service: Arc<PortalService<R>>) -> Router
where
    R: ApplicantRepository + 'static,
{
    Router::new()
        .route("/api/v1/applicants", post(register_handler::<R>))
        .route("/api/v1/applicants/:applicant_id", get(applicant_handler::<R>))
        .route(
            "/api/v1/applicants/:applicant_id/departments",
            put(selection_handler::<R>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/departments/:department/answers",
            put(answers_handler::<R>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/submit",
            post(submit_handler::<R>),
        )
        .route(
            "/api/v1/admin/applicants/:applicant_id/departments/:department/status",
            put(review_handler::<R>),
        )
        .route("/api/v1/admin/stats", get(stats_handler::<R>))
        .route("/api/v1/admin/applicants", get(listing_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectionRequest {
    pub(crate) departments: Vec<String>,
}

/// Reviewer authority as forwarded by the authenticating proxy.
#[derive(Debug, Deserialize)]
pub(crate) struct ReviewerPayload {
    pub(crate) role: String,
    #[serde(default)]
    pub(crate) department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) reviewer: ReviewerPayload,
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) feedback: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatsParams {
    #[serde(default)]
    pub(crate) department: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingParams {
    #[serde(default)]
    pub(crate) q: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) department: Option<String>,
    #[serde(default)]
    pub(crate) scope: Option<String>,
    #[serde(default)]
    pub(crate) submission: Option<String>,
    #[serde(default)]
    pub(crate) sort: Option<String>,
    #[serde(default)]
    pub(crate) page: Option<usize>,
}

fn error_response(error: PortalServiceError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        error!(%error, "portal request failed");
    }
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Json(profile): Json<ApplicantProfile>,
) -> Response
where
    R: ApplicantRepository + 'static,
{
    match service.register(profile, Utc::now()) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn applicant_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    R: ApplicantRepository + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.get(&id) {
        Ok(record) => {
            let progress = ProgressView::build(service.registry(), &record);
            let statuses = service.status_views(&record);
            let payload = json!({
                "applicant": record,
                "progress": progress,
                "statuses": statuses,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn selection_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(applicant_id): Path<String>,
    Json(request): Json<SelectionRequest>,
) -> Response
where
    R: ApplicantRepository + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.select_departments(&id, &request.departments) {
        Ok(record) => {
            let progress = ProgressView::build(service.registry(), &record);
            (StatusCode::OK, Json(progress)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn answers_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path((applicant_id, department)): Path<(String, String)>,
    Json(answers): Json<AnswerBundle>,
) -> Response
where
    R: ApplicantRepository + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.save_answers(&id, &department, answers) {
        Ok(record) => {
            let progress = ProgressView::build(service.registry(), &record);
            (StatusCode::OK, Json(progress)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    R: ApplicantRepository + 'static,
{
    let id = ApplicantId(applicant_id);
    match service.submit(&id, Utc::now()) {
        Ok(record) => {
            let payload = json!({
                "applicant_id": record.id,
                "submitted": record.application_submitted,
                "submitted_at": record.submitted_at,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn review_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Path((applicant_id, department)): Path<(String, String)>,
    Json(request): Json<ReviewRequest>,
) -> Response
where
    R: ApplicantRepository + 'static,
{
    let reviewer = match parse_reviewer(&service, request.reviewer) {
        Ok(reviewer) => reviewer,
        Err(message) => return bad_request(message),
    };
    let Some(status) = ReviewStatus::parse(&request.status) else {
        return bad_request(format!("unknown review status '{}'", request.status));
    };

    let id = ApplicantId(applicant_id);
    match service.review(
        &reviewer,
        &id,
        &department,
        status,
        request.feedback,
        Utc::now(),
    ) {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(other) => error_response(other),
    }
}

fn parse_reviewer<R>(
    service: &PortalService<R>,
    payload: ReviewerPayload,
) -> Result<Reviewer, String>
where
    R: ApplicantRepository + 'static,
{
    match payload.role.trim().to_ascii_lowercase().as_str() {
        "core" | "admin" => Ok(Reviewer::Core),
        "lead" | "department_lead" => {
            let raw = payload
                .department
                .ok_or_else(|| "department leads must name their department".to_string())?;
            let code = service.registry().normalize(&raw);
            if !code.is_known() {
                return Err(format!("unknown department '{raw}'"));
            }
            Ok(Reviewer::DepartmentLead(code))
        }
        other => Err(format!("unknown reviewer role '{other}'")),
    }
}

fn parse_department<R>(
    service: &PortalService<R>,
    raw: Option<String>,
) -> Option<DepartmentCode>
where
    R: ApplicantRepository + 'static,
{
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| service.registry().normalize(&value))
}

pub(crate) async fn stats_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Query(params): Query<StatsParams>,
) -> Response
where
    R: ApplicantRepository + 'static,
{
    let scope = parse_department(&service, params.department);
    match service.statistics(scope.as_ref()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(other) => {
            // show an empty report rather than partial counts
            error!(error = %other, "statistics unavailable");
            let empty = StatisticsReport::empty(service.registry(), scope.as_ref());
            let payload = json!({
                "error": other.to_string(),
                "scope": empty.scope,
                "overall": empty.overall,
                "departments": empty.departments,
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn listing_handler<R>(
    State(service): State<Arc<PortalService<R>>>,
    Query(params): Query<ListingParams>,
) -> Response
where
    R: ApplicantRepository + 'static,
{
    let query = match listing_query(&service, params) {
        Ok(query) => query,
        Err(message) => return bad_request(message),
    };

    match service.listing(&query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(other) => error_response(other),
    }
}

fn listing_query<R>(
    service: &PortalService<R>,
    params: ListingParams,
) -> Result<ListingQuery, String>
where
    R: ApplicantRepository + 'static,
{
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            ReviewStatus::parse(raw).ok_or_else(|| format!("unknown status filter '{raw}'"))?,
        ),
    };
    let submission = match params.submission.as_deref() {
        None => SubmissionFilter::All,
        Some(raw) => SubmissionFilter::parse(raw)
            .ok_or_else(|| format!("unknown submission filter '{raw}'"))?,
    };
    let sort = match params.sort.as_deref() {
        None => SortKey::Newest,
        Some(raw) => SortKey::parse(raw).ok_or_else(|| format!("unknown sort key '{raw}'"))?,
    };

    Ok(ListingQuery {
        search: params.q.unwrap_or_default(),
        status,
        department: parse_department(service, params.department),
        scope: parse_department(service, params.scope),
        submission,
        sort,
        page: params.page.unwrap_or(1),
    })
}
