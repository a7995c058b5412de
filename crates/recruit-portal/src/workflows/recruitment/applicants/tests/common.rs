use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::PortalConfig;
use crate::workflows::recruitment::applicants::domain::{
    AnswerBundle, ApplicantId, ApplicantProfile, ApplicantRecord, StatusEntry,
};
use crate::workflows::recruitment::applicants::repository::{
    ApplicantRepository, RepositoryError,
};
use crate::workflows::recruitment::applicants::{portal_router, PortalService};
use crate::workflows::recruitment::departments::{DepartmentCode, DepartmentRegistry};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn later() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 3, 16, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn profile(name: &str) -> ApplicantProfile {
    let slug = name.to_lowercase().replace(' ', ".");
    ApplicantProfile {
        name: Some(name.to_string()),
        email: Some(format!("{slug}@campus.example")),
        registration_number: Some(format!("21BCE{:04}", name.len() * 37)),
        phone: Some("+91 98450 00000".to_string()),
    }
}

pub(super) fn answers(motivation: &str) -> AnswerBundle {
    serde_json::from_value(json!({
        "motivation": motivation,
        "dynamicFields": {
            "portfolio": { "value": "https://example.dev", "label": "Portfolio link" }
        }
    }))
    .expect("answer bundle parses")
}

pub(super) fn portal_config() -> PortalConfig {
    PortalConfig {
        max_departments: 2,
        page_size: 2,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ApplicantId, ApplicantRecord>>>,
}

impl MemoryRepository {
    fn with_record<T>(
        &self,
        id: &ApplicantId,
        apply: impl FnOnce(&mut ApplicantRecord) -> T,
    ) -> Result<T, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        Ok(apply(record))
    }
}

impl ApplicantRepository for MemoryRepository {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn load_all(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        let mut records = guard.values().cloned().collect::<Vec<_>>();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn load(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn write_selected_departments(
        &self,
        id: &ApplicantId,
        departments: &[DepartmentCode],
    ) -> Result<(), RepositoryError> {
        self.with_record(id, |record| {
            record.selected_departments = departments
                .iter()
                .map(|code| code.as_str().to_string())
                .collect();
        })
    }

    fn write_department_status(
        &self,
        id: &ApplicantId,
        department: &DepartmentCode,
        entry: StatusEntry,
    ) -> Result<(), RepositoryError> {
        self.with_record(id, |record| {
            record
                .department_statuses
                .insert(department.as_str().to_string(), entry);
        })
    }

    fn write_department_answers(
        &self,
        id: &ApplicantId,
        department: &DepartmentCode,
        answers: AnswerBundle,
    ) -> Result<(), RepositoryError> {
        self.with_record(id, |record| {
            record
                .department_answers
                .insert(department.as_str().to_string(), answers);
        })
    }

    fn mark_submitted(&self, id: &ApplicantId, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        self.with_record(id, |record| {
            if !record.application_submitted {
                record.application_submitted = true;
                record.submitted_at = Some(at);
            }
        })
    }
}

/// Repository whose reads always fail.
pub(super) struct UnavailableRepository;

impl ApplicantRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        Err(unavailable())
    }

    fn load_all(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        Err(unavailable())
    }

    fn load(&self, _id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Err(unavailable())
    }

    fn write_selected_departments(
        &self,
        _id: &ApplicantId,
        _departments: &[DepartmentCode],
    ) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    fn write_department_status(
        &self,
        _id: &ApplicantId,
        _department: &DepartmentCode,
        _entry: StatusEntry,
    ) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    fn write_department_answers(
        &self,
        _id: &ApplicantId,
        _department: &DepartmentCode,
        _answers: AnswerBundle,
    ) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    fn mark_submitted(&self, _id: &ApplicantId, _at: DateTime<Utc>) -> Result<(), RepositoryError> {
        Err(unavailable())
    }
}

fn unavailable() -> RepositoryError {
    RepositoryError::Unavailable("document store offline".to_string())
}

pub(super) fn build_service() -> (PortalService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PortalService::new(
        repository.clone(),
        Arc::new(DepartmentRegistry::standard()),
        portal_config(),
    );
    (service, repository)
}

/// Register an applicant, select `departments`, and save a form for each of them.
pub(super) fn completed_applicant(
    service: &PortalService<MemoryRepository>,
    name: &str,
    departments: &[&str],
) -> ApplicantRecord {
    let record = service
        .register(profile(name), now())
        .expect("registration succeeds");
    service
        .select_departments(&record.id, departments)
        .expect("selection succeeds");
    let mut latest = record;
    for department in departments {
        latest = service
            .save_answers(&latest.id, department, answers("keen to help"))
            .expect("answers saved");
    }
    latest
}

pub(super) fn submitted_applicant(
    service: &PortalService<MemoryRepository>,
    name: &str,
    departments: &[&str],
) -> ApplicantRecord {
    let record = completed_applicant(service, name, departments);
    service
        .submit(&record.id, now())
        .expect("submission succeeds")
}

pub(super) fn application_router_with_service(
    service: PortalService<MemoryRepository>,
) -> axum::Router {
    portal_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
